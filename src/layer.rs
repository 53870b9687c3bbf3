use serde::{Deserialize, Serialize};

use crate::errors::MeshError;

/// Box dimensions of a layer: width (x), height (y), depth (z)
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Dimensions {
    pub w: f64,
    pub h: f64,
    pub d: f64,
}

/// Center of a layer
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A rectangular material prism in the device stack
///
/// `y` is the stacking axis; the footprint lies in the x-z plane.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Layer {
    pub name: String,
    /// Display color (0xRRGGBB), carried through to elements untouched
    #[serde(default)]
    pub color: u32,
    pub dimensions: Dimensions,
    pub position: Position,
}

/// Axis-aligned extents of a layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerExtents {
    pub x0: f64,
    pub x1: f64,
    pub z0: f64,
    pub z1: f64,
    pub y_bottom: f64,
    pub y_top: f64,
}

impl Layer {
    pub fn new(name: &str, color: u32, dimensions: Dimensions, position: Position) -> Self {
        Self {
            name: name.to_string(),
            color,
            dimensions,
            position,
        }
    }

    /// Shorthand for `Layer::new` taking raw numbers `(w, h, d)` and `(x, y, z)`
    pub fn boxed(name: &str, color: u32, size: (f64, f64, f64), center: (f64, f64, f64)) -> Self {
        Self::new(
            name,
            color,
            Dimensions { w: size.0, h: size.1, d: size.2 },
            Position { x: center.0, y: center.1, z: center.2 },
        )
    }

    pub fn extents(&self) -> LayerExtents {
        let dim = &self.dimensions;
        let pos = &self.position;
        LayerExtents {
            x0: pos.x - dim.w / 2.0,
            x1: pos.x + dim.w / 2.0,
            z0: pos.z - dim.d / 2.0,
            z1: pos.z + dim.d / 2.0,
            y_bottom: pos.y - dim.h / 2.0,
            y_top: pos.y + dim.h / 2.0,
        }
    }

    /// Number of in-plane cells along x and z for a target cell size
    pub fn divisions(&self, density: f64) -> (usize, usize) {
        let nx = (self.dimensions.w / density).round().max(1.0) as usize;
        let nz = (self.dimensions.d / density).round().max(1.0) as usize;
        (nx, nz)
    }

    pub fn volume(&self) -> f64 {
        self.dimensions.w * self.dimensions.h * self.dimensions.d
    }

    /// Reject zero-size or non-finite boxes before any node is created
    pub fn validate(&self) -> Result<(), MeshError> {
        let invalid = |reason: String| MeshError::InvalidLayerGeometry {
            layer: self.name.clone(),
            reason,
        };

        let dim = &self.dimensions;
        for (label, value) in [("width", dim.w), ("height", dim.h), ("depth", dim.d)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(format!("{} must be positive and finite, got {}", label, value)));
            }
        }

        let pos = &self.position;
        if !(pos.x.is_finite() && pos.y.is_finite() && pos.z.is_finite()) {
            return Err(invalid(format!(
                "position ({}, {}, {}) is not finite",
                pos.x, pos.y, pos.z
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_extents_from_center() {
        let layer = Layer::boxed("Oxide", 0x00aaff, (80.0, 10.0, 60.0), (0.0, 5.0, 10.0));
        let e = layer.extents();

        assert_relative_eq!(e.x0, -40.0);
        assert_relative_eq!(e.x1, 40.0);
        assert_relative_eq!(e.z0, -20.0);
        assert_relative_eq!(e.z1, 40.0);
        assert_relative_eq!(e.y_bottom, 0.0);
        assert_relative_eq!(e.y_top, 10.0);
    }

    #[test]
    fn test_divisions_clamped_to_one() {
        let layer = Layer::boxed("Metal", 0xcccccc, (10.0, 15.0, 60.0), (-20.0, 17.5, 0.0));

        assert_eq!(layer.divisions(10.0), (1, 6));
        // 10 / 50 rounds to 0, clamped to 1
        assert_eq!(layer.divisions(50.0), (1, 1));
        assert_eq!(layer.divisions(4.0), (3, 15));
    }

    #[test]
    fn test_validate_rejects_flat_layer() {
        let layer = Layer::boxed("Flat", 0, (10.0, 0.0, 10.0), (0.0, 0.0, 0.0));
        match layer.validate() {
            Err(MeshError::InvalidLayerGeometry { layer, reason }) => {
                assert_eq!(layer, "Flat");
                assert!(reason.contains("height"));
            }
            other => panic!("expected invalid geometry, got {:?}", other),
        }

        let nan = Layer::boxed("Nan", 0, (10.0, 1.0, 10.0), (f64::NAN, 0.0, 0.0));
        assert!(nan.validate().is_err());

        let ok = Layer::boxed("Ok", 0, (10.0, 1.0, 10.0), (0.0, 0.0, 0.0));
        assert!(ok.validate().is_ok());
    }
}
