//! Polygon triangulation
//!
//! The mesh generator only depends on the [`Triangulator`] trait: a flat list
//! of 2D coordinates (outer ring followed by optional hole rings) goes in, a
//! flat list of vertex indices comes out, every three forming one triangle.
//!
//! [`EarClipping`] is the bundled implementation, a thin wrapper over the
//! `earcutr` port of earcut. Output triangles are always counter-clockwise in
//! the input plane, whatever the orientation of the input rings.

use crate::errors::TriangulationError;

/// Polygon triangulation primitive
pub trait Triangulator {
    /// Triangulate a polygon
    ///
    /// # Arguments
    /// * `coords` - Flat vertex coordinates `[x0, y0, x1, y1, ...]`
    /// * `hole_starts` - Vertex index at which each hole ring begins
    /// * `dim` - Coordinates per vertex (must be 2)
    ///
    /// # Returns
    /// Vertex indices, three per triangle
    fn triangulate(
        &self,
        coords: &[f64],
        hole_starts: &[usize],
        dim: usize,
    ) -> Result<Vec<usize>, TriangulationError>;
}

/// Ear-clipping triangulator backed by `earcutr`
///
/// Rings are validated before triangulation so malformed input is reported
/// with a specific error rather than an empty triangle list.
#[derive(Debug, Clone, Copy, Default)]
pub struct EarClipping;

impl Triangulator for EarClipping {
    fn triangulate(
        &self,
        coords: &[f64],
        hole_starts: &[usize],
        dim: usize,
    ) -> Result<Vec<usize>, TriangulationError> {
        if dim != 2 {
            return Err(TriangulationError::UnsupportedDimension(dim));
        }
        if coords.len() % dim != 0 {
            return Err(TriangulationError::RaggedCoordinates { len: coords.len(), dim });
        }
        let vertices = coords.len() / dim;
        check_rings(vertices, hole_starts)?;

        let mut triangles = earcutr::earcut(coords, hole_starts, dim)
            .map_err(|_| TriangulationError::Failed { vertices })?;
        if triangles.is_empty() {
            return Err(TriangulationError::Failed { vertices });
        }

        let point = |i: usize| [coords[2 * i], coords[2 * i + 1]];
        for tri in triangles.chunks_exact_mut(3) {
            if orient(point(tri[0]), point(tri[1]), point(tri[2])) < 0.0 {
                tri.swap(1, 2);
            }
        }

        Ok(triangles)
    }
}

/// Hole offsets must increase and leave every ring at least 3 vertices
fn check_rings(vertices: usize, hole_starts: &[usize]) -> Result<(), TriangulationError> {
    let mut start = 0;
    for &offset in hole_starts {
        if offset <= start || offset >= vertices {
            return Err(TriangulationError::InvalidHoleOffset { offset, vertices });
        }
        if offset - start < 3 {
            return Err(TriangulationError::DegenerateRing { start, count: offset - start });
        }
        start = offset;
    }

    if vertices - start < 3 {
        return Err(TriangulationError::DegenerateRing { start, count: vertices - start });
    }
    Ok(())
}

/// Twice the signed area of triangle (a, b, c); positive when counter-clockwise
fn orient(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}
