use std::collections::HashMap;
use nalgebra::Vector3;

/// Scalar field data on mesh nodes
#[derive(Debug, Clone)]
pub struct ScalarField {
    pub name: String,
    pub data: Vec<f64>,
}

/// Min / max / mean of a scalar field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRange {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl ScalarField {
    pub fn new(name: &str, data: Vec<f64>) -> Self {
        Self {
            name: name.to_string(),
            data,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value range, `None` for an empty field
    ///
    /// This is the span a color map over the field is scaled to.
    pub fn range(&self) -> Option<FieldRange> {
        if self.data.is_empty() {
            return None;
        }
        let min = self.data.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = self.data.iter().sum::<f64>() / self.data.len() as f64;
        Some(FieldRange { min, max, mean })
    }
}

/// Vector field data on mesh elements (one value per element)
#[derive(Debug, Clone)]
pub struct ElementVectorField {
    pub name: String,
    pub data: Vec<Vector3<f64>>,
}

impl ElementVectorField {
    pub fn new(name: &str, data: Vec<Vector3<f64>>) -> Self {
        Self {
            name: name.to_string(),
            data,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Largest vector magnitude in the field
    pub fn max_magnitude(&self) -> f64 {
        self.data.iter().map(|v| v.norm()).fold(0.0, f64::max)
    }
}

/// Named fields attached to a mesh
#[derive(Debug, Clone, Default)]
pub struct FieldData {
    pub scalar_fields: HashMap<String, ScalarField>,
    pub element_vector_fields: HashMap<String, ElementVectorField>,
}

impl FieldData {
    pub fn new() -> Self {
        Self {
            scalar_fields: HashMap::new(),
            element_vector_fields: HashMap::new(),
        }
    }

    /// Add a nodal scalar field, replacing any field with the same name
    pub fn add_field(&mut self, field: ScalarField) {
        self.scalar_fields.insert(field.name.clone(), field);
    }

    /// Add a per-element vector field
    pub fn add_element_vector_field(&mut self, field: ElementVectorField) {
        self.element_vector_fields.insert(field.name.clone(), field);
    }

    pub fn get_field(&self, name: &str) -> Option<&ScalarField> {
        self.scalar_fields.get(name)
    }

    pub fn get_element_vector_field(&self, name: &str) -> Option<&ElementVectorField> {
        self.element_vector_fields.get(name)
    }

    pub fn num_fields(&self) -> usize {
        self.scalar_fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scalar_fields.is_empty() && self.element_vector_fields.is_empty()
    }
}
