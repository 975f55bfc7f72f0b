/// Named scalar morph channels of a face mesh. Channel order is the asset's
/// native order; indices stay stable for the lifetime of the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct MorphTargetSet {
    names: Vec<String>,
    weights: Vec<f32>,
}

impl MorphTargetSet {
    pub fn new(names: Vec<String>, weights: Vec<f32>) -> Self {
        debug_assert_eq!(names.len(), weights.len());
        Self { names, weights }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = (usize, &str)> {
        self.names.iter().enumerate().map(|(i, n)| (i, n.as_str()))
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn weight(&self, index: usize) -> f32 {
        self.weights.get(index).copied().unwrap_or(0.0)
    }

    /// Influences are clamped to [0, 1]; out-of-range writes never leak
    /// into the scene.
    pub fn set_weight(&mut self, index: usize, value: f32) {
        if let Some(weight) = self.weights.get_mut(index) {
            *weight = value.clamp(0.0, 1.0);
        }
    }
}
