use serde::{Deserialize, Serialize};

/// Number of behavioral dimensions in a [`FeatureVector`].
pub const FEATURE_DIMENSIONS: usize = 7;

/// Normalized behavioral summary of a session at one point in time.
///
/// Dimensions, in order: click-through rate, scroll completion, normalized
/// session minutes, bounced (0/1), conversion rate, normalized feature-use
/// frequency, navigation efficiency. Every component lies in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_DIMENSIONS]);

impl FeatureVector {
    /// Build a vector, clamping each component into [0, 1].
    /// Non-finite components become 0.
    pub fn new(values: [f64; FEATURE_DIMENSIONS]) -> Self {
        let mut clamped = [0.0; FEATURE_DIMENSIONS];
        for (slot, value) in clamped.iter_mut().zip(values) {
            *slot = if value.is_finite() { value.clamp(0.0, 1.0) } else { 0.0 };
        }
        Self(clamped)
    }

    pub fn zero() -> Self {
        Self([0.0; FEATURE_DIMENSIONS])
    }

    pub fn values(&self) -> &[f64; FEATURE_DIMENSIONS] {
        &self.0
    }

    /// Euclidean distance to another vector.
    pub fn distance(&self, other: &FeatureVector) -> f64 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
            .sqrt()
    }

    /// Component-wise mean. Returns the zero vector for an empty input.
    pub fn mean<'a>(vectors: impl IntoIterator<Item = &'a FeatureVector>) -> Self {
        let mut sum = [0.0; FEATURE_DIMENSIONS];
        let mut count = 0usize;
        for v in vectors {
            for (acc, x) in sum.iter_mut().zip(v.0.iter()) {
                *acc += x;
            }
            count += 1;
        }
        if count == 0 {
            return Self::zero();
        }
        for acc in sum.iter_mut() {
            *acc /= count as f64;
        }
        Self::new(sum)
    }
}

impl From<[f64; FEATURE_DIMENSIONS]> for FeatureVector {
    fn from(values: [f64; FEATURE_DIMENSIONS]) -> Self {
        Self::new(values)
    }
}
