use serde::Serialize;

use crate::models::{Badge, BadgeSet};

/// Multi-hot indicator vector over the badge vocabulary
///
/// Position `i` is 1.0 exactly when `Badge::ALL[i]` is selected. The array
/// type pins the length to the vocabulary size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector(pub [f64; Badge::COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn dot(&self, other: &FeatureVector) -> f64 {
        self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum()
    }

    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn squared_distance(&self, other: &FeatureVector) -> f64 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum()
    }

    /// Whether the badge at `feature` is set
    pub fn is_set(&self, feature: usize) -> bool {
        self.0[feature] > 0.5
    }
}

/// Encodes a badge selection as a multi-hot vector
pub fn encode(badges: &BadgeSet) -> FeatureVector {
    let mut vector = [0.0; Badge::COUNT];
    for badge in badges.iter() {
        vector[badge.index()] = 1.0;
    }
    FeatureVector(vector)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_sets_exactly_selected_positions() {
        let badges: BadgeSet = [Badge::InnerFlow, Badge::OffThePath, Badge::JournalToSelf]
            .into_iter()
            .collect();
        let vector = encode(&badges);

        assert_eq!(vector.as_slice().len(), 18);
        for badge in Badge::ALL {
            let expected = if badges.contains(*badge) { 1.0 } else { 0.0 };
            assert_eq!(vector.0[badge.index()], expected, "{}", badge);
        }
    }

    #[test]
    fn test_encode_empty_selection_is_zero_vector() {
        let vector = encode(&BadgeSet::new());
        assert!(vector.as_slice().iter().all(|v| *v == 0.0));
        assert_eq!(vector.norm(), 0.0);
    }

    #[test]
    fn test_every_single_badge_encodes_one_hot() {
        for badge in Badge::ALL {
            let vector = encode(&[*badge].into_iter().collect());
            assert_eq!(vector.as_slice().iter().sum::<f64>(), 1.0);
            assert!(vector.is_set(badge.index()));
        }
    }

    #[test]
    fn test_distance_and_dot() {
        let a = encode(&[Badge::FoodSoul, Badge::SoloTraveler].into_iter().collect());
        let b = encode(&[Badge::FoodSoul].into_iter().collect());
        assert_eq!(a.dot(&b), 1.0);
        assert_eq!(a.squared_distance(&b), 1.0);
    }
}
