//! Badge-vector classifiers.
//!
//! All implementations share one contract: a multi-hot vector goes in and an
//! archetype from the fixed vocabulary comes out. Which one is fitted is
//! chosen by `ClassifierKind`.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::Archetype,
    services::encoder::FeatureVector,
};

pub mod forest;
pub mod knn;
pub mod logistic;

pub use forest::{ForestParams, RandomForest};
pub use knn::KNearestNeighbors;
pub use logistic::{LogisticParams, LogisticRegression};

/// Seed for the train/test shuffle, fixed so the split is repeatable
pub const SPLIT_SEED: u64 = 42;

/// Fraction of samples held out for the accuracy report
pub const TEST_FRACTION: f64 = 0.2;

/// A labeled training example
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub features: FeatureVector,
    pub label: Archetype,
}

/// A fitted model mapping a feature vector to an archetype
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Archetype;

    /// Human-readable model name for reports and logs
    fn name(&self) -> &'static str;
}

/// Which classifier to fit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    #[default]
    LogisticRegression,
    RandomForest,
    #[serde(rename = "knn", alias = "k_nearest_neighbors")]
    KNearestNeighbors,
}

impl ClassifierKind {
    /// Fits a classifier of this kind on `samples`
    pub fn fit<R: Rng>(self, samples: &[Sample], rng: &mut R) -> AppResult<Box<dyn Classifier>> {
        if samples.is_empty() {
            return Err(AppError::Training(
                "Cannot fit a classifier on zero samples".to_string(),
            ));
        }

        let model: Box<dyn Classifier> = match self {
            ClassifierKind::LogisticRegression => {
                Box::new(LogisticRegression::fit(samples, &LogisticParams::default()))
            }
            ClassifierKind::RandomForest => {
                Box::new(RandomForest::fit(samples, &ForestParams::default(), rng))
            }
            ClassifierKind::KNearestNeighbors => {
                Box::new(KNearestNeighbors::fit(samples, knn::DEFAULT_K))
            }
        };

        tracing::debug!(
            model = model.name(),
            samples = samples.len(),
            "Classifier fitted"
        );

        Ok(model)
    }
}

/// Shuffles with a fixed seed and splits off `test_fraction` of the items
///
/// The test share is rounded up, so any non-empty input with a positive
/// fraction yields at least one test item.
pub fn train_test_split<T: Clone>(items: &[T], test_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut indices: Vec<usize> = (0..items.len()).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));

    let test_count = ((items.len() as f64) * test_fraction).ceil() as usize;
    let test_count = test_count.min(items.len());

    let (test_idx, train_idx) = indices.split_at(test_count);
    let train = train_idx.iter().map(|&i| items[i].clone()).collect();
    let test = test_idx.iter().map(|&i| items[i].clone()).collect();
    (train, test)
}

/// Fraction of `samples` the model labels correctly; 0.0 for an empty set
pub fn accuracy(model: &dyn Classifier, samples: &[Sample]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let correct = samples
        .iter()
        .filter(|s| model.predict(&s.features) == s.label)
        .count();
    correct as f64 / samples.len() as f64
}

/// Index of the largest value; earlier entries win ties
pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, value) in values.iter().enumerate() {
        if *value > values[best] {
            best = i;
        }
    }
    best
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::models::Badge;

    #[test]
    fn test_split_sizes() {
        let items: Vec<u32> = (0..200).collect();
        let (train, test) = train_test_split(&items, TEST_FRACTION, SPLIT_SEED);
        assert_eq!(train.len(), 160);
        assert_eq!(test.len(), 40);
    }

    #[test]
    fn test_split_is_a_partition() {
        let items: Vec<u32> = (0..57).collect();
        let (train, test) = train_test_split(&items, TEST_FRACTION, SPLIT_SEED);
        let mut all: Vec<u32> = train.into_iter().chain(test).collect();
        all.sort();
        assert_eq!(all, items);
    }

    #[test]
    fn test_split_is_repeatable() {
        let items: Vec<u32> = (0..30).collect();
        assert_eq!(
            train_test_split(&items, 0.2, 42),
            train_test_split(&items, 0.2, 42)
        );
    }

    #[test]
    fn test_fit_rejects_empty_samples() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = ClassifierKind::LogisticRegression.fit(&[], &mut rng);
        assert!(matches!(result, Err(AppError::Training(_))));
    }

    #[test]
    fn test_every_kind_learns_separable_clusters() {
        let samples = separable_samples();
        for kind in [
            ClassifierKind::LogisticRegression,
            ClassifierKind::RandomForest,
            ClassifierKind::KNearestNeighbors,
        ] {
            let mut rng = StdRng::seed_from_u64(3);
            let model = kind.fit(&samples, &mut rng).unwrap();
            assert_eq!(accuracy(model.as_ref(), &samples), 1.0, "{}", model.name());

            let query = sample(&[Badge::NatureStillness, Badge::InnerFlow], Archetype::EarthLover);
            assert_eq!(model.predict(&query.features), Archetype::EarthLover);
        }
    }

    #[test]
    fn test_argmax_prefers_first_on_tie() {
        assert_eq!(argmax(&[0.1, 0.7, 0.7, 0.2]), 1);
        assert_eq!(argmax(&[0.0]), 0);
    }

    #[test]
    fn test_kind_names_deserialize() {
        let kind: ClassifierKind = serde_json::from_str("\"knn\"").unwrap();
        assert_eq!(kind, ClassifierKind::KNearestNeighbors);
        let kind: ClassifierKind = serde_json::from_str("\"random_forest\"").unwrap();
        assert_eq!(kind, ClassifierKind::RandomForest);
    }
}
