use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::{
    config::Config,
    error::AppResult,
    models::{Archetype, BadgeSet, UserRecord},
    services::{
        classifier::{self, Classifier, ClassifierKind, Sample},
        encoder::{encode, FeatureVector},
        similarity::{top_similar, SimilarUser},
        synthetic::generate_users,
    },
};

/// Knobs for one training run
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub classifier: ClassifierKind,
    pub synthetic_users: usize,
    pub seed: Option<u64>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            classifier: ClassifierKind::default(),
            synthetic_users: 200,
            seed: None,
        }
    }
}

impl From<&Config> for EngineSettings {
    fn from(config: &Config) -> Self {
        Self {
            classifier: config.classifier,
            synthetic_users: config.synthetic_users,
            seed: config.synthetic_seed,
        }
    }
}

/// Operator-facing summary of the fitted model
#[derive(Debug, Clone, Serialize)]
pub struct ModelReport {
    pub classifier: &'static str,
    pub kind: ClassifierKind,
    /// Held-out accuracy; informational only
    pub accuracy: f64,
    pub dataset_size: usize,
    pub train_size: usize,
    pub test_size: usize,
    pub trained_at: DateTime<Utc>,
}

/// Synthetic dataset plus the classifier fitted on it
pub struct ArchetypeEngine {
    users: Vec<UserRecord>,
    features: Vec<FeatureVector>,
    model: Box<dyn Classifier>,
    report: ModelReport,
}

impl ArchetypeEngine {
    /// Generates a fresh synthetic dataset and fits a classifier on it
    pub fn train(settings: &EngineSettings) -> AppResult<Self> {
        let mut rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let users = generate_users(settings.synthetic_users, &mut rng);
        Self::fit(users, settings.classifier, &mut rng)
    }

    /// Fits a classifier on an existing set of users
    pub fn fit<R: Rng>(
        users: Vec<UserRecord>,
        kind: ClassifierKind,
        rng: &mut R,
    ) -> AppResult<Self> {
        let features: Vec<FeatureVector> = users.iter().map(|u| encode(&u.badges)).collect();
        let samples: Vec<Sample> = features
            .iter()
            .zip(&users)
            .map(|(features, user)| Sample {
                features: *features,
                label: user.archetype,
            })
            .collect();

        let (train, test) = classifier::train_test_split(
            &samples,
            classifier::TEST_FRACTION,
            classifier::SPLIT_SEED,
        );
        let model = kind.fit(&train, rng)?;
        let accuracy = classifier::accuracy(model.as_ref(), &test);

        let report = ModelReport {
            classifier: model.name(),
            kind,
            accuracy,
            dataset_size: users.len(),
            train_size: train.len(),
            test_size: test.len(),
            trained_at: Utc::now(),
        };

        tracing::info!(
            classifier = report.classifier,
            accuracy = %format!("{:.2}%", accuracy * 100.0),
            train_size = report.train_size,
            test_size = report.test_size,
            "Archetype model trained"
        );

        Ok(Self {
            users,
            features,
            model,
            report,
        })
    }

    pub fn predict(&self, badges: &BadgeSet) -> Archetype {
        self.model.predict(&encode(badges))
    }

    /// Synthetic users closest to the selection by cosine similarity
    pub fn similar(&self, badges: &BadgeSet, k: usize) -> Vec<SimilarUser> {
        let rows: Vec<(FeatureVector, &UserRecord)> =
            self.features.iter().copied().zip(&self.users).collect();
        top_similar(&encode(badges), &rows, k)
    }

    pub fn report(&self) -> &ModelReport {
        &self.report
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Badge;

    fn seeded(kind: ClassifierKind) -> ArchetypeEngine {
        ArchetypeEngine::train(&EngineSettings {
            classifier: kind,
            synthetic_users: 200,
            seed: Some(42),
        })
        .unwrap()
    }

    #[test]
    fn test_train_reports_split_sizes() {
        let engine = seeded(ClassifierKind::LogisticRegression);
        let report = engine.report();
        assert_eq!(report.dataset_size, 200);
        assert_eq!(report.train_size, 160);
        assert_eq!(report.test_size, 40);
        assert!((0.0..=1.0).contains(&report.accuracy));
        assert_eq!(report.classifier, "Logistic Regression");
    }

    #[test]
    fn test_predictions_come_from_vocabulary() {
        for kind in [
            ClassifierKind::LogisticRegression,
            ClassifierKind::RandomForest,
            ClassifierKind::KNearestNeighbors,
        ] {
            let engine = seeded(kind);
            for badge in Badge::ALL {
                let archetype = engine.predict(&[*badge].into_iter().collect());
                assert!(Archetype::ALL.contains(&archetype));
            }
        }
    }

    #[test]
    fn test_similar_finds_exact_training_row_first() {
        let engine = seeded(ClassifierKind::KNearestNeighbors);
        let target = engine.users()[17].badges.clone();
        let similar = engine.similar(&target, 3);

        assert_eq!(similar.len(), 3);
        assert!((similar[0].similarity - 1.0).abs() < 1e-12);
        assert_eq!(similar[0].badges, target.to_vec());
    }

    #[test]
    fn test_same_seed_same_dataset() {
        let a = seeded(ClassifierKind::LogisticRegression);
        let b = seeded(ClassifierKind::LogisticRegression);
        assert_eq!(a.users(), b.users());
    }
}
