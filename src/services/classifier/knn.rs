use std::collections::HashMap;

use crate::models::Archetype;
use crate::services::encoder::FeatureVector;

use super::{Classifier, Sample};

pub const DEFAULT_K: usize = 5;

/// k-nearest-neighbors over Euclidean distance with majority vote
///
/// Neighbors at equal distance keep training order. A tied vote goes to the
/// label whose closest member ranked highest.
pub struct KNearestNeighbors {
    k: usize,
    samples: Vec<Sample>,
}

impl KNearestNeighbors {
    pub fn fit(samples: &[Sample], k: usize) -> Self {
        Self {
            k: k.max(1),
            samples: samples.to_vec(),
        }
    }
}

impl Classifier for KNearestNeighbors {
    fn predict(&self, features: &FeatureVector) -> Archetype {
        let mut ranked: Vec<(f64, &Sample)> = self
            .samples
            .iter()
            .map(|s| (s.features.squared_distance(features), s))
            .collect();
        ranked.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        // label -> (votes, rank of nearest member)
        let mut votes: HashMap<Archetype, (usize, usize)> = HashMap::new();
        for (rank, (_, sample)) in ranked.iter().take(self.k).enumerate() {
            let entry = votes.entry(sample.label).or_insert((0, rank));
            entry.0 += 1;
        }

        votes
            .into_iter()
            .max_by(|(_, (count_a, rank_a)), (_, (count_b, rank_b))| {
                count_a.cmp(count_b).then(rank_b.cmp(rank_a))
            })
            .map(|(label, _)| label)
            .unwrap_or(Archetype::MindfulSeeker)
    }

    fn name(&self) -> &'static str {
        "K-Nearest Neighbors"
    }
}
