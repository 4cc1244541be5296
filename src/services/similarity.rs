use serde::Serialize;

use crate::models::{Archetype, Badge, UserRecord};
use crate::services::encoder::FeatureVector;

/// Number of similar users reported alongside a prediction
pub const DEFAULT_TOP_K: usize = 3;

/// A training row ranked against a query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarUser {
    /// Row position in the synthetic dataset
    pub index: usize,
    pub badges: Vec<Badge>,
    pub archetype: Archetype,
    pub similarity: f64,
}

/// Cosine similarity; zero when either vector has no badges set
pub fn cosine_similarity(a: &FeatureVector, b: &FeatureVector) -> f64 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 0.0;
    }
    a.dot(b) / denom
}

/// The `k` rows most similar to `query`, best first
///
/// Equal scores keep dataset order (lower row index first).
pub fn top_similar(
    query: &FeatureVector,
    rows: &[(FeatureVector, &UserRecord)],
    k: usize,
) -> Vec<SimilarUser> {
    let mut scored: Vec<(usize, f64)> = rows
        .iter()
        .enumerate()
        .map(|(index, (features, _))| (index, cosine_similarity(query, features)))
        .collect();

    // stable: ties stay in index order
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    scored
        .into_iter()
        .take(k)
        .map(|(index, similarity)| {
            let record = rows[index].1;
            SimilarUser {
                index,
                badges: record.badges.to_vec(),
                archetype: record.archetype,
                similarity,
            }
        })
        .collect()
}
