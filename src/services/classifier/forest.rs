//! Random forest of Gini decision trees.
//!
//! Features are binary, so every split is "badge absent" / "badge present"
//! and a feature never splits twice on one path.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{Archetype, Badge};
use crate::services::encoder::FeatureVector;

use super::{argmax, Classifier, Sample};

#[derive(Debug, Clone)]
pub struct ForestParams {
    pub n_trees: usize,
    /// Candidate features per split; `None` means sqrt of the vocabulary size
    pub max_features: Option<usize>,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_features: None,
            max_depth: None,
            min_samples_split: 2,
        }
    }
}

impl ForestParams {
    fn candidate_features(&self) -> usize {
        self.max_features
            .unwrap_or_else(|| (Badge::COUNT as f64).sqrt().round() as usize)
            .clamp(1, Badge::COUNT)
    }
}

enum Node {
    Leaf(Archetype),
    Split {
        feature: usize,
        absent: Box<Node>,
        present: Box<Node>,
    },
}

impl Node {
    fn predict(&self, features: &FeatureVector) -> Archetype {
        match self {
            Node::Leaf(label) => *label,
            Node::Split {
                feature,
                absent,
                present,
            } => {
                if features.is_set(*feature) {
                    present.predict(features)
                } else {
                    absent.predict(features)
                }
            }
        }
    }
}

fn class_counts(samples: &[&Sample]) -> [usize; Archetype::COUNT] {
    let mut counts = [0; Archetype::COUNT];
    for sample in samples {
        counts[sample.label.index()] += 1;
    }
    counts
}

fn gini(counts: &[usize; Archetype::COUNT], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| (c as f64 / total).powi(2))
        .sum::<f64>()
}

fn majority(counts: &[usize; Archetype::COUNT]) -> Archetype {
    let as_f64: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
    Archetype::from_index(argmax(&as_f64)).unwrap_or(Archetype::MindfulSeeker)
}

fn grow<R: Rng>(samples: &[&Sample], depth: usize, params: &ForestParams, rng: &mut R) -> Node {
    let counts = class_counts(samples);
    let label = majority(&counts);
    let impurity = gini(&counts, samples.len());

    let depth_reached = params.max_depth.is_some_and(|max| depth >= max);
    if impurity == 0.0 || samples.len() < params.min_samples_split || depth_reached {
        return Node::Leaf(label);
    }

    let mut features: Vec<usize> = (0..Badge::COUNT).collect();
    features.shuffle(rng);

    let candidates = params.candidate_features();
    let mut best: Option<(usize, f64)> = None;
    for (tried, &feature) in features.iter().enumerate() {
        if tried >= candidates && best.is_some() {
            break;
        }

        let (present, absent): (Vec<&Sample>, Vec<&Sample>) = samples
            .iter()
            .copied()
            .partition(|s| s.features.is_set(feature));
        if present.is_empty() || absent.is_empty() {
            continue;
        }

        let n = samples.len() as f64;
        let weighted = (present.len() as f64 / n) * gini(&class_counts(&present), present.len())
            + (absent.len() as f64 / n) * gini(&class_counts(&absent), absent.len());
        let gain = impurity - weighted;
        if gain > 1e-12 && best.map_or(true, |(_, g)| gain > g) {
            best = Some((feature, gain));
        }
    }

    let Some((feature, _)) = best else {
        return Node::Leaf(label);
    };

    let (present, absent): (Vec<&Sample>, Vec<&Sample>) = samples
        .iter()
        .copied()
        .partition(|s| s.features.is_set(feature));

    Node::Split {
        feature,
        absent: Box::new(grow(&absent, depth + 1, params, rng)),
        present: Box::new(grow(&present, depth + 1, params, rng)),
    }
}

pub struct RandomForest {
    trees: Vec<Node>,
}

impl RandomForest {
    pub fn fit<R: Rng>(samples: &[Sample], params: &ForestParams, rng: &mut R) -> Self {
        if samples.is_empty() {
            return Self { trees: Vec::new() };
        }

        let trees = (0..params.n_trees.max(1))
            .map(|_| {
                let bootstrap: Vec<&Sample> = (0..samples.len())
                    .map(|_| &samples[rng.gen_range(0..samples.len())])
                    .collect();
                grow(&bootstrap, 0, params, rng)
            })
            .collect();

        Self { trees }
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}

impl Classifier for RandomForest {
    fn predict(&self, features: &FeatureVector) -> Archetype {
        let mut votes = [0.0; Archetype::COUNT];
        for tree in &self.trees {
            votes[tree.predict(features).index()] += 1.0;
        }
        Archetype::from_index(argmax(&votes)).unwrap_or(Archetype::MindfulSeeker)
    }

    fn name(&self) -> &'static str {
        "Random Forest"
    }
}
