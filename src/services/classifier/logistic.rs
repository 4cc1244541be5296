//! Multinomial logistic regression.
//!
//! Softmax over the archetypes seen in training, L2-penalized, fitted with
//! full-batch gradient descent.

use crate::models::{Archetype, Badge};
use crate::services::encoder::FeatureVector;

use super::{argmax, Classifier, Sample};

#[derive(Debug, Clone)]
pub struct LogisticParams {
    pub max_iter: usize,
    pub learning_rate: f64,
    /// Inverse regularization strength
    pub c: f64,
    /// Stop once no parameter moves by more than this in one step
    pub tolerance: f64,
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            learning_rate: 0.5,
            c: 1.0,
            tolerance: 1e-6,
        }
    }
}

pub struct LogisticRegression {
    classes: Vec<Archetype>,
    weights: Vec<[f64; Badge::COUNT]>,
    biases: Vec<f64>,
}

impl LogisticRegression {
    pub fn fit(samples: &[Sample], params: &LogisticParams) -> Self {
        let mut classes: Vec<Archetype> = samples.iter().map(|s| s.label).collect();
        classes.sort();
        classes.dedup();

        let mut model = Self {
            weights: vec![[0.0; Badge::COUNT]; classes.len()],
            biases: vec![0.0; classes.len()],
            classes,
        };

        let targets: Vec<usize> = samples
            .iter()
            .map(|s| model.class_position(s.label))
            .collect();
        let n = samples.len() as f64;
        let penalty = 1.0 / (params.c * n);

        for iteration in 0..params.max_iter {
            let mut grad_w = vec![[0.0; Badge::COUNT]; model.classes.len()];
            let mut grad_b = vec![0.0; model.classes.len()];

            for (sample, &target) in samples.iter().zip(&targets) {
                let probs = model.probabilities(&sample.features);
                for (k, p) in probs.iter().enumerate() {
                    let indicator = if k == target { 1.0 } else { 0.0 };
                    let err = p - indicator;
                    grad_b[k] += err;
                    for (g, x) in grad_w[k].iter_mut().zip(sample.features.as_slice()) {
                        *g += err * x;
                    }
                }
            }

            let mut largest_step: f64 = 0.0;
            for k in 0..model.classes.len() {
                for j in 0..Badge::COUNT {
                    let step = params.learning_rate
                        * (grad_w[k][j] / n + penalty * model.weights[k][j]);
                    model.weights[k][j] -= step;
                    largest_step = largest_step.max(step.abs());
                }
                let step = params.learning_rate * grad_b[k] / n;
                model.biases[k] -= step;
                largest_step = largest_step.max(step.abs());
            }

            if largest_step < params.tolerance {
                tracing::debug!(iterations = iteration + 1, "Logistic regression converged");
                break;
            }
        }

        model
    }

    fn class_position(&self, label: Archetype) -> usize {
        self.classes.iter().position(|c| *c == label).unwrap_or(0)
    }

    /// Softmax probabilities, aligned with `classes()`
    pub fn probabilities(&self, features: &FeatureVector) -> Vec<f64> {
        let logits: Vec<f64> = self
            .weights
            .iter()
            .zip(&self.biases)
            .map(|(w, b)| {
                w.iter()
                    .zip(features.as_slice())
                    .map(|(wi, xi)| wi * xi)
                    .sum::<f64>()
                    + b
            })
            .collect();

        let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = logits.iter().map(|l| (l - max).exp()).collect();
        let total: f64 = exps.iter().sum();
        exps.into_iter().map(|e| e / total).collect()
    }

    /// Archetypes this model can emit
    pub fn classes(&self) -> &[Archetype] {
        &self.classes
    }
}

impl Classifier for LogisticRegression {
    fn predict(&self, features: &FeatureVector) -> Archetype {
        let probs = self.probabilities(features);
        self.classes[argmax(&probs)]
    }

    fn name(&self) -> &'static str {
        "Logistic Regression"
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_probabilities_sum_to_one() {
        let model = LogisticRegression::fit(&separable_samples(), &LogisticParams::default());
        let probs = model.probabilities(&separable_samples()[0].features);
        assert_eq!(probs.len(), 2);
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_only_seen_classes_are_emitted() {
        let model = LogisticRegression::fit(&separable_samples(), &LogisticParams::default());
        assert_eq!(
            model.classes(),
            &[Archetype::EarthLover, Archetype::UrbanSoulwalker]
        );
    }

    #[test]
    fn test_single_class_predicts_that_class() {
        let samples = vec![sample(&[Badge::WonderMystery], Archetype::WildMystic)];
        let model = LogisticRegression::fit(&samples, &LogisticParams::default());
        let query = sample(&[Badge::CraftCreation], Archetype::WildMystic);
        assert_eq!(model.predict(&query.features), Archetype::WildMystic);
    }
}
