use linfa::traits::Fit;
use linfa::Dataset;
use linfa_logistic::MultiLogisticRegression;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::config::SolverConfig;
use crate::data::sample::Sample;
use crate::error::TrainerError;
use crate::pipeline::label_encoder::LabelEncoder;

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// Output of one prediction: the winning label and the per-class scores.
///
/// `scores[i]` is the softmax probability of the model's `classes[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub scores: Vec<f32>,
}

/// Fitted multinomial logistic (maximum-entropy) classifier.
///
/// Prediction is `argmax_c(weights[c] · x + biases[c])`; scores are the
/// softmax of those logits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaxEntModel {
    pub classes: Vec<String>,
    /// One row of `feature_count` weights per class.
    pub weights: Vec<Vec<f32>>,
    pub biases: Vec<f32>,
}

impl MaxEntModel {
    /// A model that always answers `label` with full confidence.
    pub fn constant(label: impl Into<String>, feature_count: usize) -> Self {
        MaxEntModel {
            classes: vec![label.into()],
            weights: vec![vec![0.0; feature_count]],
            biases: vec![0.0],
        }
    }

    pub fn feature_count(&self) -> usize {
        self.weights.first().map_or(0, Vec::len)
    }

    /// Raw per-class scores before normalization.
    pub fn logits(&self, features: &[f32]) -> Vec<f64> {
        self.weights
            .iter()
            .zip(self.biases.iter())
            .map(|(row, &b)| {
                row.iter().zip(features).map(|(&w, &x)| w as f64 * x as f64).sum::<f64>() + b as f64
            })
            .collect()
    }

    /// Softmax probabilities, one per class.
    pub fn scores(&self, features: &[f32]) -> Vec<f32> {
        softmax(&self.logits(features))
    }

    pub fn predict(&self, features: &[f32]) -> Prediction {
        let scores = self.scores(features);
        let label = self.classes.get(argmax(&scores)).cloned().unwrap_or_default();
        Prediction { label, scores }
    }

    pub(crate) fn validate(&self) -> Result<(), TrainerError> {
        if self.classes.is_empty() {
            return Err(TrainerError::Artifact("model has no classes".into()));
        }
        if self.weights.len() != self.classes.len() || self.biases.len() != self.classes.len() {
            return Err(TrainerError::Artifact(format!(
                "model has {} classes but {} weight rows and {} biases",
                self.classes.len(),
                self.weights.len(),
                self.biases.len()
            )));
        }
        let width = self.feature_count();
        if self.weights.iter().any(|row| row.len() != width) {
            return Err(TrainerError::Artifact("weight rows differ in length".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Trainer
// ---------------------------------------------------------------------------

/// Fits a [`MaxEntModel`] with `linfa-logistic`'s multinomial solver.
#[derive(Debug, Clone, Copy)]
pub struct MaxEntTrainer {
    pub solver: SolverConfig,
}

impl MaxEntTrainer {
    pub fn new(solver: SolverConfig) -> Self {
        MaxEntTrainer { solver }
    }

    /// Fits against `(sample.pixels, encoder.encode(sample.label))` pairs.
    ///
    /// A single distinct label never reaches the solver; the result is a
    /// constant model for that label.
    pub fn fit(
        &self,
        samples: &[Sample],
        encoder: &LabelEncoder,
    ) -> Result<MaxEntModel, TrainerError> {
        let first = samples.first().ok_or(TrainerError::EmptyDataset)?;
        let feature_count = first.feature_count();

        let mut flat = Vec::with_capacity(samples.len() * feature_count);
        let mut keys = Vec::with_capacity(samples.len());
        for (index, sample) in samples.iter().enumerate() {
            if sample.feature_count() != feature_count {
                return Err(TrainerError::FeatureMismatch {
                    index,
                    expected: feature_count,
                    actual: sample.feature_count(),
                });
            }
            let key = encoder.encode(&sample.label).ok_or_else(|| {
                TrainerError::Fit(format!("label '{}' was not encoded", sample.label))
            })?;
            flat.extend_from_slice(&sample.pixels);
            keys.push(key);
        }

        if encoder.len() == 1 {
            log::info!("only one class ('{}') present; fitting a constant model", first.label);
            return Ok(MaxEntModel::constant(first.label.clone(), feature_count));
        }

        let records = Array2::from_shape_vec((samples.len(), feature_count), flat)
            .map_err(|e| TrainerError::Fit(e.to_string()))?;
        let targets = Array1::from(keys);
        let dataset = Dataset::new(records, targets);

        log::debug!(
            "fitting maximum-entropy model: {} samples, {} features, {} classes",
            samples.len(),
            feature_count,
            encoder.len()
        );

        let fitted = MultiLogisticRegression::<f32>::default()
            .alpha(self.solver.l2_regularization)
            .gradient_tolerance(self.solver.gradient_tolerance)
            .max_iterations(self.solver.max_iterations)
            .fit(&dataset)
            .map_err(|e| TrainerError::Fit(e.to_string()))?;

        let params = fitted.params();
        let intercept = fitted.intercept();
        let mut model = MaxEntModel {
            classes: Vec::new(),
            weights: Vec::new(),
            biases: Vec::new(),
        };
        for (column, key) in fitted.classes().iter().enumerate() {
            let label = encoder.decode(*key).ok_or_else(|| {
                TrainerError::Fit(format!("solver returned unknown class key {}", key))
            })?;
            model.classes.push(label.to_string());
            model.weights.push(params.column(column).to_vec());
            model.biases.push(intercept[column]);
        }
        Ok(model)
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn softmax(logits: &[f64]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|&z| (z - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.iter().map(|&e| (e / sum) as f32).collect()
}

/// Index of the first maximum element in a slice.
pub(crate) fn argmax(v: &[f32]) -> usize {
    let mut best = 0;
    for (i, x) in v.iter().enumerate() {
        if *x > v[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_class_model() -> MaxEntModel {
        MaxEntModel {
            classes: vec!["dark".into(), "bright".into()],
            weights: vec![vec![-4.0, -4.0], vec![4.0, 4.0]],
            biases: vec![4.0, -4.0],
        }
    }

    #[test]
    fn predicts_by_largest_logit() {
        let model = two_class_model();
        assert_eq!(model.predict(&[0.0, 0.1]).label, "dark");
        assert_eq!(model.predict(&[0.9, 1.0]).label, "bright");
    }

    #[test]
    fn scores_are_a_distribution() {
        let p = two_class_model().predict(&[0.3, 0.2]);
        assert_eq!(p.scores.len(), 2);
        let total: f32 = p.scores.iter().sum();
        assert!((total - 1.0).abs() < 1e-5);
        assert!(p.scores.iter().all(|s| (0.0..=1.0).contains(s)));
    }

    #[test]
    fn constant_model_is_certain() {
        let model = MaxEntModel::constant("cat", 3);
        let p = model.predict(&[0.1, 0.5, 0.9]);
        assert_eq!(p.label, "cat");
        assert_eq!(p.scores, vec![1.0]);
        assert!(model.validate().is_ok());
    }

    #[test]
    fn argmax_prefers_first_on_ties() {
        assert_eq!(argmax(&[0.5, 0.5]), 0);
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), 1);
    }

    #[test]
    fn single_label_skips_solver() {
        let samples = vec![Sample::new(vec![0.2; 4], "cat"), Sample::new(vec![0.8; 4], "cat")];
        let encoder = LabelEncoder::fit(samples.iter().map(|s| s.label.as_str()));
        let model = MaxEntTrainer::new(SolverConfig::default()).fit(&samples, &encoder).unwrap();
        assert_eq!(model.classes, ["cat"]);
        assert_eq!(model.feature_count(), 4);
    }

    #[test]
    fn separable_classes_are_learned() {
        let mut samples = Vec::new();
        for i in 0..6 {
            let v = i as f32 * 0.02;
            samples.push(Sample::new(vec![v, v, 0.1], "dark"));
            samples.push(Sample::new(vec![0.9 - v, 0.9 - v, 0.1], "bright"));
        }
        let encoder = LabelEncoder::fit(samples.iter().map(|s| s.label.as_str()));
        let model = MaxEntTrainer::new(SolverConfig::default()).fit(&samples, &encoder).unwrap();

        assert_eq!(model.classes.len(), 2);
        for s in &samples {
            assert_eq!(model.predict(&s.pixels).label, s.label);
        }
    }

    #[test]
    fn mismatched_feature_lengths_are_rejected() {
        let samples = vec![Sample::new(vec![0.0; 3], "a"), Sample::new(vec![0.0; 2], "b")];
        let encoder = LabelEncoder::fit(["a", "b"]);
        let err = MaxEntTrainer::new(SolverConfig::default()).fit(&samples, &encoder).unwrap_err();
        assert!(matches!(err, TrainerError::FeatureMismatch { index: 1, expected: 3, actual: 2 }));
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = MaxEntTrainer::new(SolverConfig::default())
            .fit(&[], &LabelEncoder::default())
            .unwrap_err();
        assert!(matches!(err, TrainerError::EmptyDataset));
    }
}
