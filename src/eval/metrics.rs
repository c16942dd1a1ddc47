use serde::{Deserialize, Serialize};

use crate::data::sample::Sample;
use crate::model::trained_model::TrainedModel;

/// Probability floor used when taking the log of a predicted score.
const LOG_LOSS_EPS: f64 = 1e-15;

/// Per-class counts gathered during evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub label: String,
    /// Evaluation samples whose true label is this class.
    pub support: usize,
    /// Of those, how many were predicted correctly.
    pub correct: usize,
}

impl ClassMetrics {
    /// Fraction of this class's samples predicted correctly; 0 when unsupported.
    pub fn accuracy(&self) -> f64 {
        if self.support == 0 {
            0.0
        } else {
            self.correct as f64 / self.support as f64
        }
    }
}

/// Multiclass evaluation summary.
///
/// `confusion[t][p]` counts samples with true label `labels[t]` predicted as
/// `labels[p]`. `labels` lists the model's classes in key order followed by
/// any true labels the model has never seen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MulticlassMetrics {
    /// Unweighted mean of per-class accuracy over classes present in the data.
    pub macro_accuracy: f64,
    /// Correct predictions over all samples.
    pub micro_accuracy: f64,
    /// Mean negative log-probability assigned to the true label.
    pub log_loss: f64,
    pub per_class: Vec<ClassMetrics>,
    pub labels: Vec<String>,
    pub confusion: Vec<Vec<usize>>,
    pub sample_count: usize,
}

/// Scores `model` on `samples`.
///
/// An empty `samples` slice yields all-zero metrics.
pub fn evaluate(model: &TrainedModel, samples: &[Sample]) -> MulticlassMetrics {
    let mut labels: Vec<String> = model.classes().to_vec();
    for s in samples {
        if !labels.contains(&s.label) {
            labels.push(s.label.clone());
        }
    }
    let position = |label: &str| labels.iter().position(|l| l == label);

    let n_labels = labels.len();
    let mut confusion = vec![vec![0usize; n_labels]; n_labels];
    let mut total_log_loss = 0.0;

    for sample in samples {
        let prediction = model.predict(sample);
        let (Some(t), Some(p)) = (position(&sample.label), position(&prediction.label)) else {
            continue;
        };
        confusion[t][p] += 1;

        let p_true = model
            .classes()
            .iter()
            .position(|c| *c == sample.label)
            .and_then(|i| prediction.scores.get(i))
            .map_or(0.0, |&s| s as f64);
        total_log_loss += -(p_true.max(LOG_LOSS_EPS)).ln();
    }

    let per_class: Vec<ClassMetrics> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| ClassMetrics {
            label: label.clone(),
            support: confusion[i].iter().sum(),
            correct: confusion[i][i],
        })
        .filter(|c| c.support > 0)
        .collect();

    let n = samples.len();
    let correct: usize = per_class.iter().map(|c| c.correct).sum();
    let (macro_accuracy, micro_accuracy, log_loss) = if n == 0 {
        (0.0, 0.0, 0.0)
    } else {
        (
            per_class.iter().map(ClassMetrics::accuracy).sum::<f64>() / per_class.len() as f64,
            correct as f64 / n as f64,
            total_log_loss / n as f64,
        )
    };

    MulticlassMetrics {
        macro_accuracy,
        micro_accuracy,
        log_loss,
        per_class,
        labels,
        confusion,
        sample_count: n,
    }
}

/// Renders the confusion matrix as an aligned text table for logging.
pub fn format_confusion(metrics: &MulticlassMetrics) -> String {
    let width = metrics.labels.iter().map(String::len).max().unwrap_or(0).max(5);
    let mut out = format!("{:>width$}", "");
    for label in &metrics.labels {
        out.push_str(&format!(" {:>width$}", label));
    }
    for (label, row) in metrics.labels.iter().zip(&metrics.confusion) {
        out.push('\n');
        out.push_str(&format!("{:>width$}", label));
        for count in row {
            out.push_str(&format!(" {:>width$}", count));
        }
    }
    out
}
