use std::fmt;

use crate::bayes::Prediction;
use crate::error::{BayesError, Result};
use crate::summary::Label;

/// Outcome of comparing predictions against ground truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accuracy {
    pub correct: usize,
    pub total: usize,
}

impl Accuracy {
    pub fn fraction(&self) -> f64 {
        self.correct as f64 / self.total as f64
    }

    /// Percentage rounded to two decimal places.
    pub fn percent(&self) -> f64 {
        (self.fraction() * 10_000.0).round() / 100.0
    }
}

impl fmt::Display for Accuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Accuracy: {:.2}% - {}/{} correctly classified",
            self.fraction() * 100.0,
            self.correct,
            self.total
        )
    }
}

/// Counts the predictions whose label equals the true label at the same position.
pub fn accuracy(predictions: &[Prediction], labels: &[Label]) -> Result<Accuracy> {
    if predictions.len() != labels.len() {
        return Err(BayesError::DimensionMismatch {
            what: "prediction count",
            expected: labels.len(),
            got: predictions.len(),
        });
    }
    if labels.is_empty() {
        return Err(BayesError::EmptyInput("labels to score against"));
    }

    let correct = predictions
        .iter()
        .zip(labels.iter())
        .fold(0, |acc, (prediction, &label)| {
            if prediction.label == label {
                acc + 1
            } else {
                acc
            }
        });

    Ok(Accuracy {
        correct,
        total: labels.len(),
    })
}
