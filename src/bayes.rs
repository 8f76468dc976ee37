use log::{debug, info};
use std::f64::consts::PI;

use crate::error::{BayesError, Result};
use crate::summary::{separate_by_class, summarize, ClassSummary, Label, VariancePolicy};

/// The winning class of one row together with its log-likelihood.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label: Label,
    /// Sum of per-feature log-densities, not a normalized probability.
    pub score: f64,
}

/// Gaussian probability density of `x` under `N(mean, stdev²)`.
pub fn density(x: f64, mean: f64, stdev: f64) -> f64 {
    let exponent = (-(x - mean).powi(2) / (2.0 * stdev.powi(2))).exp();
    exponent / (stdev * (2.0 * PI).sqrt())
}

/// Natural log of [`density`], computed in log space so that values far from
/// the mean keep a finite score instead of underflowing to `-inf`.
///
/// A zero standard deviation describes a point mass: `x == mean` scores `0.0`
/// and everything else scores `-inf`.
pub fn log_density(x: f64, mean: f64, stdev: f64) -> f64 {
    if stdev == 0.0 {
        return if x == mean { 0.0 } else { f64::NEG_INFINITY };
    }
    let z = (x - mean) / stdev;
    -0.5 * z * z - stdev.ln() - 0.5 * (2.0 * PI).ln()
}

/// Log-likelihood of `row` under one class, summed over its features.
pub fn class_log_score(row: &[f64], summary: &ClassSummary) -> f64 {
    row.iter()
        .zip(summary.means.iter().zip(summary.stdevs.iter()))
        .fold(0.0, |acc, (&x, (&mean, &stdev))| {
            acc + log_density(x, mean, stdev)
        })
}

/// Picks the class with the strictly largest score.
///
/// Ties keep the earliest class. A `NaN` score never beats a real one.
pub fn argmax<I: IntoIterator<Item = (Label, f64)>>(scores: I) -> Option<Prediction> {
    scores
        .into_iter()
        .fold(None, |best: Option<Prediction>, (label, score)| match best {
            Some(current)
                if !(score > current.score || (current.score.is_nan() && !score.is_nan())) =>
            {
                Some(current)
            }
            _ => Some(Prediction { label, score }),
        })
}

/// Gaussian Naive Bayes classifier over real-valued features.
///
/// The model is unfitted until [`fit`](GaussianNaiveBayes::fit) succeeds. Each
/// successful `fit` replaces the stored summaries wholesale; a failed `fit`
/// leaves the previous state untouched.
#[derive(Debug, Clone, Default)]
pub struct GaussianNaiveBayes {
    summaries: Option<Vec<ClassSummary>>,
    policy: VariancePolicy,
}

impl GaussianNaiveBayes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: VariancePolicy) -> Self {
        Self {
            summaries: None,
            policy,
        }
    }

    pub fn policy(&self) -> VariancePolicy {
        self.policy
    }

    pub fn is_fitted(&self) -> bool {
        self.summaries.is_some()
    }

    /// The fitted class summaries, in first-seen class order.
    pub fn summaries(&self) -> Result<&[ClassSummary]> {
        self.summaries.as_deref().ok_or(BayesError::UnfittedModel)
    }

    pub fn n_classes(&self) -> Result<usize> {
        Ok(self.summaries()?.len())
    }

    pub fn n_features(&self) -> Result<usize> {
        let summaries = self.summaries()?;
        Ok(summaries.first().map_or(0, ClassSummary::n_features))
    }

    /// Learns one [`ClassSummary`] per class from `x` and `y`.
    pub fn fit<R: AsRef<[f64]>>(&mut self, x: &[R], y: &[Label]) -> Result<&[ClassSummary]> {
        let separated = separate_by_class(x, y)?;
        let summaries = summarize(&separated, self.policy)?;

        info!("fitted {} classes over {} rows", summaries.len(), x.len());

        Ok(self.summaries.insert(summaries).as_slice())
    }

    /// Log-score of every class for every row, classes in summary order.
    pub fn predict_log_scores<R: AsRef<[f64]>>(
        &self,
        rows: &[R],
    ) -> Result<Vec<Vec<(Label, f64)>>> {
        let summaries = self.summaries()?;
        let n_features = self.n_features()?;

        let mut scores = Vec::with_capacity(rows.len());
        for row in rows {
            let row = row.as_ref();
            if row.len() != n_features {
                return Err(BayesError::DimensionMismatch {
                    what: "prediction row features",
                    expected: n_features,
                    got: row.len(),
                });
            }

            scores.push(
                summaries
                    .iter()
                    .map(|summary| (summary.class, class_log_score(row, summary)))
                    .collect(),
            );
        }

        Ok(scores)
    }

    /// Predicts the most probable class of every row.
    pub fn predict<R: AsRef<[f64]>>(&self, rows: &[R]) -> Result<Vec<Prediction>> {
        let predictions = self
            .predict_log_scores(rows)?
            .into_iter()
            .map(|scores| argmax(scores).ok_or(BayesError::UnfittedModel))
            .collect::<Result<Vec<_>>>()?;

        debug!("predicted {} rows", predictions.len());
        Ok(predictions)
    }
}
