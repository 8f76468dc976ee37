use log::{debug, warn};
use std::collections::{hash_map::Entry, HashMap};

use crate::error::{BayesError, Result};

/// Integer class code, assigned in first-seen order by the loader.
pub type Label = usize;

/// What to do with a class that has too few rows for a sample standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VariancePolicy {
    /// Reject the class with [`BayesError::InsufficientData`].
    #[default]
    Strict,
    /// Keep the `NaN` standard deviation that `0 / 0` produces and let it
    /// propagate into the log-scores of that class.
    Propagate,
}

/// The training rows of one class, in their original order.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassRows<'a> {
    pub class: Label,
    pub rows: Vec<&'a [f64]>,
}

/// Per-feature mean and sample standard deviation of one class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassSummary {
    pub class: Label,
    pub means: Vec<f64>,
    pub stdevs: Vec<f64>,
    /// Number of training rows the summary was computed from.
    pub count: usize,
}

impl ClassSummary {
    pub fn n_features(&self) -> usize {
        self.means.len()
    }
}

/// Arithmetic mean. `NaN` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator) around a precomputed mean.
///
/// A single value gives `0 / 0`, i.e. `NaN`.
pub fn stdev(values: &[f64], mean: f64) -> f64 {
    let squares = values.iter().fold(0.0, |acc, v| acc + (v - mean).powi(2));
    (squares / (values.len() as f64 - 1.0)).sqrt()
}

/// Groups the rows of `x` by their label in `y`.
///
/// Classes come out in the order they are first seen in `y`, and rows keep
/// their order within a class.
pub fn separate_by_class<'a, R: AsRef<[f64]>>(
    x: &'a [R],
    y: &[Label],
) -> Result<Vec<ClassRows<'a>>> {
    if x.len() != y.len() {
        return Err(BayesError::DimensionMismatch {
            what: "label count",
            expected: x.len(),
            got: y.len(),
        });
    }

    let mut separated: Vec<ClassRows<'a>> = Vec::new();
    let mut positions = HashMap::new();
    for (row, &class) in x.iter().zip(y.iter()) {
        let position = match positions.entry(class) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                separated.push(ClassRows {
                    class,
                    rows: Vec::new(),
                });
                *entry.insert(separated.len() - 1)
            }
        };
        separated[position].rows.push(row.as_ref());
    }

    Ok(separated)
}

/// Collects feature `index` of every row into one column.
fn column(rows: &[&[f64]], index: usize) -> Vec<f64> {
    rows.iter().map(|row| row[index]).collect()
}

/// Computes one [`ClassSummary`] per class, in the order of `separated`.
///
/// Every row of every class must have the same number of features.
pub fn summarize(
    separated: &[ClassRows<'_>],
    policy: VariancePolicy,
) -> Result<Vec<ClassSummary>> {
    let n_features = match separated.first().and_then(|class| class.rows.first()) {
        Some(row) => row.len(),
        None => return Err(BayesError::EmptyInput("training rows")),
    };

    let mut summaries = Vec::with_capacity(separated.len());
    for class_rows in separated {
        let count = class_rows.rows.len();
        if count < 2 {
            match policy {
                VariancePolicy::Strict => {
                    return Err(BayesError::InsufficientData {
                        class: class_rows.class,
                        count,
                    })
                }
                VariancePolicy::Propagate => warn!(
                    "class {} has {} row(s), its standard deviations will be NaN",
                    class_rows.class, count
                ),
            }
        }

        if let Some(row) = class_rows.rows.iter().find(|row| row.len() != n_features) {
            return Err(BayesError::DimensionMismatch {
                what: "training row features",
                expected: n_features,
                got: row.len(),
            });
        }

        let mut means = Vec::with_capacity(n_features);
        let mut stdevs = Vec::with_capacity(n_features);
        for feature in 0..n_features {
            let values = column(&class_rows.rows, feature);
            let m = mean(&values);
            let s = stdev(&values, m);
            if s == 0.0 {
                debug!(
                    "class {} feature {} is constant ({})",
                    class_rows.class, feature, m
                );
            }
            means.push(m);
            stdevs.push(s);
        }

        debug!(
            "class {}: {} rows, means {:?}, stdevs {:?}",
            class_rows.class, count, means, stdevs
        );
        summaries.push(ClassSummary {
            class: class_rows.class,
            means,
            stdevs,
            count,
        });
    }

    Ok(summaries)
}
