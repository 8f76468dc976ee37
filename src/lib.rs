//! Gaussian Naive Bayes classification of small numeric tabular datasets.

pub mod bayes;
pub mod dataset;
pub mod error;
pub mod score;
pub mod summary;

pub use bayes::{GaussianNaiveBayes, Prediction};
pub use dataset::{Dataset, LabelIndex};
pub use error::{BayesError, Result};
pub use score::{accuracy, Accuracy};
pub use summary::{ClassSummary, Label, VariancePolicy};
