use thiserror::Error;

/// Errors reported by the loader, the classifier and the scorer.
#[derive(Debug, Error)]
pub enum BayesError {
    #[error("dimension mismatch in {what}: expected {expected}, got {got}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("model used before calling `fit`")]
    UnfittedModel,
    #[error("class {class} has {count} example(s), at least 2 are needed for a standard deviation")]
    InsufficientData { class: usize, count: usize },
    #[error("no {0} supplied")]
    EmptyInput(&'static str),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, BayesError>;
