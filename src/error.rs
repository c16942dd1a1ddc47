use std::path::PathBuf;

/// Fatal errors raised by the training pipeline.
///
/// Per-image failures never surface here; the loader turns them into
/// [`SkipReason`](crate::data::loader::SkipReason) values and keeps going.
#[derive(Debug, thiserror::Error)]
pub enum TrainerError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("No usable samples to train on")]
    EmptyDataset,
    #[error("Sample {index} has {actual} features, expected {expected}")]
    FeatureMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Classifier fit failed: {0}")]
    Fit(String),
    #[error("Invalid model artifact: {0}")]
    Artifact(String),
}

impl TrainerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TrainerError::Io {
            path: path.into(),
            source,
        }
    }
}
