pub mod config;
pub mod data;
pub mod error;
pub mod eval;
pub mod model;
pub mod pipeline;
pub mod run;

// Convenience re-exports
pub use config::{ImageGeometry, SolverConfig, TrainerConfig};
pub use data::{ImageLoader, LoadReport, Manifest, Sample};
pub use error::TrainerError;
pub use eval::{evaluate, MulticlassMetrics};
pub use model::{DataSchema, TrainedModel};
pub use pipeline::{Prediction, TrainingPipeline};
pub use run::{run, RunSummary};
