pub mod label_encoder;
pub mod maxent;
pub mod pipeline;

pub use label_encoder::LabelEncoder;
pub use maxent::{MaxEntModel, MaxEntTrainer, Prediction};
pub use pipeline::TrainingPipeline;
