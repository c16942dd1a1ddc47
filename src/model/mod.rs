pub mod artifact;
pub mod metadata;
pub mod trained_model;

pub use metadata::{DataSchema, InputType};
pub use trained_model::TrainedModel;
