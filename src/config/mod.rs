pub mod trainer_config;

pub use trainer_config::{ImageGeometry, SolverConfig, TrainerConfig, CONFIG_FILE};
