use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::TrainerError;

/// Optional override file looked up in the working directory.
pub const CONFIG_FILE: &str = "trainer_config.json";

/// Target resolution and channel layout every image is converted to.
///
/// `channels` is 3 for interleaved R, G, B or 1 for luma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageGeometry {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
}

impl ImageGeometry {
    pub fn new(width: u32, height: u32, channels: u8) -> Self {
        ImageGeometry {
            width,
            height,
            channels,
        }
    }

    /// Length of the flat pixel vector for one image.
    pub fn feature_count(&self) -> usize {
        self.width as usize * self.height as usize * self.channels as usize
    }
}

impl Default for ImageGeometry {
    fn default() -> Self {
        ImageGeometry {
            width: 224,
            height: 224,
            channels: 3,
        }
    }
}

/// Knobs handed to the maximum-entropy solver.
///
/// - `max_iterations`: L-BFGS iteration cap
/// - `l2_regularization`: ridge penalty on the weights
/// - `gradient_tolerance`: convergence threshold on the gradient norm
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub max_iterations: u64,
    pub l2_regularization: f32,
    pub gradient_tolerance: f32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            max_iterations: 100,
            l2_regularization: 1e-4,
            gradient_tolerance: 1e-4,
        }
    }
}

/// Everything a training run needs to know, in one place.
///
/// The defaults reproduce the fixed layout the trainer has always used:
/// images under `images/`, labels in `images/tags.tsv`, and the model written
/// to `animal_recognition_model.zip` in the working directory. Any subset of
/// fields may be overridden from [`CONFIG_FILE`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Directory manifest paths are resolved against.
    pub images_dir: PathBuf,
    /// Tab-separated `<path>\t<label>` file.
    pub manifest_path: PathBuf,
    /// Output artifact; relative paths land in the working directory.
    pub model_path: PathBuf,
    pub geometry: ImageGeometry,
    /// Seed for the held-out shuffle.
    pub seed: u64,
    /// Fraction of samples kept out of training for evaluation.
    /// `0.0` evaluates on the training set itself.
    pub holdout_fraction: f64,
    pub solver: SolverConfig,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        let images_dir = PathBuf::from("images");
        let manifest_path = images_dir.join("tags.tsv");
        TrainerConfig {
            images_dir,
            manifest_path,
            model_path: PathBuf::from("animal_recognition_model.zip"),
            geometry: ImageGeometry::default(),
            seed: 1,
            holdout_fraction: 0.0,
            solver: SolverConfig::default(),
        }
    }
}

impl TrainerConfig {
    /// Rejects values the loader or the solver cannot work with.
    pub fn validate(&self) -> Result<(), TrainerError> {
        let g = &self.geometry;
        if g.width == 0 || g.height == 0 {
            return Err(TrainerError::Config(format!(
                "image geometry must be non-empty, got {}x{}",
                g.width, g.height
            )));
        }
        if g.channels != 1 && g.channels != 3 {
            return Err(TrainerError::Config(format!(
                "channels must be 1 or 3, got {}",
                g.channels
            )));
        }
        if !(0.0..1.0).contains(&self.holdout_fraction) {
            return Err(TrainerError::Config(format!(
                "holdout_fraction must be in [0, 1), got {}",
                self.holdout_fraction
            )));
        }
        if self.solver.max_iterations == 0 {
            return Err(TrainerError::Config(
                "solver.max_iterations must be at least 1".into(),
            ));
        }
        if self.solver.l2_regularization < 0.0 {
            return Err(TrainerError::Config(
                "solver.l2_regularization must not be negative".into(),
            ));
        }
        Ok(())
    }

    /// Absolute location of the model artifact.
    pub fn resolved_model_path(&self) -> Result<PathBuf, TrainerError> {
        if self.model_path.is_absolute() {
            return Ok(self.model_path.clone());
        }
        let cwd = std::env::current_dir().map_err(|e| TrainerError::io(".", e))?;
        Ok(cwd.join(&self.model_path))
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &Path) -> Result<(), TrainerError> {
        let file = std::fs::File::create(path).map_err(|e| TrainerError::io(path, e))?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a config from a JSON file. Missing fields take defaults.
    pub fn load_json(path: &Path) -> Result<TrainerConfig, TrainerError> {
        let file = std::fs::File::open(path).map_err(|e| TrainerError::io(path, e))?;
        let reader = std::io::BufReader::new(file);
        let config: TrainerConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` when it exists, otherwise falls back to the defaults.
    pub fn load_or_default(path: &Path) -> Result<TrainerConfig, TrainerError> {
        if path.exists() {
            log::info!("loading configuration from {}", path.display());
            TrainerConfig::load_json(path)
        } else {
            Ok(TrainerConfig::default())
        }
    }
}
