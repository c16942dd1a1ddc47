use crate::config::{ImageGeometry, SolverConfig};
use crate::data::sample::Sample;
use crate::error::TrainerError;
use crate::model::metadata::{DataSchema, FEATURE_COLUMN};
use crate::model::trained_model::TrainedModel;
use crate::pipeline::label_encoder::LabelEncoder;
use crate::pipeline::maxent::MaxEntTrainer;

/// Label encoding → maximum-entropy fit → key-to-label mapping, as one unit.
///
/// The pipeline owns no learned state; `fit` returns a [`TrainedModel`] whose
/// predictions already carry the original string labels.
#[derive(Debug, Clone)]
pub struct TrainingPipeline {
    geometry: ImageGeometry,
    trainer: MaxEntTrainer,
}

impl TrainingPipeline {
    pub fn new(geometry: ImageGeometry, solver: SolverConfig) -> Self {
        TrainingPipeline {
            geometry,
            trainer: MaxEntTrainer::new(solver),
        }
    }

    /// Fits the pipeline on `samples`.
    ///
    /// # Errors
    /// - [`TrainerError::EmptyDataset`] when `samples` is empty
    /// - [`TrainerError::FeatureMismatch`] when a sample's length differs from
    ///   the configured geometry
    /// - [`TrainerError::Fit`] when the solver fails
    pub fn fit(&self, samples: &[Sample]) -> Result<TrainedModel, TrainerError> {
        if samples.is_empty() {
            return Err(TrainerError::EmptyDataset);
        }
        let expected = self.geometry.feature_count();
        let mismatch = samples
            .iter()
            .enumerate()
            .find(|(_, s)| s.feature_count() != expected);
        if let Some((index, s)) = mismatch {
            return Err(TrainerError::FeatureMismatch {
                index,
                expected,
                actual: s.feature_count(),
            });
        }

        let encoder = LabelEncoder::fit(samples.iter().map(|s| s.label.as_str()));
        let model = self.trainer.fit(samples, &encoder)?;

        log::info!(
            "fit completed: feature column '{}' ({} values), {} classes [{}]",
            FEATURE_COLUMN,
            expected,
            model.classes.len(),
            model.classes.join(", ")
        );

        let schema = DataSchema::new(self.geometry, model.classes.clone()).with_description(
            format!("maximum-entropy image classifier over {} samples", samples.len()),
        );
        Ok(TrainedModel::new(model, schema))
    }
}
