use std::path::PathBuf;

use crate::config::TrainerConfig;
use crate::data::loader::ImageLoader;
use crate::data::split::split_samples;
use crate::error::TrainerError;
use crate::eval::metrics::{evaluate, format_confusion, MulticlassMetrics};
use crate::model::trained_model::TrainedModel;
use crate::pipeline::pipeline::TrainingPipeline;

/// What a completed run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub model: TrainedModel,
    pub metrics: MulticlassMetrics,
    pub model_path: PathBuf,
    pub samples_loaded: usize,
    pub entries_skipped: usize,
    /// `true` when the metrics were computed on the training data.
    pub evaluated_on_training_set: bool,
}

/// Load → fit → evaluate → save, in that order, with no retries.
///
/// Per-image failures are logged and skipped by the loader; every other
/// failure aborts the run.
pub fn run(config: &TrainerConfig) -> Result<RunSummary, TrainerError> {
    config.validate()?;

    let loader = ImageLoader::new(&config.images_dir, config.geometry);
    let report = loader.load_manifest(&config.manifest_path)?;
    let samples_loaded = report.samples.len();
    let entries_skipped = report.skipped.len();
    if samples_loaded == 0 {
        return Err(TrainerError::EmptyDataset);
    }

    let split = split_samples(report.samples, config.holdout_fraction, config.seed);
    let evaluated_on_training_set = split.holdout.is_none();
    if evaluated_on_training_set {
        log::warn!("evaluating on the training data; accuracy will be optimistic");
    } else {
        log::info!(
            "holding out {} of {} samples for evaluation",
            split.evaluation_set().len(),
            samples_loaded
        );
    }

    let pipeline = TrainingPipeline::new(config.geometry, config.solver);
    println!("======== Training started ========");
    let model = pipeline.fit(&split.train)?;
    println!("======== Model trained ========");

    let metrics = evaluate(&model, split.evaluation_set());
    println!("Accuracy: {:.2}%", metrics.macro_accuracy * 100.0);
    log::info!(
        "micro-accuracy {:.2}%, log-loss {:.4} over {} samples",
        metrics.micro_accuracy * 100.0,
        metrics.log_loss,
        metrics.sample_count
    );
    for class in &metrics.per_class {
        log::debug!("class '{}': {}/{} correct", class.label, class.correct, class.support);
    }
    log::debug!(
        "confusion matrix (rows = true, columns = predicted):\n{}",
        format_confusion(&metrics)
    );

    let model_path = config.resolved_model_path()?;
    model.save(&model_path)?;
    println!("Model saved to: {}", model_path.display());

    Ok(RunSummary {
        model,
        metrics,
        model_path,
        samples_loaded,
        entries_skipped,
        evaluated_on_training_set,
    })
}
