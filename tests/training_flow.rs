use std::path::Path;

use animal_trainer::data::image::load_image_pixels;
use animal_trainer::data::{EntryOutcome, SkipReason};
use animal_trainer::{
    evaluate, run, ImageGeometry, ImageLoader, Manifest, TrainedModel, TrainerConfig, TrainerError,
    TrainingPipeline,
};
use image::{Rgb, RgbImage};
use tempfile::TempDir;

fn write_jpeg(dir: &Path, name: &str, color: [u8; 3]) {
    RgbImage::from_pixel(64, 48, Rgb(color))
        .save(dir.join(name))
        .unwrap();
}

/// Lays out `images/` with the given files and manifest text under a temp dir.
fn workspace(files: &[(&str, [u8; 3])], manifest: &str) -> (TempDir, TrainerConfig) {
    let temp = tempfile::tempdir().unwrap();
    let images = temp.path().join("images");
    std::fs::create_dir_all(&images).unwrap();
    for (name, color) in files {
        write_jpeg(&images, name, *color);
    }
    std::fs::write(images.join("tags.tsv"), manifest).unwrap();

    let config = TrainerConfig {
        images_dir: images.clone(),
        manifest_path: images.join("tags.tsv"),
        model_path: temp.path().join("animal_recognition_model.zip"),
        ..TrainerConfig::default()
    };
    (temp, config)
}

#[test]
fn cat_dog_and_missing_file_trains_on_two_samples() {
    let (_temp, config) = workspace(
        &[("cat.jpg", [230, 180, 40]), ("dog.jpg", [30, 60, 200])],
        "cat.jpg\tcat\ndog.jpg\tdog\nghost.jpg\tcat\n",
    );

    let manifest = Manifest::read(&config.manifest_path).unwrap();
    let loader = ImageLoader::new(&config.images_dir, config.geometry);
    let outcomes: Vec<EntryOutcome> = loader.outcomes(&manifest).collect();
    let skipped: Vec<_> = outcomes
        .iter()
        .filter_map(|o| match o {
            EntryOutcome::Skipped(s) => Some(s),
            EntryOutcome::Loaded(_) => None,
        })
        .collect();
    assert_eq!(outcomes.len(), 3);
    assert_eq!(skipped.len(), 1);
    assert!(skipped[0].path.ends_with("ghost.jpg"));
    assert!(matches!(skipped[0].reason, SkipReason::Decode(_)));

    let summary = run(&config).unwrap();
    assert_eq!(summary.samples_loaded, 2);
    assert_eq!(summary.entries_skipped, 1);
    assert!(summary.evaluated_on_training_set);
    assert_eq!(summary.model.classes(), ["cat", "dog"]);
    assert_eq!(summary.model.schema.feature_count, 224 * 224 * 3);
    assert!(summary.model_path.exists());
}

#[test]
fn loaded_samples_have_target_length_and_unit_range() {
    let (_temp, config) = workspace(
        &[("a.jpg", [255, 255, 255]), ("b.jpg", [0, 0, 0])],
        "a.jpg\tx\nb.jpg\ty\n",
    );
    let report = ImageLoader::new(&config.images_dir, config.geometry)
        .load_manifest(&config.manifest_path)
        .unwrap();
    assert_eq!(report.samples.len(), 2);
    for sample in &report.samples {
        assert_eq!(sample.pixels.len(), 224 * 224 * 3);
        assert!(sample.pixels.iter().all(|v| (0.0..=1.0).contains(v)));
    }
}

#[test]
fn single_label_reaches_full_accuracy() {
    let (_temp, mut config) = workspace(
        &[("1.jpg", [200, 10, 10]), ("2.jpg", [10, 200, 10]), ("3.jpg", [10, 10, 200])],
        "1.jpg\tcat\n2.jpg\tcat\n3.jpg\tcat\n",
    );
    config.geometry = ImageGeometry::new(32, 32, 3);

    let summary = run(&config).unwrap();
    assert!((summary.metrics.macro_accuracy - 1.0).abs() < 1e-9);
    assert!((summary.metrics.micro_accuracy - 1.0).abs() < 1e-9);
}

#[test]
fn reloaded_model_predicts_like_the_trained_one() {
    let (temp, mut config) = workspace(
        &[
            ("cat1.jpg", [240, 200, 60]),
            ("cat2.jpg", [220, 190, 80]),
            ("dog1.jpg", [20, 40, 180]),
            ("dog2.jpg", [40, 70, 210]),
        ],
        "cat1.jpg\tcat\ncat2.jpg\tcat\ndog1.jpg\tdog\ndog2.jpg\tdog\n",
    );
    config.geometry = ImageGeometry::new(16, 16, 3);

    let report = ImageLoader::new(&config.images_dir, config.geometry)
        .load_manifest(&config.manifest_path)
        .unwrap();
    let trained = TrainingPipeline::new(config.geometry, config.solver)
        .fit(&report.samples)
        .unwrap();

    let held_out_dir = temp.path().join("held_out");
    std::fs::create_dir_all(&held_out_dir).unwrap();
    write_jpeg(&held_out_dir, "unseen.jpg", [230, 195, 70]);
    let unseen = load_image_pixels(&held_out_dir.join("unseen.jpg"), config.geometry).unwrap();

    trained.save(&config.model_path).unwrap();
    let reloaded = TrainedModel::load(&config.model_path).unwrap();

    assert_eq!(reloaded.predict_pixels(&unseen).label, trained.predict_pixels(&unseen).label);
    assert_eq!(reloaded.predict_pixels(&unseen).label, "cat");
    assert_eq!(
        evaluate(&reloaded, &report.samples).macro_accuracy,
        evaluate(&trained, &report.samples).macro_accuracy
    );
}

#[test]
fn holdout_split_evaluates_on_unseen_samples() {
    let files: Vec<(String, [u8; 3])> = (0..8)
        .map(|i| (format!("{i}.jpg"), if i % 2 == 0 { [250, 250, 250] } else { [5, 5, 5] }))
        .collect();
    let manifest: String = (0..8)
        .map(|i| format!("{i}.jpg\t{}\n", if i % 2 == 0 { "light" } else { "dark" }))
        .collect();
    let refs: Vec<(&str, [u8; 3])> = files.iter().map(|(n, c)| (n.as_str(), *c)).collect();
    let (_temp, mut config) = workspace(&refs, &manifest);
    config.geometry = ImageGeometry::new(8, 8, 3);
    config.holdout_fraction = 0.25;

    let summary = run(&config).unwrap();
    assert!(!summary.evaluated_on_training_set);
    assert_eq!(summary.metrics.sample_count, 2);
}

#[test]
fn missing_manifest_is_fatal() {
    let temp = tempfile::tempdir().unwrap();
    let config = TrainerConfig {
        images_dir: temp.path().to_path_buf(),
        manifest_path: temp.path().join("tags.tsv"),
        model_path: temp.path().join("model.zip"),
        ..TrainerConfig::default()
    };
    assert!(matches!(run(&config), Err(TrainerError::Io { .. })));
}

#[test]
fn no_usable_images_is_fatal() {
    let (_temp, config) = workspace(&[], "gone.jpg\tcat\nalso-gone.jpg\tdog\n");
    assert!(matches!(run(&config), Err(TrainerError::EmptyDataset)));
    assert!(!config.model_path.exists());
}
