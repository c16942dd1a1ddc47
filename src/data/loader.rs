use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::ImageGeometry;
use crate::data::image::load_image_pixels;
use crate::data::manifest::{Manifest, ManifestEntry, ManifestLine};
use crate::data::sample::Sample;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Why a manifest line did not produce a sample.
#[derive(Debug)]
pub enum SkipReason {
    /// The line did not split into `<path>\t<label>`.
    Malformed(String),
    /// The image could not be opened, decoded, or resized.
    Decode(image::ImageError),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Malformed(reason) => write!(f, "malformed manifest line: {}", reason),
            SkipReason::Decode(err) => write!(f, "{}", err),
        }
    }
}

/// A manifest line that was dropped from the output.
#[derive(Debug)]
pub struct SkippedEntry {
    pub line: usize,
    /// Resolved image path, or the raw line text for malformed lines.
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Per-line result of loading.
#[derive(Debug)]
pub enum EntryOutcome {
    Loaded(Sample),
    Skipped(SkippedEntry),
}

/// Everything the loader produced for one manifest.
///
/// `samples.len() + skipped.len()` equals the number of non-blank manifest lines.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub samples: Vec<Sample>,
    pub skipped: Vec<SkippedEntry>,
}

impl LoadReport {
    pub fn total(&self) -> usize {
        self.samples.len() + self.skipped.len()
    }
}

/// Turns manifest entries into [`Sample`]s.
#[derive(Debug, Clone)]
pub struct ImageLoader {
    base_dir: PathBuf,
    geometry: ImageGeometry,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

impl ImageLoader {
    pub fn new(base_dir: impl Into<PathBuf>, geometry: ImageGeometry) -> Self {
        ImageLoader {
            base_dir: base_dir.into(),
            geometry,
        }
    }

    /// Loads a single entry. Never fails: errors become [`EntryOutcome::Skipped`].
    pub fn load_entry(&self, entry: &ManifestEntry) -> EntryOutcome {
        let path = self.base_dir.join(&entry.image_path);
        match load_image_pixels(&path, self.geometry) {
            Ok(pixels) => EntryOutcome::Loaded(Sample::new(pixels, entry.label.clone())),
            Err(err) => EntryOutcome::Skipped(SkippedEntry {
                line: entry.line,
                path,
                reason: SkipReason::Decode(err),
            }),
        }
    }

    /// Yields one outcome per non-blank manifest line, in file order.
    pub fn outcomes<'a>(
        &'a self,
        manifest: &'a Manifest,
    ) -> impl Iterator<Item = EntryOutcome> + 'a {
        manifest.lines.iter().map(move |line| match line {
            ManifestLine::Entry(entry) => self.load_entry(entry),
            ManifestLine::Malformed { line, raw, reason } => EntryOutcome::Skipped(SkippedEntry {
                line: *line,
                path: PathBuf::from(raw),
                reason: SkipReason::Malformed(reason.clone()),
            }),
        })
    }

    /// Loads every line of `manifest`, logging each skipped entry once.
    pub fn load(&self, manifest: &Manifest) -> LoadReport {
        let mut report = LoadReport::default();
        for outcome in self.outcomes(manifest) {
            match outcome {
                EntryOutcome::Loaded(sample) => report.samples.push(sample),
                EntryOutcome::Skipped(skipped) => {
                    match &skipped.reason {
                        SkipReason::Malformed(reason) => log::error!(
                            "skipping manifest line {} ({:?}): {}",
                            skipped.line,
                            skipped.path.display().to_string(),
                            reason
                        ),
                        SkipReason::Decode(err) => log::error!(
                            "failed to load image {} (line {}): {}",
                            skipped.path.display(),
                            skipped.line,
                            err
                        ),
                    }
                    report.skipped.push(skipped);
                }
            }
        }
        log::info!(
            "loaded {} of {} manifest entries ({} skipped)",
            report.samples.len(),
            report.total(),
            report.skipped.len()
        );
        report
    }

    /// Reads `manifest_path` and loads it. Only an unreadable manifest is fatal.
    pub fn load_manifest(
        &self,
        manifest_path: &Path,
    ) -> Result<LoadReport, crate::TrainerError> {
        let manifest = Manifest::read(manifest_path)?;
        Ok(self.load(&manifest))
    }
}
