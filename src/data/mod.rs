pub mod image;
pub mod loader;
pub mod manifest;
pub mod sample;
pub mod split;

pub use loader::{EntryOutcome, ImageLoader, LoadReport, SkipReason, SkippedEntry};
pub use manifest::{Manifest, ManifestEntry, ManifestLine};
pub use sample::Sample;
pub use split::{split_samples, DataSplit};
