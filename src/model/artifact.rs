//! Model artifact: a zip archive holding `model.json` (weights, biases and
//! classes) and `schema.json` (the training data schema).
//!
//! Saving always overwrites; there is no versioning or appending.
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::TrainerError;
use crate::model::metadata::DataSchema;
use crate::model::trained_model::TrainedModel;
use crate::pipeline::maxent::MaxEntModel;

pub const MODEL_ENTRY: &str = "model.json";
pub const SCHEMA_ENTRY: &str = "schema.json";

impl TrainedModel {
    /// Writes the model and its schema to a zip archive at `path`.
    pub fn save(&self, path: &Path) -> Result<(), TrainerError> {
        let file = File::create(path).map_err(|e| TrainerError::io(path, e))?;
        let mut zip = zip::ZipWriter::new(BufWriter::new(file));
        zip.start_file(MODEL_ENTRY, entry_options())?;
        zip.write_all(&serde_json::to_vec(&self.model)?)
            .map_err(|e| TrainerError::io(path, e))?;

        zip.start_file(SCHEMA_ENTRY, entry_options())?;
        zip.write_all(&serde_json::to_vec_pretty(&self.schema)?)
            .map_err(|e| TrainerError::io(path, e))?;

        let mut writer = zip.finish()?;
        writer.flush().map_err(|e| TrainerError::io(path, e))?;
        Ok(())
    }

    /// Reads an archive previously written by [`TrainedModel::save`].
    pub fn load(path: &Path) -> Result<TrainedModel, TrainerError> {
        let file = File::open(path).map_err(|e| TrainerError::io(path, e))?;
        let mut archive = zip::ZipArchive::new(BufReader::new(file))?;

        let model: MaxEntModel = read_json_entry(&mut archive, MODEL_ENTRY, path)?;
        let schema: DataSchema = read_json_entry(&mut archive, SCHEMA_ENTRY, path)?;

        model.validate()?;
        if schema.input_type.geometry().feature_count() != schema.feature_count {
            return Err(TrainerError::Artifact(format!(
                "schema input type {:?} does not match its feature count {}",
                schema.input_type, schema.feature_count
            )));
        }
        if model.feature_count() != schema.feature_count {
            return Err(TrainerError::Artifact(format!(
                "model expects {} features but schema declares {}",
                model.feature_count(),
                schema.feature_count
            )));
        }
        Ok(TrainedModel::new(model, schema))
    }
}

fn entry_options() -> zip::write::SimpleFileOptions {
    zip::write::SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated)
}

fn read_json_entry<R, T>(
    archive: &mut zip::ZipArchive<R>,
    name: &str,
    path: &Path,
) -> Result<T, TrainerError>
where
    R: Read + std::io::Seek,
    T: DeserializeOwned,
{
    let mut entry = archive.by_name(name).map_err(|err| match err {
        zip::result::ZipError::FileNotFound => {
            TrainerError::Artifact(format!("{} is missing {}", path.display(), name))
        }
        other => TrainerError::Zip(other),
    })?;
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes).map_err(|e| TrainerError::io(path, e))?;
    Ok(serde_json::from_slice(&bytes)?)
}
