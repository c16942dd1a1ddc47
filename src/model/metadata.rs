use serde::{Deserialize, Serialize};

use crate::config::ImageGeometry;

pub const FEATURE_COLUMN: &str = "Image";
pub const LABEL_COLUMN: &str = "Label";
pub const PREDICTED_LABEL_COLUMN: &str = "PredictedLabel";
pub const SCORE_COLUMN: &str = "Score";

/// Describes how to interpret the feature vector fed to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InputType {
    /// Grayscale image resized to width×height, normalized to [0, 1].
    ImageGrayscale { width: u32, height: u32 },
    /// RGB image resized to width×height, normalized to [0, 1], flattened as R,G,B,...
    ImageRgb { width: u32, height: u32 },
}

impl InputType {
    pub fn from_geometry(geometry: ImageGeometry) -> Self {
        let (width, height) = (geometry.width, geometry.height);
        if geometry.channels == 1 {
            InputType::ImageGrayscale { width, height }
        } else {
            InputType::ImageRgb { width, height }
        }
    }

    pub fn geometry(&self) -> ImageGeometry {
        match *self {
            InputType::ImageGrayscale { width, height } => ImageGeometry::new(width, height, 1),
            InputType::ImageRgb { width, height } => ImageGeometry::new(width, height, 3),
        }
    }
}

/// Schema of the data a model was trained against. Saved next to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSchema {
    pub feature_column: String,
    pub label_column: String,
    pub predicted_label_column: String,
    pub score_column: String,
    pub input_type: InputType,
    pub feature_count: usize,
    /// Class labels in key order; `Score[i]` belongs to `output_labels[i]`.
    pub output_labels: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl DataSchema {
    pub fn new(geometry: ImageGeometry, output_labels: Vec<String>) -> Self {
        DataSchema {
            feature_column: FEATURE_COLUMN.into(),
            label_column: LABEL_COLUMN.into(),
            predicted_label_column: PREDICTED_LABEL_COLUMN.into(),
            score_column: SCORE_COLUMN.into(),
            input_type: InputType::from_geometry(geometry),
            feature_count: geometry.feature_count(),
            output_labels,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
