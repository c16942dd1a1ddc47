use crate::data::sample::Sample;
use crate::model::metadata::DataSchema;
use crate::pipeline::maxent::{MaxEntModel, Prediction};

/// A fitted classifier together with the schema it was trained against.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedModel {
    pub model: MaxEntModel,
    pub schema: DataSchema,
}

impl TrainedModel {
    pub fn new(model: MaxEntModel, schema: DataSchema) -> Self {
        TrainedModel { model, schema }
    }

    pub fn classes(&self) -> &[String] {
        &self.model.classes
    }

    pub fn predict(&self, sample: &Sample) -> Prediction {
        self.model.predict(&sample.pixels)
    }

    pub fn predict_pixels(&self, pixels: &[f32]) -> Prediction {
        self.model.predict(pixels)
    }
}
