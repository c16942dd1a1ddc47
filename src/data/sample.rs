/// One preprocessed training/evaluation unit.
///
/// `pixels` holds `width × height × channels` values in [0, 1], row-major and
/// channel-interleaved. Samples are never mutated once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub pixels: Vec<f32>,
    pub label: String,
}

impl Sample {
    pub fn new(pixels: Vec<f32>, label: impl Into<String>) -> Self {
        Sample {
            pixels,
            label: label.into(),
        }
    }

    pub fn feature_count(&self) -> usize {
        self.pixels.len()
    }
}
