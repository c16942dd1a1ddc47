use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::data::sample::Sample;

/// Training and evaluation sets for one run.
#[derive(Debug, Clone)]
pub struct DataSplit {
    pub train: Vec<Sample>,
    /// `None` means "evaluate on the training set".
    pub holdout: Option<Vec<Sample>>,
}

impl DataSplit {
    /// The set the evaluator should score.
    pub fn evaluation_set(&self) -> &[Sample] {
        self.holdout.as_deref().unwrap_or(&self.train)
    }
}

/// Splits `samples` into train and held-out sets.
///
/// With `holdout_fraction == 0.0` nothing is held out and evaluation runs on
/// the training data. Otherwise samples are shuffled with a `seed`ed RNG and the
/// first `round(n * fraction)` become the held-out set, keeping at least one
/// sample for training.
pub fn split_samples(samples: Vec<Sample>, holdout_fraction: f64, seed: u64) -> DataSplit {
    if holdout_fraction <= 0.0 || samples.len() < 2 {
        return DataSplit {
            train: samples,
            holdout: None,
        };
    }

    let n = samples.len();
    let n_holdout = ((n as f64 * holdout_fraction).round() as usize).clamp(1, n - 1);

    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));

    let mut slots: Vec<Option<Sample>> = samples.into_iter().map(Some).collect();
    let mut take = |idx: usize| slots[idx].take();
    let holdout: Vec<Sample> = indices[..n_holdout].iter().filter_map(|&i| take(i)).collect();
    let train: Vec<Sample> = indices[n_holdout..].iter().filter_map(|&i| take(i)).collect();

    DataSplit {
        train,
        holdout: Some(holdout),
    }
}
