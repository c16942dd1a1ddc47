pub mod metrics;

pub use metrics::{evaluate, format_confusion, ClassMetrics, MulticlassMetrics};
