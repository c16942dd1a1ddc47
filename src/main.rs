use std::path::Path;

use animal_trainer::config::{TrainerConfig, CONFIG_FILE};
use anyhow::Context;

// No flags: paths come from the defaults, or from `trainer_config.json` in
// the working directory when present.
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = TrainerConfig::load_or_default(Path::new(CONFIG_FILE))
        .with_context(|| format!("reading {}", CONFIG_FILE))?;

    let summary = animal_trainer::run(&config).with_context(|| {
        format!(
            "training from {} failed",
            config.manifest_path.display()
        )
    })?;

    log::info!(
        "done: {} samples used, {} entries skipped",
        summary.samples_loaded,
        summary.entries_skipped
    );
    Ok(())
}
