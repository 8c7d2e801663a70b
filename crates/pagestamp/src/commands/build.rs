//! Page generation command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use pagestamp_static::StaticBuilder;

use crate::config::load_build_config;

/// Run the build command.
pub async fn run(config_path: &Path, output: Option<PathBuf>, strict: bool) -> Result<()> {
    tracing::info!("Generating service pages...");

    let mut config = load_build_config(config_path)?;
    if let Some(output) = output {
        config.output_dir = output;
    }
    config.strict |= strict;

    let result = StaticBuilder::new(config).build()?;

    tracing::info!("Files written:");
    for path in &result.written {
        tracing::info!(" - {}", path.display());
    }

    tracing::info!(
        "Built {} pages with {} warnings in {}ms",
        result.pages,
        result.warning_count(),
        result.duration_ms
    );

    Ok(())
}
