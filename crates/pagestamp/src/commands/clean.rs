//! Text cleanup command for generated pages.

use std::path::Path;

use anyhow::{Context, Result};
use pagestamp_data::load_services;
use pagestamp_static::{clean_file, Normalizer};

use crate::config::load_build_config;

/// Run the clean command over every service page.
pub async fn run(config_path: &Path, dry_run: bool) -> Result<()> {
    let config = load_build_config(config_path)?;
    let services = load_services(&config.services_path)?;
    let normalizer = Normalizer::new();

    let mut any_changed = false;

    for record in &services {
        let path = config.output_path(&record.filename);
        if !path.exists() {
            tracing::warn!("{}: not generated yet, skipping", path.display());
            continue;
        }

        let cleanup = clean_file(&normalizer, &path, dry_run)
            .with_context(|| format!("Failed to clean {}", path.display()))?;
        any_changed |= cleanup.changed;

        let status = match (cleanup.changed, dry_run) {
            (true, true) => "would change",
            (true, false) => "changed",
            (false, _) => "unchanged",
        };
        if cleanup.summary.is_empty() {
            tracing::info!("{}: {}", path.display(), status);
        } else {
            tracing::info!("{}: {} ({})", path.display(), status, cleanup.summary);
        }
    }

    if !any_changed {
        tracing::info!("No changes needed.");
    }

    Ok(())
}
