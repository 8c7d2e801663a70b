//! Service page builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::NaiveDate;

use pagestamp_data::{load_services, DataError, ServiceSet};

use crate::page::RegionOutcome;
use crate::site::SiteConfig;
use crate::sitemap::{render_robots, render_sitemap, sitemap_entries};
use crate::synthesis::{FieldWarning, Synthesizer};

/// Configuration for building the service pages.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Service records data file
    pub services_path: PathBuf,

    /// HTML template shared by every service page
    pub template_path: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Image directory to create if missing
    pub images_dir: Option<PathBuf>,

    /// Site-wide settings
    pub site: SiteConfig,

    /// Treat any warning as fatal
    pub strict: bool,

    /// Sitemap date; today (UTC) when unset
    pub lastmod: Option<NaiveDate>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            services_path: PathBuf::from("services.json"),
            template_path: PathBuf::from("index.html"),
            output_dir: PathBuf::from("."),
            images_dir: None,
            site: SiteConfig::default(),
            strict: false,
            lastmod: None,
        }
    }
}

impl BuildConfig {
    /// Path a service page is written to.
    pub fn output_path(&self, filename: &str) -> PathBuf {
        self.output_dir.join(filename)
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of service pages generated
    pub pages: usize,

    /// Every file written, in write order
    pub written: Vec<PathBuf>,

    /// How each template region resolved
    pub outcomes: Vec<RegionOutcome>,

    /// Regions records could not fill
    pub field_warnings: Vec<FieldWarning>,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

impl BuildResult {
    pub fn warning_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_warning()).count() + self.field_warnings.len()
    }
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error("Failed to read template: {0}")]
    ReadError(String),

    #[error("Output for '{slug}' would overwrite the template {path}")]
    TemplateCollision { slug: String, path: String },

    #[error("Invalid page URL: {0}")]
    UrlError(String),

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),

    #[error("Strict mode: {} warning(s): {}", .0.len(), .0.join("; "))]
    Strict(Vec<String>),
}

/// Builds every service page, the sitemap and robots policy.
pub struct StaticBuilder {
    config: BuildConfig,
    synthesizer: Synthesizer,
}

impl StaticBuilder {
    /// Create a new builder.
    pub fn new(config: BuildConfig) -> Self {
        let synthesizer = Synthesizer::new(config.site.clone());
        Self {
            config,
            synthesizer,
        }
    }

    /// Build the site.
    ///
    /// Input errors abort before anything is written. Files written before a
    /// later write failure are left in place.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        let services = load_services(&self.config.services_path)?;

        let template = fs::read_to_string(&self.config.template_path).map_err(|e| {
            BuildError::ReadError(format!("{}: {}", self.config.template_path.display(), e))
        })?;

        self.check_template_collision(&services)?;

        let synthesis = self.synthesizer.synthesize(&template, &services)?;

        for outcome in synthesis.outcomes.iter().filter(|o| o.is_warning()) {
            tracing::warn!("{}", outcome);
        }
        for warning in &synthesis.field_warnings {
            tracing::warn!("{}", warning);
        }

        if self.config.strict {
            let warnings = synthesis.warnings();
            if !warnings.is_empty() {
                return Err(BuildError::Strict(warnings));
            }
        }

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        if let Some(images_dir) = &self.config.images_dir {
            fs::create_dir_all(images_dir).map_err(|e| {
                BuildError::WriteError(format!("{}: {}", images_dir.display(), e))
            })?;
        }

        let mut written = Vec::with_capacity(synthesis.pages.len() + 2);

        for page in &synthesis.pages {
            let path = self.config.output_path(&page.filename);
            write_file(&path, &page.html)?;
            tracing::debug!("Wrote {} for '{}'", path.display(), page.slug);
            written.push(path);
        }

        written.push(self.generate_sitemap(&services)?);
        written.push(self.generate_robots()?);

        let duration = start.elapsed();

        Ok(BuildResult {
            pages: synthesis.pages.len(),
            written,
            outcomes: synthesis.outcomes,
            field_warnings: synthesis.field_warnings,
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Refuse to generate a page on top of the template it is built from.
    fn check_template_collision(&self, services: &ServiceSet) -> Result<(), BuildError> {
        let template = resolve_path(&self.config.template_path);

        for record in services {
            let output = resolve_path(&self.config.output_path(&record.filename));
            if output == template {
                return Err(BuildError::TemplateCollision {
                    slug: record.slug.clone(),
                    path: self.config.template_path.display().to_string(),
                });
            }
        }

        Ok(())
    }

    /// Generate sitemap.
    fn generate_sitemap(&self, services: &ServiceSet) -> Result<PathBuf, BuildError> {
        let lastmod = self
            .config
            .lastmod
            .unwrap_or_else(|| chrono::Utc::now().date_naive());

        let entries = sitemap_entries(&self.config.site, services, lastmod)
            .map_err(|e| BuildError::UrlError(e.to_string()))?;

        let path = self.config.output_dir.join("sitemap.xml");
        write_file(&path, &render_sitemap(&entries))?;

        Ok(path)
    }

    /// Generate robots.txt.
    fn generate_robots(&self) -> Result<PathBuf, BuildError> {
        let robots =
            render_robots(&self.config.site).map_err(|e| BuildError::UrlError(e.to_string()))?;

        let path = self.config.output_dir.join("robots.txt");
        write_file(&path, &robots)?;

        Ok(path)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), BuildError> {
    fs::write(path, contents).map_err(|e| BuildError::WriteError(format!("{}: {}", path.display(), e)))
}

/// Canonical form of a path that may not exist yet.
fn resolve_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = fs::canonicalize(path) {
        return canonical;
    }

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    match (fs::canonicalize(parent), path.file_name()) {
        (Ok(parent), Some(name)) => parent.join(name),
        _ => path.to_path_buf(),
    }
}
