//! Configuration file (site.toml) loading.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pagestamp_static::{site, BuildConfig, SiteConfig};
use serde::Deserialize;

/// Configuration file structure (site.toml).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub site: SiteSection,
    #[serde(default)]
    pub paths: PathsSection,
    #[serde(default)]
    pub build: BuildSettings,
}

#[derive(Debug, Deserialize)]
pub struct SiteSection {
    #[serde(default = "default_domain")]
    pub domain: String,
    #[serde(default = "default_static_pages")]
    pub static_pages: Vec<String>,
    #[serde(default = "default_hero_gradient")]
    pub hero_gradient: String,
}

#[derive(Debug, Deserialize)]
pub struct PathsSection {
    #[serde(default = "default_services")]
    pub services: String,
    #[serde(default = "default_template")]
    pub template: String,
    #[serde(default = "default_output")]
    pub output: String,
    /// Image directory created on build
    pub images: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct BuildSettings {
    #[serde(default)]
    pub strict: bool,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            static_pages: default_static_pages(),
            hero_gradient: default_hero_gradient(),
        }
    }
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            services: default_services(),
            template: default_template(),
            output: default_output(),
            images: None,
        }
    }
}

fn default_domain() -> String {
    site::DEFAULT_DOMAIN.to_string()
}
fn default_static_pages() -> Vec<String> {
    site::DEFAULT_STATIC_PAGES.iter().map(|p| p.to_string()).collect()
}
fn default_hero_gradient() -> String {
    site::DEFAULT_HERO_GRADIENT.to_string()
}
fn default_services() -> String {
    "services.json".to_string()
}
fn default_template() -> String {
    "index.html".to_string()
}
fn default_output() -> String {
    ".".to_string()
}

impl ConfigFile {
    /// Turn the file settings into a build configuration.
    ///
    /// Relative paths are resolved against `base`, the directory holding the
    /// config file.
    pub fn into_build_config(self, base: &Path) -> Result<BuildConfig> {
        let mut site = SiteConfig::new(&self.site.domain)
            .with_context(|| format!("Invalid site domain '{}'", self.site.domain))?;
        site.static_pages = self.site.static_pages;
        site.hero_gradient = self.site.hero_gradient;

        Ok(BuildConfig {
            services_path: base.join(&self.paths.services),
            template_path: base.join(&self.paths.template),
            output_dir: base.join(&self.paths.output),
            images_dir: self.paths.images.map(|dir| base.join(dir)),
            site,
            strict: self.build.strict,
            lastmod: None,
        })
    }
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let config: ConfigFile = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    tracing::debug!("No config at {}, using defaults", path.display());
    Ok(ConfigFile::default())
}

/// Load `path` and build a configuration rooted at its directory.
pub fn load_build_config(path: &Path) -> Result<BuildConfig> {
    let base = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    load_config(path)?.into_build_config(&base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_when_file_is_absent() {
        let temp = tempdir().unwrap();

        let config = load_build_config(&temp.path().join("site.toml")).unwrap();

        assert_eq!(config.services_path, temp.path().join("services.json"));
        assert_eq!(config.template_path, temp.path().join("index.html"));
        assert_eq!(config.site.root().as_str(), "https://quantumtask.io/");
        assert_eq!(config.site.static_pages.len(), 4);
        assert!(!config.strict);
        assert!(config.images_dir.is_none());
    }

    #[test]
    fn reads_sections() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("site.toml");
        fs::write(
            &path,
            r#"
[site]
domain = "https://example.com"
static_pages = ["terms.html"]

[paths]
services = "data/services.yaml"
output = "public"
images = "public/images"

[build]
strict = true
"#,
        )
        .unwrap();

        let config = load_build_config(&path).unwrap();

        assert_eq!(config.site.root().as_str(), "https://example.com/");
        assert_eq!(config.site.static_pages, vec!["terms.html"]);
        assert_eq!(config.services_path, temp.path().join("data/services.yaml"));
        assert_eq!(config.output_dir, temp.path().join("public"));
        assert_eq!(config.images_dir, Some(temp.path().join("public/images")));
        assert!(config.strict);
    }

    #[test]
    fn rejects_malformed_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("site.toml");
        fs::write(&path, "[site\ndomain = ").unwrap();

        assert!(load_config(&path).is_err());
    }

    #[test]
    fn rejects_relative_domain() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("site.toml");
        fs::write(&path, "[site]\ndomain = \"quantumtask.io\"\n").unwrap();

        assert!(load_build_config(&path).is_err());
    }
}
