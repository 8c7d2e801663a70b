//! Loading and validating service record sets.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::record::ServiceRecord;

/// Supported data-file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
    Toml,
}

impl Format {
    /// Pick a format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str())? {
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            "toml" => Some(Format::Toml),
            _ => None,
        }
    }
}

/// Errors that can occur when loading service records.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Unsupported data file format: {0} (expected .json, .yaml, .yml or .toml)")]
    UnsupportedFormat(String),

    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Record {index}: {field} must not be empty")]
    EmptyField { index: usize, field: &'static str },

    #[error("Record '{slug}': invalid filename '{filename}' (expected a plain *.html file name)")]
    InvalidFilename { slug: String, filename: String },

    #[error("Duplicate slug '{0}'")]
    DuplicateSlug(String),

    #[error("Duplicate filename '{0}'")]
    DuplicateFilename(String),
}

/// TOML documents cannot have a top-level array, so records live under `[[service]]`.
#[derive(Deserialize)]
struct TomlServices {
    #[serde(default)]
    service: Vec<ServiceRecord>,
}

/// An ordered, validated collection of service records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceSet {
    records: Vec<ServiceRecord>,
}

impl ServiceSet {
    /// Validate records and wrap them in a set.
    ///
    /// Identity fields must be non-empty, filenames must be plain `*.html`
    /// names, and both slugs and filenames must be unique.
    pub fn new(records: Vec<ServiceRecord>) -> Result<Self, DataError> {
        let mut slugs = HashSet::new();
        let mut filenames = HashSet::new();

        for (index, record) in records.iter().enumerate() {
            if record.slug.trim().is_empty() {
                return Err(DataError::EmptyField {
                    index,
                    field: "slug",
                });
            }
            if record.filename.trim().is_empty() {
                return Err(DataError::EmptyField {
                    index,
                    field: "filename",
                });
            }
            if record.trade_display.trim().is_empty() {
                return Err(DataError::EmptyField {
                    index,
                    field: "tradeDisplay",
                });
            }
            if !is_plain_html_name(&record.filename) {
                return Err(DataError::InvalidFilename {
                    slug: record.slug.clone(),
                    filename: record.filename.clone(),
                });
            }
            if !slugs.insert(record.slug.as_str()) {
                return Err(DataError::DuplicateSlug(record.slug.clone()));
            }
            if !filenames.insert(record.filename.as_str()) {
                return Err(DataError::DuplicateFilename(record.filename.clone()));
            }
        }

        Ok(Self { records })
    }

    /// Records in input order.
    pub fn records(&self) -> &[ServiceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ServiceRecord> {
        self.records.iter()
    }

    /// Every record except `current`, in input order.
    pub fn siblings<'a>(
        &'a self,
        current: &'a ServiceRecord,
    ) -> impl Iterator<Item = &'a ServiceRecord> + 'a {
        self.records.iter().filter(move |r| r.slug != current.slug)
    }
}

impl<'a> IntoIterator for &'a ServiceSet {
    type Item = &'a ServiceRecord;
    type IntoIter = std::slice::Iter<'a, ServiceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Parse service records from source text in the given format.
///
/// `origin` is only used in error messages.
pub fn parse_services(source: &str, format: Format, origin: &str) -> Result<ServiceSet, DataError> {
    let parse_err = |message: String| DataError::Parse {
        path: origin.to_string(),
        message,
    };

    let records: Vec<ServiceRecord> = match format {
        Format::Json => serde_json::from_str(source).map_err(|e| parse_err(e.to_string()))?,
        Format::Yaml => serde_yaml::from_str(source).map_err(|e| parse_err(e.to_string()))?,
        Format::Toml => {
            let doc: TomlServices = toml::from_str(source).map_err(|e| parse_err(e.to_string()))?;
            doc.service
        }
    };

    ServiceSet::new(records)
}

/// Load and validate the service records at `path`.
pub fn load_services(path: &Path) -> Result<ServiceSet, DataError> {
    let format = Format::from_path(path)
        .ok_or_else(|| DataError::UnsupportedFormat(path.display().to_string()))?;

    let source = fs::read_to_string(path).map_err(|e| DataError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let set = parse_services(&source, format, &path.display().to_string())?;

    if set.is_empty() {
        tracing::warn!("No service records found in {}", path.display());
    } else {
        tracing::debug!("Loaded {} service records from {}", set.len(), path.display());
    }

    Ok(set)
}

/// A single `*.html` file name that is also a literal URL path segment.
///
/// Only ASCII letters, digits, `-`, `_` and `.` are accepted, so the name never
/// carries a separator, query, fragment or XML-special character.
fn is_plain_html_name(filename: &str) -> bool {
    let stem = match filename.strip_suffix(".html") {
        Some(stem) => stem,
        None => return false,
    };

    !stem.is_empty()
        && filename
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
