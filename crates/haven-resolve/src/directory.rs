//! Resource-directory collaborator interface.
//!
//! The directory of physical support locations is an external system as far
//! as the pipeline is concerned: [`ResourceDirectory`] is the only thing the
//! service sees, and every implementation answers the same query — active
//! records that carry coordinates. [`FileDirectory`] is the default/dev
//! backend, loading a validated YAML seed at startup; [`StaticDirectory`]
//! serves fixtures in tests.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use haven_core::geo;

/// An active directory location with known coordinates.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LocationRecord {
    pub name: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    /// Directory category, e.g. "Community counseling center".
    pub kind: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("failed to read directory file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse directory file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid directory entry: {0}")]
    Validation(String),

    #[error("directory backend unavailable: {0}")]
    Unavailable(String),
}

/// Query interface over the location directory.
#[async_trait]
pub trait ResourceDirectory: Send + Sync {
    /// Returns every active record that has coordinates.
    ///
    /// "No results" is an empty list; an `Err` means the lookup itself
    /// failed and must not be flattened into an empty list.
    ///
    /// # Errors
    ///
    /// [`DirectoryError`] when the backing store cannot be queried.
    async fn list_active_with_coordinates(&self) -> Result<Vec<LocationRecord>, DirectoryError>;
}

#[derive(Debug, Deserialize)]
struct DirectoryFile {
    resources: Vec<DirectoryEntry>,
}

#[derive(Debug, Deserialize)]
struct DirectoryEntry {
    name: String,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
    #[serde(default = "default_active")]
    active: bool,
}

fn default_active() -> bool {
    true
}

/// Directory backed by a YAML seed file, loaded and validated once at startup.
pub struct FileDirectory {
    records: Vec<LocationRecord>,
}

impl FileDirectory {
    /// Loads and validates the directory seed file.
    ///
    /// Inactive entries and entries without both coordinates are filtered out
    /// here, so every served record satisfies the query contract.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError` if the file cannot be read, parsed, or fails
    /// validation.
    pub fn load(path: &Path) -> Result<Self, DirectoryError> {
        let content = std::fs::read_to_string(path).map_err(|e| DirectoryError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let records = parse_directory(&content)?;
        Ok(Self { records })
    }

    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

fn parse_directory(content: &str) -> Result<Vec<LocationRecord>, DirectoryError> {
    let file: DirectoryFile = serde_yaml::from_str(content)?;

    let mut records = Vec::new();
    for entry in file.resources {
        if entry.name.trim().is_empty() {
            return Err(DirectoryError::Validation(
                "resource name must be non-empty".to_owned(),
            ));
        }
        if !entry.active {
            continue;
        }
        let (Some(latitude), Some(longitude)) = (entry.latitude, entry.longitude) else {
            continue;
        };
        if !geo::in_bounds(latitude, longitude) {
            return Err(DirectoryError::Validation(format!(
                "resource '{}' has out-of-range coordinates ({latitude}, {longitude})",
                entry.name
            )));
        }
        records.push(LocationRecord {
            name: entry.name,
            phone: entry.phone,
            website: entry.website,
            kind: entry.kind,
            latitude,
            longitude,
        });
    }

    Ok(records)
}

#[async_trait]
impl ResourceDirectory for FileDirectory {
    async fn list_active_with_coordinates(&self) -> Result<Vec<LocationRecord>, DirectoryError> {
        Ok(self.records.clone())
    }
}

/// Fixed in-memory directory for tests and local development.
pub struct StaticDirectory {
    records: Vec<LocationRecord>,
}

impl StaticDirectory {
    #[must_use]
    pub fn new(records: Vec<LocationRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl ResourceDirectory for StaticDirectory {
    async fn list_active_with_coordinates(&self) -> Result<Vec<LocationRecord>, DirectoryError> {
        Ok(self.records.clone())
    }
}
