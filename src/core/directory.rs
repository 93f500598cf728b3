use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

const BUILTIN_DIRECTORY: &str = include_str!("../../config/directory.toml");

/// Errors that can occur when loading reference tables
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Failed to read directory file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse directory file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid id in {table} table: {id}")]
    InvalidId { table: &'static str, id: String },
}

#[derive(Debug, Deserialize)]
struct RawDirectory {
    #[serde(default)]
    produce_types: Vec<String>,
    #[serde(default)]
    counties: HashMap<String, String>,
    #[serde(default)]
    hubs: HashMap<String, String>,
}

/// Static lookup tables: county and hub ids to names, plus the produce taxonomy
///
/// Loaded once at startup and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct LocationDirectory {
    counties: HashMap<Uuid, String>,
    hubs: HashMap<Uuid, String>,
    produce_types: Vec<String>,
}

impl LocationDirectory {
    /// The tables shipped with the service
    pub fn builtin() -> Result<Self, DirectoryError> {
        Self::from_toml_str(BUILTIN_DIRECTORY)
    }

    /// Load tables from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DirectoryError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, DirectoryError> {
        let raw: RawDirectory = toml::from_str(contents)?;

        Ok(Self {
            counties: parse_table("counties", raw.counties)?,
            hubs: parse_table("hubs", raw.hubs)?,
            produce_types: raw.produce_types,
        })
    }

    /// Display name for a county reference
    ///
    /// Unknown or non-UUID values are returned as-is, since older rows store
    /// the county name directly.
    pub fn county_name<'a>(&'a self, raw: &'a str) -> &'a str {
        lookup(&self.counties, raw)
    }

    /// Display name for a drop-off hub reference
    pub fn hub_name<'a>(&'a self, raw: &'a str) -> &'a str {
        lookup(&self.hubs, raw)
    }

    pub fn is_known_produce(&self, name: &str) -> bool {
        self.produce_types.iter().any(|p| p == name)
    }

    pub fn produce_types(&self) -> &[String] {
        &self.produce_types
    }

    pub fn county_count(&self) -> usize {
        self.counties.len()
    }

    pub fn hub_count(&self) -> usize {
        self.hubs.len()
    }
}

fn parse_table(
    table: &'static str,
    entries: HashMap<String, String>,
) -> Result<HashMap<Uuid, String>, DirectoryError> {
    entries
        .into_iter()
        .map(|(id, name)| {
            Uuid::parse_str(&id)
                .map(|uuid| (uuid, name))
                .map_err(|_| DirectoryError::InvalidId { table, id })
        })
        .collect()
}

fn lookup<'a>(table: &'a HashMap<Uuid, String>, raw: &'a str) -> &'a str {
    Uuid::parse_str(raw.trim())
        .ok()
        .and_then(|id| table.get(&id))
        .map(String::as_str)
        .unwrap_or(raw)
}
