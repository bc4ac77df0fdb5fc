//! Runtime configuration

use crate::edition::EditionSource;
use crate::error::TadabburError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_CACHE_CAPACITY: usize = 8;
const DEFAULT_PLAIN_EDITION: &str = "quran-simple-clean";
const DEFAULT_DIACRITIC_EDITION: &str = "quran-uthmani";

const ENV_PREFIX: &str = "TADABBUR_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind_addr: String,
    pub data_dir: PathBuf,
    /// Number of editions kept resident
    pub cache_capacity: usize,
    pub plain_edition: EditionSource,
    /// Searched first for queries typed with harakat
    pub diacritic_edition: Option<EditionSource>,
    /// Download editions missing from `data_dir`
    pub fetch_missing: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            data_dir: get_data_dir(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            plain_edition: EditionSource::AlQuranCloud {
                identifier: DEFAULT_PLAIN_EDITION.to_string(),
            },
            diacritic_edition: Some(EditionSource::AlQuranCloud {
                identifier: DEFAULT_DIACRITIC_EDITION.to_string(),
            }),
            fetch_missing: true,
        }
    }
}

impl Config {
    /// Defaults overlaid with `TADABBUR_*` environment variables
    pub fn from_env() -> Result<Self, TadabburError> {
        Self::from_lookup(|key| std::env::var(format!("{}{}", ENV_PREFIX, key)).ok())
    }

    /// Same as [`Config::from_env`] with an injectable variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TadabburError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup("BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(dir) = lookup("DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(capacity) = lookup("CACHE_CAPACITY") {
            config.cache_capacity = capacity.trim().parse().map_err(|_| {
                TadabburError::Config(format!("CACHE_CAPACITY must be a number, got {:?}", capacity))
            })?;
        }
        if let Some(edition) = lookup("PLAIN_EDITION") {
            config.plain_edition = edition.parse()?;
        }
        if let Some(edition) = lookup("DIACRITIC_EDITION") {
            // empty or "none" disables the diacritic corpus
            config.diacritic_edition = match edition.trim() {
                "" | "none" => None,
                other => Some(other.parse()?),
            };
        }
        if let Some(flag) = lookup("FETCH_MISSING") {
            config.fetch_missing = parse_bool(&flag).ok_or_else(|| {
                TadabburError::Config(format!("FETCH_MISSING must be true or false, got {:?}", flag))
            })?;
        }

        Ok(config)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Get the data directory
///
/// Platform data dir (`Tadabbur/` subfolder) when available, `./data` otherwise.
pub fn get_data_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_dir() {
        return data_dir.join("Tadabbur");
    }
    PathBuf::from("data")
}
