use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::project_dirs;
use crate::error::{ConfigError, CraError, Result};
use crate::holidays::Holiday;

/// Holiday calendars are published once a year; a month is plenty
pub const DEFAULT_MAX_AGE_HOURS: i64 = 24 * 30;

/// Holidays fetched for one year
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CachedYear {
    pub holidays: Vec<Holiday>,
    pub fetched_at: String, // RFC 3339 timestamp
}

/// On-disk cache of provider responses, keyed by year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidayCache {
    pub years: HashMap<i32, CachedYear>,
    pub last_updated: String,
    #[serde(skip)]
    path: PathBuf,
}

impl HolidayCache {
    /// Create an empty cache stored at `path`
    pub fn with_path(path: PathBuf) -> Self {
        HolidayCache {
            years: HashMap::new(),
            last_updated: Local::now().to_rfc3339(),
            path,
        }
    }

    pub fn get_cache_path() -> Option<PathBuf> {
        project_dirs().map(|proj_dirs| proj_dirs.cache_dir().join("holidays_cache.json"))
    }

    /// Load the cache from the platform cache directory
    pub fn load() -> Result<Self> {
        let cache_path =
            Self::get_cache_path().ok_or(ConfigError::NoProjectDirectory("cache"))?;
        Self::load_from(&cache_path)
    }

    /// Load the cache from `path`; a missing file yields an empty cache
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::with_path(path.to_path_buf()));
        }

        let cache_data = fs::read_to_string(path)?;
        let mut cache: HolidayCache = serde_json::from_str(&cache_data).map_err(|e| {
            CraError::Other(format!("Failed to parse cache {}: {}", path.display(), e))
        })?;
        cache.path = path.to_path_buf();

        Ok(cache)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let cache_data = serde_json::to_string_pretty(self)?;
        fs::write(&self.path, cache_data)?;

        Ok(())
    }

    pub fn get(&self, year: i32) -> Option<&CachedYear> {
        self.years.get(&year)
    }

    /// Store the holidays of a year, replacing any previous entry
    pub fn insert(&mut self, year: i32, holidays: Vec<Holiday>) {
        let now = Local::now().to_rfc3339();
        self.years.insert(
            year,
            CachedYear {
                holidays,
                fetched_at: now.clone(),
            },
        );
        self.last_updated = now;
    }

    /// A year is stale when absent, unparseable or older than `hours`
    pub fn is_stale(&self, year: i32, hours: i64) -> bool {
        let Some(entry) = self.years.get(&year) else {
            return true;
        };
        if let Ok(fetched_at) = DateTime::parse_from_rfc3339(&entry.fetched_at) {
            let duration = Local::now().signed_duration_since(fetched_at);
            duration.num_hours() > hours
        } else {
            true
        }
    }
}
