use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

pub const DEFAULT_HOLIDAY_API_URL: &str = "https://jours-feries-france.antoine-augusti.fr/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
/// Half a working day
pub const DEFAULT_UNITS: f64 = 0.5;

pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "cra", "cra")
}

/// Identity block printed at the top of the report
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ReportHeader {
    pub employee_name: String,
    pub employee_email: String,
    pub company_name: String,
    pub manager_name: String,
    pub manager_email: String,
}

impl ReportHeader {
    pub fn is_empty(&self) -> bool {
        [
            &self.employee_name,
            &self.employee_email,
            &self.company_name,
            &self.manager_name,
            &self.manager_email,
        ]
        .iter()
        .all(|field| field.trim().is_empty())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub holiday_api_url: String,
    pub request_timeout_secs: u64,
    pub default_units: f64,
    pub output_dir: Option<PathBuf>,
    pub header: ReportHeader,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            holiday_api_url: DEFAULT_HOLIDAY_API_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            default_units: DEFAULT_UNITS,
            output_dir: None,
            header: ReportHeader::default(),
        }
    }
}

impl Config {
    pub fn get_config_path() -> Option<PathBuf> {
        project_dirs().map(|proj_dirs| proj_dirs.config_dir().join("config.json"))
    }

    /// Load the user configuration, falling back to defaults when no file exists yet
    pub fn load() -> Result<Self> {
        let config_path =
            Self::get_config_path().ok_or(ConfigError::NoProjectDirectory("config"))?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let config_data = fs::read_to_string(config_path)
            .map_err(|e| ConfigError::LoadFailed(format!("{}: {}", config_path.display(), e)))?;

        let config: Config = serde_json::from_str(&config_data)
            .map_err(|e| ConfigError::LoadFailed(format!("{}: {}", config_path.display(), e)))?;

        if !(config.default_units.is_finite() && config.default_units >= 0.0) {
            return Err(ConfigError::LoadFailed(format!(
                "{}: default_units must be a non-negative number, got {}",
                config_path.display(),
                config.default_units
            ))
            .into());
        }

        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf> {
        let config_path =
            Self::get_config_path().ok_or(ConfigError::NoProjectDirectory("config"))?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::DirectoryCreationFailed(e.to_string()))?;
        }

        let config_data = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        fs::write(config_path, config_data)
            .map_err(|e| ConfigError::SaveFailed(format!("{}: {}", config_path.display(), e)))?;

        Ok(())
    }

    /// Directory reports are written to
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.default_units, 0.5);
        assert_eq!(config.holiday_api_url, DEFAULT_HOLIDAY_API_URL);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.header.employee_name = "Camille Martin".to_string();
        config.output_dir = Some(PathBuf::from("/tmp/reports"));
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"header": {"company_name": "ACME"}}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.header.company_name, "ACME");
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert!(!config.header.is_empty());
        assert!(Config::default().header.is_empty());
    }

    #[test]
    fn test_negative_default_units_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"default_units": -0.5}"#).unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("default_units"));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_output_dir_defaults_to_cwd() {
        assert_eq!(Config::default().output_dir(), PathBuf::from("."));
    }
}
