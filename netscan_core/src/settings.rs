//! Runtime settings, read from `config.json` in the platform config dir
//! (`~/.config/netscan/config.json`, `%APPDATA%\netscan\config\config.json`).
//! A missing file means defaults; unknown keys are rejected.

use std::{
    fmt::{self, Display},
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use directories::ProjectDirs;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::storage::ProfileStore;
use crate::vendor::DEFAULT_ENDPOINT;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Where transient profile XML files go; `None` means [`ProfileStore::default_dir`].
    pub profile_dir: Option<PathBuf>,
    /// Vendor lookup URL; `{mac}` is replaced by the address verbatim.
    pub vendor_endpoint: String,
    pub http_timeout_secs: u64,
    /// How long a join waits for the adapter to report the requested SSID.
    pub association_timeout_secs: u64,
    pub poll_interval_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            profile_dir: None,
            vendor_endpoint: DEFAULT_ENDPOINT.to_string(),
            http_timeout_secs: 10,
            association_timeout_secs: 15,
            poll_interval_ms: 500,
        }
    }
}

#[derive(Debug)]
pub enum SettingsError {
    IoError(io::Error),
    ParseError(serde_json::Error),
}

impl From<io::Error> for SettingsError {
    fn from(err: io::Error) -> Self {
        SettingsError::IoError(err)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        SettingsError::ParseError(err)
    }
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(e) => write!(f, "IO error reading settings: {}", e),
            SettingsError::ParseError(e) => write!(f, "Invalid settings file: {}", e),
        }
    }
}

impl std::error::Error for SettingsError {}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "netscan").map(|p| p.config_dir().join("config.json"))
    }

    /// Load from the default location, falling back to defaults.
    pub fn load() -> Result<Self, SettingsError> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        match fs::read_to_string(path) {
            Ok(text) => {
                debug!("Loading settings from {:?}", path);
                Ok(serde_json::from_str(&text)?)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No settings at {:?}, using defaults", path);
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn profile_store(&self) -> io::Result<ProfileStore> {
        let dir = match &self.profile_dir {
            Some(dir) => dir.clone(),
            None => ProfileStore::default_dir()?,
        };
        Ok(ProfileStore::new(dir))
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn association_timeout(&self) -> Duration {
        Duration::from_secs(self.association_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&tmp.path().join("config.json")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.vendor_endpoint, "https://macvendors.co/api/{mac}");
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(
            &path,
            r#"{ "association_timeout_secs": 3, "profile_dir": "C:\\temp\\profiles" }"#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.association_timeout(), Duration::from_secs(3));
        assert_eq!(settings.profile_dir, Some(PathBuf::from("C:\\temp\\profiles")));
        assert_eq!(settings.http_timeout_secs, 10);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(&path, r#"{ "retries": 3 }"#).unwrap();

        let err = Settings::load_from(&path).unwrap_err();
        assert!(matches!(err, SettingsError::ParseError(_)));
    }
}
