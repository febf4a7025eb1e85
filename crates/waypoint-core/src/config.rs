//! Navigator configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::CoreError;
use crate::routes::{LANDING_PATH, LOGIN_PATH};
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the settings database holding persisted credentials
    pub database_path: PathBuf,
    /// Where unauthenticated users are sent
    pub login_path: String,
    /// Where authenticated users are sent away from guest-only pages
    pub landing_path: String,
    /// Settings key whose presence marks a restorable session
    pub access_token_key: String,
    pub refresh_token_key: String,
    /// Redirects one navigation may follow before it is abandoned
    pub max_redirects: usize,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("waypoint.db"),
            login_path: LOGIN_PATH.to_string(),
            landing_path: LANDING_PATH.to_string(),
            access_token_key: waypoint_session::ACCESS_TOKEN_KEY.to_string(),
            refresh_token_key: waypoint_session::REFRESH_TOKEN_KEY.to_string(),
            max_redirects: 8,
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("Waypoint"))
            .unwrap_or_else(|| PathBuf::from(".waypoint"))
    }

    /// Read a JSON config file; missing fields keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&text)?;

        tracing::debug!(path = %path.as_ref().display(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, path) in [("login_path", &self.login_path), ("landing_path", &self.landing_path)] {
            if !path.starts_with('/') {
                return Err(CoreError::Config(format!(
                    "{name} must be an absolute path, got {path:?}"
                )));
            }
        }
        for (name, key) in [
            ("access_token_key", &self.access_token_key),
            ("refresh_token_key", &self.refresh_token_key),
        ] {
            if key.trim().is_empty() {
                return Err(CoreError::Config(format!("{name} cannot be empty")));
            }
        }
        // Both tokens live in the same settings table
        if self.access_token_key == self.refresh_token_key {
            return Err(CoreError::Config(format!(
                "access_token_key and refresh_token_key must differ, both are {:?}",
                self.access_token_key
            )));
        }
        if self.max_redirects == 0 {
            return Err(CoreError::Config("max_redirects must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

// Platform data directory lookup
mod dirs {
    use std::path::PathBuf;

    pub fn data_local_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new(PathBuf::from("/tmp/waypoint-test"));
        assert_eq!(config.database_path, PathBuf::from("/tmp/waypoint-test/waypoint.db"));
        assert_eq!(config.login_path, "/auth/login");
        assert_eq!(config.landing_path, "/service/tracker");
        assert_eq!(config.access_token_key, "access_token");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config = Config::from_json(r#"{"login_path": "/signin", "max_redirects": 3}"#).unwrap();
        assert_eq!(config.login_path, "/signin");
        assert_eq!(config.max_redirects, 3);
        assert_eq!(config.landing_path, "/service/tracker");
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            Config::from_json(r#"{"landing_path": "service/tracker"}"#),
            Err(CoreError::Config(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{"max_redirects": 0}"#),
            Err(CoreError::Config(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{"refresh_token_key": " "}"#),
            Err(CoreError::Config(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{"access_token_key": "jwt", "refresh_token_key": "jwt"}"#),
            Err(CoreError::Config(_))
        ));
        assert!(matches!(
            Config::from_json("not json"),
            Err(CoreError::Serialization(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/definitely/not/here/waypoint.json");
        assert!(matches!(result, Err(CoreError::Io(_))));
    }
}
