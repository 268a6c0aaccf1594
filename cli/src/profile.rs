use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::args::Dialect;

pub const DEFAULT_PROFILE_NAME: &str = "default";

/// Optional TOML file with per-account settings. Passwords are never read
/// from it.
#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub api_key: Option<String>,
    pub username: Option<String>,
    pub dialect: Option<Dialect>,
    pub notes_path: Option<String>,
    pub log_path: Option<String>,
    pub api_url: Option<String>,
    pub auth_url: Option<String>,
    pub legacy_url: Option<String>,
}

impl Profile {
    pub fn from_path(profile: &Path) -> anyhow::Result<Option<Self>> {
        if !profile.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(profile)
            .with_context(|| format!("Failed to read profile file {}", profile.display()))?;

        let profile: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to deserialize profile {}", profile.display()))?;

        Ok(Some(profile))
    }

    #[cfg(test)]
    pub fn save(&self, profile_path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string(self).context("Failed to serialize profile")?;

        std::fs::write(profile_path, content).context("Failed to write profile")?;

        Ok(())
    }
}

/// Get the XDG config directory, respecting XDG_CONFIG_HOME
fn get_config_dir() -> PathBuf {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg_config).join("simplenote")
    } else {
        directories::ProjectDirs::from("com", "simplenote", "simplenote")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Get path to a named profile's config file
pub fn get_profile_config_path(profile_name: &str) -> PathBuf {
    get_config_dir()
        .join("profiles")
        .join(format!("{}.toml", profile_name))
}

/// A value with a `.toml` extension or a path separator is a file path,
/// anything else names a profile in the config directory.
pub fn get_profile_path(arg_profile: &Option<String>) -> PathBuf {
    match arg_profile {
        Some(value) if value.ends_with(".toml") || value.contains(std::path::MAIN_SEPARATOR) => {
            PathBuf::from(value)
        }
        Some(name) => get_profile_config_path(name),
        None => get_profile_config_path(DEFAULT_PROFILE_NAME),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_profile_is_none() {
        let dir = TempDir::new().unwrap();

        let profile = Profile::from_path(&dir.path().join("nope.toml")).unwrap();

        assert!(profile.is_none());
    }

    #[test]
    fn test_profile_round_trips_through_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("me.toml");
        let profile = Profile {
            username: Some("me@example.com".to_string()),
            dialect: Some(Dialect::Legacy),
            notes_path: Some("/tmp/notes.json".to_string()),
            ..Default::default()
        };

        profile.save(&path).unwrap();

        assert_eq!(Profile::from_path(&path).unwrap(), Some(profile));
    }

    #[test]
    fn test_partial_profile() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("me.toml");
        std::fs::write(&path, "username = \"me\"\ndialect = \"simperium\"\n").unwrap();

        let profile = Profile::from_path(&path).unwrap().unwrap();

        assert_eq!(profile.username.as_deref(), Some("me"));
        assert_eq!(profile.dialect, Some(Dialect::Simperium));
        assert!(profile.api_key.is_none());
    }

    #[test]
    fn test_broken_profile_names_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "username = ").unwrap();

        let err = Profile::from_path(&path).unwrap_err();

        assert!(format!("{:#}", err).contains("broken.toml"));
    }

    #[test]
    fn test_profile_path_forms() {
        assert_eq!(
            get_profile_path(&Some("work.toml".to_string())),
            PathBuf::from("work.toml")
        );
        assert!(get_profile_path(&Some("work".to_string())).ends_with("profiles/work.toml"));
        assert!(get_profile_path(&None).ends_with("profiles/default.toml"));
    }
}
