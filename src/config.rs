//! CLI settings
//!
//! Remembers which credentials the CLI used last so repeated invocations do
//! not need `--edgerc`/`--section` every time.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Settings {
    /// Credentials file, when not `~/.edgerc`
    #[serde(default)]
    pub edgerc: Option<PathBuf>,
    /// Credentials section, when not `default`
    #[serde(default)]
    pub section: Option<String>,
    /// Last security configuration read
    #[serde(default)]
    pub last_config_id: Option<i64>,
}

impl Settings {
    fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("appsec").join("config.json"))
    }

    /// Load settings from the user config directory; missing or unreadable
    /// files yield defaults
    pub fn load() -> Self {
        match Self::settings_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed settings {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::settings_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;

        Ok(())
    }

    /// Credentials section (flag > settings > `default`)
    pub fn effective_section(&self, flag: Option<&str>) -> String {
        flag.map(str::to_string)
            .or_else(|| self.section.clone())
            .unwrap_or_else(|| akamai_appsec::edgegrid::DEFAULT_SECTION.to_string())
    }

    /// Credentials file (flag > settings > `~/.edgerc`)
    pub fn effective_edgerc(&self, flag: Option<&Path>) -> Option<PathBuf> {
        flag.map(Path::to_path_buf).or_else(|| self.edgerc.clone())
    }

    /// Config id (flag > last used)
    pub fn effective_config_id(&self, flag: Option<i64>) -> Option<i64> {
        flag.or(self.last_config_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("nope.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("appsec").join("config.json");

        let settings = Settings {
            edgerc: Some(PathBuf::from("/tmp/edgerc")),
            section: Some("ccu".into()),
            last_config_id: Some(43253),
        };
        settings.save_to(&path).unwrap();

        assert_eq!(Settings::load_from(&path), settings);
    }

    #[test]
    fn test_malformed_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_precedence() {
        let settings = Settings {
            section: Some("ccu".into()),
            last_config_id: Some(1),
            ..Default::default()
        };
        assert_eq!(settings.effective_section(Some("papi")), "papi");
        assert_eq!(settings.effective_section(None), "ccu");
        assert_eq!(Settings::default().effective_section(None), "default");
        assert_eq!(settings.effective_config_id(Some(7)), Some(7));
        assert_eq!(settings.effective_config_id(None), Some(1));
        assert_eq!(settings.effective_edgerc(None), None);
    }
}
