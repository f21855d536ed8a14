use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::LookupError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// File-backed store for the single persisted preference. Read once at
/// startup, written on every toggle.
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Missing file or unrecognized content both default to light.
    pub fn load(&self) -> Theme {
        match fs::read_to_string(&self.path) {
            Ok(content) => match content.trim() {
                "dark" => Theme::Dark,
                "light" => Theme::Light,
                other => {
                    tracing::warn!("Ignoring unrecognized theme value: {:?}", other);
                    Theme::Light
                }
            },
            Err(_) => Theme::Light,
        }
    }

    pub fn store(&self, theme: Theme) -> Result<(), LookupError> {
        fs::write(&self.path, theme.as_str()).map_err(|e| {
            tracing::error!("Failed to write theme preference to {:?}: {}", self.path, e);
            LookupError::Storage(format!("Failed to persist theme: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> ThemeStore {
        let path = std::env::temp_dir().join(format!("pokedex-lookup-{}-{}", name, std::process::id()));
        let _ = fs::remove_file(&path);
        ThemeStore::new(path)
    }

    #[test]
    fn test_defaults_to_light_when_missing() {
        let store = temp_store("missing");
        assert_eq!(store.load(), Theme::Light);
    }

    #[test]
    fn test_round_trips_dark() {
        let store = temp_store("roundtrip");
        store.store(Theme::Dark).unwrap();
        assert_eq!(store.load(), Theme::Dark);
        store.store(Theme::Light).unwrap();
        assert_eq!(store.load(), Theme::Light);
        let _ = fs::remove_file(&store.path);
    }

    #[test]
    fn test_garbage_content_defaults_to_light() {
        let store = temp_store("garbage");
        fs::write(&store.path, "solarized").unwrap();
        assert_eq!(store.load(), Theme::Light);
        let _ = fs::remove_file(&store.path);
    }
}
