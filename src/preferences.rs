//! User interface preferences persisted next to the journal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::db::KeyValueStore;
use crate::error::StorageError;

/// Key the theme choice is stored under.
pub const THEME_KEY: &str = "themePreference";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(ThemePreference::Light),
            "dark" => Ok(ThemePreference::Dark),
            other => Err(format!("unknown theme {:?}", other)),
        }
    }
}

/// Stored theme, or `system_default` when nothing usable is stored.
pub async fn load_theme(store: &dyn KeyValueStore, system_default: ThemePreference) -> ThemePreference {
    match store.get(THEME_KEY).await {
        Ok(Some(raw)) => raw.parse().unwrap_or_else(|e| {
            warn!("Ignoring stored theme: {}", e);
            system_default
        }),
        Ok(None) => system_default,
        Err(e) => {
            warn!("Failed to read theme preference: {}", e);
            system_default
        }
    }
}

pub async fn save_theme(store: &dyn KeyValueStore, theme: ThemePreference) -> Result<(), StorageError> {
    store.set(THEME_KEY, theme.as_str()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    #[tokio::test]
    async fn test_theme_defaults_to_system() {
        let store = MemoryStore::new();
        assert_eq!(load_theme(&store, ThemePreference::Dark).await, ThemePreference::Dark);

        store.set(THEME_KEY, "sepia").await.unwrap();
        assert_eq!(load_theme(&store, ThemePreference::Light).await, ThemePreference::Light);
    }

    #[tokio::test]
    async fn test_theme_round_trip() {
        let store = MemoryStore::new();
        save_theme(&store, ThemePreference::Dark).await.unwrap();
        assert_eq!(store.get(THEME_KEY).await.unwrap().as_deref(), Some("dark"));
        assert_eq!(load_theme(&store, ThemePreference::Light).await, ThemePreference::Dark);
    }

    #[test]
    fn test_toggle() {
        assert_eq!(ThemePreference::Light.toggled(), ThemePreference::Dark);
        assert_eq!(ThemePreference::Dark.toggled().to_string(), "light");
    }
}
