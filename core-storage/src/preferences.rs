//! Persisted user preferences
//!
//! Values are stored as plain strings (`"dark"`, `"pt-BR"`), not JSON.

use bridge_traits::SettingsStore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

pub const THEME_MODE_KEY: &str = "@theme_mode";
pub const LANGUAGE_KEY: &str = "@language";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    /// Follow the OS setting
    #[default]
    System,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "system" => Some(Self::System),
            _ => None,
        }
    }

    /// Effective darkness given the OS setting
    pub fn is_dark(&self, system_is_dark: bool) -> bool {
        match self {
            Self::Light => false,
            Self::Dark => true,
            Self::System => system_is_dark,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "pt-BR")]
    PtBr,
    #[serde(rename = "es")]
    Es,
    #[serde(rename = "en")]
    En,
}

impl Language {
    pub const ALL: [Language; 3] = [Self::PtBr, Self::Es, Self::En];

    /// BCP 47 tag
    pub fn code(&self) -> &'static str {
        match self {
            Self::PtBr => "pt-BR",
            Self::Es => "es",
            Self::En => "en",
        }
    }

    /// Native name for the language picker
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::PtBr => "Português",
            Self::Es => "Español",
            Self::En => "English",
        }
    }

    /// Accepts the stored codes and common variants (`pt`, `es-AR`, `EN`)
    pub fn parse(value: &str) -> Option<Self> {
        let lower = value.trim().to_ascii_lowercase();
        let primary = lower.split(|c: char| c == '-' || c == '_').next().unwrap_or_default();
        match primary {
            "pt" => Some(Self::PtBr),
            "es" => Some(Self::Es),
            "en" => Some(Self::En),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Theme and language, stored next to the yard collections.
#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn SettingsStore>,
}

impl Preferences {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    async fn read(&self, key: &str) -> Option<String> {
        match self.store.get_string(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Failed to read preference");
                None
            }
        }
    }

    async fn write(&self, key: &str, value: &str) {
        match self.store.set_string(key, value).await {
            Ok(()) => debug!(key, value, "Saved preference"),
            Err(e) => warn!(key, error = %e, "Failed to save preference"),
        }
    }

    /// Stored theme, `System` when missing or unreadable
    pub async fn theme_mode(&self) -> ThemeMode {
        self.read(THEME_MODE_KEY)
            .await
            .and_then(|raw| ThemeMode::parse(&raw))
            .unwrap_or_default()
    }

    pub async fn set_theme_mode(&self, mode: ThemeMode) {
        self.write(THEME_MODE_KEY, mode.as_str()).await;
    }

    /// Stored language, `pt-BR` when missing or unreadable
    pub async fn language(&self) -> Language {
        self.read(LANGUAGE_KEY)
            .await
            .and_then(|raw| Language::parse(&raw))
            .unwrap_or_default()
    }

    pub async fn set_language(&self, language: Language) {
        self.write(LANGUAGE_KEY, language.code()).await;
    }
}
