//! UI preference snapshot.
//!
//! Stored as a flat JSON object of string keys. A value may be the plain JSON
//! value (`"sidebar_open": false`) or that value JSON-encoded into a string
//! (`"sidebar_open": "false"`). Anything missing or unreadable falls back to the
//! default; read and write failures are logged and never reach the caller.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::fields::Theme;

pub const THEME_KEY: &str = "theme";
pub const LOCALE_KEY: &str = "locale";
pub const SIDEBAR_KEY: &str = "sidebar_open";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefs {
    pub theme: Theme,
    pub locale: String,
    pub sidebar_open: bool,
}

impl Default for Prefs {
    fn default() -> Self {
        Prefs {
            theme: Theme::Light,
            locale: "en".to_string(),
            sidebar_open: true,
        }
    }
}

impl Prefs {
    /// Read preferences, defaulting whatever is absent or malformed.
    pub fn load(path: &Path) -> Self {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no preferences file, using defaults");
                return Prefs::default();
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read preferences");
                return Prefs::default();
            }
        };
        match serde_json::from_str::<BTreeMap<String, Value>>(&raw) {
            Ok(entries) => Prefs::from_entries(&entries),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "malformed preferences file ignored");
                Prefs::default()
            }
        }
    }

    /// Build preferences from key/value entries, skipping bad values.
    pub fn from_entries(entries: &BTreeMap<String, Value>) -> Self {
        let defaults = Prefs::default();
        Prefs {
            theme: read_entry(entries, THEME_KEY).unwrap_or(defaults.theme),
            locale: read_entry::<String>(entries, LOCALE_KEY)
                .filter(|l| !l.trim().is_empty())
                .unwrap_or(defaults.locale),
            sidebar_open: read_entry(entries, SIDEBAR_KEY).unwrap_or(defaults.sidebar_open),
        }
    }

    pub fn to_entries(&self) -> BTreeMap<String, Value> {
        let mut entries = BTreeMap::new();
        entries.insert(
            THEME_KEY.to_string(),
            serde_json::to_value(self.theme).unwrap_or(Value::Null),
        );
        entries.insert(LOCALE_KEY.to_string(), Value::String(self.locale.clone()));
        entries.insert(SIDEBAR_KEY.to_string(), Value::Bool(self.sidebar_open));
        entries
    }

    /// Write preferences. Failures are logged and otherwise ignored.
    pub fn save(&self, path: &Path) {
        let written = serde_json::to_string_pretty(&self.to_entries())
            .map_err(std::io::Error::from)
            .and_then(|data| {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                fs::write(path, data)
            });
        match written {
            Ok(()) => debug!(path = %path.display(), "saved preferences"),
            Err(e) => warn!(path = %path.display(), error = %e, "could not save preferences"),
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }
}

fn read_entry<T: DeserializeOwned>(entries: &BTreeMap<String, Value>, key: &str) -> Option<T> {
    let value = entries.get(key)?;
    if let Ok(parsed) = serde_json::from_value::<T>(value.clone()) {
        return Some(parsed);
    }
    if let Value::String(encoded) = value {
        if let Ok(parsed) = serde_json::from_str::<T>(encoded) {
            return Some(parsed);
        }
    }
    warn!(key, value = %value, "ignoring malformed preference");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entries(value: Value) -> BTreeMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Prefs::load(&dir.path().join("prefs.json")), Prefs::default());
    }

    #[test]
    fn accepts_plain_and_encoded_values() {
        let prefs = Prefs::from_entries(&entries(json!({
            "theme": "\"dark\"",
            "locale": "de",
            "sidebar_open": "false",
        })));
        assert_eq!(prefs.theme, Theme::Dark);
        assert_eq!(prefs.locale, "de");
        assert!(!prefs.sidebar_open);

        let prefs = Prefs::from_entries(&entries(json!({
            "theme": "dark",
            "sidebar_open": false,
        })));
        assert_eq!(prefs.theme, Theme::Dark);
        assert!(!prefs.sidebar_open);
    }

    #[test]
    fn malformed_values_fall_back_individually() {
        let prefs = Prefs::from_entries(&entries(json!({
            "theme": "neon",
            "locale": 42,
            "sidebar_open": false,
            "unknown": [1, 2],
        })));
        assert_eq!(prefs.theme, Theme::Light);
        assert_eq!(prefs.locale, "en");
        assert!(!prefs.sidebar_open);
    }

    #[test]
    fn malformed_file_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "theme=dark").unwrap();
        assert_eq!(Prefs::load(&path), Prefs::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ui").join("prefs.json");
        let mut prefs = Prefs::default();
        prefs.toggle_theme();
        prefs.toggle_sidebar();
        prefs.locale = "fr".into();
        prefs.save(&path);
        assert_eq!(Prefs::load(&path), prefs);
    }

    #[test]
    fn unwritable_path_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();
        Prefs::default().save(&blocker.join("prefs.json"));
    }
}
