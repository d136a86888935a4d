//! Transition-style preference persistence.
//!
//! The engine reads the persisted style at construction and writes it on every
//! successful style change. Storage is behind [`PrefStore`] so tests run on an
//! in-memory store; the file store keeps a small JSON settings document and
//! degrades silently to defaults when the file is missing or unreadable.

use crate::core::transition::TransitionStyle;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::RwLock;

/// Key-value preference surface for the deck.
pub trait PrefStore: Send + Sync {
    /// Persisted transition style, if one was ever saved.
    fn transition_style(&self) -> Option<TransitionStyle>;

    /// Persist the transition style.
    fn set_transition_style(&self, style: TransitionStyle);
}

/// On-disk settings document. Unknown fields are ignored, missing fields
/// default, so older or hand-edited files keep loading.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct Settings {
    transition: Option<TransitionStyle>,
}

/// JSON-file preference store (`deckplay.json` under the config dir).
pub struct FilePrefs {
    path: PathBuf,
    settings: RwLock<Settings>,
}

impl FilePrefs {
    /// Load settings from `path`. A missing or corrupt file yields defaults.
    pub fn load(path: PathBuf) -> Self {
        let settings = match std::fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!("ignoring corrupt settings file {}: {}", path.display(), e);
                    Settings::default()
                }
            },
            Err(e) => {
                debug!("no settings file at {} ({}), using defaults", path.display(), e);
                Settings::default()
            }
        };
        Self {
            path,
            settings: RwLock::new(settings),
        }
    }

    fn save(&self, settings: &Settings) {
        let json = match serde_json::to_string_pretty(settings) {
            Ok(json) => json,
            Err(e) => {
                warn!("failed to serialize settings: {}", e);
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, json) {
            warn!("failed to write settings to {}: {}", self.path.display(), e);
        }
    }
}

impl PrefStore for FilePrefs {
    fn transition_style(&self) -> Option<TransitionStyle> {
        self.settings.read().unwrap_or_else(|e| e.into_inner()).transition
    }

    fn set_transition_style(&self, style: TransitionStyle) {
        let mut settings = self.settings.write().unwrap_or_else(|e| e.into_inner());
        settings.transition = Some(style);
        self.save(&settings);
    }
}

/// In-memory preference store for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryPrefs {
    transition: RwLock<Option<TransitionStyle>>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with a pre-seeded style (simulates an earlier session).
    pub fn with_style(style: TransitionStyle) -> Self {
        Self {
            transition: RwLock::new(Some(style)),
        }
    }
}

impl PrefStore for MemoryPrefs {
    fn transition_style(&self) -> Option<TransitionStyle> {
        *self.transition.read().unwrap_or_else(|e| e.into_inner())
    }

    fn set_transition_style(&self, style: TransitionStyle) {
        *self.transition.write().unwrap_or_else(|e| e.into_inner()) = Some(style);
    }
}
