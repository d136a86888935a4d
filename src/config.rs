//! Application path resolution for settings and logs.
//!
//! Resolution priority for both config and data files:
//! 1. `--config-dir` CLI argument
//! 2. `DECKPLAY_CONFIG_DIR` environment variable
//! 3. The current directory, if deckplay files already live there
//!    (portable/local mode)
//! 4. Platform directories from `dirs-next`
//!    (Linux `~/.config/deckplay`, macOS `~/Library/Application Support/deckplay`,
//!    Windows `%APPDATA%\deckplay`)

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "deckplay";
const ENV_CONFIG_DIR: &str = "DECKPLAY_CONFIG_DIR";
const LOCAL_MARKERS: [&str; 2] = ["deckplay.json", "deckplay.log"];

/// Overrides for the default application paths.
#[derive(Debug, Clone, Default)]
pub struct PathConfig {
    /// Custom config directory (from CLI or ENV).
    pub config_dir: Option<PathBuf>,
}

impl PathConfig {
    /// Build from the CLI argument, falling back to the environment variable.
    pub fn from_env_and_cli(cli_dir: Option<PathBuf>) -> Self {
        let config_dir =
            cli_dir.or_else(|| std::env::var(ENV_CONFIG_DIR).ok().map(PathBuf::from));
        Self { config_dir }
    }
}

/// Path to a configuration file (settings).
pub fn config_file(name: &str, config: &PathConfig) -> PathBuf {
    resolve_dir(config, dirs_next::config_dir).join(name)
}

/// Path to a data file (logs and similar).
pub fn data_file(name: &str, config: &PathConfig) -> PathBuf {
    resolve_dir(config, dirs_next::data_dir).join(name)
}

/// Create the config and data directories if they are missing.
pub fn ensure_dirs(config: &PathConfig) -> Result<()> {
    let config_dir = resolve_dir(config, dirs_next::config_dir);
    let data_dir = resolve_dir(config, dirs_next::data_dir);

    for dir in [&config_dir, &data_dir] {
        if !dir.exists() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create directory: {}", dir.display()))?;
        }
    }
    Ok(())
}

fn resolve_dir(config: &PathConfig, platform_dir: fn() -> Option<PathBuf>) -> PathBuf {
    if let Some(dir) = &config.config_dir {
        return dir.clone();
    }
    if let Some(dir) = local_override() {
        return dir;
    }
    platform_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Portable mode: a deckplay file next to the executable's working directory
/// pins all paths to that directory.
fn local_override() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    if has_local_markers(&cwd) { Some(cwd) } else { None }
}

fn has_local_markers(dir: &Path) -> bool {
    LOCAL_MARKERS.iter().any(|name| dir.join(name).exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_dir_wins() {
        let config = PathConfig {
            config_dir: Some(PathBuf::from("/custom")),
        };
        assert_eq!(config_file("deckplay.json", &config), PathBuf::from("/custom/deckplay.json"));
        assert_eq!(data_file("deckplay.log", &config), PathBuf::from("/custom/deckplay.log"));
    }

    #[test]
    fn test_platform_default_contains_app_dir() {
        let config = PathConfig::default();
        let path = config_file("deckplay.json", &config);
        let text = path.to_string_lossy();
        assert!(text.contains("deckplay.json"));
        // Either the platform dir with our app folder, or local/"." fallback
        assert!(text.contains(APP_DIR) || path.parent().is_some());
    }

    #[test]
    fn test_from_cli_takes_priority() {
        let config = PathConfig::from_env_and_cli(Some(PathBuf::from("/from-cli")));
        assert_eq!(config.config_dir, Some(PathBuf::from("/from-cli")));
    }

    #[test]
    fn test_local_marker_detection() {
        let dir = std::env::temp_dir().join("deckplay_paths_test");
        let _ = std::fs::create_dir_all(&dir);
        assert!(!has_local_markers(&dir));

        std::fs::write(dir.join("deckplay.json"), "{}").unwrap();
        assert!(has_local_markers(&dir));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
