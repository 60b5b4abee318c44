//! Configuration module for research-chat
//!
//! Handles loading and validating settings from YAML files and environment variables.

mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Load settings from an explicit path, or search the default locations.
///
/// Lookup order: `explicit`, `$RESEARCH_CHAT_SETTINGS_PATH`, `settings.yml`,
/// `config/settings.yml`, `/etc/research-chat/settings.yml`, then the user
/// config directory. Environment overrides are applied and the result is
/// validated before it is returned.
pub fn load(explicit: Option<&Path>) -> Result<Settings> {
    let mut settings = match find_settings_file(explicit) {
        Some(path) => {
            info!("Loading settings from: {}", path.display());
            Settings::from_file(&path)?
        }
        None => {
            info!("No settings file found, using defaults");
            Settings::default()
        }
    };
    settings.merge_env();
    settings.validate()?;
    Ok(settings)
}

fn find_settings_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var("RESEARCH_CHAT_SETTINGS_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    let mut paths = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
        PathBuf::from("/etc/research-chat/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("research-chat/settings.yml"));
    }

    paths.into_iter().find(|p| p.exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_explicit_file() {
        let path = std::env::temp_dir().join(format!(
            "research-chat-settings-{}.yml",
            std::process::id()
        ));
        std::fs::write(&path, "server:\n  port: 9999\nllm:\n  model: mistral\n").unwrap();

        let settings = load(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.server.port, 9999);
        assert_eq!(settings.extractor.max_chars, 800);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let path = std::env::temp_dir().join(format!(
            "research-chat-invalid-{}.yml",
            std::process::id()
        ));
        std::fs::write(&path, "extractor:\n  max_sentences: 0\n").unwrap();

        let result = load(Some(&path));
        std::fs::remove_file(&path).ok();

        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let result = load(Some(Path::new("/nonexistent/research-chat.yml")));
        assert!(result.is_err());
    }
}
