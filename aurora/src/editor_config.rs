//! Editor configuration from aurora.toml

use num_format::Locale;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::document::{DocumentError, SerializedDocument};

/// Conventional configuration file name
pub const CONFIG_FILE_NAME: &str = "aurora.toml";

/// Editor session configuration from aurora.toml
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Namespace identifying this editor instance
    pub namespace: String,

    /// Text shown while the document is blank
    pub placeholder: String,

    /// Locale used for thousands separators in the status bar
    pub locale: String,

    /// Optional JSON snapshot loaded as the initial document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_content: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            namespace: "AuroraEditor".to_string(),
            placeholder: "Start writing your story...".to_string(),
            locale: "en".to_string(),
            initial_content: None,
        }
    }
}

impl EditorConfig {
    /// Load configuration from an aurora.toml file
    ///
    /// A relative `initial_content` path is resolved against the directory
    /// holding the configuration file.
    ///
    /// # Parameters
    /// * `path` - Path to the aurora.toml configuration file
    ///
    /// # Returns
    /// * `Ok(EditorConfig)` - Successfully loaded configuration
    /// * `Err(ConfigError)` - Error reading or parsing the configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(ConfigError::IoError)?;

        let mut config: EditorConfig = toml::from_str(&content).map_err(ConfigError::ParseError)?;

        if let (Some(initial), Some(base)) = (config.initial_content.as_mut(), path.parent()) {
            if initial.is_relative() {
                *initial = base.join(&*initial);
            }
        }

        log::info!("Loaded editor configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to an aurora.toml file
    ///
    /// # Parameters
    /// * `path` - Path where the aurora.toml file will be written
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::SerializeError)?;

        fs::write(&path, content).map_err(ConfigError::IoError)?;

        Ok(())
    }

    /// Number-formatting locale named by `locale`
    pub fn number_locale(&self) -> Result<Locale, ConfigError> {
        Locale::from_name(&self.locale).map_err(|_| ConfigError::UnknownLocale(self.locale.clone()))
    }

    /// Read the initial snapshot, if one is configured
    pub fn initial_snapshot(&self) -> Result<Option<SerializedDocument>, ConfigError> {
        let Some(path) = &self.initial_content else {
            return Ok(None);
        };

        let json = fs::read_to_string(path).map_err(ConfigError::IoError)?;
        let snapshot = SerializedDocument::from_json(&json).map_err(|source| ConfigError::Snapshot {
            path: path.clone(),
            source,
        })?;
        Ok(Some(snapshot))
    }
}

/// Errors that can occur when loading or saving editor configuration
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum ConfigError {
    /// IO error when reading or writing file
    #[error("IO error: {0}")]
    IoError(#[source] std::io::Error),

    /// Error parsing TOML
    #[error("TOML parse error: {0}")]
    ParseError(#[source] toml::de::Error),

    /// Error serializing to TOML
    #[error("TOML serialize error: {0}")]
    SerializeError(#[source] toml::ser::Error),

    #[error("Unknown locale '{0}'")]
    UnknownLocale(String),

    #[error("Invalid initial content in {path}: {source}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: EditorConfig = toml::from_str("").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.namespace, "AuroraEditor");
        assert_eq!(config.placeholder, "Start writing your story...");
        assert_eq!(config.number_locale().unwrap(), Locale::en);
    }

    #[test]
    fn test_parse_example_toml() {
        let toml_content = r#"
namespace = "NovelDraft"
placeholder = "Chapter one..."
locale = "de"
initial_content = "draft.json"
"#;

        let config: EditorConfig = toml::from_str(toml_content).unwrap();

        assert_eq!(config.namespace, "NovelDraft");
        assert_eq!(config.placeholder, "Chapter one...");
        assert_eq!(config.number_locale().unwrap(), Locale::de);
        assert_eq!(config.initial_content, Some(PathBuf::from("draft.json")));
    }

    #[test]
    fn test_unknown_locale() {
        let config = EditorConfig {
            locale: "xx-nowhere".to_string(),
            ..EditorConfig::default()
        };
        assert!(matches!(config.number_locale(), Err(ConfigError::UnknownLocale(_))));
    }

    #[test]
    fn test_no_initial_snapshot() {
        assert!(EditorConfig::default().initial_snapshot().unwrap().is_none());
    }
}
