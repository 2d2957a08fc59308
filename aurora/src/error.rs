//! Errors raised while setting up an editor session

use thiserror::Error;

use crate::document::DocumentError;
use crate::editor_config::ConfigError;
use crate::markdown_import::ImportError;

/// Errors that can occur when building an editor session
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid initial content: {0}")]
    Document(#[from] DocumentError),

    #[error("Import error: {0}")]
    Import(#[from] ImportError),
}
