//! Top-level error for the `cielo` binary.

use std::path::PathBuf;

use cielo_common::ConfigError;
use cielo_editor_core::MarkupError;
use cielo_media::MediaError;
use miette::Diagnostic;

/// Main error type for cielo commands
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum CieloError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Markup(#[from] MarkupError),

    #[error("could not read {}", path.display())]
    #[diagnostic(code(cielo::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {}", path.display())]
    #[diagnostic(code(cielo::json))]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
