//! Configuration errors.

use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};

use crate::scope::MediaScope;

#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("could not read config file {}", path.display())]
    #[diagnostic(code(cielo::config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {message}")]
    #[diagnostic(code(cielo::config::parse))]
    Parse {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        at: Option<SourceSpan>,
    },

    #[error("unknown media scope `{scope}`")]
    #[diagnostic(code(cielo::config::scope), help("configured scopes: {known}"))]
    UnknownScope { scope: MediaScope, known: String },
}
