//! `cielo.toml` loading.
//!
//! ```toml
//! [site]
//! base_url = "https://cielosdespejados.org"
//! session_cookie = "$CIELO_SESSION"
//!
//! [media]
//! default_scope = "blog"
//! scopes = ["blog", "activities"]
//!
//! [editor]
//! insertion = "at-cursor"
//! ```
//!
//! `$NAME` occurrences are replaced from the environment before parsing.

use std::path::Path;
use std::{env, fs};

use miette::{NamedSource, SourceSpan};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::scope::MediaScope;

pub const DEFAULT_CONFIG_PATH: &str = "cielo.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    pub base_url: String,
    pub session_cookie: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            session_cookie: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MediaConfig {
    pub default_scope: MediaScope,
    pub scopes: Vec<MediaScope>,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            default_scope: MediaScope::BLOG,
            scopes: vec![MediaScope::BLOG, MediaScope::ACTIVITIES],
        }
    }
}

/// Where markup inserted into an editor lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InsertionMode {
    /// At the caret of the active surface, or at its end without a live caret.
    #[default]
    AtCursor,
    /// Always at the end of the active surface.
    Append,
}

impl std::str::FromStr for InsertionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "at-cursor" => Ok(InsertionMode::AtCursor),
            "append" => Ok(InsertionMode::Append),
            other => Err(format!("unknown insertion mode `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EditorConfig {
    pub insertion: InsertionMode,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub media: MediaConfig,
    pub editor: EditorConfig,
}

impl Config {
    /// Load a config file. A file that does not exist yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Config::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_owned(),
                    source,
                });
            }
        };
        Self::parse(&path.display().to_string(), &raw, |name| env::var(name).ok())
    }

    /// Parse TOML after substituting `$NAME` through `lookup`.
    pub fn parse(
        name: &str,
        raw: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Config, ConfigError> {
        let source = substitute_vars(raw, lookup);
        toml::from_str(&source).map_err(|e| ConfigError::Parse {
            message: e.message().to_owned(),
            at: e.span().map(SourceSpan::from),
            src: NamedSource::new(name, source.clone()),
        })
    }

    /// Resolve a scope argument against the configured scopes.
    pub fn scope(&self, requested: Option<&str>) -> Result<MediaScope, ConfigError> {
        let scope = match requested {
            Some(name) => MediaScope::new(name),
            None => self.media.default_scope.clone(),
        };
        if self.media.scopes.contains(&scope) {
            return Ok(scope);
        }
        let known = self
            .media
            .scopes
            .iter()
            .map(MediaScope::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        Err(ConfigError::UnknownScope { scope, known })
    }
}

/// Replace `$NAME` (letters, digits, underscores) with `lookup(NAME)`.
/// Unknown names are left as written.
pub fn substitute_vars(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(dollar) = rest.find('$') {
        out.push_str(&rest[..dollar]);
        let after = &rest[dollar + 1..];
        let len = after
            .char_indices()
            .find(|&(i, c)| !(c == '_' || c.is_ascii_alphabetic() || (i > 0 && c.is_ascii_digit())))
            .map(|(i, _)| i)
            .unwrap_or(after.len());
        let name = &after[..len];
        match (!name.is_empty()).then(|| lookup(name)).flatten() {
            Some(value) => out.push_str(&value),
            None => {
                out.push('$');
                out.push_str(name);
            }
        }
        rest = &after[len..];
    }
    out.push_str(rest);
    out
}
