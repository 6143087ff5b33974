//! Errors raised by media backends.
//!
//! The panel itself never returns these: it logs them and keeps its last
//! known-good state. They surface only to direct backend callers such as the
//! command line.

use miette::Diagnostic;

use cielo_common::MediaScope;

#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum MediaError {
    /// The site answered with a non-success status.
    #[error("{operation} for scope `{scope}` failed with status {status}")]
    #[diagnostic(
        code(cielo::media::status),
        help("listing and uploading require a logged-in session cookie")
    )]
    Status {
        operation: &'static str,
        scope: MediaScope,
        status: u16,
    },

    /// Blank scope handed straight to a backend.
    #[error("no media scope given")]
    #[diagnostic(code(cielo::media::scope))]
    UnsetScope,

    /// The configured site URL cannot carry the media routes.
    #[error("invalid site base URL `{url}`: {reason}")]
    #[diagnostic(
        code(cielo::media::base_url),
        help("set [site] base_url to an absolute http or https URL")
    )]
    BaseUrl { url: String, reason: String },

    /// Request never produced a response.
    #[cfg(feature = "http")]
    #[error(transparent)]
    #[diagnostic(code(cielo::media::transport))]
    Transport(#[from] reqwest::Error),

    /// Response body was not an `{"images": [...]}` object.
    #[error("malformed media listing: {0}")]
    #[diagnostic(code(cielo::media::decode))]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    #[diagnostic(code(cielo::media::io))]
    Io(#[from] std::io::Error),
}
