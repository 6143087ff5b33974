//! The two HTTP-shaped contracts the panel consumes.

use std::path::Path;

use bytes::Bytes;
use mime_sniffer::MimeTypeSniffer;
use serde::{Deserialize, Serialize};

use crate::error::MediaError;
use cielo_common::MediaScope;

/// Body of both the listing and the upload responses.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MediaListing {
    pub images: Vec<String>,
}

/// One file picked or dropped by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Bytes,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, keeping only its file name.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, MediaError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, bytes))
    }

    /// MIME type sniffed from the content.
    pub fn content_type(&self) -> &str {
        self.bytes
            .sniff_mime_type()
            .unwrap_or("application/octet-stream")
    }
}

/// Listing and upload endpoints, parameterized by scope.
///
/// Both return the full, server-ordered list of image URLs for the scope.
pub trait MediaBackend {
    fn list(&self, scope: &MediaScope) -> impl Future<Output = Result<Vec<String>, MediaError>>;

    fn upload(
        &self,
        scope: &MediaScope,
        files: &[UploadFile],
    ) -> impl Future<Output = Result<Vec<String>, MediaError>>;
}

impl<B: MediaBackend + ?Sized> MediaBackend for &B {
    fn list(&self, scope: &MediaScope) -> impl Future<Output = Result<Vec<String>, MediaError>> {
        (**self).list(scope)
    }

    fn upload(
        &self,
        scope: &MediaScope,
        files: &[UploadFile],
    ) -> impl Future<Output = Result<Vec<String>, MediaError>> {
        (**self).upload(scope, files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_sniffing() {
        let png = UploadFile::new(
            "m42.png",
            &b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01\x08\x06\0\0\0"[..],
        );
        assert_eq!(png.content_type(), "image/png");

        let unknown = UploadFile::new("notas.bin", &b"\x00\x01\x02"[..]);
        assert_eq!(unknown.content_type(), "application/octet-stream");
    }

    #[test]
    fn test_listing_body() {
        let listing: MediaListing =
            serde_json::from_str(r#"{"images":["/static/store/blog/a.jpg"]}"#).unwrap();
        assert_eq!(listing.images, vec!["/static/store/blog/a.jpg"]);
    }
}
