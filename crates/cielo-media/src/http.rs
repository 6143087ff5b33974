//! reqwest client for the site's `/media/{scope}` routes.

use reqwest::header::COOKIE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, Url};

use crate::backend::{MediaBackend, MediaListing, UploadFile};
use crate::error::MediaError;
use cielo_common::MediaScope;

/// Multipart field the upload route reads its files from.
pub const UPLOAD_FIELD: &str = "files";

#[derive(Debug, Clone)]
pub struct HttpMediaBackend {
    client: Client,
    base_url: Url,
    session_cookie: Option<String>,
}

impl HttpMediaBackend {
    pub fn new(base_url: &str) -> Result<Self, MediaError> {
        Self::with_client(Client::new(), base_url)
    }

    /// The base URL must be absolute http(s); routes are appended to its path.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, MediaError> {
        let invalid = |reason: String| MediaError::BaseUrl {
            url: base_url.to_owned(),
            reason,
        };
        let parsed = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid("expected an http or https URL".into()));
        }
        Ok(Self {
            client,
            base_url: parsed,
            session_cookie: None,
        })
    }

    /// Send `Cookie: session=<value>` with every request.
    pub fn with_session(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn list_url(&self, scope: &MediaScope) -> Url {
        self.route(scope, "list")
    }

    pub fn upload_url(&self, scope: &MediaScope) -> Url {
        self.route(scope, "upload")
    }

    /// `{base}/media/{scope}/{action}`, with the scope as one encoded segment.
    fn route(&self, scope: &MediaScope, action: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["media", scope.as_str(), action]);
        }
        url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.session_cookie {
            Some(cookie) => request.header(COOKIE, format!("session={cookie}")),
            None => request,
        }
    }

    async fn read_listing(
        operation: &'static str,
        scope: &MediaScope,
        response: Response,
    ) -> Result<Vec<String>, MediaError> {
        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::Status {
                operation,
                scope: scope.clone(),
                status: status.as_u16(),
            });
        }
        let body = response.bytes().await?;
        let listing: MediaListing = serde_json::from_slice(&body)?;
        Ok(listing.images)
    }
}

impl MediaBackend for HttpMediaBackend {
    async fn list(&self, scope: &MediaScope) -> Result<Vec<String>, MediaError> {
        if scope.is_unset() {
            return Err(MediaError::UnsetScope);
        }
        let url = self.list_url(scope);
        tracing::debug!(%url, "listing media");
        let response = self.authorize(self.client.get(url)).send().await?;
        Self::read_listing("listing", scope, response).await
    }

    async fn upload(
        &self,
        scope: &MediaScope,
        files: &[UploadFile],
    ) -> Result<Vec<String>, MediaError> {
        if scope.is_unset() {
            return Err(MediaError::UnsetScope);
        }
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes.to_vec())
                .file_name(file.name.clone())
                .mime_str(file.content_type())?;
            form = form.part(UPLOAD_FIELD, part);
        }

        let url = self.upload_url(scope);
        tracing::debug!(%url, count = files.len(), "uploading media");
        let response = self
            .authorize(self.client.post(url))
            .multipart(form)
            .send()
            .await?;
        Self::read_listing("upload", scope, response).await
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    use super::*;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01\x08\x06\0\0\0";

    /// Answer a single request with `status` and `body`; the handle yields
    /// the request as received.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            request
        });
        (base, handle)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        while !request_complete(&raw) {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);
        }
        String::from_utf8_lossy(&raw).into_owned()
    }

    fn request_complete(raw: &[u8]) -> bool {
        let Some(head_end) = raw.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let head = String::from_utf8_lossy(&raw[..head_end]).to_ascii_lowercase();
        let body = &raw[head_end + 4..];
        if head.contains("transfer-encoding: chunked") {
            return body.ends_with(b"0\r\n\r\n");
        }
        let length = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        body.len() >= length
    }

    fn backend(base: &str) -> HttpMediaBackend {
        let client = Client::builder().no_proxy().build().unwrap();
        HttpMediaBackend::with_client(client, base).unwrap()
    }

    #[test]
    fn test_route_urls() {
        let backend = HttpMediaBackend::new("http://localhost:8000/").unwrap();
        assert_eq!(
            backend.list_url(&MediaScope::BLOG).as_str(),
            "http://localhost:8000/media/blog/list"
        );
        assert_eq!(
            backend.upload_url(&MediaScope::ACTIVITIES).as_str(),
            "http://localhost:8000/media/activities/upload"
        );

        let nested = HttpMediaBackend::new("https://cielos.example/admin/").unwrap();
        assert_eq!(
            nested.list_url(&MediaScope::BLOG).as_str(),
            "https://cielos.example/admin/media/blog/list"
        );
    }

    #[test]
    fn test_scope_is_one_path_segment() {
        let backend = HttpMediaBackend::new("http://localhost:8000").unwrap();
        let url = backend.list_url(&MediaScope::new("a/b?c#d"));
        assert_eq!(url.as_str(), "http://localhost:8000/media/a%2Fb%3Fc%23d/list");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_base_url_must_be_http() {
        for base in ["localhost:8000", "/media", "ftp://cielos.example", ""] {
            assert!(
                matches!(HttpMediaBackend::new(base), Err(MediaError::BaseUrl { .. })),
                "accepted {base:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_unset_scope_is_rejected_before_sending() {
        let backend = HttpMediaBackend::new("http://127.0.0.1:9").unwrap();
        let err = backend.list(&MediaScope::default()).await.unwrap_err();
        assert!(matches!(err, MediaError::UnsetScope));
    }

    #[tokio::test]
    async fn test_listing_decodes_images_and_sends_cookie() {
        let (base, server) = serve_once("200 OK", r#"{"images":["/static/store/blog/m42.jpg"]}"#).await;
        let images = backend(&base)
            .with_session("abc123")
            .list(&MediaScope::BLOG)
            .await
            .unwrap();
        assert_eq!(images, vec!["/static/store/blog/m42.jpg"]);

        let request = server.await.unwrap().to_ascii_lowercase();
        assert!(request.starts_with("get /media/blog/list http/1.1\r\n"));
        assert!(request.contains("\r\ncookie: session=abc123\r\n"));
    }

    #[tokio::test]
    async fn test_forbidden_maps_to_status() {
        let (base, server) = serve_once("403 Forbidden", r#"{"error":"login required"}"#).await;
        let err = backend(&base).list(&MediaScope::BLOG).await.unwrap_err();
        match err {
            MediaError::Status {
                operation,
                scope,
                status,
            } => {
                assert_eq!(operation, "listing");
                assert_eq!(scope, MediaScope::BLOG);
                assert_eq!(status, 403);
            }
            other => panic!("unexpected error {other:?}"),
        }
        let request = server.await.unwrap().to_ascii_lowercase();
        assert!(!request.contains("cookie:"));
    }

    #[tokio::test]
    async fn test_malformed_body_maps_to_decode() {
        let (base, server) = serve_once("200 OK", r#"{"imagenes":[]}"#).await;
        let err = backend(&base).list(&MediaScope::BLOG).await.unwrap_err();
        assert!(matches!(err, MediaError::Decode(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_upload_sends_one_part_per_file() {
        let (base, server) = serve_once("200 OK", r#"{"images":["/a.png","/b.bin"]}"#).await;
        let files = [
            UploadFile::new("m42.png", PNG),
            UploadFile::new("notas.bin", &b"\x00\x01\x02"[..]),
        ];
        let images = backend(&base)
            .with_session("abc123")
            .upload(&MediaScope::ACTIVITIES, &files)
            .await
            .unwrap();
        assert_eq!(images, vec!["/a.png", "/b.bin"]);

        let request = server.await.unwrap();
        let lowered = request.to_ascii_lowercase();
        assert!(lowered.starts_with("post /media/activities/upload http/1.1\r\n"));
        assert!(lowered.contains("\r\ncookie: session=abc123\r\n"));
        assert!(lowered.contains("content-type: multipart/form-data; boundary="));
        assert_eq!(request.matches(r#"name="files""#).count(), 2);
        assert!(request.contains(r#"name="files"; filename="m42.png""#));
        assert!(request.contains(r#"name="files"; filename="notas.bin""#));
        assert!(lowered.contains("content-type: image/png"));
        assert!(lowered.contains("content-type: application/octet-stream"));
    }
}
