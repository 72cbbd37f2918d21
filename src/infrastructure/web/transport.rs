//! Transport boundary.
//!
//! A request/response primitive assumed reliable at the byte level. The
//! executor owns classification and retries; the transport only moves bytes.

use std::error;
use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use url::Url;

#[derive(Debug)]
pub enum TransportError {
    Http(reqwest::Error),
    File { path: PathBuf, source: std::io::Error },
}

impl Display for TransportError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            TransportError::Http(e) => write!(f, "http request failed: {}", e),
            TransportError::File { path, .. } => {
                write!(f, "could not read upload file {}", path.display())
            }
        }
    }
}

impl error::Error for TransportError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            TransportError::Http(e) => Some(e),
            TransportError::File { source, .. } => Some(source),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> TransportError {
        TransportError::Http(err)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// POST a query and return the raw response text.
    async fn send(&self, url: &Url, query: &str) -> Result<String, TransportError>;

    /// POST a query together with a file as a multipart form.
    async fn send_file(
        &self,
        url: &Url,
        query: &str,
        file_path: &Path,
    ) -> Result<String, TransportError>;
}

/// Production transport over `reqwest`, authenticating every request with the
/// configured token.
pub struct HttpTransport {
    client: Client,
    token: String,
}

impl HttpTransport {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            token: token.into(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, url: &Url, query: &str) -> Result<String, TransportError> {
        let body = serde_json::json!({ "query": query });
        let response = self
            .client
            .post(url.clone())
            .header(AUTHORIZATION, self.token.as_str())
            .json(&body)
            .send()
            .await?;
        Ok(response.text().await?)
    }

    async fn send_file(
        &self,
        url: &Url,
        query: &str,
        file_path: &Path,
    ) -> Result<String, TransportError> {
        let bytes = tokio::fs::read(file_path)
            .await
            .map_err(|source| TransportError::File {
                path: file_path.to_path_buf(),
                source,
            })?;
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let form = Form::new()
            .text("query", query.to_string())
            .part("variables[file]", Part::bytes(bytes).file_name(file_name));
        let response = self
            .client
            .post(url.clone())
            .header(AUTHORIZATION, self.token.as_str())
            .multipart(form)
            .send()
            .await?;
        Ok(response.text().await?)
    }
}
