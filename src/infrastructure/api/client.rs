//! HTTP client for the analytics backend

use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::{ApiError, ApiResult};

/// A file held in memory, ready to be sent as the `file` form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, keeping only its final path component as the name
    pub async fn from_path(path: impl AsRef<Path>) -> ApiResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|source| ApiError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }

    /// Mime type guessed from the extension
    pub fn mime(&self) -> &'static str {
        let ext = self
            .name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => "text/csv",
            "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            "json" => "application/json",
            "txt" => "text/plain",
            _ => "application/octet-stream",
        }
    }

    fn to_part(&self) -> ApiResult<Part> {
        let part = Part::bytes(self.bytes.clone())
            .file_name(self.name.clone())
            .mime_str(self.mime())?;
        Ok(part)
    }
}

/// Status and parsed body of a backend response
#[derive(Debug)]
pub(super) struct Reply {
    pub status: StatusCode,
    pub body: Value,
}

impl Reply {
    /// Decode into an endpoint schema; non-success statuses become errors
    pub fn into_typed<T: DeserializeOwned>(self, endpoint: &str) -> ApiResult<T> {
        if !self.status.is_success() {
            let detail = backend_detail(&self.body);
            warn!(endpoint, status = %self.status, %detail, "backend reported failure");
            return Err(ApiError::Backend {
                status: self.status,
                detail,
            });
        }
        serde_json::from_value(self.body).map_err(|source| ApiError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}

/// FastAPI puts error text under `detail`; fall back to the whole body
fn backend_detail(body: &Value) -> String {
    match body.get("detail") {
        Some(Value::String(detail)) => detail.clone(),
        Some(other) => other.to_string(),
        None => body.to_string(),
    }
}

/// Client bound to one backend base URL.
///
/// Cloning shares the underlying connection pool. Requests carry no
/// timeout and are never retried.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Client for the process-wide base URL
    pub fn from_config() -> Self {
        Self::new(crate::config::base_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request target: base URL and endpoint concatenated verbatim
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// `GET {base}{endpoint}`, returning the JSON body whatever the status
    pub async fn get(&self, endpoint: &str) -> ApiResult<Value> {
        let reply = self.send(self.http.get(self.url(endpoint)), endpoint).await?;
        Ok(reply.body)
    }

    /// `POST {base}{endpoint}` with a JSON body, returning the JSON body whatever the status
    pub async fn post<T: Serialize + ?Sized>(&self, endpoint: &str, data: &T) -> ApiResult<Value> {
        let request = self.http.post(self.url(endpoint)).json(data);
        let reply = self.send(request, endpoint).await?;
        Ok(reply.body)
    }

    /// `POST {base}{endpoint}` with a single multipart field named `file`
    pub async fn upload_file(&self, endpoint: &str, file: &UploadFile) -> ApiResult<Value> {
        let reply = self.send_upload(endpoint, file).await?;
        Ok(reply.body)
    }

    pub(super) async fn send_upload(&self, endpoint: &str, file: &UploadFile) -> ApiResult<Reply> {
        let form = Form::new().part("file", file.to_part()?);
        debug!(endpoint, file = %file.name, bytes = file.bytes.len(), "uploading file");
        self.send(self.http.post(self.url(endpoint)).multipart(form), endpoint)
            .await
    }

    pub(super) async fn get_with<Q: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        query: &Q,
    ) -> ApiResult<Reply> {
        let request = self.http.get(self.url(endpoint)).query(query);
        self.send(request, endpoint).await
    }

    pub(super) async fn post_with<Q, B>(&self, endpoint: &str, query: &Q, body: &B) -> ApiResult<Reply>
    where
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let request = self.http.post(self.url(endpoint)).query(query).json(body);
        self.send(request, endpoint).await
    }

    pub(super) async fn post_empty<Q: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        query: &Q,
    ) -> ApiResult<Reply> {
        let request = self.http.post(self.url(endpoint)).query(query);
        self.send(request, endpoint).await
    }

    async fn send(&self, request: RequestBuilder, endpoint: &str) -> ApiResult<Reply> {
        let response = request.send().await.map_err(|err| {
            warn!(endpoint, error = %err, "request failed");
            ApiError::Transport(err)
        })?;
        let status = response.status();
        let bytes = response.bytes().await?;
        debug!(endpoint, %status, bytes = bytes.len(), "backend responded");

        let body = serde_json::from_slice(&bytes)
            .map_err(|source| ApiError::InvalidJson { status, source })?;
        Ok(Reply { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_url_is_plain_concatenation() {
        let client = ApiClient::new("http://localhost:8000");
        assert_eq!(client.url("/api/upload"), "http://localhost:8000/api/upload");
        assert_eq!(client.url("api"), "http://localhost:8000api");
        assert_eq!(client.url(""), "http://localhost:8000");
    }

    #[test]
    fn test_mime_guess() {
        assert_eq!(UploadFile::new("data.csv", vec![]).mime(), "text/csv");
        assert_eq!(
            UploadFile::new("Book.XLSX", vec![]).mime(),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert_eq!(UploadFile::new("blob", vec![]).mime(), "application/octet-stream");
    }

    #[test]
    fn test_backend_detail_extraction() {
        assert_eq!(backend_detail(&json!({"detail": "boom"})), "boom");
        assert_eq!(
            backend_detail(&json!({"detail": [{"loc": ["query"]}]})),
            r#"[{"loc":["query"]}]"#
        );
        assert_eq!(backend_detail(&json!({"error": "x"})), r#"{"error":"x"}"#);
    }

    #[test]
    fn test_into_typed_rejects_error_status() {
        let reply = Reply {
            status: StatusCode::BAD_REQUEST,
            body: json!({"detail": "Invalid model type"}),
        };
        let err = reply.into_typed::<Value>("/api/model/train").unwrap_err();
        assert!(matches!(
            err,
            ApiError::Backend { status, ref detail }
                if status == StatusCode::BAD_REQUEST && detail == "Invalid model type"
        ));
    }

    #[tokio::test]
    async fn test_from_path_missing_file() {
        let err = UploadFile::from_path("/definitely/not/here.csv")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Io { .. }));
    }
}
