//! services/client/src/http/request.rs
//!
//! Request bodies and per-call options accepted by the `ApiClient`.

use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;
use tradevision_core::domain::ChartUpload;
use tradevision_core::ports::{PortError, PortResult};

/// A single binary part of a `multipart/form-data` request.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

impl FilePart {
    /// The chart upload as the `file` field the backend expects.
    pub fn chart(upload: &ChartUpload) -> Self {
        Self {
            field: "file".to_string(),
            file_name: upload.file_name.clone(),
            mime_type: upload.mime_type.clone(),
            bytes: upload.bytes.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(FilePart),
}

impl RequestBody {
    pub fn json<B: Serialize + ?Sized>(body: &B) -> PortResult<Self> {
        serde_json::to_value(body)
            .map(RequestBody::Json)
            .map_err(|e| PortError::InvalidResponse(format!("Failed to encode request: {}", e)))
    }
}

/// Extra headers and query parameters for one call.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Adds the parameter only when a value is present.
    pub fn query_opt(self, name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.query(name, value),
            None => self,
        }
    }
}
