//! services/client/src/http/client.rs
//!
//! The single configured request pipeline every domain API module goes
//! through. It attaches the persisted bearer token, turns every failure into
//! the normalized `ApiError` shape, and emits the session-expiry event on 401.

use bytes::Bytes;
use reqwest::{multipart, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, warn};
use tradevision_core::ports::{
    ApiError, PortError, PortResult, SessionStorage, UnauthorizedListener,
    FALLBACK_ERROR_MESSAGE, TOKEN_KEY,
};

use crate::http::request::{FilePart, RequestBody, RequestOptions};

//=========================================================================================
// Wire Error Shape
//=========================================================================================

/// The backend reports field errors either as one message or a list per field.
#[derive(Deserialize)]
#[serde(untagged)]
enum FieldMessages {
    One(String),
    Many(Vec<String>),
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Option<BTreeMap<String, FieldMessages>>,
}

/// Builds the normalized error from a non-2xx status and whatever body came with it.
fn normalize_error(status: StatusCode, body: &[u8]) -> ApiError {
    let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
    let message = parsed
        .message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string());
    let errors = parsed.errors.map(|fields| {
        fields
            .into_iter()
            .map(|(field, messages)| {
                let messages = match messages {
                    FieldMessages::One(msg) => vec![msg],
                    FieldMessages::Many(msgs) => msgs,
                };
                (field, messages)
            })
            .collect()
    });
    ApiError {
        message,
        status: status.as_u16(),
        errors,
    }
}

//=========================================================================================
// The Client
//=========================================================================================

/// A cheaply cloneable handle to the configured HTTP pipeline.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    storage: Arc<dyn SessionStorage>,
    on_unauthorized: Option<Arc<dyn UnauthorizedListener>>,
}

impl ApiClient {
    /// Creates a new `ApiClient` that reads its bearer token from `storage`.
    pub fn new(base_url: Url, storage: Arc<dyn SessionStorage>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("tradevision-client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url,
            storage,
            on_unauthorized: None,
        })
    }

    /// Registers the receiver of the session-expiry event.
    pub fn with_unauthorized_listener(mut self, listener: Arc<dyn UnauthorizedListener>) -> Self {
        self.on_unauthorized = Some(listener);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> PortResult<Url> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined)
            .map_err(|e| PortError::InvalidResponse(format!("Invalid request URL {}: {}", joined, e)))
    }

    fn bearer_token(&self) -> Option<String> {
        match self.storage.get_present(TOKEN_KEY) {
            Ok(token) => token,
            Err(e) => {
                warn!("Could not read the stored token: {}", e);
                None
            }
        }
    }

    fn expire_session(&self) {
        if let Err(e) = self.storage.clear_session() {
            error!("Failed to clear the persisted session after 401: {}", e);
        }
        if let Some(listener) = &self.on_unauthorized {
            listener.on_unauthorized();
        }
    }

    /// Sends one request and returns the raw body of a 2xx response.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        options: RequestOptions,
    ) -> PortResult<Bytes> {
        let url = self.url_for(path)?;
        debug!(%method, %url, "Sending request");

        // 1. Build the request with per-call options.
        let mut builder = self.http.request(method.clone(), url);
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        for (name, value) in &options.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        // 2. Attach the bearer token, if one is persisted.
        if let Some(token) = self.bearer_token() {
            builder = builder.bearer_auth(token);
        }

        // 3. Encode the body.
        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(part) => builder.multipart(multipart_form(part)?),
        };

        // 4. Send. A request that never got a response is still a normalized error.
        let response = builder.send().await.map_err(|e| {
            warn!(%method, path, "Request failed without a response: {}", e);
            PortError::Api(ApiError::transport())
        })?;

        // 5. Read the body and normalize failures.
        let status = response.status();
        let body = response.bytes().await;
        self.settle(&method, path, status, body)
    }

    /// Turns a status and its body into the call's result. A 401 expires the
    /// session whether or not the body could be read.
    fn settle<E: std::fmt::Display>(
        &self,
        method: &Method,
        path: &str,
        status: StatusCode,
        body: Result<Bytes, E>,
    ) -> PortResult<Bytes> {
        if status == StatusCode::UNAUTHORIZED {
            self.expire_session();
        }

        let bytes = body.map_err(|e| {
            warn!(%method, path, "Failed to read response body: {}", e);
            PortError::Api(ApiError::new(status.as_u16(), FALLBACK_ERROR_MESSAGE))
        })?;

        if !status.is_success() {
            let api_error = normalize_error(status, &bytes);
            warn!(%method, path, status = api_error.status, "Request rejected: {}", api_error.message);
            return Err(PortError::Api(api_error));
        }

        Ok(bytes)
    }

    /// Sends a request and decodes the JSON body as `T`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        options: RequestOptions,
    ) -> PortResult<T> {
        let bytes = self.execute(method, path, body, options).await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            PortError::InvalidResponse(format!("Unexpected response from {}: {}", path, e))
        })
    }

    /// Sends a request whose successful response carries no payload.
    pub async fn request_unit(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        options: RequestOptions,
    ) -> PortResult<()> {
        self.execute(method, path, body, options).await.map(|_| ())
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> PortResult<T> {
        self.get_with(path, RequestOptions::default()).await
    }

    pub async fn get_with<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> PortResult<T> {
        self.request(Method::GET, path, RequestBody::Empty, options).await
    }

    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> PortResult<T> {
        let body = RequestBody::json(body)?;
        self.request(Method::POST, path, body, RequestOptions::default()).await
    }

    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> PortResult<T> {
        self.request(Method::POST, path, RequestBody::Empty, RequestOptions::default())
            .await
    }

    /// A body-less POST with no payload in the response.
    pub async fn post_empty_with(&self, path: &str, options: RequestOptions) -> PortResult<()> {
        self.request_unit(Method::POST, path, RequestBody::Empty, options)
            .await
    }

    pub async fn delete(&self, path: &str) -> PortResult<()> {
        self.request_unit(Method::DELETE, path, RequestBody::Empty, RequestOptions::default())
            .await
    }

    pub async fn upload<T: DeserializeOwned>(&self, path: &str, part: FilePart) -> PortResult<T> {
        self.request(
            Method::POST,
            path,
            RequestBody::Multipart(part),
            RequestOptions::default(),
        )
        .await
    }
}

fn multipart_form(part: FilePart) -> PortResult<multipart::Form> {
    let field = part.field;
    let file_part = multipart::Part::bytes(part.bytes.to_vec())
        .file_name(part.file_name)
        .mime_str(&part.mime_type)
        .map_err(|e| PortError::InvalidResponse(format!("Invalid MIME type: {}", e)))?;
    Ok(multipart::Form::new().part(field, file_part))
}
