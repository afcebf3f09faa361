//! services/client/src/api/auth.rs
//!
//! Login, signup and the current-user lookup. Login and signup answers are
//! wrapped in the `{ data: ... }` envelope; `/me` is bare.

use async_trait::async_trait;
use tradevision_core::domain::{AuthResponse, Envelope, LoginRequest, SignupRequest, User};
use tradevision_core::ports::{AuthService, PortResult};

use crate::http::ApiClient;

#[derive(Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthService for AuthApi {
    async fn login(&self, request: &LoginRequest) -> PortResult<AuthResponse> {
        let envelope: Envelope<AuthResponse> =
            self.client.post_json("/api/auth/login", request).await?;
        Ok(envelope.into_data())
    }

    async fn signup(&self, request: &SignupRequest) -> PortResult<AuthResponse> {
        let envelope: Envelope<AuthResponse> =
            self.client.post_json("/api/auth/signup", request).await?;
        Ok(envelope.into_data())
    }

    async fn current_user(&self) -> PortResult<User> {
        self.client.get("/api/auth/me").await
    }
}
