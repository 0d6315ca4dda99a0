//! Auth orchestrator: composes gateway calls with session writes.
//!
//! ERROR HANDLING
//! ==============
//! Application-level failures (`success: false`) come back as data so front
//! ends can show the backend's message inline. Only transport errors
//! (`ApiError`) are returned as `Err`. Authenticated reads short-circuit to a
//! local "Not authenticated" envelope when no token is stored, without any
//! network call.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::{ApiError, ApiGateway, RequestOptions};
use crate::config::Endpoint;
use crate::session::SessionStore;
use crate::types::{
    ApiResponse, AuthResponse, Chat, ChatDetail, GenerateRequest, GeneratedCode, LoginData, SignupData, UserProfile,
};

pub const NOT_AUTHENTICATED: &str = "Not authenticated";

pub struct AuthService<G> {
    gateway: G,
    session: Arc<SessionStore>,
}

impl<G: ApiGateway> AuthService<G> {
    #[must_use]
    pub fn new(gateway: G, session: Arc<SessionStore>) -> Self {
        Self { gateway, session }
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// `POST /auth/signup`; stores the session on success.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport or HTTP failure.
    pub async fn signup(&self, data: &SignupData) -> Result<AuthResponse, ApiError> {
        self.authenticate(Endpoint::Signup, to_body(data)?)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "signup error"))
    }

    /// `POST /auth/login`; stores the session on success.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport or HTTP failure.
    pub async fn login(&self, data: &LoginData) -> Result<AuthResponse, ApiError> {
        self.authenticate(Endpoint::Login, to_body(data)?)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "login error"))
    }

    async fn authenticate(&self, endpoint: Endpoint, body: Value) -> Result<AuthResponse, ApiError> {
        let raw = self
            .gateway
            .request(endpoint, RequestOptions::new().json(body))
            .await?;
        let response: AuthResponse = decode(raw)?;
        if response.success {
            if let Some(data) = &response.data {
                self.session.save(&data.token, &data.user);
            }
        }
        Ok(response)
    }

    /// Drop the local session. The token itself is not revoked server-side.
    pub fn logout(&self) {
        self.session.clear();
    }

    /// `GET /chats`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport or HTTP failure.
    pub async fn get_chats(&self) -> Result<ApiResponse<Vec<Chat>>, ApiError> {
        self.authorized(Endpoint::ListChats, RequestOptions::new())
            .await
            .inspect_err(|e| tracing::error!(error = %e, "get chats error"))
    }

    /// `GET /chats/{id}`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport or HTTP failure.
    pub async fn get_chat(&self, chat_id: i64) -> Result<ApiResponse<ChatDetail>, ApiError> {
        self.authorized(Endpoint::ChatDetail(chat_id), RequestOptions::new())
            .await
            .inspect_err(|e| tracing::error!(error = %e, chat_id, "get chat error"))
    }

    /// `POST /generate`. A `chat_id` of `None` or `0` starts a new chat.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport or HTTP failure.
    pub async fn generate_code(
        &self,
        prompt: &str,
        language: &str,
        chat_id: Option<i64>,
    ) -> Result<ApiResponse<GeneratedCode>, ApiError> {
        let request = GenerateRequest {
            prompt: prompt.to_owned(),
            language: language.to_owned(),
            chat_id: chat_id.filter(|id| *id != 0),
        };
        let options = RequestOptions::new().json(to_body(&request)?);
        self.authorized(Endpoint::Generate, options)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "generate code error"))
    }

    async fn authorized<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        options: RequestOptions,
    ) -> Result<ApiResponse<T>, ApiError> {
        let Some(token) = self.session.get_token() else {
            tracing::debug!(endpoint = %endpoint.path(), "no token; skipping request");
            return Ok(ApiResponse::failure(NOT_AUTHENTICATED));
        };
        let raw = self.gateway.request(endpoint, options.bearer(&token)).await?;
        decode(raw)
    }

    #[must_use]
    pub fn current_user(&self) -> Option<UserProfile> {
        self.session.get_user()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }
}

fn to_body<T: serde::Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::InvalidRequest(e.to_string()))
}

fn decode<T: DeserializeOwned>(raw: Value) -> Result<ApiResponse<T>, ApiError> {
    serde_json::from_value(raw).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
