//! Authentication endpoints.

use relab_core::{Email, LoginRequest, LoginResponse, Registration, UserProfile};
use reqwest::Method;
use tracing::{info, instrument};

use super::{ApiClient, ApiError, ErrorFormat};

/// `/usuarios/` resource group.
#[derive(Debug, Clone, Copy)]
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for an access/refresh token pair.
    ///
    /// Nothing is persisted here; see `SessionContext::login`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with the backend's `detail` message when the
    /// credentials are rejected, or a transport/decode error.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &Email, password: &str) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            email: email.clone(),
            password: password.to_owned(),
        };
        let request = self
            .client
            .request(Method::POST, self.client.url("usuarios/auth/login/")?, None)
            .json(&body);

        let response: LoginResponse = self.client.send_json(request, ErrorFormat::Detail).await?;
        info!(has_access = response.access.is_some(), "Login answered");
        Ok(response)
    }

    /// Create an account.
    ///
    /// Registration does not log the user in.
    ///
    /// # Errors
    ///
    /// On validation failure the error message lists every rejected field,
    /// one `field: messages` line per field.
    #[instrument(skip(self, registration), fields(username = %registration.username))]
    pub async fn register(&self, registration: &Registration) -> Result<UserProfile, ApiError> {
        let request = self
            .client
            .request(Method::POST, self.client.url("usuarios/")?, None)
            .json(registration);

        let user: UserProfile = self
            .client
            .send_json(request, ErrorFormat::FieldErrors)
            .await?;
        info!(user_id = %user.id, "Account created");
        Ok(user)
    }
}
