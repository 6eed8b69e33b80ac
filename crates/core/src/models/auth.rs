//! Login and registration payloads.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::models::UserProfile;
use crate::types::{DigitString, Email};

/// Body of `POST /usuarios/auth/login/`.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub email: Email,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Successful login answer.
///
/// The token endpoint always returns `access` and `refresh`; `user` is only
/// present when the backend is configured to embed the profile.
#[derive(Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access: Option<String>,
    #[serde(default)]
    pub refresh: String,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("access", &self.access.as_ref().map(|_| "[REDACTED]"))
            .field("refresh", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

/// Body of `POST /usuarios/`.
///
/// `password_confirm` is sent too; the backend checks it again.
#[derive(Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: Email,
    pub password: String,
    pub password_confirm: String,
    pub first_name: String,
    pub last_name: String,
    pub cpf: DigitString,
    #[serde(rename = "telefone")]
    pub phone: DigitString,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("cpf", &self.cpf)
            .field("phone", &self.phone)
            .finish_non_exhaustive()
    }
}
