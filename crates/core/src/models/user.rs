//! Authenticated user profile.

use serde::{Deserialize, Serialize};

use crate::types::{Email, UserId};

/// Profile of the logged-in user, as returned with the login tokens.
///
/// Stored alongside the tokens and replaced wholesale on every login. The
/// backend sends more fields than these (addresses, avatar, flags); they are
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Backend primary key.
    pub id: UserId,
    /// Login handle chosen at registration.
    pub username: String,
    /// Email used to log in.
    pub email: Email,
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Brazilian taxpayer id (CPF), digits only.
    #[serde(rename = "cpf", default)]
    pub tax_id: Option<String>,
    /// Phone number, digits only.
    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,
}

impl UserProfile {
    /// First and last name joined, falling back to the username.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_owned()
        }
    }
}
