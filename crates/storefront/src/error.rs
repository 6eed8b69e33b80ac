//! Unified error type for storefront actions.
//!
//! Views and the CLI return `Result<T, AppError>`. The `Display` output is
//! the message shown to the user.

use relab_core::CartItemId;
use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::session::{LoginError, StoreError};
use crate::views::FormError;

/// Application-level error type for the storefront client.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend request failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Login was rejected or could not be completed.
    #[error(transparent)]
    Login(#[from] LoginError),

    /// Session storage could not be written.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Local form validation failed; nothing was sent.
    #[error(transparent)]
    Form(#[from] FormError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The action needs a logged-in user.
    #[error("Faça login para continuar")]
    LoginRequired,

    /// The line is not in the displayed cart.
    #[error("Item {0} não está no carrinho")]
    ItemNotInCart(CartItemId),
}

impl AppError {
    /// The backend rejected the session's access token.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        match self {
            Self::Api(e) | Self::Login(LoginError::Api(e)) => e.is_unauthorized(),
            _ => false,
        }
    }
}

/// Result alias for storefront actions.
pub type Result<T, E = AppError> = std::result::Result<T, E>;
