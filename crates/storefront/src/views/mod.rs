//! Stateful view models behind the storefront screens.
//!
//! Each view owns its copy of the data it displays and re-fetches after any
//! change. A failed request is logged, shown as a banner, and leaves the
//! previously displayed data in place.

mod auth;
mod cart;
mod catalog;

pub use auth::{AuthMode, AuthPanel, FormError, LoginForm, RegisterForm};
pub use cart::{AddOutcome, CartPanel};
pub use catalog::CatalogView;
