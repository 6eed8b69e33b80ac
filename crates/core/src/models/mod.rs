//! Wire models for the storefront backend.
//!
//! Field names follow Rust conventions; `#[serde(rename)]` maps them onto the
//! backend's JSON keys. Monetary amounts arrive as decimal strings and are
//! never recomputed on the client.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod listing;
pub mod user;

pub use auth::{LoginRequest, LoginResponse, Registration};
pub use cart::{Cart, CartItem, ProductSummary};
pub use catalog::{Category, Product};
pub use listing::{Listing, Page};
pub use user::UserProfile;
