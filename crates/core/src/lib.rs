//! Relab Core - Shared types library.
//!
//! This crate provides the types shared by every Relab component:
//! - `storefront` - API client, session handling and view models
//! - `cli` - Command-line front-end for browsing and cart management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage.
//! The backend owns every record; these types mirror its JSON payloads.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails and documents
//! - [`models`] - Wire models for users, products, categories and carts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
