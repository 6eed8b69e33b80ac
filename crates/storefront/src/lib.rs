//! Relab storefront client library.
//!
//! REST client, persisted session, and the view models the storefront
//! screens are built on. The `relab` CLI is a thin front-end over this crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod session;
pub mod views;

pub use error::{AppError, Result};
