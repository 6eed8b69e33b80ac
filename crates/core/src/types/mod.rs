//! Core types for Relab.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod document;
pub mod email;
pub mod id;
pub mod price;

pub use document::DigitString;
pub use email::{Email, EmailError};
pub use id::*;
pub use price::Price;
