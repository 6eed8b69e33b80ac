//! List responses.
//!
//! Collection endpoints answer either with a bare JSON array or, when the
//! backend paginates, with a `{"count", "next", "previous", "results"}`
//! envelope. [`Listing`] accepts both.

use serde::Deserialize;

/// A paginated envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    /// Missing `results` reads as an empty page.
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// Either shape of a list response.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Items(Vec<T>),
    Page(Page<T>),
}

impl<T> Listing<T> {
    /// The records, whichever shape they came in.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Items(items) => items,
            Self::Page(page) => page.results,
        }
    }
}
