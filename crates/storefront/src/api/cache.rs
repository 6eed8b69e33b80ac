//! Cache types for catalog responses.

use relab_core::{Category, CategoryId, Product, ProductId};

/// Cache key for products and categories.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    /// Product listing, keyed by its query string.
    Products(String),
    Product(ProductId),
    Featured,
    Promotions,
    Categories,
    Category(CategoryId),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Vec<Product>),
    Product(Box<Product>),
    Categories(Vec<Category>),
    Category(Box<Category>),
}
