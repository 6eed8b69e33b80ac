//! Catalog records: products and categories.
//!
//! Both are read-only from the client's point of view. Listing endpoints
//! return a trimmed-down product (no description, counters or timestamps),
//! so every detail-only field is optional.
//!
//! Amounts arrive as JSON strings for stored prices and as JSON numbers for
//! computed ones (`preco_final`, `desconto_percentual`); both decode.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, Price, ProductId};

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Backend primary key.
    pub id: ProductId,
    /// Display name.
    #[serde(rename = "nome")]
    pub name: String,
    /// URL slug.
    #[serde(default)]
    pub slug: String,
    /// One-line description shown on cards.
    #[serde(rename = "descricao_curta", default)]
    pub short_description: Option<String>,
    /// Full description (detail endpoint only).
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    /// List price.
    #[serde(rename = "preco")]
    pub price: Decimal,
    /// Promotional price, when one is set.
    #[serde(rename = "preco_promocional", default)]
    pub promotional_price: Option<Decimal>,
    /// Price actually charged (promotional when on promotion).
    #[serde(rename = "preco_final")]
    pub final_price: Decimal,
    /// Whether the promotional price applies.
    #[serde(rename = "em_promocao", default)]
    pub on_promotion: bool,
    /// Discount over the list price, in percent.
    #[serde(rename = "desconto_percentual", default)]
    pub discount_percent: Option<Decimal>,
    /// Units in stock.
    #[serde(rename = "estoque", default)]
    pub stock: i64,
    /// Flag set by staff (detail endpoint only).
    #[serde(rename = "disponivel", default)]
    pub available: Option<bool>,
    /// Available and in stock.
    #[serde(rename = "disponivel_venda", default)]
    pub available_for_sale: bool,
    /// Image path relative to the media host.
    #[serde(rename = "imagem", default)]
    pub image: Option<String>,
    /// Owning category.
    #[serde(rename = "categoria", default)]
    pub category_id: Option<CategoryId>,
    /// Owning category's name.
    #[serde(rename = "categoria_nome", default)]
    pub category_name: Option<String>,
    /// Highlighted on the home page.
    #[serde(rename = "em_destaque", default)]
    pub featured: bool,
    #[serde(rename = "visualizacoes", default)]
    pub view_count: Option<u64>,
    #[serde(rename = "vendas", default)]
    pub sales_count: Option<u64>,
    #[serde(rename = "criado_em", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "atualizado_em", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Price to display on cards.
    #[must_use]
    pub const fn display_price(&self) -> Price {
        Price::new(self.final_price)
    }

    /// List price, shown struck through when a promotion applies.
    #[must_use]
    pub fn original_price(&self) -> Option<Price> {
        self.on_promotion.then(|| Price::new(self.price))
    }

    /// Case-insensitive substring match on the name.
    #[must_use]
    pub fn name_matches(&self, term: &str) -> bool {
        self.name.to_lowercase().contains(&term.to_lowercase())
    }
}

// =============================================================================
// Category
// =============================================================================

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Backend primary key.
    pub id: CategoryId,
    /// Display name.
    #[serde(rename = "nome")]
    pub name: String,
    /// URL slug.
    #[serde(default)]
    pub slug: String,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "imagem", default)]
    pub image: Option<String>,
    /// Detail endpoint only; listings contain active categories.
    #[serde(rename = "ativo", default)]
    pub active: Option<bool>,
    /// Sort position.
    #[serde(rename = "ordem", default)]
    pub order: Option<i32>,
    #[serde(rename = "total_produtos", default)]
    pub product_count: Option<u64>,
}
