//! Shopping cart owned by the backend.
//!
//! Totals and subtotals are computed server-side. The client shows what the
//! last cart fetch returned and never derives one amount from another.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CartId, CartItemId, Price, ProductId, UserId};

/// Product fields embedded in a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "imagem", default)]
    pub image: Option<String>,
}

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Line id, used by the update and remove endpoints.
    pub id: CartItemId,
    #[serde(rename = "produto")]
    pub product_id: ProductId,
    #[serde(rename = "produto_detalhes")]
    pub product: ProductSummary,
    /// Always at least 1; the backend rejects anything lower.
    #[serde(rename = "quantidade")]
    pub quantity: u32,
    #[serde(rename = "preco_unitario")]
    pub unit_price: Decimal,
    /// `unit_price * quantity`, as computed by the backend.
    pub subtotal: Decimal,
}

impl CartItem {
    #[must_use]
    pub const fn display_unit_price(&self) -> Price {
        Price::new(self.unit_price)
    }

    #[must_use]
    pub const fn display_subtotal(&self) -> Price {
        Price::new(self.subtotal)
    }
}

/// The authenticated user's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    #[serde(rename = "usuario")]
    pub owner_id: UserId,
    #[serde(rename = "itens", default)]
    pub items: Vec<CartItem>,
    /// Sum of quantities across lines.
    #[serde(rename = "total_itens", default)]
    pub item_count: u32,
    pub subtotal: Decimal,
    pub total: Decimal,
    #[serde(rename = "criado_em", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "atualizado_em", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Cart {
    /// A cart with no items is shown as empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.item_count == 0
    }

    /// Find a line by id.
    #[must_use]
    pub fn item(&self, id: CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    #[must_use]
    pub const fn display_subtotal(&self) -> Price {
        Price::new(self.subtotal)
    }

    #[must_use]
    pub const fn display_total(&self) -> Price {
        Price::new(self.total)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_cart_payload() {
        let json = r#"{
            "id": 1,
            "usuario": 9,
            "itens": [{
                "id": 15,
                "produto": 3,
                "produto_detalhes": {"id": 3, "nome": "Fone", "slug": "fone", "imagem": null, "estoque": 4},
                "quantidade": 2,
                "preco_unitario": "49.90",
                "subtotal": "99.80",
                "criado_em": "2025-03-01T10:00:00-03:00",
                "atualizado_em": "2025-03-01T10:00:00-03:00"
            }],
            "total_itens": 2,
            "subtotal": "99.80",
            "total": "99.80",
            "criado_em": "2025-03-01T09:58:12.442190-03:00",
            "atualizado_em": "2025-03-01T10:00:00-03:00"
        }"#;
        let cart: Cart = serde_json::from_str(json).unwrap();
        assert!(!cart.is_empty());
        let item = cart.item(CartItemId::new(15)).unwrap();
        assert_eq!(item.quantity, 2);
        assert_eq!(item.product.name, "Fone");
        assert_eq!(item.display_subtotal().to_string(), "R$ 99.80");
        assert_eq!(cart.display_total().to_string(), "R$ 99.80");
        assert!(cart.created_at.is_some());
    }

    #[test]
    fn test_empty_cart() {
        let json = r#"{"id": 1, "usuario": 9, "itens": [], "total_itens": 0, "subtotal": "0.00", "total": "0.00"}"#;
        let cart: Cart = serde_json::from_str(json).unwrap();
        assert!(cart.is_empty());
        assert!(cart.item(CartItemId::new(1)).is_none());
    }
}
