//! Cart commands.
//!
//! The cart is fetched first so line ids can be checked, then the action
//! runs and the re-fetched cart is printed.

#![allow(clippy::print_stdout)]

use relab_core::{Cart, CartItemId, ProductId};
use relab_storefront::views::{AddOutcome, CartPanel};
use relab_storefront::{AppError, Result};

use super::App;

pub enum Action {
    Show,
    Add { product: ProductId, quantity: u32 },
    Increment(CartItemId),
    Decrement(CartItemId),
    SetQuantity(CartItemId, u32),
    Remove(CartItemId),
    Clear,
}

pub async fn run(app: &App, action: Action) -> Result<()> {
    if !app.session.is_authenticated() {
        return Err(AppError::LoginRequired);
    }

    let mut panel = CartPanel::new(app.client.clone(), app.session.clone());
    panel.refresh().await?;

    match action {
        Action::Show => {}
        Action::Add { product, quantity } => {
            if panel.add(product, quantity).await? == AddOutcome::LoginRequired {
                return Err(AppError::LoginRequired);
            }
        }
        Action::Increment(item) => panel.increment(item).await?,
        Action::Decrement(item) => panel.decrement(item).await?,
        Action::SetQuantity(item, quantity) => panel.set_quantity(item, quantity).await?,
        Action::Remove(item) => panel.remove(item).await?,
        Action::Clear => panel.clear().await?,
    }

    match panel.cart() {
        Some(cart) => print_cart(cart),
        None => println!("No cart"),
    }
    Ok(())
}

fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Cart is empty");
        return;
    }
    for item in &cart.items {
        println!(
            "{:>5}  {} x {} {}  = {}",
            item.id,
            item.quantity,
            item.product.name,
            item.display_unit_price(),
            item.display_subtotal()
        );
    }
    println!();
    println!("{} item(s)", cart.item_count);
    println!("Subtotal: {}", cart.display_subtotal());
    println!("Total:    {}", cart.display_total());
}
