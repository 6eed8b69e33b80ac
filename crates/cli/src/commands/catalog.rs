//! Catalog commands.

#![allow(clippy::print_stdout)]

use relab_core::{Category, CategoryId, Product, ProductId};
use relab_storefront::Result;
use relab_storefront::views::CatalogView;

use super::App;

/// Which product list to show.
pub enum Shelf {
    All(Option<CategoryId>),
    Featured,
    Promotions,
}

pub async fn list_products(app: &App, shelf: Shelf, search: Option<String>) -> Result<()> {
    let mut view = CatalogView::new(app.client.clone());
    match shelf {
        Shelf::All(category) => view.select_category(category).await?,
        Shelf::Featured => view.load_featured().await?,
        Shelf::Promotions => view.load_promotions().await?,
    }
    if let Some(term) = search {
        view.set_search(term);
    }

    let products = view.visible_products();
    if products.is_empty() {
        println!("No products found");
        return Ok(());
    }
    for product in products {
        print_product_line(product);
    }
    Ok(())
}

pub async fn show_product(app: &App, id: ProductId) -> Result<()> {
    let product = app.client.products().get(id).await?;

    println!("{} (#{})", product.name, product.id);
    if let Some(original) = product.original_price() {
        println!("  price: {} (was {original})", product.display_price());
    } else {
        println!("  price: {}", product.display_price());
    }
    if let Some(category) = &product.category_name {
        println!("  category: {category}");
    }
    println!("  stock: {}", product.stock);
    if let Some(image) = &product.image {
        println!("  image: {}", app.config.api.media_url(image));
    }
    if let Some(description) = product.description.as_ref().or(product.short_description.as_ref()) {
        println!();
        println!("{description}");
    }
    Ok(())
}

pub async fn list_categories(app: &App) -> Result<()> {
    let mut view = CatalogView::new(app.client.clone());
    view.load_categories().await?;
    for category in view.categories() {
        print_category_line(category);
    }
    Ok(())
}

pub async fn show_category(app: &App, id: CategoryId) -> Result<()> {
    let category = app.client.categories().get(id).await?;
    print_category_line(&category);
    if let Some(description) = &category.description {
        println!("{description}");
    }
    Ok(())
}

fn print_product_line(product: &Product) {
    let promo = if product.on_promotion { " [promo]" } else { "" };
    let stock = if product.available_for_sale { "" } else { " (indisponível)" };
    println!(
        "{:>5}  {}  {}{promo}{stock}",
        product.id,
        product.display_price(),
        product.name
    );
}

fn print_category_line(category: &Category) {
    match category.product_count {
        Some(count) => println!("{:>5}  {} ({count})", category.id, category.name),
        None => println!("{:>5}  {}", category.id, category.name),
    }
}
