//! Product listing commands.

use anyhow::{bail, Result};
use clothify_commerce::catalog::{Catalog, Product};
use clothify_commerce::ids::ProductId;
use clothify_store::CatalogSource;

use super::{ProductsArgs, ProductsCommand};
use crate::context::Context;
use crate::output::{moderation_badge, price_label, stock_badge};

/// Run the products command.
pub fn run(args: ProductsArgs, ctx: &Context) -> Result<()> {
    let state = ctx.state()?;
    if state.catalog_source() == CatalogSource::Seed {
        ctx.output
            .warn("Product table unavailable or empty; showing the built-in catalog");
    }
    let catalog = state.catalog();

    match args.command {
        Some(ProductsCommand::List { category, new, sale }) => {
            list(catalog, category.as_deref(), new, sale, ctx)
        }
        Some(ProductsCommand::Show { id, related }) => show(catalog, &id, related, ctx),
        Some(ProductsCommand::Categories) => categories(catalog, ctx),
        None => list(catalog, None, false, false, ctx),
    }
}

fn list(
    catalog: &Catalog,
    category: Option<&str>,
    new: bool,
    sale: bool,
    ctx: &Context,
) -> Result<()> {
    let products: Vec<&Product> = catalog
        .products()
        .iter()
        .filter(|p| category.map_or(true, |c| p.category.eq_ignore_ascii_case(c)))
        .filter(|p| !new || p.is_new)
        .filter(|p| !sale || p.is_on_sale())
        .collect();

    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }

    ctx.output.header(&format!("Products ({})", products.len()));
    if products.is_empty() {
        ctx.output.info("No products found.");
        return Ok(());
    }
    ctx.output.product_header();
    for product in products {
        ctx.output.product_row(product);
    }
    Ok(())
}

fn show(catalog: &Catalog, id: &str, related: usize, ctx: &Context) -> Result<()> {
    let id = ProductId::new(id);
    let Some(product) = catalog.get(&id) else {
        bail!("Product not found: {}", id);
    };
    let others = catalog.related(&id, related);

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "product": product,
            "related": others,
        }));
        return Ok(());
    }

    ctx.output.header(&product.name);
    ctx.output.kv("ID", product.id.as_str());
    ctx.output.kv("Price", &price_label(product));
    if let Some(original) = product.original_price.filter(|_| product.is_on_sale()) {
        ctx.output.kv("Was", &original.display());
    }
    ctx.output.kv("Category", &product.category);
    if let Some(brand) = product.brand_guess() {
        ctx.output.kv("Brand", brand);
    }
    if !product.sizes.is_empty() {
        ctx.output.kv("Sizes", &product.sizes.join(", "));
    }
    ctx.output.kv("Stock", &stock_badge(product.in_stock));
    ctx.output.kv("Status", &moderation_badge(product.status));
    if let Some(image) = product.primary_image() {
        ctx.output.kv("Image", image);
    }
    if !product.description.is_empty() {
        ctx.output.kv("Description", &product.description);
    }

    if !product.reviews.is_empty() {
        ctx.output.header(&format!(
            "Reviews ({}, {:.1} average)",
            product.review_count, product.rating
        ));
        for review in &product.reviews {
            let verified = if review.verified { ", verified" } else { "" };
            ctx.output.list_item(&format!(
                "{}/5 by {} on {}{}: {}",
                review.rating, review.author, review.date, verified, review.comment
            ));
        }
    }

    if !others.is_empty() {
        ctx.output.header("You may also like");
        for other in others {
            ctx.output
                .list_item(&format!("{} {} ({})", other.id, other.name, price_label(other)));
        }
    }
    Ok(())
}

fn categories(catalog: &Catalog, ctx: &Context) -> Result<()> {
    let counts: Vec<(&str, usize)> = catalog
        .categories()
        .into_iter()
        .map(|c| (c, catalog.by_category(c).len()))
        .collect();

    if ctx.output.is_json() {
        let map: serde_json::Map<String, serde_json::Value> = counts
            .iter()
            .map(|(c, n)| (c.to_string(), serde_json::Value::from(*n)))
            .collect();
        ctx.output.json(&map);
        return Ok(());
    }

    ctx.output.header("Categories");
    for (category, count) in counts {
        ctx.output.list_item(&format!("{} ({})", category, count));
    }
    Ok(())
}
