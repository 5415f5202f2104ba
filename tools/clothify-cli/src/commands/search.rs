//! Catalog search command.

use anyhow::{bail, Result};
use clothify_commerce::money::Money;
use clothify_commerce::search::{Facet, FilterCriteria, SearchFacets, SortDirection, SortKey};
use serde::Serialize;

use super::SearchArgs;
use crate::context::Context;
use crate::output::format_micros;

/// Run the search command.
pub fn run(args: SearchArgs, ctx: &Context) -> Result<()> {
    let criteria = criteria_from(&args)?;
    let state = ctx.state()?;
    let results = state.search(&criteria);

    let per_page = args.per_page.unwrap_or(ctx.config.search.per_page);
    let page = results.page(args.page, per_page);

    if ctx.output.is_json() {
        ctx.output.json(&SearchReport {
            criteria: &criteria,
            total_count: results.total_count,
            page: page.pagination.page,
            total_pages: page.pagination.total_pages,
            products: page.products.iter().map(|p| p.id.as_str()).collect(),
            suggestion: results.suggestion.as_deref(),
            facets: args.facets.then_some(&results.facets),
            query_time_us: results.query_time_us,
        });
        return Ok(());
    }

    let title = match criteria.normalized_query() {
        Some(q) => format!("Results for \"{}\"", q),
        None => "All products".to_string(),
    };
    ctx.output.header(&title);

    if let Some(suggestion) = &results.suggestion {
        ctx.output.info(&format!("Did you mean \"{}\"?", suggestion));
    }

    if results.is_empty() {
        ctx.output.info("No products match these filters.");
        return Ok(());
    }

    ctx.output.product_header();
    for product in page.products {
        ctx.output.product_row(product);
    }
    ctx.output.info(&format!(
        "Showing {}-{} of {} (page {}/{}) in {}",
        page.pagination.start_item(),
        page.pagination.end_item(),
        results.total_count,
        page.pagination.page,
        page.pagination.total_pages,
        format_micros(results.query_time_us),
    ));

    if args.facets {
        for facet in results.facets.all() {
            print_facet(facet, ctx);
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct SearchReport<'a> {
    criteria: &'a FilterCriteria,
    total_count: usize,
    page: usize,
    total_pages: usize,
    products: Vec<&'a str>,
    suggestion: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    facets: Option<&'a SearchFacets>,
    query_time_us: u64,
}

fn print_facet(facet: &Facet, ctx: &Context) {
    if facet.values.is_empty() {
        return;
    }
    ctx.output.header(&facet.name);
    for value in &facet.values {
        let marker = if value.selected { " *" } else { "" };
        ctx.output
            .list_item(&format!("{} ({}){}", value.value, value.count, marker));
    }
}

/// Build filter criteria from the command line.
fn criteria_from(args: &SearchArgs) -> Result<FilterCriteria> {
    let mut criteria = FilterCriteria::new();

    if let Some(query) = &args.query {
        criteria = criteria.with_query(query.as_str());
    }
    if let Some(category) = &args.category {
        criteria = criteria.with_category(category.as_str());
    }
    if args.min_price.is_some() || args.max_price.is_some() {
        criteria = criteria.with_price_range(
            parse_price(args.min_price, "--min-price")?,
            parse_price(args.max_price, "--max-price")?,
        );
    }
    for size in &args.size {
        criteria = criteria.with_size(size.as_str());
    }
    if args.in_stock {
        criteria = criteria.with_in_stock(true);
    }
    if let Some(rating) = args.min_rating {
        if !(0.0..=5.0).contains(&rating) {
            bail!("--min-rating must be between 0 and 5, got {}", rating);
        }
        criteria = criteria.with_min_rating(rating);
    }
    if let Some(brand) = &args.brand {
        criteria = criteria.with_brand(brand.as_str());
    }

    let direction = if args.desc {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    };
    match &args.sort {
        Some(key) => {
            let Some(key) = SortKey::from_str(key) else {
                bail!(
                    "Unknown sort key '{}'. Use relevance, name, price, newest or popularity.",
                    key
                );
            };
            criteria = criteria.sorted_by(key, direction);
        }
        None if args.desc => criteria = criteria.sorted_by(SortKey::Relevance, direction),
        None => {}
    }

    Ok(criteria)
}

fn parse_price(value: Option<f64>, flag: &str) -> Result<Option<Money>> {
    match value {
        Some(v) if v.is_nan() || v < 0.0 => bail!("{} must be a non-negative amount", flag),
        Some(v) => Ok(Some(Money::usd((v * 100.0).round() as i64))),
        None => Ok(None),
    }
}
