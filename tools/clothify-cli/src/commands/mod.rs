//! CLI command implementations.

pub mod config;
pub mod products;
pub mod search;
pub mod validate;

use clap::{Args, Subcommand};

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Search text (name, description, category).
    pub query: Option<String>,

    /// Only this category ("all" for any).
    #[arg(long)]
    pub category: Option<String>,

    /// Lowest price, in major units.
    #[arg(long)]
    pub min_price: Option<f64>,

    /// Highest price, in major units.
    #[arg(long)]
    pub max_price: Option<f64>,

    /// Sizes to match (any of them).
    #[arg(short, long)]
    pub size: Vec<String>,

    /// Only products in stock.
    #[arg(long)]
    pub in_stock: bool,

    /// Minimum average rating.
    #[arg(long)]
    pub min_rating: Option<f64>,

    /// Brand (first word of the name).
    #[arg(short, long)]
    pub brand: Option<String>,

    /// Sort key: relevance, name, price, newest, popularity.
    #[arg(long)]
    pub sort: Option<String>,

    /// Reverse the sort order.
    #[arg(long)]
    pub desc: bool,

    /// Page to show.
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Results per page (default: from config).
    #[arg(long)]
    pub per_page: Option<usize>,

    /// Show facet counts.
    #[arg(long)]
    pub facets: bool,
}

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: Option<ProductsCommand>,
}

#[derive(Subcommand)]
pub enum ProductsCommand {
    /// List products.
    List {
        /// Only this category.
        #[arg(long)]
        category: Option<String>,

        /// Only new arrivals.
        #[arg(long)]
        new: bool,

        /// Only marked-down products.
        #[arg(long)]
        sale: bool,
    },
    /// Show details for one product.
    Show {
        /// Product ID.
        id: String,

        /// Number of related products to list.
        #[arg(long, default_value = "4")]
        related: usize,
    },
    /// List categories.
    Categories,
}

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    #[command(subcommand)]
    pub command: ValidateCommand,
}

#[derive(Subcommand)]
pub enum ValidateCommand {
    /// Check an email address.
    Email { value: String },
    /// Check a phone number.
    Phone { value: String },
    /// Check an absolute URL.
    Url { value: String },
    /// Check checkout shipping details given as field=value pairs.
    Address {
        /// Fields, e.g. `full_name="Ada Lovelace" city=London`.
        #[arg(required = true)]
        fields: Vec<String>,
    },
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Print the path of the config file in use.
    Path,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
