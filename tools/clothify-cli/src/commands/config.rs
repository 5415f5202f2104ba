//! Configuration management commands.

use anyhow::{bail, Context as _, Result};
use clothify_store::config::CONFIG_FILE_NAMES;
use clothify_store::StoreConfig;

use super::{ConfigArgs, ConfigCommand};
use crate::context::Context;

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Path => show_path(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        let mut config = ctx.config.clone();
        config.database.anon_key = config.database.anon_key.as_deref().map(mask);
        ctx.output.json(&config);
        return Ok(());
    }

    let config = &ctx.config;
    ctx.output.header("Current Configuration");

    ctx.output.info("");
    ctx.output.info("[database]");
    match &config.database.url {
        Some(url) => ctx.output.kv("url", url),
        None => ctx.output.kv("url", "(unset, using the built-in catalog)"),
    }
    if let Some(key) = &config.database.anon_key {
        ctx.output.kv("anon_key", &mask(key));
    }
    ctx.output.kv(
        "request_cache_ttl_secs",
        &config.database.request_cache_ttl_secs.to_string(),
    );
    ctx.output
        .kv("timeout_secs", &config.database.timeout_secs.to_string());

    ctx.output.info("");
    ctx.output.info("[search]");
    ctx.output
        .kv("debounce_ms", &config.search.debounce_ms.to_string());
    ctx.output.kv("per_page", &config.search.per_page.to_string());

    ctx.output.info("");
    ctx.output.info("[pricing]");
    let currency = config.pricing.currency;
    ctx.output.kv("currency", currency.code());
    ctx.output.kv(
        "flat_shipping",
        &clothify_commerce::Money::new(config.pricing.flat_shipping_cents, currency).display(),
    );
    match config.pricing.free_shipping_threshold_cents {
        Some(cents) => ctx.output.kv(
            "free_shipping_threshold",
            &clothify_commerce::Money::new(cents, currency).display(),
        ),
        None => ctx.output.kv("free_shipping_threshold", "none"),
    }
    ctx.output
        .kv("tax_rate_percent", &config.pricing.tax_rate_percent.to_string());

    ctx.output.info("");
    ctx.output.info("[storage]");
    match &config.storage.path {
        Some(path) => ctx.output.kv("path", &path.display().to_string()),
        None => ctx.output.kv("path", "(unset, in memory)"),
    }

    Ok(())
}

fn show_path(ctx: &Context) -> Result<()> {
    let Some(path) = &ctx.config_path else {
        bail!("No config file found. Run `clothify config init` to create one.");
    };
    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "path": path }));
    } else {
        println!("{}", path.display());
    }
    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_FILE_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    StoreConfig::default()
        .save(&config_path)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    ctx.output
        .success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = check(&ctx.config);

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}

/// Errors and warnings for a configuration.
fn check(config: &StoreConfig) -> (Vec<String>, Vec<String>) {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    let db = &config.database;
    match (&db.url, &db.anon_key) {
        (Some(url), Some(_)) => {
            if !clothify_forms::is_valid_url(url) {
                errors.push(format!("database.url '{}' is not an absolute URL", url));
            } else if !url.starts_with("https://") {
                warnings.push("database.url should use https".to_string());
            }
        }
        (Some(_), None) => errors.push("database.anon_key is required with database.url".to_string()),
        (None, Some(_)) => warnings.push("database.anon_key is set without database.url".to_string()),
        (None, None) => {}
    }
    if db.timeout_secs == 0 {
        errors.push("database.timeout_secs must be greater than 0".to_string());
    }

    if config.search.per_page == 0 {
        errors.push("search.per_page must be greater than 0".to_string());
    }
    if config.search.debounce_ms > 5_000 {
        warnings.push(format!(
            "search.debounce_ms {} is long enough to feel unresponsive",
            config.search.debounce_ms
        ));
    }

    let pricing = &config.pricing;
    if pricing.flat_shipping_cents < 0 {
        errors.push("pricing.flat_shipping_cents must not be negative".to_string());
    }
    if pricing.free_shipping_threshold_cents.is_some_and(|c| c < 0) {
        errors.push("pricing.free_shipping_threshold_cents must not be negative".to_string());
    }
    if !(0.0..=100.0).contains(&pricing.tax_rate_percent) {
        errors.push("pricing.tax_rate_percent must be 0-100".to_string());
    }

    (errors, warnings)
}

/// Keep the first and last four characters of a key.
fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}
