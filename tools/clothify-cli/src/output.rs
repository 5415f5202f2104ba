//! Output formatting for the CLI.

use clothify_commerce::catalog::{ModerationStatus, Product};
use console::style;

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(&self, item: &str) {
        if self.json {
            return;
        }
        println!("  {} {}", style("•").dim(), item);
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| format!("{:width$}", truncate(col, *width), width = width))
            .collect();
        println!("  {}", formatted.join("  "));
    }

    /// Print one product as a table row.
    pub fn product_row(&self, product: &Product) {
        let rating = if product.review_count > 0 {
            format!("{:.1} ({})", product.rating, product.review_count)
        } else {
            "-".to_string()
        };
        self.table_row(
            &[
                product.id.as_str(),
                &product.name,
                &product.category,
                &price_label(product),
                &rating,
                if product.in_stock { "in stock" } else { "sold out" },
            ],
            &PRODUCT_COLUMNS,
        );
    }

    /// Print the header row for [`Output::product_row`].
    pub fn product_header(&self) {
        if self.json {
            return;
        }
        let cols = ["ID", "NAME", "CATEGORY", "PRICE", "RATING", "STOCK"];
        let formatted: Vec<String> = cols
            .iter()
            .zip(PRODUCT_COLUMNS.iter())
            .map(|(col, width)| format!("{:width$}", col, width = width))
            .collect();
        println!("  {}", style(formatted.join("  ")).dim());
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

const PRODUCT_COLUMNS: [usize; 6] = [4, 26, 12, 20, 10, 12];

/// Price, with the discount when marked down.
pub fn price_label(product: &Product) -> String {
    match product.discount_percentage() {
        Some(pct) => format!("{} (-{}%)", product.price.display(), pct),
        None => product.price.display(),
    }
}

/// Status badge for stock.
pub fn stock_badge(in_stock: bool) -> String {
    if in_stock {
        style("in stock").green().to_string()
    } else {
        style("sold out").red().to_string()
    }
}

/// Status badge for moderation states.
pub fn moderation_badge(status: ModerationStatus) -> String {
    match status {
        ModerationStatus::Approved => style(status.as_str()).green().to_string(),
        ModerationStatus::Pending => style(status.as_str()).yellow().to_string(),
        ModerationStatus::Rejected => style(status.as_str()).red().to_string(),
    }
}

/// Format a search time given in microseconds.
pub fn format_micros(us: u64) -> String {
    if us < 1_000 {
        format!("{}µs", us)
    } else if us < 1_000_000 {
        format!("{:.2}ms", us as f64 / 1_000.0)
    } else {
        format!("{:.2}s", us as f64 / 1_000_000.0)
    }
}

/// Cut `s` to `width` characters, marking the cut with an ellipsis.
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width || width == 0 {
        return s.to_string();
    }
    let kept: String = s.chars().take(width - 1).collect();
    format!("{}…", kept)
}
