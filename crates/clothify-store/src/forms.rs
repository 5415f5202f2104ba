//! Form schemas for checkout and vendor submissions.

use clothify_commerce::checkout::ShippingAddress;
use clothify_forms::{FieldRules, FormSchema, RuleKind};
use regex::Regex;
use std::sync::LazyLock;

static POSTAL_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 \-]{1,9}$").expect("postal code regex is valid")
});

pub const MAX_SIZE_LABEL_CHARS: usize = 10;

/// Shipping details collected at checkout.
pub fn checkout_form() -> FormSchema {
    FormSchema::new()
        .field("full_name", FieldRules::new().required().min_length(2).max_length(100))
        .field("email", FieldRules::new().required().email())
        .field("phone", FieldRules::new().phone())
        .field("address1", FieldRules::new().required().min_length(5).max_length(200))
        .field("address2", FieldRules::new().max_length(200))
        .field("city", FieldRules::new().required().max_length(100))
        .field("state", FieldRules::new().max_length(100))
        .field(
            "postal_code",
            FieldRules::new()
                .required()
                .with_regex(POSTAL_CODE.clone())
                .message(RuleKind::Pattern, "Please enter a valid postal code"),
        )
        .field("country", FieldRules::new().required().min_length(2).max_length(56))
}

/// Field values of `address` as [`checkout_form`] names them.
pub fn address_values(address: &ShippingAddress) -> Vec<(&'static str, String)> {
    vec![
        ("full_name", address.full_name.clone()),
        ("email", address.email.clone()),
        ("phone", address.phone.clone().unwrap_or_default()),
        ("address1", address.address1.clone()),
        ("address2", address.address2.clone().unwrap_or_default()),
        ("city", address.city.clone()),
        ("state", address.state.clone().unwrap_or_default()),
        ("postal_code", address.postal_code.clone()),
        ("country", address.country.clone()),
    ]
}

/// A vendor's product submission.
pub fn vendor_product_form() -> FormSchema {
    FormSchema::new()
        .field("name", FieldRules::new().required().min_length(3).max_length(100))
        .field("description", FieldRules::new().max_length(2000))
        .field(
            "price",
            FieldRules::new()
                .required()
                .min(0.01)
                .max(100_000.0)
                .message(RuleKind::Min, "Price must be greater than zero"),
        )
        .field("category", FieldRules::new().required().max_length(50))
        .field("sizes", FieldRules::new().custom(check_sizes))
        .field("image_url", FieldRules::new().url())
}

/// The note an admin leaves when rejecting a product.
pub fn rejection_form() -> FormSchema {
    FormSchema::new().field(
        "note",
        FieldRules::new()
            .required()
            .min_length(5)
            .max_length(500)
            .message(RuleKind::Required, "Tell the vendor why the product was rejected"),
    )
}

/// Comma-separated size labels, each non-empty and short.
fn check_sizes(value: &str) -> Option<String> {
    let labels: Vec<&str> = value.split(',').map(str::trim).collect();
    if labels.iter().any(|label| label.is_empty()) {
        return Some("Sizes must be separated by single commas".into());
    }
    labels
        .iter()
        .find(|label| label.chars().count() > MAX_SIZE_LABEL_CHARS)
        .map(|label| format!("Size \"{}\" is too long", label))
}
