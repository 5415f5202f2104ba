//! Field validation commands.

use anyhow::{bail, Result};
use clothify_forms::{is_valid_email, is_valid_phone, is_valid_url, FieldErrors};
use clothify_store::checkout_form;

use super::{ValidateArgs, ValidateCommand};
use crate::context::Context;

/// Run the validate command.
pub fn run(args: ValidateArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ValidateCommand::Email { value } => report("email", &value, is_valid_email(&value), ctx),
        ValidateCommand::Phone { value } => report("phone", &value, is_valid_phone(&value), ctx),
        ValidateCommand::Url { value } => report("url", &value, is_valid_url(&value), ctx),
        ValidateCommand::Address { fields } => address(&fields, ctx),
    }
}

fn report(kind: &str, value: &str, valid: bool, ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "kind": kind,
            "value": value,
            "valid": valid,
        }));
    } else if valid {
        ctx.output.success(&format!("Valid {}: {}", kind, value));
    }

    if !valid {
        bail!("Invalid {}: {}", kind, value);
    }
    Ok(())
}

fn address(fields: &[String], ctx: &Context) -> Result<()> {
    let pairs = parse_pairs(fields)?;
    let schema = checkout_form();
    for (name, _) in &pairs {
        if !schema.contains(name) {
            ctx.output.warn(&format!("Ignoring unknown field '{}'", name));
        }
    }

    let borrowed: Vec<(&str, String)> = pairs
        .iter()
        .map(|(name, value)| (name.as_str(), value.clone()))
        .collect();
    let errors: FieldErrors = schema.validate_pairs(&borrowed);

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "valid": errors.is_empty(),
            "errors": errors,
        }));
    } else if errors.is_empty() {
        ctx.output.success("Address is valid");
    } else {
        ctx.output.header("Address has errors");
        for (field, message) in &errors {
            ctx.output.kv(field, message);
        }
    }

    if !errors.is_empty() {
        bail!("Address has {} invalid field(s)", errors.len());
    }
    Ok(())
}

/// Split `name=value` arguments. A repeated name keeps its last value.
fn parse_pairs(fields: &[String]) -> Result<Vec<(String, String)>> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for field in fields {
        let Some((name, value)) = field.split_once('=') else {
            bail!("Expected field=value, got '{}'", field);
        };
        let name = name.trim();
        if name.is_empty() {
            bail!("Missing field name in '{}'", field);
        }
        pairs.retain(|(n, _)| n != name);
        pairs.push((name.to_string(), value.to_string()));
    }
    Ok(pairs)
}
