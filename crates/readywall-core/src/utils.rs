//! Utility functions for the `ReadyWall` admin client

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::path::Path;

/// Resolve an image reference to a fetchable URL
///
/// Absolute `http(s)://` references pass through untouched; bare filenames are
/// percent-encoded and appended to `asset_base`. Empty references resolve to
/// nothing.
#[must_use]
pub fn resolve_image_url(asset_base: &str, reference: &str) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }

    let lower = reference.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Some(reference.to_string());
    }

    Some(format!(
        "{}/{}",
        asset_base.trim_end_matches('/'),
        urlencoding::encode(reference)
    ))
}

/// Reduce an unbounded carousel cursor into `[0, len)`
///
/// Returns `None` for an empty gallery.
#[must_use]
pub fn wrap_index(cursor: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok().filter(|len| *len > 0)?;
    usize::try_from(cursor.rem_euclid(len)).ok()
}

/// Parse a price typed into a form
#[must_use]
pub fn parse_price(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite())
}

/// Parse a stock quantity typed into a form; negative quantities are rejected
#[must_use]
pub fn parse_quantity(input: &str) -> Option<u64> {
    input.trim().parse::<u64>().ok()
}

/// MIME type implied by a file extension, for the image types the gateway stores
#[must_use]
pub fn image_mime_type(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

/// Render a server timestamp in the operator's local time
#[must_use]
pub fn format_local_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%d/%m/%Y, %H:%M:%S")
        .to_string()
}

/// Initials for avatar chips ("Asha Rao" becomes "AR")
#[must_use]
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Deserialize a number that may arrive as a JSON number or a numeric string
///
/// # Errors
///
/// Only fails when the underlying deserializer does; unparseable values become `None`.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => parse_price(&text),
        _ => None,
    })
}

/// Deserialize an integer that may arrive as a JSON number or a numeric string
///
/// # Errors
///
/// Only fails when the underlying deserializer does; unparseable values become `None`.
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(number)) => number.as_i64(),
        Some(Value::String(text)) => text.trim().parse().ok(),
        _ => None,
    })
}
