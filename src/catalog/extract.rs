//! Extraction of JSON fragments embedded in inline script blocks.
//!
//! Detail pages carry their data as object literals assigned inside
//! JavaScript, e.g. `"sku_map": {...}, "has_reviews": ...`. The extractor
//! finds the start marker, then scans to the matching close delimiter.
//! When that fails it falls back to the fixed window between the start
//! and end markers that the page layout has historically used.

use crate::error::ExtractError;
use serde_json::Value;
use tracing::trace;

/// Marker pair and window geometry for one embedded fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FragmentSpec {
    /// Text that precedes the fragment.
    pub start: &'static str,
    /// Text that follows the fragment.
    pub end: &'static str,
    /// Width of the key boilerplate between `start` and the fragment.
    pub offset: usize,
    /// Characters past the beginning of `end` that still belong to the fragment.
    pub suffix: usize,
}

/// Per-variant SKU map on a detail page.
pub const SKU_MAP: FragmentSpec =
    FragmentSpec { start: "sku_map", end: "has_reviews", offset: 10, suffix: 0 };

/// Brand/designer/gender metadata shared by all variants of a product.
pub const PRODUCT_GROUP: FragmentSpec =
    FragmentSpec { start: "productView_id", end: "\"gender\"", offset: 17, suffix: 13 };

/// Characters allowed between a start marker and the opening delimiter.
const KEY_PUNCTUATION: &[char] = &['"', '\'', ':', '=', ' ', '\t', '\r', '\n'];

/// Extracts and parses the fragment described by `spec` from `text`.
pub fn extract_fragment(text: &str, spec: &FragmentSpec) -> Result<Value, ExtractError> {
    let start = text.find(spec.start).ok_or(ExtractError::MarkerNotFound { marker: spec.start })?;

    let after = &text[start + spec.start.len()..];
    let balanced_err = match balanced_slice(after) {
        Some(slice) => match serde_json::from_str(slice) {
            Ok(value) => return Ok(value),
            Err(e) => {
                trace!("Balanced fragment after {:?} is not JSON: {}", spec.start, e);
                Some(e)
            }
        },
        None => None,
    };

    match window_slice(text, start, spec) {
        Ok(window) => serde_json::from_str(window).map_err(|e| ExtractError::Malformed {
            marker: spec.start,
            source: balanced_err.unwrap_or(e),
        }),
        Err(window_err) => Err(match balanced_err {
            Some(source) => ExtractError::Malformed { marker: spec.start, source },
            None => window_err,
        }),
    }
}

/// Returns the object or array literal opening right after the marker.
fn balanced_slice(after: &str) -> Option<&str> {
    let open_at = after.find(|c: char| !KEY_PUNCTUATION.contains(&c))?;
    let open = after[open_at..].chars().next()?;
    if open != '{' && open != '[' {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in after[open_at..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            '}' | ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&after[open_at..=open_at + i]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Fixed window `start + offset .. end + suffix`, trimmed, minus one trailing comma.
fn window_slice<'a>(
    text: &'a str,
    start: usize,
    spec: &FragmentSpec,
) -> Result<&'a str, ExtractError> {
    let from = start + spec.start.len();
    let end = text[from..]
        .find(spec.end)
        .map(|i| from + i)
        .ok_or(ExtractError::MarkerNotFound { marker: spec.end })?;

    let lo = start + spec.offset;
    let hi = (end + spec.suffix).min(text.len());
    let window =
        text.get(lo..hi).ok_or(ExtractError::Unbalanced { marker: spec.start })?.trim();

    Ok(window.strip_suffix(',').unwrap_or(window))
}
