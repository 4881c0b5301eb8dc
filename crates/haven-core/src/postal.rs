//! Postal-code validation and canonicalization.
//!
//! Supports exactly two formats: US ZIP codes (`12345` or `12345-6789`) and
//! Canadian postal codes (`A1A 1A1`). Classification is driven entirely by
//! which pattern the cleaned input matches; a caller-supplied country hint is
//! advisory and never changes the outcome.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static US_ZIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}(?:-\d{4})?$").expect("valid regex"));
static CA_POSTAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][0-9][A-Z][ -]?[0-9][A-Z][0-9]$").expect("valid regex"));

/// Countries with a supported postal-code format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Country {
    Us,
    Ca,
}

impl std::fmt::Display for Country {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Country::Us => write!(f, "US"),
            Country::Ca => write!(f, "CA"),
        }
    }
}

/// A validated, canonicalized postal code.
///
/// `normalized` matches exactly one of the two canonical formats and `country`
/// is derived from which format matched — never from user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedCode {
    pub raw: String,
    pub normalized: String,
    pub country: Country,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PostalError {
    #[error("unrecognized postal code format: {raw:?}")]
    InvalidFormat { raw: String },
}

/// Validate and canonicalize a raw postal-code string.
///
/// Cleaning: trim, uppercase, collapse internal whitespace runs to single
/// spaces. US ZIPs keep their cleaned form (`12345` / `12345-6789`); Canadian
/// codes are reassembled as `A1A 1A1` regardless of the separator used.
///
/// The `hint` never overrides a failed match and never contradicts a matched
/// format — the matched pattern alone decides the country.
///
/// Pure and deterministic; no I/O.
///
/// # Errors
///
/// Returns [`PostalError::InvalidFormat`] when the cleaned input matches
/// neither supported format.
pub fn normalize(raw: &str, hint: Option<Country>) -> Result<NormalizedCode, PostalError> {
    // Format wins over the hint, so the hint is deliberately unused.
    let _ = hint;

    let cleaned = raw
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase();

    if US_ZIP_RE.is_match(&cleaned) {
        return Ok(NormalizedCode {
            raw: raw.to_owned(),
            normalized: cleaned,
            country: Country::Us,
        });
    }

    if CA_POSTAL_RE.is_match(&cleaned) {
        let compact: String = cleaned.chars().filter(char::is_ascii_alphanumeric).collect();
        return Ok(NormalizedCode {
            raw: raw.to_owned(),
            normalized: format!("{} {}", &compact[..3], &compact[3..]),
            country: Country::Ca,
        });
    }

    Err(PostalError::InvalidFormat {
        raw: raw.to_owned(),
    })
}
