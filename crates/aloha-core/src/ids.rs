//! Identifier prefixes and generation.
//!
//! Identifiers look like `geo-a3f8b2c1`: a short prefix, a dash and eight
//! lowercase hex characters drawn from the OS random source.

use crate::errors::CoreError;

pub const PREFIX_GEOFENCE: &str = "geo";

/// Number of random bytes behind each identifier (two hex chars per byte).
const RANDOM_BYTES: usize = 4;

/// Generate a fresh prefixed identifier, e.g. `"geo-0c9e41aa"`.
///
/// # Errors
///
/// Returns `CoreError::Other` if the OS random source is unavailable.
pub fn generate(prefix: &str) -> Result<String, CoreError> {
    let mut bytes = [0u8; RANDOM_BYTES];
    getrandom::fill(&mut bytes)
        .map_err(|e| anyhow::anyhow!("failed to generate identifier: {e}"))?;
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    Ok(format!("{prefix}-{hex}"))
}
