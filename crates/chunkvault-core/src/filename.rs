//! Filename sanitization.
//!
//! Filenames key the manifest directory (`<filename>.json`), so anything a
//! client sends is reduced to a single path component first.

use crate::error::{CoreError, Result};

/// Suffix of a manifest record file.
pub const MANIFEST_SUFFIX: &str = ".json";

/// Longest accepted basename, leaving room for [`MANIFEST_SUFFIX`] within
/// the common 255-byte filesystem limit.
pub const MAX_FILENAME_LEN: usize = 255 - MANIFEST_SUFFIX.len();

/// Reduce `raw` to its final path component.
///
/// Both `/` and `\` count as separators. The result is rejected if it is
/// empty, `.` or `..`, contains control characters, or is too long.
pub fn sanitize_filename(raw: &str) -> Result<String> {
    let base = raw.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or_default();

    if base.is_empty() || base == "." || base == ".." {
        return Err(CoreError::InvalidFilename(raw.to_string()));
    }
    if base.chars().any(char::is_control) {
        return Err(CoreError::InvalidFilename(raw.to_string()));
    }
    if base.len() > MAX_FILENAME_LEN {
        return Err(CoreError::InvalidFilename(raw.to_string()));
    }

    Ok(base.to_string())
}
