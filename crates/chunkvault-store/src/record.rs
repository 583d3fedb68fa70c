//! Naming and validation of manifest records shared by the backends.

use chunkvault_core::{FileManifest, MANIFEST_SUFFIX};

use crate::error::{Result, StoreError};

/// Storage name of the record for `filename`.
pub(crate) fn record_name(filename: &str) -> String {
    format!("{}{}", filename, MANIFEST_SUFFIX)
}

/// Decode a record stored under `name`.
///
/// The decoded `filename` must agree with `name`, otherwise two records
/// could claim the same file.
pub(crate) fn decode_record(name: &str, bytes: &[u8]) -> Result<FileManifest> {
    let corrupt = |reason: String| StoreError::ManifestCorrupt {
        name: name.to_string(),
        reason,
    };

    let manifest = FileManifest::from_json(bytes).map_err(|e| corrupt(e.to_string()))?;
    if record_name(manifest.filename()) != name {
        return Err(corrupt(format!(
            "record names file {:?}",
            manifest.filename()
        )));
    }
    Ok(manifest)
}
