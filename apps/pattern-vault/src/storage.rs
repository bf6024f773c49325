//! # Catalog Storage
//!
//! Opens a `Catalog` on the configured backend and writes snapshot files.
//! Shared by the CLI commands and the HTTP server.

use crate::config::{BackendKind, VaultConfig};
use pattern_core::primitives::MAGIC_BYTES;
use pattern_core::{
    Catalog, CodePatternRecord, MAX_SNAPSHOT_SIZE, MemoryStore, PatternError, snapshot_from_bytes,
    snapshot_to_bytes,
};
use std::path::{Path, PathBuf};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum size of a JSON pattern file for `store` (16 MB).
pub const MAX_PATTERN_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Maximum size of an import file, matching the snapshot decode limit.
pub const MAX_IMPORT_FILE_SIZE: u64 = MAX_SNAPSHOT_SIZE as u64;

// =============================================================================
// PATH VALIDATION
// =============================================================================

/// Reject files larger than `max_size` before reading them.
pub fn validate_file_size(path: &Path, max_size: u64) -> Result<(), PatternError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| PatternError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(PatternError::InvalidInput(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Canonicalize an input path and require a regular file.
pub fn validate_file_path(path: &Path) -> Result<PathBuf, PatternError> {
    let canonical = path.canonicalize().map_err(|e| {
        PatternError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(PatternError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }
    Ok(canonical)
}

/// Canonicalize the parent of an output path; the file itself may not exist.
pub fn validate_output_path(path: &Path) -> Result<PathBuf, PatternError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        PatternError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;
    if !canonical_parent.is_dir() {
        return Err(PatternError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| PatternError::IoError("Output path has no filename".to_string()))?;
    Ok(canonical_parent.join(filename))
}

// =============================================================================
// CATALOG OPEN / SAVE
// =============================================================================

/// Open the catalog for the configured backend.
///
/// A missing snapshot file opens as an empty catalog; `save_catalog` creates it.
pub fn open_catalog(config: &VaultConfig) -> Result<Catalog, PatternError> {
    match config.backend {
        BackendKind::Redb => Catalog::with_redb(&config.database),
        BackendKind::Memory => Ok(Catalog::new()),
        BackendKind::File => {
            if !config.database.exists() {
                return Ok(Catalog::new());
            }
            validate_file_size(&config.database, MAX_IMPORT_FILE_SIZE)?;
            let data = std::fs::read(&config.database)
                .map_err(|e| PatternError::IoError(format!("Read snapshot: {}", e)))?;
            let records = snapshot_from_bytes(&data)?;
            Ok(Catalog::with_memory(MemoryStore::from_records(records)?))
        }
    }
}

/// Persist the catalog if its backend needs an explicit write.
///
/// redb commits on every write and memory is never persisted, so only the
/// file backend does work here.
pub fn save_catalog(catalog: &Catalog, config: &VaultConfig) -> Result<(), PatternError> {
    if config.backend != BackendKind::File {
        return Ok(());
    }
    write_snapshot(&catalog.records()?, &config.database)
}

/// Write records as a snapshot file.
pub fn write_snapshot(records: &[CodePatternRecord], path: &Path) -> Result<(), PatternError> {
    let data = snapshot_to_bytes(records)?;
    std::fs::write(path, &data)
        .map_err(|e| PatternError::IoError(format!("Write snapshot: {}", e)))
}

// =============================================================================
// RECORD FILES
// =============================================================================

/// Decode records from a snapshot or a JSON array, detected by magic bytes.
pub fn decode_records(data: &[u8]) -> Result<Vec<CodePatternRecord>, PatternError> {
    if data.starts_with(MAGIC_BYTES) {
        snapshot_from_bytes(data)
    } else {
        serde_json::from_slice(data).map_err(|e| {
            PatternError::SerializationError(format!("Not a snapshot or JSON record list: {}", e))
        })
    }
}

/// Read and decode a record file after path and size checks.
pub fn read_records(path: &Path) -> Result<Vec<CodePatternRecord>, PatternError> {
    let validated = validate_file_path(path)?;
    validate_file_size(&validated, MAX_IMPORT_FILE_SIZE)?;
    let data = std::fs::read(&validated)
        .map_err(|e| PatternError::IoError(format!("Read file: {}", e)))?;
    decode_records(&data)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pattern_core::PatternDraft;
    use tempfile::tempdir;

    fn file_config(path: PathBuf) -> VaultConfig {
        VaultConfig {
            database: path,
            backend: BackendKind::File,
            ..VaultConfig::default()
        }
    }

    #[test]
    fn file_backend_round_trips_through_disk() {
        let dir = tempdir().expect("tempdir");
        let config = file_config(dir.path().join("patterns.snapshot"));

        let mut catalog = open_catalog(&config).expect("open empty");
        catalog
            .submit(&PatternDraft::new("Retry", "x = 1", "retry with backoff"))
            .expect("submit");
        save_catalog(&catalog, &config).expect("save");

        let reopened = open_catalog(&config).expect("reopen");
        assert_eq!(reopened.len().expect("len"), 1);
    }

    #[test]
    fn memory_backend_never_touches_disk() {
        let dir = tempdir().expect("tempdir");
        let config = VaultConfig {
            database: dir.path().join("never.db"),
            backend: BackendKind::Memory,
            ..VaultConfig::default()
        };
        let catalog = open_catalog(&config).expect("open");
        save_catalog(&catalog, &config).expect("save");
        assert!(!config.database.exists());
    }

    #[test]
    fn decode_accepts_json_record_lists() {
        let mut catalog = Catalog::new();
        let record = catalog
            .submit(&PatternDraft::new("Pool", "x = 1", "object pool"))
            .expect("submit");
        let json = serde_json::to_vec(&vec![record.clone()]).expect("json");

        assert_eq!(decode_records(&json).expect("decode"), vec![record]);
        assert!(matches!(
            decode_records(b"garbage"),
            Err(PatternError::SerializationError(_))
        ));
    }

    #[test]
    fn output_path_requires_existing_parent() {
        let dir = tempdir().expect("tempdir");
        assert!(validate_output_path(&dir.path().join("out.pvlt")).is_ok());
        assert!(validate_output_path(&dir.path().join("missing/out.pvlt")).is_err());
    }

    #[test]
    fn oversized_file_rejected() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("big.json");
        std::fs::write(&path, vec![b' '; 64]).expect("write");
        assert!(matches!(
            validate_file_size(&path, 16),
            Err(PatternError::InvalidInput(_))
        ));
    }
}
