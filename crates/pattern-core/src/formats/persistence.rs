//! # Snapshot Format
//!
//! Binary serialization for whole catalogs, used by the file backend and by
//! export/import.
//!
//! Format: Header (5 bytes) + postcard-encoded `Vec<CodePatternRecord>`.
//! - 4 bytes: Magic ("PVLT")
//! - 1 byte: Version
//!
//! Size and header are validated before the payload is decoded.

use crate::{CodePatternRecord, PatternError, primitives};

/// Maximum accepted snapshot size (256 MiB), checked before decoding.
pub const MAX_SNAPSHOT_SIZE: usize = 256 * 1024 * 1024;

/// Header length in bytes.
const HEADER_LEN: usize = 5;

// =============================================================================
// FILE HEADER
// =============================================================================

/// The snapshot header precedes all record data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl SnapshotHeader {
    /// Header for the current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *primitives::MAGIC_BYTES,
            version: primitives::FORMAT_VERSION,
        }
    }

    /// Validate magic bytes and version.
    pub fn validate(&self) -> Result<(), PatternError> {
        if &self.magic != primitives::MAGIC_BYTES {
            return Err(PatternError::SerializationError(
                "Invalid magic bytes".to_string(),
            ));
        }
        if self.version != primitives::FORMAT_VERSION {
            return Err(PatternError::SerializationError(format!(
                "Unsupported snapshot version: {} (expected {})",
                self.version,
                primitives::FORMAT_VERSION
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PatternError> {
        if bytes.len() < HEADER_LEN {
            return Err(PatternError::SerializationError(
                "Header too short".to_string(),
            ));
        }
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[0..4]);
        Ok(Self {
            magic,
            version: bytes[4],
        })
    }
}

impl Default for SnapshotHeader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// SERIALIZATION FUNCTIONS
// =============================================================================

/// Encode records into a snapshot (header + payload).
pub fn snapshot_to_bytes(records: &[CodePatternRecord]) -> Result<Vec<u8>, PatternError> {
    let payload = postcard::to_stdvec(records)
        .map_err(|e| PatternError::SerializationError(e.to_string()))?;

    let mut result = Vec::with_capacity(HEADER_LEN + payload.len());
    result.extend_from_slice(&SnapshotHeader::new().to_bytes());
    result.extend_from_slice(&payload);
    Ok(result)
}

/// Decode a snapshot produced by `snapshot_to_bytes`.
pub fn snapshot_from_bytes(bytes: &[u8]) -> Result<Vec<CodePatternRecord>, PatternError> {
    if bytes.len() < HEADER_LEN {
        return Err(PatternError::SerializationError(format!(
            "Data too short: minimum {} bytes required",
            HEADER_LEN
        )));
    }
    if bytes.len() > MAX_SNAPSHOT_SIZE {
        return Err(PatternError::SerializationError(format!(
            "Snapshot size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_SNAPSHOT_SIZE
        )));
    }

    SnapshotHeader::from_bytes(bytes)?.validate()?;

    postcard::from_bytes(&bytes[HEADER_LEN..]).map_err(|e| {
        PatternError::SerializationError(format!("Failed to decode snapshot records: {}", e))
    })
}

// =============================================================================
// TESTS
// =============================================================================
