//! Error types for fingerprinting.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from fingerprinting an input.
///
/// A missing input is not represented here: absence is a valid
/// [`Fingerprint`](super::Fingerprint) value, not a failure.
#[derive(Debug, Error)]
pub enum FingerprintError {
    /// The input exists but could not be read.
    #[error("failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FingerprintError {
    pub(crate) fn read(path: &Path, source: std::io::Error) -> Self {
        FingerprintError::Read {
            path: path.to_path_buf(),
            source,
        }
    }
}
