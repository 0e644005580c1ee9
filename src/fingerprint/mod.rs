//! Content fingerprinting and change detection.
//!
//! A fingerprint is a SHA-256 digest of an input's bytes, or a distinguished
//! absent value when the input does not exist. Fingerprints are the trigger
//! mechanism for reconciliation: when any tracked input's current digest
//! differs from the one recorded last time, the dependent remote mutation
//! must be re-issued.

mod error;


pub use error::FingerprintError;

use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

/// Digest of an input's content, or `Absent` when the input does not exist.
///
/// A digest is a pure function of the bytes: metadata and timestamps never
/// contribute, so identical content always yields an identical fingerprint.
/// Absence is a valid observation, distinguishable from every digest, and is
/// not an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Fingerprint {
    /// The addressed input does not exist.
    Absent,
    /// Lowercase hex SHA-256 of the input's bytes.
    Digest(String),
}

impl Fingerprint {
    /// Fingerprint a file's content, streaming it through the digest.
    ///
    /// A missing file yields `Ok(Fingerprint::Absent)`. An existing but
    /// unreadable path (a directory, missing permissions) is an error and
    /// must not be confused with absence.
    pub fn of_file(path: impl AsRef<Path>) -> Result<Self, FingerprintError> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Fingerprint::Absent),
            Err(err) => return Err(FingerprintError::read(path, err)),
        };

        let mut hasher = Sha256::new();
        io::copy(&mut BufReader::new(file), &mut hasher)
            .map_err(|err| FingerprintError::read(path, err))?;
        Ok(Fingerprint::Digest(to_hex(&hasher.finalize())))
    }

    /// Fingerprint in-memory content.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Fingerprint::Digest(to_hex(&Sha256::digest(bytes)))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Fingerprint::Absent)
    }

    /// The hex digest, or `None` for an absent input.
    pub fn as_hex(&self) -> Option<&str> {
        match self {
            Fingerprint::Absent => None,
            Fingerprint::Digest(hex) => Some(hex),
        }
    }

    /// Pure comparison against a previously stored fingerprint. No I/O.
    pub fn differs_from(&self, stored: &Fingerprint) -> bool {
        self != stored
    }
}

fn to_hex(digest: &[u8]) -> String {
    digest
        .iter()
        .fold(String::with_capacity(digest.len() * 2), |mut hex, byte| {
            let _ = write!(hex, "{byte:02x}");
            hex
        })
}

/// Change-detection gate over tracked inputs.
///
/// Recomputes the fingerprint of each `(path, stored)` pair and reports
/// whether any current value differs from its stored one. A fingerprinting
/// error (not absence) propagates instead of being treated as "no change",
/// so the caller reports it rather than reconcile against stale data.
pub fn any_changed<'a, P, I>(tracked: I) -> Result<bool, FingerprintError>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = (P, &'a Fingerprint)>,
{
    for (path, stored) in tracked {
        let current = Fingerprint::of_file(path.as_ref())?;
        if current.differs_from(stored) {
            tracing::debug!(path = %path.as_ref().display(), "tracked input changed");
            return Ok(true);
        }
    }
    Ok(false)
}
