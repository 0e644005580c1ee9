//! Cloudplane - client for asynchronously provisioned cloud platform objects
//!
//! This library drives client-visible resources (tenant billing policies,
//! imported solutions) to match server-side objects whose state transitions
//! happen out-of-band. A submitted operation returns immediately with a
//! pending status; the client polls until a terminal state appears, bounded
//! by one caller-supplied deadline, and uses content fingerprints to decide
//! whether a remote mutation must be re-issued at all.

pub mod api;
pub mod config;
pub mod fingerprint;
pub mod licensing;
pub mod lro;
pub mod solution;
