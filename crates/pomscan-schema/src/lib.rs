//! Shared data model for pomscan.
//!
//! These types are produced by the scanner in `pomscan-core` and consumed by
//! the POM emitter and the diagnostic dump. Nothing here touches the network
//! or the filesystem.

pub mod hash;
pub mod types;

// Re-exports
pub use hash::*;
pub use types::*;

/// File extension identifying a candidate archive.
pub const ARCHIVE_EXTENSION: &str = ".jar";

/// Errors raised while constructing schema values from untrusted input.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The digest string is not 40 hex characters.
    #[error("Invalid SHA1 digest: {0}")]
    InvalidDigest(String),

    /// A repository directory path is too short to hold a coordinate.
    #[error("Cannot derive coordinate from path '{0}': expected <group>/<artifact>/<version>")]
    InvalidDirPath(String),
}
