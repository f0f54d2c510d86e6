//! Core library for pomscan.
//!
//! Reconstructs a Maven dependency list for a directory of jars:
//!
//! 1. [`scan`] walks the input roots and finds `*.jar` files.
//! 2. [`digest`] computes each archive's SHA1.
//! 3. [`lookup`] asks each metadata service, in a fixed order, which published
//!    artifact carries that SHA1. The first match wins.
//! 4. [`pom`] renders the resolved coordinates as a `pom.xml`.

pub mod config;
pub mod digest;
pub mod lookup;
pub mod pom;
pub mod scan;

pub use config::{ScanConfig, SourceEndpoints};
pub use lookup::{LookupError, LookupSource, default_sources};
pub use pomscan_schema::{Coordinate, ProjectIdentity, ScanResult, Sha1Digest};
pub use scan::{ScanReport, Scanner};

/// User Agent string sent with every lookup request
pub const USER_AGENT: &str = concat!("pomscan/", env!("CARGO_PKG_VERSION"));
