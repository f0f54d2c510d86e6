use async_trait::async_trait;
use pomscan_schema::{Coordinate, SchemaError, Sha1Digest};
use reqwest::{Client, StatusCode};
use thiserror::Error;

/// Why a lookup source could not answer.
///
/// None of these are fatal to a scan: the scanner logs them and moves on to
/// the next source, exactly as it does for a clean "no match".
#[derive(Error, Debug)]
pub enum LookupError {
    /// Network failure, timeout, or an unreadable response body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with something other than `200 OK`.
    #[error("Expected 200 got {status} for {url}")]
    Status {
        /// Request URL.
        url: String,
        /// Status returned by the service.
        status: StatusCode,
    },

    /// The response body is not the JSON shape this source expects.
    #[error("Failed to parse JSON for {url}: {source}")]
    Parse {
        /// Request URL.
        url: String,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// A matching record could not be turned into a coordinate.
    #[error("Unusable record from {url}: {source}")]
    Record {
        /// Request URL.
        url: String,
        /// Why the record was rejected.
        source: SchemaError,
    },
}

/// A remote metadata service that maps an archive digest to the published
/// artifact carrying it (e.g. Maven Central, an Artifactory instance).
#[async_trait]
pub trait LookupSource: Send + Sync {
    /// Short identifier for this source instance, used in logs (e.g. "central")
    fn name(&self) -> &str;

    /// Ask the service which artifact has this SHA1.
    ///
    /// Issues exactly one HTTP request. `Ok(None)` means the service answered
    /// and has nothing usable for this digest.
    async fn lookup(
        &self,
        client: &Client,
        sha1: &Sha1Digest,
    ) -> Result<Option<Coordinate>, LookupError>;
}
