//! Lookup sources: metadata services that can identify a jar by its SHA1.
//!
//! Every source implements [`LookupSource`]. The scanner consults them in the
//! order returned by [`default_sources`], stopping at the first match.

/// Spring and JFrog Artifactory checksum search.
pub mod artifactory;
/// Maven Central solr search.
pub mod central;
/// JBoss Nexus lucene search.
pub mod nexus;
/// Shared trait and error type for lookup sources.
pub mod traits;

pub use artifactory::ArtifactorySearch;
pub use central::CentralSearch;
pub use nexus::NexusSearch;
pub use traits::{LookupError, LookupSource};

use crate::config::SourceEndpoints;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Build the lookup chain in priority order: Maven Central, JBoss, Spring,
/// JFrog.
///
/// Central is the most authoritative and answers most queries, so it goes
/// first. Only the endpoint URLs come from configuration.
pub fn default_sources(endpoints: &SourceEndpoints) -> Vec<Arc<dyn LookupSource>> {
    vec![
        Arc::new(CentralSearch::new(&endpoints.central)),
        Arc::new(NexusSearch::new("jboss", &endpoints.jboss)),
        Arc::new(ArtifactorySearch::new("spring", &endpoints.spring)),
        Arc::new(ArtifactorySearch::new("jfrog", &endpoints.jfrog)),
    ]
}

/// Check for `200 OK` and decode the JSON body.
///
/// The body is read as text first so a malformed payload is reported as
/// [`LookupError::Parse`] rather than a transport error.
async fn read_json<T: DeserializeOwned>(
    resp: reqwest::Response,
    url: &str,
) -> Result<T, LookupError> {
    let status = resp.status();
    if status != reqwest::StatusCode::OK {
        return Err(LookupError::Status {
            url: url.to_string(),
            status,
        });
    }

    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|source| LookupError::Parse {
        url: url.to_string(),
        source,
    })
}
