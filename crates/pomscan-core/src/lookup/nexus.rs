use async_trait::async_trait;
use pomscan_schema::{Coordinate, Sha1Digest};
use reqwest::Client;
use serde::Deserialize;

use super::{LookupError, LookupSource, read_json};

// {"totalCount":0,"from":-1,"count":-1,"tooManyResults":false,"collapsed":false,
//  "repoDetails":[],"data":[]}

#[derive(Debug, Deserialize)]
struct NexusResponse {
    #[serde(rename = "totalCount")]
    total_count: u64,
    #[serde(default)]
    data: Vec<Coordinate>,
}

/// A Sonatype Nexus 2 lucene search endpoint queried by `?sha1=<sha1>`.
///
/// Nexus has no packaging field in its answer; the first record is taken
/// whenever the total count is positive.
#[derive(Debug, Clone)]
pub struct NexusSearch {
    name: String,
    endpoint: String,
}

impl NexusSearch {
    /// Create a source named `name` querying the given lucene search endpoint.
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl LookupSource for NexusSearch {
    fn name(&self) -> &str {
        &self.name
    }

    async fn lookup(
        &self,
        client: &Client,
        sha1: &Sha1Digest,
    ) -> Result<Option<Coordinate>, LookupError> {
        let resp = client
            .get(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[("sha1", sha1.as_str())])
            .send()
            .await?;

        let response: NexusResponse = read_json(resp, &self.endpoint).await?;
        if response.total_count == 0 {
            return Ok(None);
        }

        let dep = response.data.into_iter().next();
        if let Some(dep) = &dep {
            tracing::debug!("From {} : {dep}", self.name);
        }
        Ok(dep)
    }
}
