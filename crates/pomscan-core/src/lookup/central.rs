use async_trait::async_trait;
use pomscan_schema::{Coordinate, Sha1Digest};
use reqwest::Client;
use serde::Deserialize;

use super::{LookupError, LookupSource, read_json};

// {"responseHeader":{...},"response":{"numFound":1,"start":0,"docs":[
//   {"id":"commons-codec:commons-codec:1.5","g":"commons-codec","a":"commons-codec",
//    "v":"1.5","p":"jar","timestamp":1301016846000,"ec":[".jar",".pom"]}]}}

#[derive(Debug, Deserialize)]
struct SolrEnvelope {
    response: SolrResponse,
}

#[derive(Debug, Deserialize)]
struct SolrResponse {
    #[serde(rename = "numFound")]
    num_found: u64,
    #[serde(default)]
    docs: Vec<SolrDoc>,
}

#[derive(Debug, Deserialize)]
struct SolrDoc {
    g: String,
    a: String,
    v: String,
    #[serde(default)]
    p: String,
}

/// Maven Central's solr search, queried by exact SHA1 (`q=1:"<sha1>"`).
///
/// Central ranks results itself (score, then timestamp descending, then
/// group/artifact). The first `jar`-packaged doc in that order is taken as is.
#[derive(Debug, Clone)]
pub struct CentralSearch {
    endpoint: String,
}

impl CentralSearch {
    /// Create a source querying the given `select` endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl LookupSource for CentralSearch {
    fn name(&self) -> &'static str {
        "central"
    }

    async fn lookup(
        &self,
        client: &Client,
        sha1: &Sha1Digest,
    ) -> Result<Option<Coordinate>, LookupError> {
        let query = format!("1:\"{sha1}\"");
        let resp = client
            .get(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[("q", query.as_str()), ("rows", "20"), ("wt", "json")])
            .send()
            .await?;

        let envelope: SolrEnvelope = read_json(resp, &self.endpoint).await?;
        let response = envelope.response;
        if response.num_found == 0 {
            return Ok(None);
        }

        let dep = response
            .docs
            .into_iter()
            .find(|doc| doc.p == "jar")
            .map(|doc| Coordinate::new(doc.g, doc.a, doc.v));

        if let Some(dep) = &dep {
            tracing::debug!("From central : {dep}");
        }
        Ok(dep)
    }
}
