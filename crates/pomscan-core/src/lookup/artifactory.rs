use async_trait::async_trait;
use pomscan_schema::{ARCHIVE_EXTENSION, Coordinate, Sha1Digest};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{LookupError, LookupSource, read_json};

// {"results":[{"repoKey":"jcenter-cache","name":"poi-ooxml-3.10.1.jar",
//   "relativePath":"org/apache/poi/poi-ooxml/3.10.1/poi-ooxml-3.10.1.jar",
//   "relativeDirPath":"org/apache/poi/poi-ooxml/3.10.1"}],
//  "searchExpression":"0c62b1db67f2a7cafd4dd55c41256a2fa0793191",
//  "message":"Search Results - 1 Items"}

#[derive(Debug, Serialize)]
struct ChecksumQuery<'a> {
    checksum: &'a str,
    search: &'static str,
}

#[derive(Debug, Deserialize)]
struct ArtifactoryResponse {
    #[serde(default)]
    results: Vec<ArtifactoryRecord>,
}

#[derive(Debug, Deserialize)]
struct ArtifactoryRecord {
    name: String,
    #[serde(rename = "relativeDirPath")]
    dir_path: String,
}

/// An Artifactory UI checksum search endpoint.
///
/// The answer lists files rather than coordinates, so the coordinate is read
/// back from the Maven layout of the first jar's directory path.
#[derive(Debug, Clone)]
pub struct ArtifactorySearch {
    name: String,
    endpoint: String,
}

impl ArtifactorySearch {
    /// Create a source named `name` posting checksum searches to `endpoint`.
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl LookupSource for ArtifactorySearch {
    fn name(&self) -> &str {
        &self.name
    }

    async fn lookup(
        &self,
        client: &Client,
        sha1: &Sha1Digest,
    ) -> Result<Option<Coordinate>, LookupError> {
        let query = ChecksumQuery {
            checksum: sha1.as_str(),
            search: "checksum",
        };
        let resp = client
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&query)
            .send()
            .await?;

        let response: ArtifactoryResponse = read_json(resp, &self.endpoint).await?;
        tracing::debug!("{} Response: {} results", self.name, response.results.len());

        let Some(record) = response
            .results
            .into_iter()
            .find(|r| r.name.ends_with(ARCHIVE_EXTENSION))
        else {
            return Ok(None);
        };

        let dep = Coordinate::from_dir_path(&record.dir_path).map_err(|source| {
            LookupError::Record {
                url: self.endpoint.clone(),
                source,
            }
        })?;
        tracing::debug!("From {} : {dep}", self.name);
        Ok(Some(dep))
    }
}
