//! Run configuration.
//!
//! A [`ScanConfig`] is assembled once by the caller (the CLI merges flags, the
//! optional TOML config file and defaults) and then passed by reference to the
//! scanner and the POM emitter.

use pomscan_schema::ProjectIdentity;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default Maven Central solr search endpoint.
pub const CENTRAL_URL: &str = "https://search.maven.org/solrsearch/select";
/// Default JBoss Nexus lucene search endpoint.
pub const JBOSS_URL: &str = "https://repository.jboss.org/nexus/service/local/lucene/search";
/// Default Spring Artifactory checksum search endpoint.
pub const SPRING_URL: &str = "https://repo.spring.io/ui/artifactsearch/checksum";
/// Default JFrog OSS Artifactory checksum search endpoint.
pub const JFROG_URL: &str = "https://oss.jfrog.org/ui/artifactsearch/checksum";

/// Default per-request timeout for lookup calls.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Upper bound on concurrent archive resolutions.
pub const MAX_JOBS: usize = 1024;

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema.
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },

    /// A value is out of range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Endpoint URLs for the lookup sources.
///
/// Only the URLs are configurable; the order in which sources are consulted
/// is fixed by [`crate::lookup::default_sources`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceEndpoints {
    /// Maven Central solr search URL.
    pub central: String,
    /// JBoss Nexus lucene search URL.
    pub jboss: String,
    /// Spring Artifactory checksum search URL.
    pub spring: String,
    /// JFrog OSS Artifactory checksum search URL.
    pub jfrog: String,
}

impl Default for SourceEndpoints {
    fn default() -> Self {
        Self {
            central: CENTRAL_URL.to_string(),
            jboss: JBOSS_URL.to_string(),
            spring: SPRING_URL.to_string(),
            jfrog: JFROG_URL.to_string(),
        }
    }
}

/// Everything a scan run needs to know.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Emit diagnostics and write the debug dump.
    pub verbose: bool,
    /// Where the POM is written.
    pub output: PathBuf,
    /// Where the debug dump is written in verbose mode.
    pub debug_file: PathBuf,
    /// Identity of the generated project.
    pub project: ProjectIdentity,
    /// Maximum number of archives resolved concurrently. `1` is fully sequential.
    pub jobs: usize,
    /// Per-request timeout for lookup calls, in seconds.
    pub timeout_secs: u64,
    /// Lookup source endpoints.
    pub endpoints: SourceEndpoints,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            output: PathBuf::from("pom.xml"),
            debug_file: PathBuf::from("debug.json"),
            project: ProjectIdentity::default(),
            jobs: 1,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            endpoints: SourceEndpoints::default(),
        }
    }
}

impl ScanConfig {
    /// Per-request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Fill in any value the config file sets.
    ///
    /// Callers apply command-line overrides after this so flags win over the
    /// file.
    pub fn apply_file(&mut self, file: ConfigFile) {
        if let Some(project) = file.project {
            if let Some(group_id) = project.group_id {
                self.project.group_id = group_id;
            }
            if let Some(artifact_id) = project.artifact_id {
                self.project.artifact_id = artifact_id;
            }
            if let Some(version) = project.version {
                self.project.version = version;
            }
        }
        if let Some(endpoints) = file.sources {
            self.endpoints = endpoints;
        }
        if let Some(scan) = file.scan {
            if let Some(jobs) = scan.jobs {
                self.jobs = jobs;
            }
            if let Some(timeout_secs) = scan.timeout_secs {
                self.timeout_secs = timeout_secs;
            }
        }
    }

    /// Reject values the scanner cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a job count outside
    /// `1..=`[`MAX_JOBS`], a zero timeout, or an empty project identity field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jobs == 0 {
            return Err(ConfigError::Invalid("jobs must be at least 1".into()));
        }
        if self.jobs > MAX_JOBS {
            return Err(ConfigError::Invalid(format!(
                "jobs must be at most {MAX_JOBS}"
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout must be at least 1 second".into()));
        }
        let p = &self.project;
        if p.group_id.is_empty() || p.artifact_id.is_empty() || p.version.is_empty() {
            return Err(ConfigError::Invalid(
                "project groupId, artifactId and version must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// On-disk TOML configuration (`pomscan.toml`).
///
/// ```toml
/// [project]
/// group_id = "com.example"
/// artifact_id = "legacy-app"
/// version = "2.3"
///
/// [sources]
/// central = "https://search.maven.org/solrsearch/select"
///
/// [scan]
/// jobs = 4
/// timeout_secs = 10
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// `[project]` section.
    pub project: Option<ProjectSection>,
    /// `[sources]` section. Missing keys keep their default URL.
    pub sources: Option<SourceEndpoints>,
    /// `[scan]` section.
    pub scan: Option<ScanSection>,
}

/// The `[project]` section of a config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectSection {
    /// Project `groupId`.
    pub group_id: Option<String>,
    /// Project `artifactId`.
    pub artifact_id: Option<String>,
    /// Project `version`.
    pub version: Option<String>,
}

/// The `[scan]` section of a config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanSection {
    /// Concurrent archive resolutions.
    pub jobs: Option<usize>,
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl ConfigFile {
    /// Load and parse a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for
    /// this schema.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse config file contents.
    ///
    /// # Errors
    ///
    /// Returns the TOML deserialization error.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
