//! Scan orchestration: discover jars, hash them, resolve each hash.
//!
//! Each archive moves through `Discovered -> Identified -> Resolved |
//! Unresolved`. Lookup failures only ever make an archive unresolved;
//! filesystem failures abort the root being walked and nothing else.

/// Archive discovery.
pub mod walk;

pub use walk::{DiscoveredArchive, discover_archives};

use crate::config::{MAX_JOBS, ScanConfig};
use crate::digest::sha1_file;
use crate::lookup::{LookupSource, default_sources};
use pomscan_schema::{Coordinate, ScanResult, Sha1Digest};
use reqwest::Client;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Semaphore, mpsc};

/// Errors that abort the scan of one root.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The directory walk failed (missing root, permission denied, ...).
    #[error("Failed to walk {root}: {source}")]
    Walk {
        /// Root being scanned.
        root: PathBuf,
        /// Underlying walk error.
        source: walkdir::Error,
    },

    /// An archive could not be read while hashing.
    #[error("Failed to hash {path}: {source}")]
    Digest {
        /// Archive being hashed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A hashing or aggregation task panicked or was cancelled.
    #[error("Scan task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// A root whose scan was cut short.
#[derive(Debug)]
pub struct RootFailure {
    /// Root as given by the caller.
    pub root: PathBuf,
    /// What stopped the walk.
    pub error: ScanError,
}

/// Aggregated outcome of a scan over one or more roots.
///
/// Serializes to the diagnostic dump layout: `{"basedirs": [...], "results": [...]}`.
#[derive(Debug, Default, Serialize)]
pub struct ScanReport {
    /// Roots in the order they were scanned.
    pub basedirs: Vec<String>,
    /// Every archive examined, in discovery order.
    pub results: Vec<ScanResult>,
    /// Roots that were aborted by a filesystem error.
    #[serde(skip)]
    pub failures: Vec<RootFailure>,
}

impl ScanReport {
    /// Number of archives examined.
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Number of archives a lookup source identified.
    pub fn resolved(&self) -> usize {
        self.results.iter().filter(|r| r.is_resolved()).count()
    }

    /// Resolved coordinates in discovery order, duplicates included.
    pub fn resolution_set(&self) -> Vec<Coordinate> {
        self.results
            .iter()
            .filter_map(|r| r.dependency.clone())
            .collect()
    }

    /// One-line `<resolved>/<total>` summary.
    pub fn summary(&self) -> String {
        format!(
            "{} dependencies out of {} jars",
            self.resolved(),
            self.total()
        )
    }
}

/// Ask each source in turn until one knows this digest.
///
/// A source that errors or has no match never stops the next one from being
/// tried. Returns `None` once every source is exhausted.
pub async fn resolve_digest(
    sources: &[Arc<dyn LookupSource>],
    client: &Client,
    sha1: &Sha1Digest,
) -> Option<Coordinate> {
    for source in sources {
        match source.lookup(client, sha1).await {
            Ok(Some(dep)) => {
                tracing::debug!("[{sha1}] {} -> {dep}", source.name());
                return Some(dep);
            }
            Ok(None) => tracing::debug!("[{sha1}] no match from {}", source.name()),
            Err(e) => tracing::debug!("[{sha1}] {} failed: {e}", source.name()),
        }
    }
    None
}

/// Drives discovery, hashing and lookups for a set of roots.
pub struct Scanner {
    client: Client,
    sources: Arc<[Arc<dyn LookupSource>]>,
    jobs: usize,
}

impl std::fmt::Debug for Scanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.sources.iter().map(|s| s.name()).collect();
        f.debug_struct("Scanner")
            .field("sources", &names)
            .field("jobs", &self.jobs)
            .finish_non_exhaustive()
    }
}

impl Scanner {
    /// Build a scanner with the default source chain and an HTTP client
    /// bounded by the configured per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &ScanConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(crate::USER_AGENT)
            .timeout(config.timeout())
            .build()?;

        Ok(Self::with_sources(client, default_sources(&config.endpoints)).with_jobs(config.jobs))
    }

    /// Build a sequential scanner over an explicit source chain.
    pub fn with_sources(client: Client, sources: Vec<Arc<dyn LookupSource>>) -> Self {
        Self {
            client,
            sources: sources.into(),
            jobs: 1,
        }
    }

    /// Resolve up to `jobs` archives concurrently, clamped to
    /// `1..=`[`MAX_JOBS`].
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.clamp(1, MAX_JOBS);
        self
    }

    /// Scan every root in order.
    ///
    /// A filesystem error aborts only the root it occurred in. Archives that
    /// were fully processed before the error stay in the report.
    pub async fn scan(&self, roots: &[PathBuf]) -> ScanReport {
        let mut report = ScanReport::default();

        for root in roots {
            tracing::debug!("Scanning {}", root.display());
            report.basedirs.push(root.display().to_string());

            let outcome = if self.jobs > 1 {
                self.scan_root_concurrent(root, &mut report.results).await
            } else {
                self.scan_root(root, &mut report.results).await
            };

            if let Err(error) = outcome {
                tracing::debug!("Aborted scan of {}: {error}", root.display());
                report.failures.push(RootFailure {
                    root: root.clone(),
                    error,
                });
            }
        }

        report
    }

    /// Sequential scan: each archive is hashed and resolved before the walk
    /// moves on.
    async fn scan_root(&self, root: &Path, results: &mut Vec<ScanResult>) -> Result<(), ScanError> {
        for archive in discover_archives(root) {
            let archive = archive.map_err(|source| ScanError::Walk {
                root: root.to_path_buf(),
                source,
            })?;
            let sha1 = identify(&archive).await?;

            let dependency = resolve_digest(&self.sources, &self.client, &sha1).await;
            results.push(into_result(archive, sha1, dependency));
        }
        Ok(())
    }

    /// Concurrent scan: the walk and hashing stay sequential, lookups fan out.
    ///
    /// At most `jobs` lookup chains run at once. Workers send
    /// `(discovery index, result)` into a bounded channel drained by a single
    /// aggregator task. The aggregator only finishes once every sender has been
    /// dropped, so no result is lost, and it restores discovery order before
    /// handing the batch back.
    async fn scan_root_concurrent(
        &self,
        root: &Path,
        results: &mut Vec<ScanResult>,
    ) -> Result<(), ScanError> {
        let (tx, mut rx) = mpsc::channel::<(usize, ScanResult)>(self.jobs.saturating_mul(2));

        let aggregator = tokio::spawn(async move {
            let mut collected = Vec::new();
            while let Some(item) = rx.recv().await {
                collected.push(item);
            }
            collected.sort_by_key(|(index, _)| *index);
            collected
                .into_iter()
                .map(|(_, result)| result)
                .collect::<Vec<_>>()
        });

        let semaphore = Arc::new(Semaphore::new(self.jobs));
        let mut outcome = Ok(());

        for (index, archive) in discover_archives(root).enumerate() {
            let archive = match archive {
                Ok(archive) => archive,
                Err(source) => {
                    outcome = Err(ScanError::Walk {
                        root: root.to_path_buf(),
                        source,
                    });
                    break;
                }
            };
            let sha1 = match identify(&archive).await {
                Ok(sha1) => sha1,
                Err(e) => {
                    outcome = Err(e);
                    break;
                }
            };

            // The semaphore is never closed.
            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                break;
            };
            let tx = tx.clone();
            let sources = Arc::clone(&self.sources);
            let client = self.client.clone();

            tokio::spawn(async move {
                let dependency = resolve_digest(&sources, &client, &sha1).await;
                let result = into_result(archive, sha1, dependency);
                if tx.send((index, result)).await.is_err() {
                    tracing::warn!("Aggregator closed before result {index} was delivered");
                }
                drop(permit);
            });
        }

        // Close our end; the aggregator drains until the last worker's sender is gone.
        drop(tx);
        let collected = aggregator.await?;
        results.extend(collected);

        outcome
    }
}

/// Hash an archive on the blocking pool.
async fn identify(archive: &DiscoveredArchive) -> Result<Sha1Digest, ScanError> {
    let path = archive.path.clone();
    let sha1 = tokio::task::spawn_blocking(move || sha1_file(&path))
        .await?
        .map_err(|source| ScanError::Digest {
            path: archive.path.clone(),
            source,
        })?;

    tracing::debug!("{sha1} <- {}", archive.filename);
    Ok(sha1)
}

fn into_result(
    archive: DiscoveredArchive,
    sha1: Sha1Digest,
    dependency: Option<Coordinate>,
) -> ScanResult {
    ScanResult {
        path: archive.relative,
        filename: archive.filename,
        sha1,
        dependency,
    }
}
