//! pomscan - rebuild a Maven `pom.xml` from a directory of jars
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
//!
//! Every `*.jar` under the given directories is hashed (SHA1) and looked up
//! in Maven Central, JBoss Nexus, Spring Artifactory and JFrog OSS, in that
//! order. Whatever resolves ends up as a `<dependency>` in the generated POM.

pub mod cmd;

use anyhow::{Context, Result};
use clap::Parser;
use pomscan_core::config::ConfigFile;
use pomscan_core::ScanConfig;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "pomscan")]
#[command(author, version, about = "Rebuild a pom.xml from a directory of jars")]
pub struct Cli {
    /// Directories (or single jars) to scan
    #[arg(required = true, value_name = "DIR")]
    pub dirs: Vec<PathBuf>,

    /// Print debug messages and write a JSON dump of every scanned jar
    #[arg(short = 'd', long = "debug", visible_alias = "verbose", visible_short_alias = 'v')]
    pub verbose: bool,

    /// Output file name [default: pom.xml]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// groupId of the generated project
    #[arg(long, value_name = "ID")]
    pub group_id: Option<String>,

    /// artifactId of the generated project
    #[arg(long, value_name = "ID")]
    pub artifact_id: Option<String>,

    /// version of the generated project
    #[arg(long, value_name = "VERSION")]
    pub project_version: Option<String>,

    /// Number of jars to resolve concurrently [default: 1]
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Per-request timeout for lookup services, in seconds [default: 5]
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Where to write the debug dump [default: debug.json]
    #[arg(long, value_name = "FILE")]
    pub debug_file: Option<PathBuf>,

    /// TOML config file with [project], [sources] and [scan] sections
    #[arg(short, long, value_name = "FILE", env = "POMSCAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Maven Central search endpoint
    #[arg(long, value_name = "URL", env = "POMSCAN_CENTRAL_URL", hide = true)]
    pub central_url: Option<String>,

    /// JBoss Nexus search endpoint
    #[arg(long, value_name = "URL", env = "POMSCAN_JBOSS_URL", hide = true)]
    pub jboss_url: Option<String>,

    /// Spring Artifactory checksum search endpoint
    #[arg(long, value_name = "URL", env = "POMSCAN_SPRING_URL", hide = true)]
    pub spring_url: Option<String>,

    /// JFrog OSS Artifactory checksum search endpoint
    #[arg(long, value_name = "URL", env = "POMSCAN_JFROG_URL", hide = true)]
    pub jfrog_url: Option<String>,
}

impl Cli {
    /// Merge defaults, the config file and flags (in that order of precedence,
    /// lowest first) into the run configuration.
    pub fn into_config(self) -> Result<(Vec<PathBuf>, ScanConfig)> {
        let mut config = ScanConfig {
            verbose: self.verbose,
            ..ScanConfig::default()
        };

        if let Some(path) = &self.config {
            let file = ConfigFile::load(path)?;
            config.apply_file(file);
        }

        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(debug_file) = self.debug_file {
            config.debug_file = debug_file;
        }
        if let Some(group_id) = self.group_id {
            config.project.group_id = group_id;
        }
        if let Some(artifact_id) = self.artifact_id {
            config.project.artifact_id = artifact_id;
        }
        if let Some(version) = self.project_version {
            config.project.version = version;
        }
        if let Some(jobs) = self.jobs {
            config.jobs = jobs;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }

        let endpoints = &mut config.endpoints;
        for (flag, slot) in [
            (self.central_url, &mut endpoints.central),
            (self.jboss_url, &mut endpoints.jboss),
            (self.spring_url, &mut endpoints.spring),
            (self.jfrog_url, &mut endpoints.jfrog),
        ] {
            if let Some(url) = flag {
                *slot = url;
            }
        }

        config.validate().context("Invalid options")?;
        Ok((self.dirs, config))
    }
}
