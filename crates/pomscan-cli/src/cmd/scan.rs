//! Scan command

use anyhow::{Context, Result};
use pomscan_core::pom::write_pom;
use pomscan_core::{ScanReport, Scanner};
use std::path::Path;

use crate::Cli;

/// Scan the given directories and write the POM.
pub async fn scan(cli: Cli) -> Result<()> {
    let (roots, config) = cli.into_config()?;
    tracing::debug!(
        "debug: {}, outFile: {}, dirs: {}",
        config.verbose,
        config.output.display(),
        roots.len()
    );

    let scanner = Scanner::new(&config).context("Failed to build HTTP client")?;
    let report = scanner.scan(&roots).await;

    for failure in &report.failures {
        eprintln!(
            "warning: stopped scanning {}: {}",
            failure.root.display(),
            failure.error
        );
    }

    // The dump does not depend on whether a POM gets written.
    if config.verbose {
        if let Err(e) = write_debug_dump(&config.debug_file, &report) {
            tracing::warn!("Failed to write {}: {e:#}", config.debug_file.display());
        }
    }

    let deps = report.resolution_set();
    let written = write_pom(&config.output, &config.project, &deps)
        .with_context(|| format!("Failed to open file {}", config.output.display()))?;
    if !written {
        tracing::info!(
            "Nothing resolved, {} not written",
            config.output.display()
        );
    }

    println!("{}", report.summary());
    Ok(())
}

fn write_debug_dump(path: &Path, report: &ScanReport) -> Result<()> {
    let buf = serde_json::to_string_pretty(report).context("Failed to marshal debug results json")?;
    std::fs::write(path, buf)?;
    Ok(())
}
