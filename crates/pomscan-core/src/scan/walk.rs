//! Archive discovery.

use pomscan_schema::ARCHIVE_EXTENSION;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A `.jar` found under a scan root, not yet hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredArchive {
    /// Full path on disk.
    pub path: PathBuf,
    /// Path relative to the scan root.
    pub relative: String,
    /// File name.
    pub filename: String,
}

/// Walk `root` depth-first and yield every file whose name ends in `.jar`.
///
/// Entries are visited in file-name order so repeated runs discover archives
/// in the same sequence. Directories (including ones named `*.jar`) and other
/// files are skipped. Walk errors are yielded as they occur; the caller
/// decides whether to stop.
pub fn discover_archives(
    root: &Path,
) -> impl Iterator<Item = Result<DiscoveredArchive, walkdir::Error>> + use<> {
    let root_buf = root.to_path_buf();
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(move |entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e)),
            };
            if entry.file_type().is_dir() {
                return None;
            }

            let filename = entry.file_name().to_string_lossy().into_owned();
            if !filename.ends_with(ARCHIVE_EXTENSION) {
                return None;
            }

            let relative = entry
                .path()
                .strip_prefix(&root_buf)
                .map(|p| p.to_string_lossy().into_owned())
                .ok()
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| filename.clone());

            Some(Ok(DiscoveredArchive {
                path: entry.into_path(),
                relative,
                filename,
            }))
        })
}
