//! Content identity for archives.
//!
//! Archives are identified by the SHA1 of their bytes, which is what Maven
//! repositories index. The input is streamed so large archives never sit in
//! memory.

use pomscan_schema::Sha1Digest;
use sha1::{Digest, Sha1};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

const BUFFER_SIZE: usize = 64 * 1024;

/// Compute the SHA1 of everything readable from `reader`.
///
/// # Errors
///
/// Returns the underlying I/O error if any read fails. Interrupted reads are
/// retried; a partial stream never yields a digest.
pub fn sha1_reader<R: Read>(mut reader: R) -> io::Result<Sha1Digest> {
    let mut hasher = Sha1::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(Sha1Digest::from_bytes(hasher.finalize()))
}

/// Compute the SHA1 of a file (streaming).
///
/// # Errors
///
/// Returns an I/O error if the file cannot be opened or read.
pub fn sha1_file(path: &Path) -> io::Result<Sha1Digest> {
    let file = File::open(path)?;
    sha1_reader(file)
}
