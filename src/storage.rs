//! Vault storage
//!
//! The vault is a single flat directory; its listing is the only catalog.
//! This module covers everything the handlers need from it: enumeration
//! sorted by recency, size formatting, filename sanitization, and timestamp
//! rendering.

use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local};

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;
const GIB: u64 = 1024 * 1024 * 1024;

/// A stored file as derived from directory metadata.
///
/// The name doubles as the primary key and the on-disk path relative to the
/// vault root. Uniqueness is enforced by the filesystem overwriting
/// same-named files.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub name: String,
    pub size: u64,
    pub modified: SystemTime,
}

/// Enumerate the vault root's direct children, most recently modified first.
///
/// Subdirectories are skipped; nothing in the vault creates them. On
/// failure the entries collected up to that point are returned alongside
/// the error so the caller can still render a partial catalog.
pub fn scan(root: &Path) -> (Vec<StoredFile>, Option<std::io::Error>) {
    let mut files = Vec::new();

    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => return (files, Some(e)),
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => return (sorted(files), Some(e)),
        };
        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => return (sorted(files), Some(e)),
        };
        if !metadata.is_file() {
            continue;
        }
        let modified = match metadata.modified() {
            Ok(t) => t,
            Err(e) => return (sorted(files), Some(e)),
        };
        files.push(StoredFile {
            name: entry.file_name().to_string_lossy().to_string(),
            size: metadata.len(),
            modified,
        });
    }

    (sorted(files), None)
}

fn sorted(mut files: Vec<StoredFile>) -> Vec<StoredFile> {
    // Stable: same-timestamp entries keep their enumeration order
    files.sort_by(|a, b| b.modified.cmp(&a.modified));
    files
}

/// Format a byte count with binary units and two decimal places.
///
/// The largest unit among B/KB/MB/GB where the value is >= 1 is chosen:
/// "512.00 B", "1.00 KB", "2.50 MB", "1.00 GB".
pub fn format_size(bytes: u64) -> String {
    let (size, unit) = if bytes >= GIB {
        (bytes as f64 / GIB as f64, "GB")
    } else if bytes >= MIB {
        (bytes as f64 / MIB as f64, "MB")
    } else if bytes >= KIB {
        (bytes as f64 / KIB as f64, "KB")
    } else {
        (bytes as f64, "B")
    };

    format!("{:.2} {}", size, unit)
}

/// Format a modification time as `YYYY-MM-DD HH:MM:SS` in local time.
pub fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Check a client-supplied filename against the flat vault namespace.
///
/// The vault has no directory hierarchy, so any name that could escape the
/// root or address a subpath is refused: empty names, `.` and `..`, and
/// names containing `/` or `\`. Double quotes are refused too; they would
/// corrupt the quoted filename in the download attachment header.
pub fn sanitize_filename(name: &str) -> crate::Result<&str> {
    if name.is_empty() {
        return Err(crate::Error::InvalidFilename("empty filename".into()));
    }
    if name == "." || name == ".." {
        return Err(crate::Error::InvalidFilename(name.into()));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(crate::Error::InvalidFilename(format!(
            "{} contains a path separator",
            name
        )));
    }
    if name.contains('"') {
        return Err(crate::Error::InvalidFilename(format!(
            "{} contains a quote",
            name
        )));
    }
    Ok(name)
}
