//! Collision-free name allocation within the storage root.
//!
//! Uploaded names are first sanitized to a safe flat filename, then claimed
//! with an atomic exclusive create. Claiming the name and creating the file
//! are a single filesystem operation, so two concurrent uploads of the same
//! base name can never end up writing to the same destination.

use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::Path;

use crate::Result;

/// Sanitize a client-supplied name into a safe flat filename.
///
/// Directory components are stripped, whitespace becomes `_`, and anything
/// outside ASCII alphanumerics plus `._-` is dropped. Leading dots are
/// trimmed so the result is never hidden or a relative-path token. An empty
/// result falls back to `"file"`.
pub fn sanitize(desired: &str) -> String {
    // Keep only the last path segment, whichever separator flavor.
    let base = desired
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(desired);

    let cleaned: String = base
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

/// Split a filename into stem and extension (including the dot).
///
/// `"report.txt"` → `("report", ".txt")`, `"archive"` → `("archive", "")`.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], &name[idx..]),
        _ => (name, ""),
    }
}

/// Create a new file under `root` with a name derived from `desired`,
/// disambiguated with `_1`, `_2`, … suffixes before the extension.
///
/// Each candidate is claimed with `create_new`, so the returned handle is
/// exclusively ours and the name never collides with an existing entry.
pub fn create_unique(root: &Path, desired: &str) -> Result<(String, File)> {
    let base = sanitize(desired);
    let (stem, ext) = split_extension(&base);

    let mut counter = 0u32;
    loop {
        let candidate = if counter == 0 {
            base.clone()
        } else {
            format!("{stem}_{counter}{ext}")
        };

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(root.join(&candidate))
        {
            Ok(file) => return Ok((candidate, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                counter += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}
