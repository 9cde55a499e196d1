//! Path resolution against the storage root.
//!
//! Every request-supplied file name goes through [`resolve`] before any
//! filesystem operation. The resolver rejects traversal attempts, absolute
//! paths, and symlink escapes, and confirms the target is a regular file
//! directly under the storage root.

use std::path::{Path, PathBuf};

use crate::{FilebayError, Result};

/// Returns true if `name` is structurally unfit to address a stored file:
/// empty, containing a separator or NUL, or carrying a `..` component.
fn is_malformed(name: &str) -> bool {
    name.is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0')
        || name == "."
        || name == ".."
}

/// Resolve `name` to the real path of an existing regular file under `root`.
///
/// Errors:
/// - [`FilebayError::InvalidPath`] for malformed names, non-regular files,
///   or anything resolving outside the storage root.
/// - [`FilebayError::NotFound`] when no entry with that name exists.
pub fn resolve(root: &Path, name: &str) -> Result<PathBuf> {
    if is_malformed(name) {
        return Err(FilebayError::InvalidPath(name.to_string()));
    }

    let candidate = root.join(name);

    let metadata = match std::fs::symlink_metadata(&candidate) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(FilebayError::NotFound(name.to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    // Symlinks could point anywhere, including back inside the root through
    // an aliased path. Resolve both sides and compare parents.
    if metadata.file_type().is_symlink() {
        let real = candidate
            .canonicalize()
            .map_err(|_| FilebayError::InvalidPath(name.to_string()))?;
        let real_root = root.canonicalize()?;
        if real.parent() != Some(real_root.as_path()) || !real.is_file() {
            return Err(FilebayError::InvalidPath(name.to_string()));
        }
        return Ok(real);
    }

    if !metadata.is_file() {
        return Err(FilebayError::InvalidPath(name.to_string()));
    }

    Ok(candidate)
}
