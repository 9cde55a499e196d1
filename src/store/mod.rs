//! File store for Filebay.
//!
//! The operations layer over the single flat storage directory: save, list,
//! read, write, rename, and delete, with collision-free name allocation and
//! path validation at the boundary. No in-memory index is kept; every listing
//! is a fresh directory scan.

pub mod naming;
pub mod paths;

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::config::StorageConfig;
use crate::{FilebayError, Result};

/// Metadata for a single stored file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// File name, unique within the storage root.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time.
    pub modified: SystemTime,
    /// Whether the file is eligible for inline text editing.
    pub editable: bool,
}

/// The operations layer over the storage root.
///
/// All limits and the editable-extension set come from [`StorageConfig`];
/// nothing is global, so tests can run against isolated temporary roots.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    max_upload_bytes: u64,
    max_edit_bytes: u64,
    editable_extensions: Vec<String>,
}

impl FileStore {
    /// Create a new store rooted at `config.root`.
    ///
    /// The root directory is created if it doesn't exist.
    pub fn new(config: &StorageConfig) -> Result<Self> {
        let root = PathBuf::from(&config.root);
        fs::create_dir_all(&root)?;

        Ok(Self {
            root,
            max_upload_bytes: config.max_upload_bytes(),
            max_edit_bytes: config.max_edit_bytes,
            editable_extensions: config
                .editable_extensions
                .iter()
                .map(|e| e.to_lowercase())
                .collect(),
        })
    }

    /// Get the storage root path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maximum accepted upload size in bytes.
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes
    }

    /// Whether a file with this name and size is eligible for inline text
    /// editing. The same rule backs both the listing metadata and the edit
    /// endpoint, so UI and API can never disagree.
    pub fn is_editable(&self, name: &str, size: u64) -> bool {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        self.editable_extensions.contains(&ext) && size <= self.max_edit_bytes
    }

    /// Save uploaded content under a collision-free name derived from
    /// `desired`. Returns the stored name.
    ///
    /// The size limit is enforced before any file is created, so an
    /// oversized upload leaves no trace in storage.
    pub fn save(&self, desired: &str, content: &[u8]) -> Result<String> {
        if content.len() as u64 > self.max_upload_bytes {
            return Err(FilebayError::PayloadTooLarge {
                size: content.len() as u64,
                limit: self.max_upload_bytes,
            });
        }

        let (name, mut file) = naming::create_unique(&self.root, desired)?;
        if let Err(e) = file.write_all(content) {
            // Don't leave a truncated file under the allocated name.
            drop(file);
            let _ = fs::remove_file(self.root.join(&name));
            return Err(e.into());
        }

        tracing::debug!(name = %name, size = content.len(), "saved file");
        Ok(name)
    }

    /// List all stored files, sorted case-insensitively by name.
    pub fn list(&self) -> Result<Vec<FileEntry>> {
        let mut entries = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            let name = match entry.file_name().into_string() {
                Ok(n) => n,
                Err(_) => continue,
            };
            let size = metadata.len();
            entries.push(FileEntry {
                editable: self.is_editable(&name, size),
                modified: metadata.modified()?,
                name,
                size,
            });
        }

        entries.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });

        Ok(entries)
    }

    /// Total bytes across all stored files. Display only.
    pub fn total_bytes(&self) -> Result<u64> {
        Ok(self.list()?.iter().map(|e| e.size).sum())
    }

    /// Look up metadata for a single stored file.
    pub fn stat(&self, name: &str) -> Result<FileEntry> {
        let path = paths::resolve(&self.root, name)?;
        let metadata = fs::metadata(&path)?;
        Ok(FileEntry {
            name: name.to_string(),
            size: metadata.len(),
            modified: metadata.modified()?,
            editable: self.is_editable(name, metadata.len()),
        })
    }

    /// Read the raw bytes of a stored file.
    pub fn read_bytes(&self, name: &str) -> Result<Vec<u8>> {
        let path = paths::resolve(&self.root, name)?;
        match fs::read(&path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(FilebayError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Read a stored file as UTF-8 text.
    pub fn read_text(&self, name: &str) -> Result<String> {
        let bytes = self.read_bytes(name)?;
        String::from_utf8(bytes)
            .map_err(|_| FilebayError::Encoding(format!("{name} is not valid UTF-8")))
    }

    /// Overwrite a stored file with UTF-8 text.
    ///
    /// Eligibility (extension + size ceiling) must be checked by the caller
    /// via [`FileStore::is_editable`] before calling this; the store only
    /// performs the write. The content goes to a temporary name first and is
    /// renamed into place, so a crash never exposes partial text.
    pub fn write_text(&self, name: &str, content: &str) -> Result<()> {
        let path = paths::resolve(&self.root, name)?;
        self.write_atomic(&path, content.as_bytes())?;
        tracing::debug!(name = %name, size = content.len(), "saved text edit");
        Ok(())
    }

    /// Replace a stored file's content with arbitrary bytes.
    ///
    /// Only the global upload limit applies; the extension is irrelevant.
    pub fn replace(&self, name: &str, content: &[u8]) -> Result<()> {
        if content.len() as u64 > self.max_upload_bytes {
            return Err(FilebayError::PayloadTooLarge {
                size: content.len() as u64,
                limit: self.max_upload_bytes,
            });
        }

        let path = paths::resolve(&self.root, name)?;
        self.write_atomic(&path, content)?;
        tracing::debug!(name = %name, size = content.len(), "replaced file content");
        Ok(())
    }

    /// Rename a stored file within the root.
    ///
    /// Unlike upload, rename never auto-suffixes: an occupied target fails
    /// with [`FilebayError::NameConflict`] and both files are left unchanged.
    pub fn rename(&self, name: &str, new_name: &str) -> Result<String> {
        let new_name = new_name.trim();
        if new_name.is_empty()
            || new_name.contains('/')
            || new_name.contains('\\')
            || new_name.contains('\0')
            || new_name == "."
            || new_name == ".."
        {
            return Err(FilebayError::InvalidName(new_name.to_string()));
        }

        let src = paths::resolve(&self.root, name)?;
        let dst = self.root.join(new_name);
        if dst.exists() {
            return Err(FilebayError::NameConflict(new_name.to_string()));
        }

        fs::rename(&src, &dst)?;
        tracing::info!(from = %name, to = %new_name, "renamed file");
        Ok(new_name.to_string())
    }

    /// Delete a stored file.
    ///
    /// A file that vanished since resolution (deleted twice, or lost a race)
    /// degrades to [`FilebayError::NotFound`].
    pub fn delete(&self, name: &str) -> Result<()> {
        let path = paths::resolve(&self.root, name)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!(name = %name, "deleted file");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(FilebayError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Write `content` to a sibling temp file and rename it over `path`.
    fn write_atomic(&self, path: &Path, content: &[u8]) -> Result<()> {
        let tmp = self.root.join(format!(
            ".tmp-{}-{}",
            std::process::id(),
            path.file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("replace")
        ));

        let mut file = fs::File::create(&tmp)?;
        if let Err(e) = file.write_all(content).and_then(|_| file.sync_all()) {
            drop(file);
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        drop(file);

        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}
