//! Response DTOs for the Filebay API.

use serde::Serialize;

use crate::datetime::to_rfc3339;
use crate::store::FileEntry;

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// A single file in a listing response.
#[derive(Debug, Serialize)]
pub struct FileInfo {
    /// File name.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time (RFC 3339, UTC).
    pub mtime: String,
    /// Whether the file is eligible for inline text editing.
    pub editable: bool,
    /// Download link (attachment disposition).
    pub download: String,
    /// View link (inline disposition).
    pub view: String,
}

impl From<FileEntry> for FileInfo {
    fn from(entry: FileEntry) -> Self {
        let encoded = urlencoding::encode(&entry.name).into_owned();
        Self {
            download: format!("/files/{encoded}/download"),
            view: format!("/files/{encoded}/view"),
            mtime: to_rfc3339(entry.modified),
            name: entry.name,
            size: entry.size,
            editable: entry.editable,
        }
    }
}

/// Listing response.
#[derive(Debug, Serialize)]
pub struct ListingResponse {
    /// Stored files, sorted case-insensitively by name.
    pub files: Vec<FileInfo>,
    /// Total bytes across all stored files.
    pub total_bytes: u64,
}

/// Upload response.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Names the uploaded files were stored under.
    pub saved: Vec<String>,
}

/// Rename response.
#[derive(Debug, Serialize)]
pub struct RenameResponse {
    /// The file's final name.
    pub name: String,
}
