//! Request DTOs for the Filebay API.

use serde::Deserialize;

/// Rename request body.
#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    /// Desired new file name.
    pub new_name: String,
}
