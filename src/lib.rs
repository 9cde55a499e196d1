//! Filebay - a shared storage directory served over HTTP.
//!
//! A single flat directory of files with upload, listing, download, inline
//! text editing, replace, rename, and delete, exposed as a JSON/raw HTTP API
//! with an optional shared-secret gate on the mutating endpoints.

pub mod config;
pub mod datetime;
pub mod error;
pub mod logging;
pub mod store;
pub mod web;

pub use config::Config;
pub use error::{FilebayError, Result};
pub use store::{FileEntry, FileStore};
pub use web::WebServer;
