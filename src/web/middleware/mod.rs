//! Middleware for the Filebay API.

pub mod auth;

pub use auth::{require_api_key, ApiKeyState};
