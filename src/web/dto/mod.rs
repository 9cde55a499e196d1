//! Data transfer objects for the Filebay API.

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;
