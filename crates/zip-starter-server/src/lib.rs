//! zip-starter server
//!
//! Single-route HTTP front end: a JSON document POSTed to any path comes back
//! as a starter archive holding the document, the page referenced by its
//! `"url"` field, and empty `data` and `tools` directories.

pub mod config;
pub mod error;
pub mod logging;
pub mod routes;

pub use config::ServerConfig;
pub use error::AppError;
pub use routes::{create_router, AppState};
