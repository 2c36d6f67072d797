//! cmisbrowse - web front-end for CMIS content repositories.
//!
//! Connects to a CMIS 1.1 endpoint over the browser binding and
//! presents the repository's folder tree as plain HTML pages, with
//! document downloads streamed straight from the repository.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
pub mod session;
pub mod utils;

pub use error::{CmisError, Result};
