//! Data models for repositories and the objects they contain.

mod object;
mod repository;

pub use object::{Document, Folder, OtherObject, RepositoryObject};
pub use repository::RepositoryInfo;
