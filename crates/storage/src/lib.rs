#![forbid(unsafe_code)]

pub mod question_file;
pub mod repository;
pub mod sqlite;

pub use repository::{DocumentKey, DocumentStore, InMemoryRepository, Storage, StorageError};
