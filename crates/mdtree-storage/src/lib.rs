//! Storage abstraction for mdtree documents.
//!
//! This crate provides a [`Storage`] trait for abstracting how the flat text of a
//! document is read and written. A document is loaded with exactly one
//! [`Storage::read`] and persisted with exactly one [`Storage::write`]; the section
//! tree never touches the backend between those two calls.
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Storage`] trait with `read()`, `write()`, and `exists()` methods
//! - [`FsStorage`] implementation for a local directory
//! - [`MockStorage`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use std::path::{Path, PathBuf};
//! use mdtree_storage::{FsStorage, Storage};
//!
//! let storage = FsStorage::new(PathBuf::from("notes"));
//! let text = storage.read(Path::new("prompt.md"))?;
//! storage.write(Path::new("prompt.md"), &text)?;
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use fs::FsStorage;
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{ErrorStatus, Storage, StorageError, StorageErrorKind};
