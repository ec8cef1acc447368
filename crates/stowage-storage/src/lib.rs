//! Stowage Storage Library
//!
//! This crate provides the storage capability used by the uploader and the file
//! access facade: the [`Storage`] trait, filesystem and in-memory backends, and
//! the [`DiskManager`] that maps disk names to backends.
//!
//! # Path format
//!
//! Paths are backend-relative (`uploads/1/image/cat_1700000000.png`). They must
//! not contain `..` or start with `/`.

pub mod disks;
pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-memory")]
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use disks::DiskManager;
pub use factory::{create_disks, create_storage};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-memory")]
pub use memory::MemoryStorage;
pub use stowage_core::StorageBackend;
pub use traits::{ByteReader, ByteStream, Storage, StorageError, StorageResult};
