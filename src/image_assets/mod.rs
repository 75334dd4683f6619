//! Content-addressed image storage
//!
//! Uploaded images are named after the SHA-256 digest of their bytes, so
//! identical uploads land on the same file no matter how many items
//! reference it.

pub mod hasher;
pub mod storage;

pub use hasher::{digest_bytes, digest_reader};
pub use storage::{ImageStore, StoredImage, IMAGE_EXTENSION};
