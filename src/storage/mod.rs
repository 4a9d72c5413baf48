// Storage module for per-handler result memoization
// Author: Gabriel Demetrios Lafis

mod cache;

pub use cache::*;

use thiserror::Error;

/// Represents an error in the storage module
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("cache lock poisoned")]
    Poisoned,
}
