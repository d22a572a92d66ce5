//! # Persistence Module
//!
//! ## Why This Module Exists
//! Button bindings and sensitivities outlive a session. They live in one line-oriented
//! mapping file the user can edit by hand, and sensitivity changes made from the
//! controller are written back to it while padmouse runs.
//!
//! ## Key Abstractions
//! - [`MappingStore`]: in-memory dictionary of bindings plus the three scalar settings,
//!   with the parser and writer for the file format
//! - [`StorePersister`]: the seam the mapping engine uses to request a save
//! - [`PersistenceHandle`]: the production persister, feeding an async writer task
//!
//! ## Error Handling Strategy
//! Reading is forgiving: malformed lines are skipped with a warning and missing keys
//! keep their defaults. Only I/O failures surface as [`StoreError`]. Saves happen in the
//! background and their failures are logged by the worker.

pub mod mapping_store;
pub mod persistence_worker;

pub use mapping_store::MappingStore;
pub use persistence_worker::PersistenceHandle;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read mapping file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write mapping file {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Receives a complete copy of the store whenever it should be made durable.
///
/// Must not block: the engine calls it from inside a tick.
pub trait StorePersister {
    fn persist(&mut self, store: &MappingStore);
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingPersister {
    pub saved: Vec<MappingStore>,
}

#[cfg(test)]
impl StorePersister for RecordingPersister {
    fn persist(&mut self, store: &MappingStore) {
        self.saved.push(store.clone());
    }
}
