//! Redirect storage engines.
//!
//! Defines the [`Engine`] trait shared by every backend, and the
//! [`EngineKind`] selector used at startup. Two backends are provided:
//!
//! - [`memory::MemoryEngine`]: a stack of immutable layers. A later
//!   registration shadows earlier ones for the same path; the older
//!   layers stay intact underneath.
//! - [`persistent::PersistentEngine`]: one redb table in a temporary
//!   file. A later registration overwrites earlier values in place.
//!
//! Both make the most recent registration authoritative for a path.

pub mod memory;
pub mod persistent;

use std::path::Path;

use crate::error::UrlshortError;
use crate::mapping::MappingSet;

pub trait Engine: Send + Sync {
    fn name(&self) -> &'static str;

    /// Add a mapping set, returning the engine that now serves it.
    fn register(self: Box<Self>, mappings: MappingSet) -> Result<Box<dyn Engine>, UrlshortError>;

    /// Exact-match lookup. `Ok(None)` means the caller should fall back.
    fn route(&self, path: &str) -> Result<Option<String>, UrlshortError>;

    /// Free any external resource held by the engine.
    fn release(self: Box<Self>) -> Result<(), UrlshortError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    Memory,
    Persistent,
}

impl EngineKind {
    #[must_use]
    pub const fn from_flag(persistent: bool) -> Self {
        if persistent {
            Self::Persistent
        } else {
            Self::Memory
        }
    }

    /// Create an empty engine. `storage_dir` is only used by the
    /// persistent backend.
    pub fn create(self, storage_dir: &Path) -> Result<Box<dyn Engine>, UrlshortError> {
        match self {
            Self::Memory => Ok(Box::new(memory::MemoryEngine::new())),
            Self::Persistent => Ok(Box::new(persistent::PersistentEngine::create_in(
                storage_dir,
            )?)),
        }
    }
}

pub(crate) fn log_registration(engine: &'static str, mappings: &MappingSet) {
    for (path, url) in mappings.iter() {
        tracing::info!(
            engine,
            source = %mappings.source(),
            path = %path,
            url = %url,
            "registering path"
        );
    }
}
