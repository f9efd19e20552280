//! In-memory engine built as a single-owner chain of immutable layers.
//!
//! Each registration pushes a new head layer that owns the previous
//! engine. Lookups walk from the head down and stop at the first layer
//! that knows the path, so a newer source shadows an older one without
//! destroying it.

use std::collections::HashMap;

use super::{log_registration, Engine};
use crate::error::UrlshortError;
use crate::mapping::MappingSet;

#[derive(Debug, Default)]
pub struct MemoryEngine {
    mappings: HashMap<String, String>,
    source: Option<String>,
    beneath: Option<Box<MemoryEngine>>,
}

impl MemoryEngine {
    /// The terminal layer: knows no paths, every lookup falls through.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `mappings` on top of this engine.
    #[must_use]
    pub fn layer(self, mappings: MappingSet) -> Self {
        log_registration("memory", &mappings);
        let source = mappings.source().to_string();
        let mappings = mappings
            .iter()
            .map(|(p, u)| (p.to_string(), u.to_string()))
            .collect();
        Self {
            mappings,
            source: Some(source),
            beneath: Some(Box::new(self)),
        }
    }

    /// Remove the head layer, returning the engine as it was before that
    /// registration. `None` for the terminal layer.
    #[must_use]
    pub fn peel(self) -> Option<Self> {
        self.beneath.map(|b| *b)
    }

    #[must_use]
    pub fn beneath(&self) -> Option<&Self> {
        self.beneath.as_deref()
    }

    /// Source name of the head layer.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Number of registered layers above the terminal one.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut layer = self;
        while let Some(next) = layer.beneath() {
            depth += 1;
            layer = next;
        }
        depth
    }

    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&str> {
        let mut layer = Some(self);
        while let Some(current) = layer {
            if let Some(url) = current.mappings.get(path) {
                return Some(url);
            }
            layer = current.beneath();
        }
        None
    }
}

impl Engine for MemoryEngine {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn register(self: Box<Self>, mappings: MappingSet) -> Result<Box<dyn Engine>, UrlshortError> {
        Ok(Box::new((*self).layer(mappings)))
    }

    fn route(&self, path: &str) -> Result<Option<String>, UrlshortError> {
        Ok(self.lookup(path).map(str::to_string))
    }

    fn release(self: Box<Self>) -> Result<(), UrlshortError> {
        Ok(())
    }
}
