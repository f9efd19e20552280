//! Startup composition: fold mapping sources into an engine.
//!
//! Loading happens in two phases. A [`Loader`] owns the engine and is
//! the only type that can register mappings. [`Loader::finish`] turns it
//! into a [`Redirector`], which can only route. Since the server only
//! ever sees a `Redirector`, registration cannot race with serving.

use crate::engine::Engine;
use crate::error::UrlshortError;
use crate::mapping::MappingSet;
use crate::sources::MappingSource;

pub struct Loader {
    engine: Box<dyn Engine>,
    sources: Vec<String>,
}

impl Loader {
    #[must_use]
    pub fn new(engine: Box<dyn Engine>) -> Self {
        Self {
            engine,
            sources: Vec::new(),
        }
    }

    pub fn register(mut self, mappings: MappingSet) -> Result<Self, UrlshortError> {
        let source = mappings.source().to_string();
        tracing::info!(
            engine = self.engine.name(),
            source = %source,
            paths = mappings.len(),
            digest = %short_digest(mappings.digest()),
            "loading mapping set"
        );
        self.engine = self.engine.register(mappings)?;
        self.sources.push(source);
        Ok(self)
    }

    pub fn register_defaults(self) -> Result<Self, UrlshortError> {
        self.register(MappingSet::defaults())
    }

    /// Load and register each source in order. The first failure aborts
    /// the fold; a source is always fully parsed before it is registered.
    pub async fn load_sources(
        mut self,
        sources: &[Box<dyn MappingSource>],
    ) -> Result<Self, UrlshortError> {
        for source in sources {
            let mappings = match source.load().await {
                Ok(mappings) => mappings,
                Err(e) => {
                    tracing::error!(
                        format = source.name(),
                        source = %source.label(),
                        error = %e,
                        "failed to load mapping source"
                    );
                    // Release the engine before bailing out so a persistent
                    // table does not outlive the failed startup.
                    if let Err(release_err) = self.engine.release() {
                        tracing::warn!(error = %release_err, "failed to release engine");
                    }
                    return Err(e);
                }
            };
            self = self.register(mappings)?;
        }
        Ok(self)
    }

    /// Sources registered so far, in registration order.
    #[must_use]
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    #[must_use]
    pub fn finish(self) -> Redirector {
        tracing::info!(
            engine = self.engine.name(),
            sources = self.sources.len(),
            "redirect table ready"
        );
        Redirector {
            engine: self.engine,
            sources: self.sources,
        }
    }
}

/// Read-only routing phase of a loaded engine.
pub struct Redirector {
    engine: Box<dyn Engine>,
    sources: Vec<String>,
}

impl Redirector {
    pub fn route(&self, path: &str) -> Result<Option<String>, UrlshortError> {
        self.engine.route(path)
    }

    #[must_use]
    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    #[must_use]
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn release(self) -> Result<(), UrlshortError> {
        self.engine.release()
    }
}

fn short_digest(digest: &str) -> &str {
    digest.get(..8).unwrap_or(digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::memory::MemoryEngine;
    use crate::mapping::DEFAULTS_SOURCE;

    fn memory_loader() -> Loader {
        Loader::new(Box::new(MemoryEngine::new()))
    }

    #[test]
    fn defaults_are_routable() {
        let redirector = memory_loader().register_defaults().unwrap().finish();
        assert_eq!(
            redirector.route("/yaml-godoc").unwrap().as_deref(),
            Some("https://godoc.org/gopkg.in/yaml.v2")
        );
        assert_eq!(redirector.sources(), [DEFAULTS_SOURCE.to_string()]);
        assert_eq!(redirector.engine_name(), "memory");
    }

    #[test]
    fn registration_order_is_recorded() {
        let loader = memory_loader()
            .register_defaults()
            .unwrap()
            .register(MappingSet::from_pairs("a.yaml", [("/a", "1")]))
            .unwrap()
            .register(MappingSet::from_pairs("b.json", [("/a", "2")]))
            .unwrap();
        assert_eq!(loader.sources(), ["defaults", "a.yaml", "b.json"]);

        let redirector = loader.finish();
        assert_eq!(redirector.route("/a").unwrap().as_deref(), Some("2"));
        redirector.release().unwrap();
    }

    #[tokio::test]
    async fn empty_source_list_keeps_defaults_only() {
        let redirector = memory_loader()
            .register_defaults()
            .unwrap()
            .load_sources(&[])
            .await
            .unwrap()
            .finish();
        assert_eq!(redirector.sources().len(), 1);
        assert_eq!(redirector.route("/a").unwrap(), None);
    }

    #[test]
    fn short_digest_truncates() {
        assert_eq!(short_digest("0123456789abcdef"), "01234567");
        assert_eq!(short_digest("abc"), "abc");
    }
}
