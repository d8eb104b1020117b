use std::fmt;

use log::info;
use mw_core::Document;

use crate::error::BuildResult;

/// A cache of decoded visual or audio assets.
pub trait AssetCache: fmt::Debug {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Drop every cached asset.
    fn evict_all(&mut self);

    /// Release memory freed by eviction. Runs after every cache was evicted.
    fn reclaim(&mut self) {}
}

/// Fetches documents by id.
pub trait DocumentSource {
    /// Load the document with `id`.
    fn fetch(&mut self, id: &str) -> BuildResult<Document>;
}

/// Owns the active document and invalidates asset caches on change.
#[derive(Debug, Default)]
pub struct MapLoader {
    current: Option<Document>,
    last_id: Option<String>,
    caches: Vec<Box<dyn AssetCache>>,
    reclaim_passes: usize,
}

impl MapLoader {
    /// A loader with no document and no caches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a cache to evict when the document changes.
    pub fn add_cache<C: AssetCache + 'static>(&mut self, cache: C) {
        self.caches.push(Box::new(cache));
    }

    /// Make `document` the active document, or clear it with `None`.
    ///
    /// Caches are evicted and reclaimed whenever the incoming id differs from
    /// the last one, including a change to or from no document. Returns
    /// whether that happened.
    pub fn load(&mut self, document: Option<Document>) -> bool {
        let new_id = document.as_ref().map(|d| d.id.clone());
        let changed = new_id != self.last_id;
        if changed {
            for cache in &mut self.caches {
                cache.evict_all();
            }
            for cache in &mut self.caches {
                cache.reclaim();
            }
            self.reclaim_passes += 1;
            info!(
                "document changed to '{}', evicted {} caches",
                new_id.as_deref().unwrap_or("<none>"),
                self.caches.len()
            );
        }
        self.last_id = new_id;
        self.current = document;
        changed
    }

    /// Fetch `id` from `source` and make it active.
    pub fn load_from(&mut self, source: &mut dyn DocumentSource, id: &str) -> BuildResult<bool> {
        let document = source.fetch(id)?;
        Ok(self.load(Some(document)))
    }

    /// Clear the active document. Same as `load(None)`, so a later load of
    /// any document evicts the caches.
    pub fn unload(&mut self) -> bool {
        if let Some(doc) = &self.current {
            info!("unloading document '{}'", doc.id);
        }
        self.load(None)
    }

    /// The active document.
    pub fn current(&self) -> Option<&Document> {
        self.current.as_ref()
    }

    /// Returns `true` while a document is active.
    pub fn is_loaded(&self) -> bool {
        self.current.is_some()
    }

    /// Id of the most recent `load`, `None` after an unload.
    pub fn last_id(&self) -> Option<&str> {
        self.last_id.as_deref()
    }

    /// Number of reclamation passes run so far.
    pub fn reclaim_passes(&self) -> usize {
        self.reclaim_passes
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::error::BuildError;

    #[derive(Debug, Default, Clone)]
    struct CountingCache(Rc<Cell<usize>>);

    impl AssetCache for CountingCache {
        fn name(&self) -> &str {
            "counting"
        }
        fn evict_all(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    struct OneDoc;

    impl DocumentSource for OneDoc {
        fn fetch(&mut self, id: &str) -> BuildResult<Document> {
            if id == "skeld" {
                Ok(Document::new("skeld", "Skeld"))
            } else {
                Err(BuildError::DocumentUnavailable {
                    id: id.to_string(),
                    message: "not found".into(),
                })
            }
        }
    }

    #[test]
    fn evicts_only_on_id_change() {
        let evictions = CountingCache::default();
        let mut loader = MapLoader::new();
        loader.add_cache(evictions.clone());

        assert!(loader.load(Some(Document::new("a", "A"))));
        assert!(!loader.load(Some(Document::new("a", "A again"))));
        assert!(loader.load(Some(Document::new("b", "B"))));
        assert_eq!(evictions.0.get(), 2);
        assert_eq!(loader.reclaim_passes(), 2);
    }

    #[test]
    fn unload_clears_last_id() {
        let mut loader = MapLoader::new();
        loader.load(Some(Document::new("a", "A")));
        assert!(loader.unload());
        assert!(!loader.is_loaded());
        assert_eq!(loader.last_id(), None);
        assert!(!loader.unload());
    }

    #[test]
    fn clearing_and_reloading_evicts_each_time() {
        let evictions = CountingCache::default();
        let mut loader = MapLoader::new();
        loader.add_cache(evictions.clone());

        assert!(loader.load(Some(Document::new("a", "A"))));
        assert!(loader.load(None));
        assert!(loader.load(Some(Document::new("a", "A"))));
        assert_eq!(evictions.0.get(), 3);
        assert_eq!(loader.reclaim_passes(), 3);
    }

    #[test]
    fn repeated_none_does_not_evict() {
        let evictions = CountingCache::default();
        let mut loader = MapLoader::new();
        loader.add_cache(evictions.clone());
        assert!(!loader.load(None));
        assert_eq!(evictions.0.get(), 0);
    }

    #[test]
    fn load_from_source() {
        let mut loader = MapLoader::new();
        assert!(loader.load_from(&mut OneDoc, "skeld").unwrap());
        assert_eq!(loader.current().unwrap().name, "Skeld");
        assert!(loader.load_from(&mut OneDoc, "polus").is_err());
        assert!(loader.is_loaded());
    }
}
