//! Asset sources and the post-processed asset cache

use lru::LruCache;
use rustc_hash::FxHashMap;
use std::num::NonZeroUsize;
use thiserror::Error;

use crate::postprocess::{PostProcess, SaturationBoost};
use crate::scene::SceneGraph;

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// No asset exists at the path
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// The asset exists but could not be decoded
    #[error("Failed to parse asset {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Asset I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for asset operations
pub type Result<T> = std::result::Result<T, AssetError>;

/// Loads a badge asset into a scene graph
pub trait AssetSource {
    fn load(&self, path: &str) -> Result<SceneGraph>;
}

/// Source that yields an empty scene for every path (headless runs)
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptySource;

impl AssetSource for EmptySource {
    fn load(&self, _path: &str) -> Result<SceneGraph> {
        Ok(SceneGraph::default())
    }
}

/// Source backed by scenes registered in memory
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    scenes: FxHashMap<String, SceneGraph>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, scene: SceneGraph) {
        self.scenes.insert(path.into(), scene);
    }

    pub fn with(mut self, path: impl Into<String>, scene: SceneGraph) -> Self {
        self.insert(path, scene);
        self
    }
}

impl AssetSource for MemorySource {
    fn load(&self, path: &str) -> Result<SceneGraph> {
        self.scenes
            .get(path)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(path.to_string()))
    }
}

impl<S: AssetSource + ?Sized> AssetSource for Box<S> {
    fn load(&self, path: &str) -> Result<SceneGraph> {
        (**self).load(path)
    }
}

/// Loads assets through a source, post-processes them once, and caches the
/// processed scene by path.
///
/// Each fetch hands out a fresh copy so a mounted badge can never observe or
/// repeat another mount's processing.
pub struct AssetLibrary<S> {
    source: S,
    boost: SaturationBoost,
    cache: LruCache<String, SceneGraph>,
    loads: usize,
}

impl<S: AssetSource> AssetLibrary<S> {
    pub fn new(source: S, capacity: NonZeroUsize) -> Self {
        Self {
            source,
            boost: SaturationBoost::default(),
            cache: LruCache::new(capacity),
            loads: 0,
        }
    }

    /// Fetch a processed scene, loading it on a cache miss
    pub fn fetch(&mut self, path: &str) -> Result<SceneGraph> {
        if let Some(scene) = self.cache.get(path) {
            tracing::trace!(path, "asset cache hit");
            return Ok(scene.clone());
        }

        let mut scene = self.source.load(path)?;
        self.loads += 1;
        PostProcess::new(self.boost).run(&mut scene);
        self.cache.put(path.to_string(), scene.clone());
        tracing::debug!(path, cached = self.cache.len(), "loaded badge asset");
        Ok(scene)
    }

    /// Number of loads that went to the source
    pub fn load_count(&self) -> usize {
        self.loads
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

impl<S> std::fmt::Debug for AssetLibrary<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetLibrary")
            .field("cached", &self.cache.len())
            .field("loads", &self.loads)
            .finish()
    }
}
