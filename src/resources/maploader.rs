//! Map loader collaborator handed to minigames on reset.
//!
//! Level loading lives outside this crate. Minigames only get a read-only
//! view of it through the [`MapLoader`] trait.
use std::sync::Arc;

use bevy_ecs::prelude::Resource;

pub trait MapLoader: Send + Sync {
    /// Name of the map currently loaded, if any.
    fn current_map(&self) -> Option<&str>;
}

/// Loader used when the host provides none.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullMapLoader;

impl MapLoader for NullMapLoader {
    fn current_map(&self) -> Option<&str> {
        None
    }
}

/// Loader that always reports the same map.
#[derive(Debug, Clone)]
pub struct FixedMapLoader {
    name: String,
}

impl FixedMapLoader {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl MapLoader for FixedMapLoader {
    fn current_map(&self) -> Option<&str> {
        Some(&self.name)
    }
}

/// Shared handle to the host's map loader.
#[derive(Resource, Clone)]
pub struct MapLoaderHandle(pub Arc<dyn MapLoader>);

impl MapLoaderHandle {
    pub fn new(loader: impl MapLoader + 'static) -> Self {
        Self(Arc::new(loader))
    }
}

impl Default for MapLoaderHandle {
    fn default() -> Self {
        Self::new(NullMapLoader)
    }
}
