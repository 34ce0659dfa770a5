//! Loaded asset storage
//!
//! Models and textures are read once at startup and then shared read-only
//! with the scene builder and the renderer. The cache is type-erased so one
//! store holds every [`Asset`] kind; lookups downcast back to the concrete
//! type and return `None` on a mismatch.
//!
//! Entries are addressed three ways:
//! - by [`AssetHandle`], returned from [`AssetCache::insert`]
//! - by the file path they were read from
//! - by a short manifest name such as `"grid"` or `"teapot"`

use std::any::Any;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::asset_error::AssetError;

/// Slot index of a cached asset
pub type AssetId = u64;

/// Reference to a cached asset, cheap to clone
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct AssetHandle {
    id: AssetId,
    path: PathBuf,
}

impl AssetHandle {
    pub fn id(&self) -> AssetId {
        self.id
    }

    /// File the asset came from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Data that can be read from a file into the cache
///
/// `Send + Sync` so the loader can decode files on worker threads.
pub trait Asset: Sized + Send + Sync + 'static {
    /// Decode the file at `path`
    fn load_from_file(path: &Path) -> Result<Self, AssetError>;
}

type SharedAsset = Arc<dyn Any + Send + Sync>;

/// Type-erased store of startup assets
#[derive(Default)]
pub struct AssetCache {
    /// Slot `i` holds the asset with id `i`
    slots: Vec<SharedAsset>,
    by_path: HashMap<PathBuf, AssetId>,
    by_name: HashMap<String, AssetId>,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `path` into the cache unless it is already there
    pub fn load<T: Asset>(&mut self, path: impl AsRef<Path>) -> Result<AssetHandle, AssetError> {
        let path = path.as_ref();
        if let Some(handle) = self.handle_for(path) {
            return Ok(handle);
        }
        let data = T::load_from_file(path)?;
        Ok(self.insert(path, data))
    }

    /// Store decoded data under `path`
    ///
    /// A second insert for the same path swaps the data and keeps the handle.
    pub fn insert<T: Asset>(&mut self, path: impl AsRef<Path>, data: T) -> AssetHandle {
        let path = path.as_ref();
        let shared: SharedAsset = Arc::new(data);

        if let Some(handle) = self.handle_for(path) {
            self.slots[handle.id as usize] = shared;
            return handle;
        }

        let id = self.slots.len() as AssetId;
        self.slots.push(shared);
        self.by_path.insert(path.to_path_buf(), id);
        AssetHandle {
            id,
            path: path.to_path_buf(),
        }
    }

    fn handle_for(&self, path: &Path) -> Option<AssetHandle> {
        self.by_path.get(path).map(|&id| AssetHandle {
            id,
            path: path.to_path_buf(),
        })
    }

    fn typed<T: Asset>(&self, id: AssetId) -> Option<Arc<T>> {
        let slot = self.slots.get(id as usize)?;
        Arc::clone(slot).downcast::<T>().ok()
    }

    pub fn get<T: Asset>(&self, handle: &AssetHandle) -> Option<Arc<T>> {
        self.typed(handle.id)
    }

    pub fn get_by_path<T: Asset>(&self, path: impl AsRef<Path>) -> Option<Arc<T>> {
        self.typed(*self.by_path.get(path.as_ref())?)
    }

    /// Register the manifest name of an asset; re-registering a name moves it
    pub fn set_name(&mut self, handle: &AssetHandle, name: impl Into<String>) {
        if self.contains(handle) {
            self.by_name.insert(name.into(), handle.id);
        }
    }

    pub fn get_named<T: Asset>(&self, name: &str) -> Option<Arc<T>> {
        self.typed(*self.by_name.get(name)?)
    }

    /// Named lookup for callers that treat a missing asset as a failure
    pub fn require_named<T: Asset>(&self, name: &str) -> Result<Arc<T>, AssetError> {
        self.get_named(name)
            .ok_or_else(|| AssetError::NotFound(name.to_string()))
    }

    /// Registered manifest names, in no particular order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    pub fn asset_count(&self) -> usize {
        self.slots.len()
    }

    pub fn contains(&self, handle: &AssetHandle) -> bool {
        (handle.id as usize) < self.slots.len()
    }
}
