//! Startup asset loading
//!
//! Every asset in the manifest is read and decoded on its own scoped thread.
//! All loads are joined before [`AssetLoader::load_all`] returns. A failed
//! load is logged and reported; it never stops the other loads.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::thread;

use serde::{Deserialize, Serialize};

use crate::asset_cache::{Asset, AssetCache};
use crate::asset_error::AssetError;
use crate::geometry::MeshData;
use crate::texture::TextureData;

/// Named asset files, relative to `root`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetManifest {
    pub root: PathBuf,
    /// JSON model files by name
    pub models: BTreeMap<String, String>,
    /// Image files by name
    pub textures: BTreeMap<String, String>,
}

impl Default for AssetManifest {
    fn default() -> Self {
        let textures = [
            ("grid", "textures/grid.png"),
            ("snowflake", "textures/snowflake1.png"),
            ("uv_grid", "textures/uvGrid.jpg"),
            ("noise", "textures/seamless-perlin-noise.jpg"),
        ];
        Self {
            root: PathBuf::from("assets"),
            models: BTreeMap::from([("teapot".to_string(), "models/teapot-claraio.json".to_string())]),
            textures: textures
                .into_iter()
                .map(|(name, path)| (name.to_string(), path.to_string()))
                .collect(),
        }
    }
}

impl AssetManifest {
    /// Empty manifest rooted at `root`
    pub fn empty(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            models: BTreeMap::new(),
            textures: BTreeMap::new(),
        }
    }

    pub fn with_model(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        self.models.insert(name.into(), path.into());
        self
    }

    pub fn with_texture(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        self.textures.insert(name.into(), path.into());
        self
    }

    pub fn len(&self) -> usize {
        self.models.len() + self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }
}

/// A load that did not make it into the cache
#[derive(Debug)]
pub struct LoadFailure {
    pub name: String,
    pub path: PathBuf,
    pub error: AssetError,
}

/// Outcome of [`AssetLoader::load_all`]
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Names of assets now in the cache
    pub loaded: Vec<String>,
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

enum Loaded {
    Model(MeshData),
    Texture(TextureData),
}

pub struct AssetLoader;

impl AssetLoader {
    /// Load every asset in the manifest concurrently and wait for all of them.
    ///
    /// Successful assets are inserted into `cache` under their file path and
    /// registered under their manifest name.
    pub fn load_all(manifest: &AssetManifest, cache: &mut AssetCache) -> LoadReport {
        let mut jobs: Vec<(String, PathBuf, bool)> = Vec::with_capacity(manifest.len());
        for (name, path) in &manifest.models {
            jobs.push((name.clone(), manifest.resolve(path), true));
        }
        for (name, path) in &manifest.textures {
            jobs.push((name.clone(), manifest.resolve(path), false));
        }

        let results: Vec<(String, PathBuf, Result<Loaded, AssetError>)> = thread::scope(|scope| {
            let handles: Vec<_> = jobs
                .iter()
                .map(|(name, path, is_model)| {
                    let handle = scope.spawn(move || {
                        if *is_model {
                            load_one::<MeshData>(path).map(Loaded::Model)
                        } else {
                            load_one::<TextureData>(path).map(Loaded::Texture)
                        }
                    });
                    (name, path, handle)
                })
                .collect();

            handles
                .into_iter()
                .map(|(name, path, handle)| {
                    let result = handle
                        .join()
                        .unwrap_or_else(|_| Err(AssetError::Parse("loader thread panicked".to_string())));
                    (name.clone(), path.clone(), result)
                })
                .collect()
        });

        let mut report = LoadReport::default();
        for (name, path, result) in results {
            match result {
                Ok(loaded) => {
                    let handle = match loaded {
                        Loaded::Model(mesh) => cache.insert(&path, mesh),
                        Loaded::Texture(texture) => cache.insert(&path, texture),
                    };
                    cache.set_name(&handle, name.clone());
                    log::info!("{} loaded", name);
                    report.loaded.push(name);
                }
                Err(error) => {
                    log::warn!("{}: {}", name, error);
                    report.failures.push(LoadFailure { name, path, error });
                }
            }
        }
        report
    }
}

fn load_one<T: Asset>(path: &Path) -> Result<T, AssetError> {
    if !path.exists() {
        return Err(AssetError::NotFound(path.display().to_string()));
    }
    T::load_from_file(path)
}
