use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{IconizeError, Result};

/// Item icon tree: `source -> entry -> variant -> nbtHash -> imgHash`.
pub type ItemTree = IndexMap<String, IndexMap<String, IndexMap<String, IndexMap<String, String>>>>;

/// Immutable asset data a resolution run is built from.
///
/// All maps keep file order, since record order drives every tie-break in
/// the resolver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetSnapshot {
    /// Display name to the list of serialized ids sharing it.
    pub names: IndexMap<String, Vec<String>>,
    /// Source to human readable mod name.
    pub mods: IndexMap<String, String>,
    /// Modpack shorthand to the sources it contains.
    pub modpacks: IndexMap<String, Vec<String>>,
    /// Icon tree, empty when icons are not available.
    #[serde(default)]
    pub items: ItemTree,
    /// Image hash to image path.
    #[serde(default)]
    pub images: IndexMap<String, String>,
    /// Tag hash to serialized tagged data.
    #[serde(default)]
    pub nbt: IndexMap<String, String>,
}

impl AssetSnapshot {
    /// Loads every asset file from `dir`.
    ///
    /// `names.json`, `mods.json` and `modpacks.json` are required; the icon
    /// files (`items.json`, `images.json`, `nbt.json`) are optional and
    /// default to empty maps.
    pub fn load(dir: &Path) -> Result<Self> {
        let snapshot = Self {
            names: load_required(dir, "names")?,
            mods: load_required(dir, "mods")?,
            modpacks: load_required(dir, "modpacks")?,
            items: load_optional(dir, "items")?,
            images: load_optional(dir, "images")?,
            nbt: load_optional(dir, "nbt")?,
        };
        debug!(
            names = snapshot.names.len(),
            mods = snapshot.mods.len(),
            images = snapshot.images.len(),
            "loaded asset snapshot from {}",
            dir.display()
        );
        Ok(snapshot)
    }

    /// Human readable mod name for `source`, or the source itself.
    pub fn mod_name<'a>(&'a self, source: &'a str) -> &'a str {
        self.mods.get(source).map(String::as_str).unwrap_or(source)
    }
}

fn load_required<T: DeserializeOwned>(dir: &Path, key: &str) -> Result<T> {
    let path = dir.join(format!("{key}.json"));
    let contents = fs::read_to_string(&path).map_err(|e| IconizeError::Asset {
        message: format!("failed to read asset file: {e}"),
        path: path.display().to_string(),
    })?;
    serde_json::from_str(&contents).map_err(|e| IconizeError::Asset {
        message: format!("failed to parse asset file: {e}"),
        path: path.display().to_string(),
    })
}

fn load_optional<T: DeserializeOwned + Default>(dir: &Path, key: &str) -> Result<T> {
    if !dir.join(format!("{key}.json")).exists() {
        return Ok(T::default());
    }
    load_required(dir, key)
}
