use std::collections::HashMap;

use indexmap::IndexMap;

use crate::assets::{AssetSnapshot, ItemTree};
use crate::errors::{IconizeError, Result};
use crate::types::Record;

/// Maps records to the image they render as.
///
/// Two records rendering the same image are visually interchangeable, which
/// the resolver uses to collapse candidate lists.
#[derive(Debug, Clone, Default)]
pub struct IconIndex {
    items: ItemTree,
    images: IndexMap<String, String>,
    /// Serialized tagged data to tag hash.
    tag_hashes: HashMap<String, String>,
}

impl IconIndex {
    pub fn new(snapshot: &AssetSnapshot) -> Self {
        let mut tag_hashes = HashMap::new();
        for (hash, tagged) in &snapshot.nbt {
            tag_hashes.entry(tagged.clone()).or_insert_with(|| hash.clone());
        }
        Self {
            items: snapshot.items.clone(),
            images: snapshot.images.clone(),
            tag_hashes,
        }
    }

    /// Image path for `record`, `None` if the item has no icon at all.
    ///
    /// # Errors
    ///
    /// Returns [`IconizeError::DataIntegrity`] when the icon tree knows the
    /// item but has no variant, no tag, or no image path for it.
    pub fn icon(&self, record: &Record) -> Result<Option<&str>> {
        let Some(variants) = self
            .items
            .get(&record.source)
            .and_then(|entries| entries.get(&record.entry))
        else {
            return Ok(None);
        };

        let report = |reason: &str| IconizeError::DataIntegrity {
            message: format!(
                "looking for item {}:{}:{}:{}, but {}",
                record.source,
                record.entry,
                record.variant,
                record.tag_key(),
                reason
            ),
        };

        let variant = if record.variant.is_empty() {
            "0"
        } else {
            record.variant.as_str()
        };
        let tags = variants
            .get(variant)
            .or_else(|| variants.values().next())
            .ok_or_else(|| report("definition for this item doesn't have any variants"))?;

        let tag_hash = record
            .tagged_data
            .as_ref()
            .and_then(|tagged| self.tag_hashes.get(tagged))
            .map(String::as_str)
            .unwrap_or("");
        let image_hash = tags
            .get(tag_hash)
            .or_else(|| tags.values().next())
            .ok_or_else(|| report("stack for this item doesn't have any tags"))?;

        self.images
            .get(image_hash)
            .map(|path| Some(path.as_str()))
            .ok_or_else(|| report("its image hash has no corresponding path"))
    }
}
