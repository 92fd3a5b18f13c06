use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use super::hierarchy::HierarchicalIndex;
use crate::assets::AssetSnapshot;
use crate::errors::{IconizeError, Result};
use crate::types::{ItemId, Record, ALWAYS_VISIBLE_SOURCES};

/// Read-only index over every record visible in the active modpack.
///
/// Display names are not unique, so records are reachable both by name
/// (one-to-many) and by their four-part identity (one-to-one).
#[derive(Debug, Clone, Default)]
pub struct AssetIndex {
    /// All records in asset file order.
    records: Vec<Record>,
    /// Identity tree pointing into `records`.
    tree: HierarchicalIndex,
    /// Records grouped by their lowercased name.
    by_name_low: HashMap<String, Vec<usize>>,
}

impl AssetIndex {
    /// Builds the index from an asset snapshot.
    ///
    /// With a `modpack`, only sources listed for that modpack are kept, plus
    /// the gas, fluid and placeholder pseudo-sources which are always kept.
    ///
    /// # Errors
    ///
    /// Returns [`IconizeError::Config`] if the modpack does not exist or
    /// lists no sources.
    pub fn build(snapshot: &AssetSnapshot, modpack: Option<&str>) -> Result<Self> {
        let whitelist = modpack
            .map(|name| modpack_sources(snapshot, name))
            .transpose()?;

        let mut index = Self::default();
        let mut skipped = 0usize;

        for (name, ids) in &snapshot.names {
            for id in ids {
                let source = ItemId::parse(id).source;
                if let Some(allowed) = &whitelist {
                    if !allowed.contains(source.as_str()) {
                        skipped += 1;
                        continue;
                    }
                }
                index.push(Record::new(name, id, snapshot.mod_name(&source)));
            }
        }

        info!(
            records = index.records.len(),
            skipped,
            modpack = modpack.unwrap_or("<all>"),
            "built asset index"
        );
        Ok(index)
    }

    /// Builds an index directly from records, keeping their order.
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        let mut index = Self::default();
        for record in records {
            index.push(record);
        }
        index
    }

    fn push(&mut self, record: Record) {
        let position = self.records.len();
        if self
            .tree
            .insert(
                &record.source,
                &record.entry,
                &record.variant,
                record.tag_key(),
                position,
            )
            .is_some()
        {
            debug!(id = %record.id, "identity listed under several names");
        }
        self.by_name_low
            .entry(record.name_low.clone())
            .or_default()
            .push(position);
        self.records.push(record);
    }

    /// All records in insertion order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at a position of [`AssetIndex::records`].
    pub fn get(&self, position: usize) -> Option<&Record> {
        self.records.get(position)
    }

    /// Looks up a record by four-part identity, with the variant and tag
    /// fallback orders applied for missing parts.
    pub fn lookup(
        &self,
        source: &str,
        entry: &str,
        variant: Option<&str>,
        tagged_data: Option<&str>,
    ) -> Option<&Record> {
        self.tree
            .get(source, entry, variant, tagged_data)
            .and_then(|position| self.records.get(position))
    }

    /// Looks up a record by serialized id (`source:entry[:variant[:tag]]`).
    pub fn lookup_exact(&self, id: &str) -> Option<&Record> {
        let parsed = ItemId::parse(id);
        self.lookup(
            &parsed.source,
            &parsed.entry,
            parsed.variant.as_deref(),
            parsed.tagged_data.as_deref(),
        )
    }

    /// All records whose lowercased name equals `name_low`.
    pub fn records_named(&self, name_low: &str) -> Vec<&Record> {
        self.by_name_low
            .get(name_low)
            .map(|positions| positions.iter().map(|&p| &self.records[p]).collect())
            .unwrap_or_default()
    }

    /// Returns `true` if some record is stored for `source`.
    pub fn has_source(&self, source: &str) -> bool {
        self.tree.has_source(source)
    }
}

fn modpack_sources<'a>(snapshot: &'a AssetSnapshot, modpack: &str) -> Result<HashSet<&'a str>> {
    let sources = snapshot
        .modpacks
        .get(modpack)
        .filter(|list| !list.is_empty())
        .ok_or_else(|| IconizeError::Config {
            message: format!("this modpack doesn't exist: {modpack}"),
        })?;

    let mut allowed: HashSet<&str> = sources.iter().map(String::as_str).collect();
    allowed.extend(ALWAYS_VISIBLE_SOURCES.iter().copied());
    Ok(allowed)
}
