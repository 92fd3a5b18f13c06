use indexmap::IndexMap;

/// Tag key to record position.
type TagMap = IndexMap<String, usize>;
/// Variant key to its tags.
type VariantMap = IndexMap<String, TagMap>;
/// Entry to its variants.
type EntryMap = IndexMap<String, VariantMap>;

/// Variant values meaning "any variant".
pub const VARIANT_WILDCARDS: [&str; 2] = ["*", "32767"];

/// Variant keys tried, in order, when the variant is unknown, before falling
/// back to the first stored variant.
///
/// The historical order is `''`, `0`, `'0'`, `'*'`. Keys are strings here, so
/// the numeric and the quoted zero are one lookup in the same position.
pub const VARIANT_FALLBACK: [&str; 3] = ["", "0", "*"];

/// Tag keys tried, in order, when no tag is requested, before falling back
/// to the first stored tag.
pub const TAG_FALLBACK: [&str; 2] = ["", "{}"];

/// Nested `source -> entry -> variant -> tag` mapping to record positions.
///
/// Every level keeps insertion order so "first available" is stable across
/// runs over the same asset snapshot.
#[derive(Debug, Clone, Default)]
pub struct HierarchicalIndex {
    tree: IndexMap<String, EntryMap>,
}

impl HierarchicalIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `position` under the four-part key, returning the position it
    /// replaced, if any.
    pub fn insert(
        &mut self,
        source: &str,
        entry: &str,
        variant: &str,
        tag: &str,
        position: usize,
    ) -> Option<usize> {
        self.tree
            .entry(source.to_string())
            .or_default()
            .entry(entry.to_string())
            .or_default()
            .entry(variant.to_string())
            .or_default()
            .insert(tag.to_string(), position)
    }

    /// Returns `true` if anything is stored for `source`.
    pub fn has_source(&self, source: &str) -> bool {
        self.tree.contains_key(source)
    }

    /// Looks up a position, applying the variant and tag fallback orders for
    /// missing parts.
    ///
    /// A concrete variant (not empty, not a wildcard) is looked up exactly.
    /// A non-empty tag is looked up exactly.
    pub fn get(
        &self,
        source: &str,
        entry: &str,
        variant: Option<&str>,
        tag: Option<&str>,
    ) -> Option<usize> {
        let variants = self.tree.get(source)?.get(entry)?;
        let tags = select_variant(variants, variant)?;
        select_tag(tags, tag)
    }
}

fn is_unknown_variant(variant: Option<&str>) -> bool {
    match variant {
        None | Some("") => true,
        Some(v) => VARIANT_WILDCARDS.contains(&v),
    }
}

fn select_variant<'a>(variants: &'a VariantMap, variant: Option<&str>) -> Option<&'a TagMap> {
    if !is_unknown_variant(variant) {
        return variants.get(variant?);
    }
    VARIANT_FALLBACK
        .iter()
        .find_map(|key| variants.get(*key))
        .or_else(|| variants.values().next())
}

fn select_tag(tags: &TagMap, tag: Option<&str>) -> Option<usize> {
    match tag.filter(|t| !t.is_empty()) {
        Some(t) => tags.get(t).copied(),
        None => TAG_FALLBACK
            .iter()
            .find_map(|key| tags.get(*key))
            .or_else(|| tags.values().next())
            .copied(),
    }
}
