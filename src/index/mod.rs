/// Asset index module.
///
/// Holds every visible record twice: as a flat, insertion-ordered list for
/// search strategies and as a four-level tree for exact identity lookups.
mod asset_index;
mod hierarchy;

pub use asset_index::AssetIndex;
pub use hierarchy::{HierarchicalIndex, TAG_FALLBACK, VARIANT_FALLBACK, VARIANT_WILDCARDS};
