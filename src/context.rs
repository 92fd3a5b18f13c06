use std::cell::OnceCell;

use crate::assets::AssetSnapshot;
use crate::errors::Result;
use crate::icons::IconIndex;
use crate::index::AssetIndex;
use crate::search::TokenSearch;

/// Everything a resolution run reads, built once on first use.
///
/// The snapshot is immutable; the index, token search and icon lookup are
/// derived from it lazily and never change afterwards.
pub struct AssetContext {
    snapshot: AssetSnapshot,
    modpack: Option<String>,
    index: OnceCell<AssetIndex>,
    tokens: OnceCell<TokenSearch>,
    icons: OnceCell<IconIndex>,
}

impl AssetContext {
    pub fn new(snapshot: AssetSnapshot, modpack: Option<String>) -> Self {
        Self {
            snapshot,
            modpack,
            index: OnceCell::new(),
            tokens: OnceCell::new(),
            icons: OnceCell::new(),
        }
    }

    /// Context over an already built index, without icons.
    pub fn from_index(index: AssetIndex) -> Self {
        let ctx = Self::new(AssetSnapshot::default(), None);
        let _ = ctx.index.set(index);
        ctx
    }

    pub fn snapshot(&self) -> &AssetSnapshot {
        &self.snapshot
    }

    pub fn modpack(&self) -> Option<&str> {
        self.modpack.as_deref()
    }

    /// The asset index, built on the first call.
    ///
    /// # Errors
    ///
    /// Fails if the configured modpack does not exist in the snapshot.
    pub fn index(&self) -> Result<&AssetIndex> {
        if let Some(index) = self.index.get() {
            return Ok(index);
        }
        let built = AssetIndex::build(&self.snapshot, self.modpack())?;
        Ok(self.index.get_or_init(|| built))
    }

    /// Token search over the index, built on the first call.
    pub fn tokens(&self) -> Result<&TokenSearch> {
        if let Some(tokens) = self.tokens.get() {
            return Ok(tokens);
        }
        let built = TokenSearch::new(self.index()?);
        Ok(self.tokens.get_or_init(|| built))
    }

    /// Icon lookup, built on the first call.
    pub fn icons(&self) -> &IconIndex {
        self.icons.get_or_init(|| IconIndex::new(&self.snapshot))
    }
}
