use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::index::AssetIndex;
use crate::types::Record;

/// Word-prefix index over record display names.
///
/// Every name is split on whitespace and each lowercased word points back at
/// the records carrying it. Queries are unions over their tokens: a record
/// matches if any token prefixes any of its words.
#[derive(Debug, Clone, Default)]
pub struct TokenSearch {
    /// Lowercased word to record positions, ascending.
    words: BTreeMap<String, Vec<usize>>,
}

impl TokenSearch {
    /// Indexes every record name of `index`.
    pub fn new(index: &AssetIndex) -> Self {
        let mut words: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (position, record) in index.records().iter().enumerate() {
            for word in record.name_low.split_whitespace() {
                let positions = words.entry(word.to_string()).or_default();
                if positions.last() != Some(&position) {
                    positions.push(position);
                }
            }
        }
        debug!(
            words = words.len(),
            records = index.len(),
            "built token search"
        );
        Self { words }
    }

    /// Returns records with a name word starting with any token of `query`.
    ///
    /// Within one token, records come in index order; across tokens the
    /// first occurrence wins.
    pub fn search<'a>(&self, index: &'a AssetIndex, query: &str) -> Vec<&'a Record> {
        let mut seen = HashSet::new();
        let mut result = Vec::new();

        for token in query.split(char::is_whitespace).filter(|t| !t.is_empty()) {
            for position in self.prefixed(&token.to_lowercase()) {
                if seen.insert(position) {
                    if let Some(record) = index.get(position) {
                        result.push(record);
                    }
                }
            }
        }
        result
    }

    /// Positions of records with a word starting with `prefix`, ascending.
    fn prefixed(&self, prefix: &str) -> Vec<usize> {
        let mut positions: Vec<usize> = self
            .words
            .range(prefix.to_string()..)
            .take_while(|(word, _)| word.starts_with(prefix))
            .flat_map(|(_, positions)| positions.iter().copied())
            .collect();
        positions.sort_unstable();
        positions.dedup();
        positions
    }
}
