use strsim::levenshtein;
use tracing::debug;

use crate::index::AssetIndex;
use crate::types::Record;

/// Nearest-name fallback based on Levenshtein distance.
///
/// Picks a single record only when it is strictly closer than the runner-up
/// and within the configured threshold; otherwise hands back every record
/// ranked by distance for the caller to disambiguate.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditDistanceResolver {
    threshold: usize,
}

impl EditDistanceResolver {
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    /// Ranks every record of `index` against `query`.
    pub fn resolve<'a>(&self, index: &'a AssetIndex, query: &str) -> Vec<&'a Record> {
        let query_low = query.to_lowercase();
        let mut ranked: Vec<(usize, &Record)> = index
            .records()
            .iter()
            .map(|r| (levenshtein(&r.name_low, &query_low), r))
            .collect();
        // Stable: equal distances keep index order.
        ranked.sort_by_key(|(distance, _)| *distance);

        let Some(&(best, best_record)) = ranked.first() else {
            return Vec::new();
        };
        let runner_up = ranked.get(1).map(|(d, _)| *d).unwrap_or(usize::MAX);

        if best < runner_up && best <= self.threshold {
            debug!(query, best, runner_up, name = %best_record.name, "unique nearest name");
            return vec![best_record];
        }

        debug!(query, best, runner_up, "no unique nearest name");
        ranked.into_iter().map(|(_, r)| r).collect()
    }
}
