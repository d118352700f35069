use std::cmp::Reverse;

use sprig_fuzzy::FuzzyMatcher;
use sprig_index::IndexedSymbol;

use crate::SpringIde;

impl SpringIde {
    /// Indexed symbols matching `query`, best first, at most `limit` of them.
    pub fn workspace_symbols(&self, query: &str, limit: usize) -> Vec<&IndexedSymbol> {
        let mut matcher = FuzzyMatcher::new(query);
        let mut scored: Vec<_> = self
            .view
            .symbols()
            .filter_map(|symbol| {
                let score = matcher.score(&symbol.label)?;
                Some((score.rank_key(), symbol))
            })
            .collect();
        scored.sort_by_key(|(rank, _)| Reverse(*rank));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, symbol)| symbol)
            .collect()
    }
}
