use serde::{Deserialize, Serialize};

/// Store statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreStats {
    /// Number of window queries answered (cached or computed)
    pub window_queries: u64,
    /// Window queries answered from the result cache
    pub cache_hits: u64,
    /// Window queries that had to be computed
    pub cache_misses: u64,
    /// Datasets loaded from disk
    pub datasets_loaded: u64,
    /// Spatial indexes built
    pub indexes_built: u64,
    /// Full cross-dataset mappings computed
    pub mappings_computed: u64,
    /// Feature pairs produced by cross-dataset mappings
    pub features_matched: u64,
    /// Source features skipped during mapping because their geometry had no extent
    pub features_skipped: u64,
}

impl StoreStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cache_hit(&mut self) {
        self.window_queries += 1;
        self.cache_hits += 1;
    }

    pub fn record_cache_miss(&mut self) {
        self.window_queries += 1;
        self.cache_misses += 1;
    }

    pub fn record_dataset_loaded(&mut self) {
        self.datasets_loaded += 1;
    }

    pub fn record_index_built(&mut self) {
        self.indexes_built += 1;
    }

    pub fn record_mapping(&mut self, matched: u64, skipped: u64) {
        self.mappings_computed += 1;
        self.features_matched += matched;
        self.features_skipped += skipped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let mut stats = StoreStats::new();
        stats.record_cache_miss();
        stats.record_cache_hit();
        stats.record_cache_hit();
        stats.record_mapping(12, 1);

        assert_eq!(stats.window_queries, 3);
        assert_eq!(stats.cache_hits, 2);
        assert_eq!(stats.cache_misses, 1);
        assert_eq!(stats.mappings_computed, 1);
        assert_eq!(stats.features_matched, 12);
        assert_eq!(stats.features_skipped, 1);
    }
}
