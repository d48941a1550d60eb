use ahash::RandomState;
use moka::sync::Cache;
use std::time::Duration;

use super::ExternalAnswer;

/// Cache of definitive external answers, keyed by the normalized query.
#[derive(Clone)]
pub struct LookupCache {
    cache: Cache<String, ExternalAnswer, RandomState>,
}

impl LookupCache {
    pub fn new(ttl_secs: u64, max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .time_to_live(Duration::from_secs(ttl_secs.max(1)))
            .max_capacity(max_capacity.max(1))
            .build_with_hasher(RandomState::new());
        Self { cache }
    }

    pub fn get(&self, query: &str) -> Option<ExternalAnswer> {
        self.cache.get(&normalize(query))
    }

    pub fn put(&self, query: &str, answer: ExternalAnswer) {
        self.cache.insert(normalize(query), answer);
    }
}

fn normalize(query: &str) -> String {
    query
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_when_empty() {
        let cache = LookupCache::new(60, 16);
        assert!(cache.get("aspirina").is_none());
    }

    #[test]
    fn keys_ignore_case_and_spacing() {
        let cache = LookupCache::new(60, 16);
        cache.put("Acido  Folico", ExternalAnswer::NotFound);

        assert_eq!(cache.get("acido folico"), Some(ExternalAnswer::NotFound));
        assert_eq!(cache.get(" ACIDO FOLICO "), Some(ExternalAnswer::NotFound));
    }
}
