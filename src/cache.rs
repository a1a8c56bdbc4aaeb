//! Memoized rankings
//!
//! Ranking is a pure function of (dataset, filter), and a dataset is loaded
//! once and never changes, so a cache owned next to the dataset can key on
//! the filter alone. Dropping the dataset means dropping its cache.

use crate::genre::GenreFilter;
use crate::ranking::ArtistAggregate;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Default)]
pub struct RankingCache {
    entries: HashMap<String, Vec<ArtistAggregate>>,
    hits: u64,
    misses: u64,
}

impl RankingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached ranking for `filter`, computing it with `compute` on a miss.
    pub fn get_or_compute<F>(&mut self, filter: &GenreFilter, compute: F) -> &[ArtistAggregate]
    where
        F: FnOnce() -> Vec<ArtistAggregate>,
    {
        let key = filter.cache_key();
        if self.entries.contains_key(&key) {
            self.hits += 1;
            debug!(key = %key, "ranking cache hit");
        } else {
            self.misses += 1;
            debug!(key = %key, "ranking cache miss");
        }
        self.entries.entry(key).or_insert_with(compute)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn aggregate(name: &str) -> ArtistAggregate {
        ArtistAggregate {
            artist_name: name.to_string(),
            avg_top3_popularity: 50.0,
            best_song: "song".to_string(),
            best_song_popularity: 50.0,
            total_songs: 1,
        }
    }

    #[test]
    fn test_computes_once_per_key() {
        let mut cache = RankingCache::new();
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            vec![aggregate("A")]
        };

        let first = cache.get_or_compute(&GenreFilter::All, compute).to_vec();
        let second = cache.get_or_compute(&GenreFilter::All, compute).to_vec();

        assert_eq!(first, second);
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn test_equivalent_filters_share_entry() {
        let mut cache = RankingCache::new();
        cache.get_or_compute(&GenreFilter::from("Children's Music"), || vec![aggregate("A")]);
        let hit = cache
            .get_or_compute(&GenreFilter::from("children’s music"), || vec![aggregate("B")])
            .to_vec();
        assert_eq!(hit[0].artist_name, "A");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_distinct_filters_distinct_entries() {
        let mut cache = RankingCache::new();
        cache.get_or_compute(&GenreFilter::All, || vec![aggregate("A")]);
        cache.get_or_compute(&GenreFilter::from("Pop"), || vec![]);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_empty_results_are_cached() {
        let mut cache = RankingCache::new();
        let calls = Cell::new(0);
        for _ in 0..3 {
            let r = cache.get_or_compute(&GenreFilter::from("Opera"), || {
                calls.set(calls.get() + 1);
                vec![]
            });
            assert!(r.is_empty());
        }
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_clear() {
        let mut cache = RankingCache::new();
        cache.get_or_compute(&GenreFilter::All, || vec![aggregate("A")]);
        cache.clear();
        assert!(cache.is_empty());
    }
}
