//! The dataset together with everything the presentation layer asks of it

use crate::cache::RankingCache;
use crate::config::Settings;
use crate::dataset::{self, Dataset};
use crate::genre::{canonicalize, GenreFilter};
use crate::overview::{Overview, OverviewOptions};
use crate::ranking::{ArtistAggregate, Ranker};
use std::collections::HashSet;
use tracing::{debug, info};

pub struct Dashboard {
    dataset: Dataset,
    settings: Settings,
    ranker: Ranker,
    rankings: RankingCache,
    /// Canonical keys of every genre present in `dataset`
    genre_keys: HashSet<String>,
    notice: Option<String>,
}

impl Dashboard {
    /// Load `settings.data_path`. A missing or unreadable file yields an
    /// empty dashboard carrying a notice instead of an error.
    pub fn open(settings: Settings) -> Self {
        let (dataset, notice) = dataset::load_or_empty(&settings.data_path, &settings.load_options());
        Self::with_dataset(dataset, settings, notice)
    }

    pub fn with_dataset(dataset: Dataset, settings: Settings, notice: Option<String>) -> Self {
        Self {
            ranker: settings.ranker(),
            genre_keys: genre_keys(&dataset),
            dataset,
            settings,
            rankings: RankingCache::new(),
            notice,
        }
    }

    /// Re-read the data file, discarding cached rankings.
    pub fn reload(&mut self) {
        let (dataset, notice) =
            dataset::load_or_empty(&self.settings.data_path, &self.settings.load_options());
        self.genre_keys = genre_keys(&dataset);
        self.dataset = dataset;
        self.notice = notice;
        self.rankings.clear();
        info!(tracks = self.dataset.len(), "dashboard reloaded");
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Why the dashboard is empty, when the data could not be loaded.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn genres(&self) -> Vec<String> {
        self.dataset.display_genres()
    }

    /// Cached ranking for `filter`. A genre with no rows in the dataset
    /// ranks to nothing and is not cached.
    pub fn top_artists(&mut self, filter: &GenreFilter) -> &[ArtistAggregate] {
        if let Some(key) = filter.key() {
            if !self.genre_keys.contains(&key) {
                debug!(filter = %filter, "unknown genre, skipping cache");
                return &[];
            }
        }
        let Self {
            dataset,
            ranker,
            rankings,
            ..
        } = self;
        rankings.get_or_compute(filter, || ranker.rank(dataset, filter))
    }

    pub fn overview(&self, filter: &GenreFilter) -> Overview {
        Overview::build(&self.dataset, filter, &self.overview_options())
    }

    pub fn cache(&self) -> &RankingCache {
        &self.rankings
    }

    fn overview_options(&self) -> OverviewOptions {
        OverviewOptions {
            popularity_bins: self.settings.popularity_bins,
            duration_bins: self.settings.duration_bins,
            scatter_sample_size: self.settings.scatter_sample_size,
        }
    }
}

fn genre_keys(dataset: &Dataset) -> HashSet<String> {
    dataset.genres().map(canonicalize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Track;
    use crate::ranking::rank_top_artists;
    use std::io::Write;

    fn dashboard() -> Dashboard {
        let tracks = vec![
            Track::new("Pop", "A", "S1", 90.0),
            Track::new("Pop", "A", "S2", 80.0),
            Track::new("Rock", "B", "S3", 70.0),
            Track::new("Children’s Music", "C", "S4", 40.0),
            Track::new("Children's Music", "D", "S5", 45.0),
        ];
        Dashboard::with_dataset(Dataset::from_tracks(tracks), Settings::default(), None)
    }

    #[test]
    fn test_cached_ranking_matches_direct() {
        let mut d = dashboard();
        for label in ["All", "Pop", "rock", "Children's Music", "Opera"] {
            let filter = GenreFilter::from(label);
            let direct = rank_top_artists(d.dataset(), &filter);
            let first = d.top_artists(&filter).to_vec();
            let again = d.top_artists(&filter).to_vec();
            assert_eq!(first, direct, "filter {}", label);
            assert_eq!(again, direct, "filter {}", label);
        }
        // "Opera" has no rows and bypasses the cache
        assert_eq!(d.cache().misses(), 4);
        assert_eq!(d.cache().hits(), 4);
    }

    #[test]
    fn test_unknown_genres_not_cached() {
        let mut d = dashboard();
        d.top_artists(&GenreFilter::All);
        d.top_artists(&GenreFilter::from("Pop"));
        assert_eq!(d.cache().len(), 2);

        for i in 0..50 {
            let filter = GenreFilter::from(format!("x{}", i));
            assert!(d.top_artists(&filter).is_empty());
        }
        assert!(d.top_artists(&GenreFilter::from("?!")).is_empty());
        assert_eq!(d.cache().len(), 2);
        assert_eq!(d.cache().misses(), 2);
    }

    #[test]
    fn test_genres() {
        assert_eq!(dashboard().genres(), vec!["All", "Children's Music", "Pop", "Rock"]);
    }

    #[test]
    fn test_settings_drive_ranking() {
        let settings = Settings {
            ranking_size: 1,
            ..Settings::default()
        };
        let mut d = Dashboard::with_dataset(dashboard().dataset().clone(), settings, None);
        assert_eq!(d.top_artists(&GenreFilter::All).len(), 1);
    }

    #[test]
    fn test_open_missing_file_is_empty_with_notice() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            data_path: dir.path().join("SpotifyFeatures.csv"),
            ..Settings::default()
        };
        let mut d = Dashboard::open(settings);
        assert!(d.dataset().is_empty());
        assert!(d.notice().unwrap().contains("file not found"));
        assert_eq!(d.genres(), vec!["All"]);
        assert!(d.top_artists(&GenreFilter::All).is_empty());
        assert_eq!(d.overview(&GenreFilter::All).metrics.total_tracks, 0);
    }

    #[test]
    fn test_reload_picks_up_file_and_clears_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracks.csv");
        let settings = Settings {
            data_path: path.clone(),
            ..Settings::default()
        };

        let mut d = Dashboard::open(settings);
        assert!(d.top_artists(&GenreFilter::All).is_empty());
        assert_eq!(d.cache().len(), 1);

        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "genre,artist_name,track_name,popularity").unwrap();
        writeln!(file, "Pop,A,S1,90").unwrap();
        drop(file);

        d.reload();
        assert!(d.notice().is_none());
        assert!(d.cache().is_empty());
        assert_eq!(d.top_artists(&GenreFilter::All).len(), 1);
    }

    #[test]
    fn test_overview_uses_settings() {
        let settings = Settings {
            popularity_bins: 5,
            ..Settings::default()
        };
        let d = Dashboard::with_dataset(dashboard().dataset().clone(), settings, None);
        let o = d.overview(&GenreFilter::All);
        assert_eq!(o.popularity_histogram.bins.len(), 5);
    }
}
