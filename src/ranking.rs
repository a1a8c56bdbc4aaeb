//! Top-artist ranking
//!
//! Ranks artists by the average popularity of their best tracks rather than
//! by a single hit, so one viral song does not outrank a consistent catalog.
//!
//! # How Ranking Works
//!
//! 1. **Candidates**: for a genre filter, every row of that genre. For
//!    [`GenreFilter::All`], only the rows of the 500 artists with the highest
//!    peak popularity, which bounds the work on large catalogs.
//! 2. **Top tracks**: each artist's rows sorted by popularity (stable), first
//!    3 kept.
//! 3. **Aggregate**: mean of the kept popularity (one decimal), best track,
//!    and the artist's row count in the candidate set.
//! 4. **Rank**: average descending, first 10 returned.
//!
//! Artists are visited in name order, so equal averages and equal peaks
//! resolve alphabetically regardless of row order in the source file.

use crate::dataset::{Dataset, Track};
use crate::genre::GenreFilter;
use crate::stats::round1;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Artists kept for the unfiltered ranking
pub const CANDIDATE_ARTIST_CAP: usize = 500;
/// Tracks averaged per artist
pub const TRACKS_PER_ARTIST: usize = 3;
/// Artists returned
pub const RANKING_SIZE: usize = 10;

/// One ranked artist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistAggregate {
    pub artist_name: String,
    pub avg_top3_popularity: f64,
    pub best_song: String,
    pub best_song_popularity: f64,
    /// Rows of this artist in the candidate set, not just the averaged ones
    pub total_songs: usize,
}

#[derive(Debug, Clone)]
pub struct Ranker {
    candidate_cap: usize,
    tracks_per_artist: usize,
    limit: usize,
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new()
    }
}

impl Ranker {
    pub fn new() -> Self {
        Self {
            candidate_cap: CANDIDATE_ARTIST_CAP,
            tracks_per_artist: TRACKS_PER_ARTIST,
            limit: RANKING_SIZE,
        }
    }

    pub fn with_candidate_cap(mut self, cap: usize) -> Self {
        self.candidate_cap = cap;
        self
    }

    pub fn with_tracks_per_artist(mut self, n: usize) -> Self {
        self.tracks_per_artist = n.max(1);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// 0 disables the cap
    pub fn candidate_cap(&self) -> usize {
        self.candidate_cap
    }

    /// Always at least 1
    pub fn tracks_per_artist(&self) -> usize {
        self.tracks_per_artist
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Rank the artists of `dataset` passing `filter`.
    ///
    /// Returns an empty list when nothing matches; this never fails.
    pub fn rank(&self, dataset: &Dataset, filter: &GenreFilter) -> Vec<ArtistAggregate> {
        let candidates = match filter {
            GenreFilter::All => cap_by_peak_popularity(dataset.tracks(), self.candidate_cap),
            GenreFilter::Genre(_) => dataset.filtered(filter),
        };

        if candidates.is_empty() {
            debug!(filter = %filter, "no candidate rows");
            return vec![];
        }

        let candidate_rows = candidates.len();
        let groups = group_by_artist(candidates);
        let artists = groups.len();

        let mut ranked: Vec<ArtistAggregate> = groups
            .into_iter()
            .map(|(name, rows)| aggregate(name, rows, self.tracks_per_artist))
            .collect();

        // Stable: equal averages keep name order
        ranked.sort_by(|a, b| b.avg_top3_popularity.total_cmp(&a.avg_top3_popularity));
        ranked.truncate(self.limit);

        debug!(
            filter = %filter,
            candidate_rows,
            artists,
            returned = ranked.len(),
            "ranked artists"
        );
        ranked
    }
}

/// Rank with the default policy: 500-artist cap, top 3 tracks, 10 artists.
pub fn rank_top_artists(dataset: &Dataset, filter: &GenreFilter) -> Vec<ArtistAggregate> {
    Ranker::new().rank(dataset, filter)
}

/// Rows of the `cap` artists with the highest peak popularity.
fn cap_by_peak_popularity(tracks: &[Track], cap: usize) -> Vec<&Track> {
    let mut peaks: BTreeMap<&str, f64> = BTreeMap::new();
    for t in tracks {
        peaks
            .entry(t.artist_name.as_str())
            .and_modify(|p| *p = p.max(t.popularity))
            .or_insert(t.popularity);
    }

    if cap == 0 || peaks.len() <= cap {
        return tracks.iter().collect();
    }

    let mut by_peak: Vec<(&str, f64)> = peaks.into_iter().collect();
    by_peak.sort_by(|a, b| b.1.total_cmp(&a.1));

    let keep: HashSet<&str> = by_peak.into_iter().take(cap).map(|(name, _)| name).collect();
    tracks
        .iter()
        .filter(|t| keep.contains(t.artist_name.as_str()))
        .collect()
}

fn group_by_artist(rows: Vec<&Track>) -> BTreeMap<&str, Vec<&Track>> {
    let mut groups: BTreeMap<&str, Vec<&Track>> = BTreeMap::new();
    for t in rows {
        groups.entry(t.artist_name.as_str()).or_default().push(t);
    }
    groups
}

/// Aggregate one artist's rows. `rows` is never empty.
fn aggregate(name: &str, mut rows: Vec<&Track>, per_artist: usize) -> ArtistAggregate {
    let total_songs = rows.len();
    rows.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));

    let top = &rows[..per_artist.max(1).min(total_songs)];
    let sum: f64 = top.iter().map(|t| t.popularity).sum();
    let best = top[0];

    ArtistAggregate {
        artist_name: name.to_string(),
        avg_top3_popularity: round1(sum / top.len() as f64),
        best_song: best.track_name.clone(),
        best_song_popularity: round1(best.popularity),
        total_songs,
    }
}
