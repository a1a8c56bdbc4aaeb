//! Dashboard overview aggregates
//!
//! Everything the dashboard shows besides the artist ranking: headline
//! metrics, distributions, per-genre leaders, the genre's audio profile,
//! energy vs loudness, and descriptive statistics.
//!
//! Sections marked "full dataset" ignore the genre filter, so the page can
//! always show how the selected genre compares with the rest.

use crate::dataset::{Dataset, Track};
use crate::genre::GenreFilter;
use crate::stats::{self, Histogram};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

/// Genres listed in the per-genre leaderboards
pub const TOP_GENRES: usize = 10;
/// Tracks listed in the top-track table
pub const TOP_TRACKS: usize = 10;

#[derive(Debug, Clone)]
pub struct OverviewOptions {
    pub popularity_bins: usize,
    pub duration_bins: usize,
    pub scatter_sample_size: usize,
}

impl Default for OverviewOptions {
    fn default() -> Self {
        Self {
            popularity_bins: 20,
            duration_bins: 30,
            scatter_sample_size: 1500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub total_tracks: usize,
    pub total_artists: usize,
    /// Distinct raw labels in the full dataset
    pub total_genres: usize,
    pub avg_popularity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreCount {
    pub genre: String,
    pub tracks: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreValue {
    pub genre: String,
    pub value: f64,
}

/// Mean audio features of the selected genre.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureProfile {
    pub danceability: Option<f64>,
    pub energy: Option<f64>,
    pub valence: Option<f64>,
    pub acousticness: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopTrack {
    pub artist_name: String,
    pub track_name: String,
    pub popularity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Weak,
    Moderate,
    Strong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Positive,
    Negative,
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strength::Weak => write!(f, "weak"),
            Strength::Moderate => write!(f, "moderate"),
            Strength::Strong => write!(f, "strong"),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Positive => write!(f, "positive"),
            Direction::Negative => write!(f, "negative"),
        }
    }
}

/// Energy vs loudness correlation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Correlation {
    pub r: f64,
    /// Rows with both values present
    pub samples: usize,
    pub strength: Strength,
    pub direction: Direction,
}

impl Correlation {
    pub fn new(r: f64, samples: usize) -> Self {
        let strength = if r.abs() > 0.5 {
            Strength::Strong
        } else if r.abs() > 0.3 {
            Strength::Moderate
        } else {
            Strength::Weak
        };
        let direction = if r > 0.0 {
            Direction::Positive
        } else {
            Direction::Negative
        };
        Self {
            r,
            samples,
            strength,
            direction,
        }
    }

    /// One-line reading for the dashboard.
    pub fn insight(&self) -> String {
        let tail = if self.r > 0.4 {
            "More energetic tracks tend to be louder."
        } else {
            "Energy and loudness move only loosely together here."
        };
        format!(
            "Energy and loudness show a {} {} correlation (r = {:.3}). {}",
            self.strength, self.direction, self.r, tail
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub energy: f64,
    pub loudness: f64,
    pub popularity: f64,
    pub artist_name: String,
    pub track_name: String,
    pub tempo: Option<f64>,
}

/// Descriptive statistics for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: &'static str,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub p25: Option<f64>,
    pub median: Option<f64>,
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

type Extractor = fn(&Track) -> Option<f64>;

const NUMERIC_COLUMNS: [(&str, Extractor); 8] = [
    ("popularity", |t| Some(t.popularity)),
    ("acousticness", |t| t.acousticness),
    ("danceability", |t| t.danceability),
    ("duration_ms", |t| t.duration_ms),
    ("energy", |t| t.energy),
    ("loudness", |t| t.loudness),
    ("tempo", |t| t.tempo),
    ("valence", |t| t.valence),
];

#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub filter: String,
    pub metrics: Metrics,
    /// Full dataset
    pub genre_counts: Vec<GenreCount>,
    pub popularity_histogram: Histogram,
    /// Full dataset, only for the unfiltered view
    pub genre_popularity: Vec<GenreValue>,
    /// Only for a genre view
    pub feature_profile: Option<FeatureProfile>,
    /// Minutes
    pub duration_histogram: Histogram,
    /// Full dataset, minutes
    pub duration_by_genre: Vec<GenreValue>,
    pub top_tracks: Vec<TopTrack>,
    pub energy_loudness: Option<Correlation>,
    pub scatter: Vec<ScatterPoint>,
    pub describe: Vec<ColumnSummary>,
}

impl Overview {
    pub fn build(dataset: &Dataset, filter: &GenreFilter, options: &OverviewOptions) -> Self {
        let rows = dataset.filtered(filter);
        let all: Vec<&Track> = dataset.tracks().iter().collect();

        let popularity: Vec<f64> = rows.iter().map(|t| t.popularity).collect();
        let minutes: Vec<f64> = rows.iter().filter_map(|t| t.duration_minutes()).collect();

        Self {
            filter: filter.to_string(),
            metrics: metrics(dataset, &rows),
            genre_counts: genre_counts(&all),
            popularity_histogram: Histogram::build(&popularity, options.popularity_bins),
            genre_popularity: if filter.is_all() {
                top_genres_by_mean(&all, |t| Some(t.popularity))
            } else {
                vec![]
            },
            feature_profile: if filter.is_all() {
                None
            } else {
                Some(feature_profile(&rows))
            },
            duration_histogram: Histogram::build(&minutes, options.duration_bins),
            duration_by_genre: top_genres_by_mean(&all, Track::duration_minutes),
            top_tracks: top_tracks(&rows),
            energy_loudness: energy_loudness(&rows),
            scatter: scatter_sample(&rows, options.scatter_sample_size),
            describe: describe(&rows),
        }
    }
}

fn values(rows: &[&Track], extract: impl Fn(&Track) -> Option<f64>) -> Vec<f64> {
    rows.iter().filter_map(|t| extract(*t)).collect()
}

fn metrics(dataset: &Dataset, rows: &[&Track]) -> Metrics {
    let artists: HashSet<&str> = rows.iter().map(|t| t.artist_name.as_str()).collect();
    let genres: HashSet<&str> = dataset.genres().collect();
    let popularity = values(rows, |t| Some(t.popularity));

    Metrics {
        total_tracks: rows.len(),
        total_artists: artists.len(),
        total_genres: genres.len(),
        avg_popularity: stats::mean(&popularity),
    }
}

fn genre_counts(rows: &[&Track]) -> Vec<GenreCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for t in rows {
        *counts.entry(t.genre.as_str()).or_insert(0) += 1;
    }

    let mut out: Vec<GenreCount> = counts
        .into_iter()
        .map(|(genre, tracks)| GenreCount {
            genre: genre.to_string(),
            tracks,
        })
        .collect();
    out.sort_by(|a, b| b.tracks.cmp(&a.tracks).then_with(|| a.genre.cmp(&b.genre)));
    out
}

/// The [`TOP_GENRES`] raw genres with the highest mean of `extract`.
fn top_genres_by_mean(rows: &[&Track], extract: impl Fn(&Track) -> Option<f64>) -> Vec<GenreValue> {
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for &t in rows {
        if let Some(v) = extract(t) {
            let entry = sums.entry(t.genre.as_str()).or_insert((0.0, 0));
            entry.0 += v;
            entry.1 += 1;
        }
    }

    let mut out: Vec<GenreValue> = sums
        .into_iter()
        .map(|(genre, (sum, n))| GenreValue {
            genre: genre.to_string(),
            value: sum / n as f64,
        })
        .collect();
    out.sort_by(|a, b| b.value.total_cmp(&a.value));
    out.truncate(TOP_GENRES);
    out
}

fn feature_profile(rows: &[&Track]) -> FeatureProfile {
    FeatureProfile {
        danceability: stats::mean(&values(rows, |t| t.danceability)),
        energy: stats::mean(&values(rows, |t| t.energy)),
        valence: stats::mean(&values(rows, |t| t.valence)),
        acousticness: stats::mean(&values(rows, |t| t.acousticness)),
    }
}

/// Each artist's most popular track, then the [`TOP_TRACKS`] best of those.
fn top_tracks(rows: &[&Track]) -> Vec<TopTrack> {
    let mut best: BTreeMap<&str, &Track> = BTreeMap::new();
    for &t in rows {
        best.entry(t.artist_name.as_str())
            .and_modify(|b| {
                if t.popularity > b.popularity {
                    *b = t;
                }
            })
            .or_insert(t);
    }

    let mut tracks: Vec<&Track> = best.into_values().collect();
    tracks.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));
    tracks
        .into_iter()
        .take(TOP_TRACKS)
        .map(|t| TopTrack {
            artist_name: t.artist_name.clone(),
            track_name: t.track_name.clone(),
            popularity: t.popularity,
        })
        .collect()
}

fn energy_loudness(rows: &[&Track]) -> Option<Correlation> {
    let (energy, loudness): (Vec<f64>, Vec<f64>) = rows
        .iter()
        .filter_map(|t| Some((t.energy?, t.loudness?)))
        .unzip();
    let r = stats::pearson(&energy, &loudness)?;
    Some(Correlation::new(r, energy.len()))
}

/// Up to `size` rows with both energy and loudness, picked at an even stride
/// so the same input always yields the same sample.
fn scatter_sample(rows: &[&Track], size: usize) -> Vec<ScatterPoint> {
    let eligible: Vec<&Track> = rows
        .iter()
        .copied()
        .filter(|t| t.energy.is_some() && t.loudness.is_some())
        .collect();

    let picked: Vec<&Track> = if eligible.len() <= size {
        eligible
    } else {
        (0..size).map(|i| eligible[i * eligible.len() / size]).collect()
    };

    picked
        .into_iter()
        .filter_map(|t| {
            Some(ScatterPoint {
                energy: t.energy?,
                loudness: t.loudness?,
                popularity: t.popularity,
                artist_name: t.artist_name.clone(),
                track_name: t.track_name.clone(),
                tempo: t.tempo,
            })
        })
        .collect()
}

fn describe(rows: &[&Track]) -> Vec<ColumnSummary> {
    NUMERIC_COLUMNS
        .iter()
        .map(|&(column, extract)| {
            let mut v = values(rows, extract);
            v.sort_by(f64::total_cmp);
            ColumnSummary {
                column,
                count: v.len(),
                mean: stats::mean(&v),
                std: stats::sample_std(&v),
                min: v.first().copied(),
                p25: stats::quantile_sorted(&v, 0.25),
                median: stats::quantile_sorted(&v, 0.5),
                p75: stats::quantile_sorted(&v, 0.75),
                max: v.last().copied(),
            }
        })
        .collect()
}
