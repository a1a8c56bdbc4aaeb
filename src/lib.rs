//! tunestats - Artist rankings and overview statistics for Spotify track data
//!
//! tunestats loads a Spotify tracks CSV (one row per track with genre,
//! artist, title, popularity and audio features) and answers the questions
//! a music dashboard asks of it.
//!
//! # Overview
//!
//! The same genre can appear under slightly different spellings
//! ("Children's Music" and "Children’s Music"), so every comparison goes
//! through a canonical key: lowercased, punctuation removed. The genre
//! selector shows one label per key, prefixed by "All".
//!
//! # Artist Ranking
//!
//! An artist's score is the mean popularity of their three most popular
//! tracks, which keeps one viral hit from outranking a consistent catalog.
//!
//! 1. Keep the 500 artists with the highest single-track popularity
//! 2. Average each artist's top 3 tracks (fewer if they have fewer)
//! 3. Sort by that average and return the top 10
//!
//! # Quick Start
//!
//! ```no_run
//! use tunestats::{load, rank_top_artists, GenreFilter};
//!
//! let dataset = load("SpotifyFeatures.csv").unwrap();
//! for (i, a) in rank_top_artists(&dataset, &GenreFilter::from("Pop")).iter().enumerate() {
//!     println!(
//!         "{:>2}. {} - avg {} (best: {} at {})",
//!         i + 1,
//!         a.artist_name,
//!         a.avg_top3_popularity,
//!         a.best_song,
//!         a.best_song_popularity
//!     );
//! }
//! ```
//!
//! # Modules
//!
//! - [`genre`]: Label canonicalization and the genre selector list
//! - [`dataset`]: CSV loading and row quarantine
//! - [`ranking`]: Top-artist ranking
//! - [`overview`]: Metrics, distributions and correlations
//! - [`dashboard`]: Dataset plus memoized rankings
//! - [`report`]: Output formatters (JSON, CSV)
//! - [`serve`]: Local web dashboard

pub mod cache;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod genre;
pub mod overview;
pub mod ranking;
pub mod report;
pub mod serve;
pub mod stats;

pub use config::Settings;
pub use dashboard::Dashboard;
pub use dataset::{load, load_or_empty, load_with, Dataset, LoadOptions, Track};
pub use error::{ConfigError, DataError};
pub use genre::{canonicalize, distinct_display_genres, GenreFilter, ALL_GENRES};
pub use overview::Overview;
pub use ranking::{rank_top_artists, ArtistAggregate, Ranker};
