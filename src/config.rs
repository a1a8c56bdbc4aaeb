//! Settings
//!
//! Resolution order, highest first:
//! 1. Command-line flags
//! 2. Environment variables (`TUNESTATS_DATA`, `TUNESTATS_CONFIG`)
//! 3. TOML file given with `--config`
//! 4. Compiled defaults
//!
//! The first two are handled by the CLI; this module owns the file format
//! and the defaults.
//!
//! ```toml
//! data_path = "data/SpotifyFeatures.csv"
//! delimiter = ","
//! candidate_artist_cap = 500
//! tracks_per_artist = 3
//! ranking_size = 10
//! popularity_bins = 20
//! duration_bins = 30
//! scatter_sample_size = 1500
//! ```

use crate::dataset::LoadOptions;
use crate::error::ConfigError;
use crate::ranking::{Ranker, CANDIDATE_ARTIST_CAP, RANKING_SIZE, TRACKS_PER_ARTIST};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_PATH: &str = "SpotifyFeatures.csv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub data_path: PathBuf,
    pub delimiter: char,
    /// 0 disables the cap
    pub candidate_artist_cap: usize,
    pub tracks_per_artist: usize,
    pub ranking_size: usize,
    pub popularity_bins: usize,
    pub duration_bins: usize,
    pub scatter_sample_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            delimiter: ',',
            candidate_artist_cap: CANDIDATE_ARTIST_CAP,
            tracks_per_artist: TRACKS_PER_ARTIST,
            ranking_size: RANKING_SIZE,
            popularity_bins: 20,
            duration_bins: 30,
            scatter_sample_size: 1500,
        }
    }
}

impl Settings {
    /// Read settings from a TOML file; keys left out keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.delimiter.is_ascii() {
            return Err(ConfigError::Invalid(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            )));
        }
        let positive = [
            ("tracks_per_artist", self.tracks_per_artist),
            ("ranking_size", self.ranking_size),
            ("popularity_bins", self.popularity_bins),
            ("duration_bins", self.duration_bins),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{} must be at least 1", name)));
            }
        }
        Ok(())
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            delimiter: self.delimiter as u8,
        }
    }

    pub fn ranker(&self) -> Ranker {
        Ranker::new()
            .with_candidate_cap(self.candidate_artist_cap)
            .with_tracks_per_artist(self.tracks_per_artist)
            .with_limit(self.ranking_size)
    }
}
