//! Track dataset loading
//!
//! Reads a delimited file of track metadata into an immutable [`Dataset`].
//! The header must name the required columns; any other columns are ignored.
//!
//! | Column | Required | Parsed as |
//! |--------|----------|-----------|
//! | `genre` | yes | non-blank text |
//! | `artist_name` | yes | non-blank text |
//! | `track_name` | yes | text |
//! | `popularity` | yes | number |
//! | `energy`, `loudness`, `danceability`, `valence`, `acousticness`, `duration_ms`, `tempo` | no | number, absent when blank or invalid |
//!
//! Rows that fail the schema are quarantined: they are left out of the
//! dataset and listed in [`Dataset::skipped`] with the reason.

use crate::error::DataError;
use crate::genre::{canonicalize, distinct_display_genres, GenreFilter};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const REQUIRED_COLUMNS: [&str; 4] = ["genre", "artist_name", "track_name", "popularity"];

/// One row of the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub genre: String,
    pub artist_name: String,
    pub track_name: String,
    pub popularity: f64,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub energy: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub loudness: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub danceability: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub valence: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub acousticness: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub duration_ms: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub tempo: Option<f64>,
}

impl Track {
    /// A track with no audio features.
    pub fn new(genre: &str, artist_name: &str, track_name: &str, popularity: f64) -> Self {
        Self {
            genre: genre.to_string(),
            artist_name: artist_name.to_string(),
            track_name: track_name.to_string(),
            popularity,
            energy: None,
            loudness: None,
            danceability: None,
            valence: None,
            acousticness: None,
            duration_ms: None,
            tempo: None,
        }
    }

    pub fn duration_minutes(&self) -> Option<f64> {
        self.duration_ms.map(|ms| ms / 60_000.0)
    }
}

/// A row left out of the dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRow {
    /// 1-based line in the source file (the header is line 1)
    pub line: u64,
    pub reason: String,
}

/// Parser options for the source file.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// An immutable snapshot of the loaded tracks.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    tracks: Vec<Track>,
    skipped: Vec<SkippedRow>,
    source: Option<PathBuf>,
}

impl Dataset {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_tracks(tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            ..Self::default()
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn skipped(&self) -> &[SkippedRow] {
        &self.skipped
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Raw genre labels, one per row, in file order.
    pub fn genres(&self) -> impl Iterator<Item = &str> {
        self.tracks.iter().map(|t| t.genre.as_str())
    }

    /// The genre selector list for this dataset.
    pub fn display_genres(&self) -> Vec<String> {
        distinct_display_genres(self.genres())
    }

    /// Rows passing `filter`, in file order.
    pub fn filtered(&self, filter: &GenreFilter) -> Vec<&Track> {
        match filter.key() {
            None => self.tracks.iter().collect(),
            Some(key) => self
                .tracks
                .iter()
                .filter(|t| canonicalize(&t.genre) == key)
                .collect(),
        }
    }
}

/// Load a comma-separated dataset.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Dataset, DataError> {
    load_with(path, &LoadOptions::default())
}

/// Load a dataset with explicit parser options.
pub fn load_with<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Dataset, DataError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DataError::NotFound {
            path: path.to_path_buf(),
        },
        _ => DataError::Io(e),
    })?;

    let mut dataset = read_tracks(file, options)?;
    dataset.source = Some(path.to_path_buf());

    info!(
        path = %path.display(),
        tracks = dataset.len(),
        skipped = dataset.skipped.len(),
        "loaded dataset"
    );
    Ok(dataset)
}

/// Load a dataset, degrading any failure to an empty dataset.
///
/// The second value is the notice to show users when the data could not be
/// loaded.
pub fn load_or_empty<P: AsRef<Path>>(path: P, options: &LoadOptions) -> (Dataset, Option<String>) {
    match load_with(path.as_ref(), options) {
        Ok(dataset) => (dataset, None),
        Err(e) => {
            warn!(error = %e, "dataset unavailable, continuing with no data");
            (Dataset::empty(), Some(e.to_string()))
        }
    }
}

/// Parse tracks from any reader.
pub fn read_tracks<R: Read>(reader: R, options: &LoadOptions) -> Result<Dataset, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DataError::MissingColumns(missing));
    }

    let mut tracks = Vec::new();
    let mut skipped = Vec::new();
    let mut record = csv::StringRecord::new();

    loop {
        match rdr.read_record(&mut record) {
            Ok(false) => break,
            Ok(true) => {}
            Err(e) => {
                if let csv::ErrorKind::Utf8 { pos, .. } = e.kind() {
                    skipped.push(SkippedRow {
                        line: pos.as_ref().map(|p| p.line()).unwrap_or(0),
                        reason: "invalid UTF-8".to_string(),
                    });
                    continue;
                }
                return Err(e.into());
            }
        }

        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() != headers.len() {
            skipped.push(SkippedRow {
                line,
                reason: format!("expected {} fields, found {}", headers.len(), record.len()),
            });
            continue;
        }

        match record.deserialize::<Track>(Some(&headers)) {
            Ok(track) => {
                if track.genre.trim().is_empty() {
                    skipped.push(SkippedRow {
                        line,
                        reason: "blank genre".to_string(),
                    });
                } else if track.artist_name.trim().is_empty() {
                    skipped.push(SkippedRow {
                        line,
                        reason: "blank artist_name".to_string(),
                    });
                } else if !track.popularity.is_finite() {
                    skipped.push(SkippedRow {
                        line,
                        reason: "non-finite popularity".to_string(),
                    });
                } else {
                    tracks.push(track);
                }
            }
            Err(e) => {
                debug!(line, error = %e, "quarantined row");
                skipped.push(SkippedRow {
                    line,
                    reason: e.to_string(),
                });
            }
        }
    }

    if !skipped.is_empty() {
        warn!(count = skipped.len(), "quarantined malformed rows");
    }

    Ok(Dataset {
        tracks,
        skipped,
        source: None,
    })
}
