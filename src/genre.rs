//! Genre label cleanup
//!
//! Raw genre labels in track datasets drift: the same genre shows up as
//! `Children's Music` and `Children’s Music`, or with odd casing and
//! punctuation. Everything here works off one canonical key:
//!
//! ```
//! use tunestats::genre::canonicalize;
//!
//! assert_eq!(canonicalize("Children’s Music"), "childrens music");
//! assert_eq!(canonicalize("CHILDREN'S MUSIC"), "childrens music");
//! ```
//!
//! Only ASCII letters, ASCII digits and whitespace survive canonicalization,
//! so accented letters are dropped along with the punctuation.

use std::fmt;

/// Sentinel label meaning "no genre filter".
pub const ALL_GENRES: &str = "All";

const QUOTE_CHARS: [char; 7] = ['"', '\'', '`', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}'];

/// Lowercase `label` and drop every character that is not an ASCII letter,
/// ASCII digit or whitespace.
pub fn canonicalize(label: &str) -> String {
    label
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect()
}

/// Trim `label` and rewrite every quote character to a plain apostrophe.
pub fn normalize_quotes(label: &str) -> String {
    label
        .trim()
        .chars()
        .map(|c| if QUOTE_CHARS.contains(&c) { '\'' } else { c })
        .collect()
}

/// Collapse duplicate labels into the list offered to users.
///
/// The first label seen for each canonical key is kept (quote-normalized and
/// trimmed). The kept labels are sorted and [`ALL_GENRES`] is prepended.
/// Blank labels, and labels that would collide with the sentinel, are skipped.
pub fn distinct_display_genres<I, S>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let sentinel_key = canonicalize(ALL_GENRES);
    let mut seen = std::collections::HashSet::new();
    let mut kept = Vec::new();

    for label in labels {
        let display = normalize_quotes(label.as_ref());
        if display.is_empty() {
            continue;
        }
        let key = canonicalize(&display);
        if key == sentinel_key {
            continue;
        }
        if seen.insert(key) {
            kept.push(display);
        }
    }

    kept.sort();

    let mut genres = Vec::with_capacity(kept.len() + 1);
    genres.push(ALL_GENRES.to_string());
    genres.extend(kept);
    genres
}

/// The dashboard's single filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GenreFilter {
    #[default]
    All,
    Genre(String),
}

impl GenreFilter {
    /// Canonical key for genre filters, `None` for [`GenreFilter::All`].
    pub fn key(&self) -> Option<String> {
        match self {
            GenreFilter::All => None,
            GenreFilter::Genre(label) => Some(canonicalize(label)),
        }
    }

    /// Does a row labelled `genre` pass this filter?
    pub fn matches(&self, genre: &str) -> bool {
        match self.key() {
            None => true,
            Some(key) => canonicalize(genre) == key,
        }
    }

    /// Key under which results for this filter may be memoized.
    ///
    /// Filters that differ only in punctuation or case select the same rows,
    /// so they share a key.
    pub fn cache_key(&self) -> String {
        match self.key() {
            None => ALL_GENRES.to_string(),
            Some(key) => format!("genre:{}", key),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, GenreFilter::All)
    }
}

impl From<&str> for GenreFilter {
    fn from(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed == ALL_GENRES {
            GenreFilter::All
        } else {
            GenreFilter::Genre(trimmed.to_string())
        }
    }
}

impl From<String> for GenreFilter {
    fn from(s: String) -> Self {
        GenreFilter::from(s.as_str())
    }
}

impl fmt::Display for GenreFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenreFilter::All => write!(f, "{}", ALL_GENRES),
            GenreFilter::Genre(label) => write!(f, "{}", label),
        }
    }
}
