//! Report export
//!
//! Writes what the dashboard shows for one genre filter to a file:
//!
//! - **JSON**: the full report (ranking, overview, notice) for programmatic use
//! - **CSV**: the artist ranking table, for spreadsheets
//!
//! # Usage
//!
//! ```ignore
//! use tunestats::report::{self, DashboardReport};
//!
//! let report = DashboardReport::build(&mut dashboard, &GenreFilter::All);
//! report::generate("top-artists.json", &report)?;  // JSON
//! report::generate("top-artists.csv", &report)?;   // CSV
//! ```

pub mod csv;
pub mod json;

use crate::dashboard::Dashboard;
use crate::genre::GenreFilter;
use crate::overview::Overview;
use crate::ranking::ArtistAggregate;
use serde::Serialize;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub generated: String,
    pub source: Option<String>,
    pub filter: String,
    pub notice: Option<String>,
    pub top_artists: Vec<ArtistAggregate>,
    pub overview: Overview,
}

impl DashboardReport {
    pub fn build(dashboard: &mut Dashboard, filter: &GenreFilter) -> Self {
        let top_artists = dashboard.top_artists(filter).to_vec();
        Self {
            generated: chrono::Local::now().to_rfc3339(),
            source: dashboard
                .dataset()
                .source()
                .map(|p| p.display().to_string()),
            filter: filter.to_string(),
            notice: dashboard.notice().map(str::to_string),
            top_artists,
            overview: dashboard.overview(filter),
        }
    }
}

/// Generate a report in the format implied by the file extension
pub fn generate<P: AsRef<Path>>(path: P, report: &DashboardReport) -> io::Result<()> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let mut file = std::fs::File::create(path)?;

    match ext.as_str() {
        "json" => json::write(&mut file, report),
        _ => csv::write(&mut file, &report.top_artists),
    }
}
