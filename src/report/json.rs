//! JSON report output

use super::DashboardReport;
use std::io::{self, Write};

pub fn write<W: Write>(writer: &mut W, report: &DashboardReport) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, report)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genre::GenreFilter;
    use crate::overview::{Overview, OverviewOptions};
    use crate::Dataset;

    #[test]
    fn test_empty_report_serializes() {
        let report = DashboardReport {
            generated: "2024-01-01T00:00:00+00:00".to_string(),
            source: None,
            filter: "All".to_string(),
            notice: Some("file not found: SpotifyFeatures.csv".to_string()),
            top_artists: vec![],
            overview: Overview::build(&Dataset::empty(), &GenreFilter::All, &OverviewOptions::default()),
        };

        let mut out = Vec::new();
        write(&mut out, &report).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["notice"], "file not found: SpotifyFeatures.csv");
        assert_eq!(value["top_artists"].as_array().unwrap().len(), 0);
        assert!(value["overview"]["metrics"]["avg_popularity"].is_null());
        assert!(out.ends_with(b"\n"));
    }
}
