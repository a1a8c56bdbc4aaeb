//! CSV output of the artist ranking

use crate::ranking::ArtistAggregate;
use serde::Serialize;
use std::io::{self, Write};

#[derive(Serialize)]
struct RankRow<'a> {
    rank: usize,
    artist_name: &'a str,
    best_song: &'a str,
    best_song_popularity: f64,
    avg_top3_popularity: f64,
    total_songs: usize,
}

pub fn write<W: Write>(writer: &mut W, ranking: &[ArtistAggregate]) -> io::Result<()> {
    let mut wtr = ::csv::Writer::from_writer(writer);

    if ranking.is_empty() {
        // serialize() only emits the header alongside the first row
        wtr.write_record([
            "rank",
            "artist_name",
            "best_song",
            "best_song_popularity",
            "avg_top3_popularity",
            "total_songs",
        ])?;
    }

    for (i, a) in ranking.iter().enumerate() {
        wtr.serialize(RankRow {
            rank: i + 1,
            artist_name: &a.artist_name,
            best_song: &a.best_song,
            best_song_popularity: a.best_song_popularity,
            avg_top3_popularity: a.avg_top3_popularity,
            total_songs: a.total_songs,
        })?;
    }

    wtr.flush()?;
    Ok(())
}
