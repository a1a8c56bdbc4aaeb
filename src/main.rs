use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use tunestats::report::{self, DashboardReport};
use tunestats::{ArtistAggregate, ConfigError, Dashboard, GenreFilter, Settings, ALL_GENRES};

#[derive(Parser, Debug)]
#[command(name = "tunestats")]
#[command(author, version, about = "Artist rankings and overview statistics for Spotify track data")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Tracks CSV (default: SpotifyFeatures.csv)
    #[arg(long, global = true, env = "TUNESTATS_DATA")]
    data: Option<PathBuf>,

    /// TOML settings file
    #[arg(long, global = true, env = "TUNESTATS_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the genres offered by the selector
    Genres,

    /// Show the top artists by average popularity of their best tracks
    TopArtists {
        /// Genre to rank within
        #[arg(short, long, default_value = ALL_GENRES)]
        genre: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show headline metrics and insights
    Overview {
        #[arg(short, long, default_value = ALL_GENRES)]
        genre: String,

        /// Print the full overview as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a report file (.json for the full report, anything else for CSV)
    Export {
        #[arg(short, long)]
        output: PathBuf,

        #[arg(short, long, default_value = ALL_GENRES)]
        genre: String,
    },

    /// Start the interactive web dashboard
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3001")]
        port: u16,

        /// Don't open a browser
        #[arg(long)]
        no_open: bool,
    },
}

fn main() {
    init_logging();
    let args = Args::parse();

    let settings = match resolve_settings(&args) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Config error: {}", e);
            process::exit(1);
        }
    };

    let mut dashboard = open_dashboard(settings);
    if let Some(notice) = dashboard.notice() {
        eprintln!("\x1b[33m{}\x1b[0m", notice);
    }

    match args.command {
        Command::Genres => {
            for genre in dashboard.genres() {
                println!("{}", genre);
            }
        }

        Command::TopArtists { genre, json } => {
            let filter = GenreFilter::from(genre);
            let ranking = dashboard.top_artists(&filter);
            if json {
                print_json(&ranking);
            } else {
                print_ranking(&filter, ranking);
            }
        }

        Command::Overview { genre, json } => {
            let filter = GenreFilter::from(genre);
            if json {
                print_json(&dashboard.overview(&filter));
            } else {
                print_overview(&dashboard, &filter);
            }
        }

        Command::Export { output, genre } => {
            let filter = GenreFilter::from(genre);
            let report = DashboardReport::build(&mut dashboard, &filter);
            if let Err(e) = report::generate(&output, &report) {
                eprintln!("Failed to write report: {}", e);
                process::exit(1);
            }
            eprintln!("\x1b[32mReport saved: {}\x1b[0m", output.display());
        }

        Command::Serve { port, no_open } => {
            if let Err(e) = tunestats::serve::start(port, dashboard, !no_open) {
                eprintln!("Server error: {}", e);
                process::exit(1);
            }
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tunestats=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Flags and environment override the settings file, which overrides defaults.
fn resolve_settings(args: &Args) -> Result<Settings, ConfigError> {
    let mut settings = match &args.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };
    if let Some(data) = &args.data {
        settings.data_path = data.clone();
    }
    Ok(settings)
}

fn open_dashboard(settings: Settings) -> Dashboard {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Loading {}", settings.data_path.display()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let dashboard = Dashboard::open(settings);

    spinner.finish_and_clear();
    dashboard
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}

fn print_ranking(filter: &GenreFilter, ranking: &[ArtistAggregate]) {
    eprintln!("\x1b[1mTop Artists - {}\x1b[0m", filter);
    eprintln!("{}", "─".repeat(78));

    if ranking.is_empty() {
        eprintln!("No tracks for this genre.");
        return;
    }

    println!(
        "{:>3}  {:<28}  {:>8}  {:>6}  {:>5}  {}",
        "#", "ARTIST", "AVG TOP3", "BEST", "SONGS", "BEST SONG"
    );
    for (i, a) in ranking.iter().enumerate() {
        println!(
            "{:>3}  {:<28}  {:>8.1}  {:>6.1}  {:>5}  {}",
            i + 1,
            truncate(&a.artist_name, 28),
            a.avg_top3_popularity,
            a.best_song_popularity,
            a.total_songs,
            truncate(&a.best_song, 40)
        );
    }
}

fn print_overview(dashboard: &Dashboard, filter: &GenreFilter) {
    let o = dashboard.overview(filter);
    let m = &o.metrics;

    eprintln!("\x1b[1mOverview - {}\x1b[0m", filter);
    eprintln!("{}", "─".repeat(78));
    println!("  Tracks:          {}", m.total_tracks);
    println!("  Artists:         {}", m.total_artists);
    println!("  Genres:          {}", m.total_genres);
    println!(
        "  Avg popularity:  {}",
        m.avg_popularity
            .map(|p| format!("{:.1}", p))
            .unwrap_or_else(|| "n/a".to_string())
    );

    if let Some(c) = &o.energy_loudness {
        println!("\n  {}", c.insight());
    }

    if !o.top_tracks.is_empty() {
        println!("\n  \x1b[1mTop tracks\x1b[0m");
        for t in &o.top_tracks {
            println!(
                "  {:>5.0}  {:<28}  {}",
                t.popularity,
                truncate(&t.artist_name, 28),
                truncate(&t.track_name, 40)
            );
        }
    }

    if let Some(p) = &o.feature_profile {
        println!("\n  \x1b[1mAudio profile\x1b[0m");
        for (name, value) in [
            ("danceability", p.danceability),
            ("energy", p.energy),
            ("valence", p.valence),
            ("acousticness", p.acousticness),
        ] {
            println!(
                "  {:<14} {}",
                name,
                value.map(|v| format!("{:.3}", v)).unwrap_or_else(|| "n/a".to_string())
            );
        }
    }

    if !o.genre_popularity.is_empty() {
        println!("\n  \x1b[1mMost popular genres\x1b[0m");
        for g in &o.genre_popularity {
            println!("  {:>6.1}  {}", g.value, g.genre);
        }
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
