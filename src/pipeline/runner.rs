use chrono::Local;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::pipeline::report::RunReport;
use crate::spotify::{SpotifyClient, TrackDetail};
use crate::store::{csv, sqlite, Dataset, LoadSet};
use crate::transform::clean_and_transform;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub db_path: PathBuf,
    pub table: String,
    pub csv_path: Option<PathBuf>,
    pub dataset: Dataset,
    pub dry_run: bool,
}

pub struct PipelineRunner {
    client: SpotifyClient,
    options: RunOptions,
}

impl PipelineRunner {
    /// Authenticates once; the token lives for the whole run.
    pub async fn new(config: &Config, options: RunOptions) -> Result<Self> {
        let client = SpotifyClient::new(config).await?;
        Ok(Self { client, options })
    }

    /// Executes the four stages in order: resolve the playlist, collect
    /// track details, transform, load. A playlist that cannot be resolved
    /// ends the run gracefully; loader failures are reported but do not
    /// abort the process.
    pub async fn run(&self, playlist_name: &str) -> Result<RunReport> {
        let mut report = RunReport::new(playlist_name.to_string(), self.options.dataset);

        let Some(playlist) = self.client.search_playlist(playlist_name).await? else {
            println!(
                "{}",
                "There is no playlist with the provided name.".yellow()
            );
            self.save_run_report(&report)?;
            return Ok(report);
        };

        info!("Resolved playlist '{}' ({})", playlist.name, playlist.id);
        report.playlist_id = Some(playlist.id.clone());

        let track_ids = self.client.playlist_track_ids(&playlist.id).await?;
        let raw = self.fetch_details(&track_ids).await?;
        report.fetched_tracks = raw.len();

        let cleaned = clean_and_transform(raw.clone());
        report.tally_tiers(&cleaned);

        let load_set = match self.options.dataset {
            Dataset::Raw => LoadSet::Raw(raw),
            Dataset::Cleaned => LoadSet::Cleaned(cleaned),
        };

        if self.options.dry_run {
            println!("{}", "Dry run - skipping load stage".yellow());
        } else {
            self.load(&load_set, &mut report);
        }

        self.save_run_report(&report)?;
        self.print_summary(&report);

        Ok(report)
    }

    async fn fetch_details(&self, track_ids: &[String]) -> Result<Vec<TrackDetail>> {
        let chunks: Vec<_> = track_ids.chunks(SpotifyClient::TRACKS_BATCH_LIMIT).collect();

        let pb = ProgressBar::new(chunks.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        pb.set_message("Fetching track details");

        let mut details = Vec::with_capacity(track_ids.len());
        for chunk in chunks {
            details.extend(self.client.track_details_batch(chunk).await?);
            pb.inc(1);
        }

        pb.finish_and_clear();

        info!("Fetched {} track detail rows", details.len());
        Ok(details)
    }

    /// Both destinations use the caught-and-logged failure policy: a failed
    /// write is recorded in the report and the run carries on to print its
    /// summary.
    fn load(&self, load_set: &LoadSet, report: &mut RunReport) {
        match sqlite::load_tracks(&self.options.db_path, &self.options.table, load_set) {
            Ok(written) => {
                println!("{}", "Data loaded successfully.".green());
                report.rows_loaded_sqlite = Some(written);
            }
            Err(e) => {
                warn!("SQLite load failed: {}", e);
                println!("{}", format!("Database error: {}", e).red());
                report.load_errors.push(e.to_string());
            }
        }

        if let Some(csv_path) = &self.options.csv_path {
            match csv::write_csv(csv_path, load_set) {
                Ok(written) => report.rows_written_csv = Some(written),
                Err(e) => {
                    warn!("CSV write failed: {}", e);
                    println!("{}", format!("CSV error: {}", e).red());
                    report.load_errors.push(e.to_string());
                }
            }
        }
    }

    fn save_run_report(&self, report: &RunReport) -> Result<()> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let reports_dir = Path::new("run_reports");

        fs::create_dir_all(reports_dir)?;

        let filename = reports_dir.join(format!("run_report_{}.json", timestamp));
        let json = serde_json::to_string_pretty(report)?;

        fs::write(&filename, json)?;

        info!("Run report saved to: {}", filename.display());

        Ok(())
    }

    fn print_summary(&self, report: &RunReport) {
        println!();
        println!("{}", "=".repeat(60));
        println!("{}", "PIPELINE SUMMARY".bold());
        println!("{}", "=".repeat(60));
        println!("Playlist: {}", report.playlist_name);
        if let Some(id) = &report.playlist_id {
            println!("Playlist id: {}", id);
        }
        println!("Tracks fetched: {}", report.fetched_tracks);
        println!(
            "Unique tracks: {} ({} duplicates removed)",
            report.unique_tracks,
            report.fetched_tracks - report.unique_tracks
        );
        println!(
            "Tiers: {} hits, {} popular, {} unpopular",
            report.hits.to_string().green(),
            report.popular.to_string().cyan(),
            report.unpopular.to_string().yellow()
        );
        match report.dataset {
            Dataset::Raw => println!("Persisted dataset: raw (no tier column)"),
            Dataset::Cleaned => println!("Persisted dataset: cleaned (with tier column)"),
        }
        if let Some(written) = report.rows_loaded_sqlite {
            println!(
                "SQLite: {} rows into {} ({})",
                written,
                self.options.table,
                self.options.db_path.display()
            );
        }
        if let Some(written) = report.rows_written_csv {
            if let Some(csv_path) = &self.options.csv_path {
                println!("CSV: {} rows into {}", written, csv_path.display());
            }
        }
        for error in &report.load_errors {
            println!("{}", format!("Load error: {}", error).red());
        }
        println!("{}", "=".repeat(60));
    }
}
