use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use spotify2sqlite::{Config, Dataset, PipelineRunner, RunOptions};

#[derive(Parser)]
#[command(name = "spotify2sqlite")]
#[command(about = "Extract Spotify playlist tracks, tier them by popularity, load into SQLite/CSV")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline for a playlist
    Run {
        /// Free-text playlist name to resolve (first search result wins)
        playlist_name: String,

        /// SQLite database file
        #[arg(long, default_value = "spotify_playlist_track.db")]
        database: PathBuf,

        /// Destination table (replaced wholesale on each run)
        #[arg(long, default_value = "spotify_playlists")]
        table: String,

        /// CSV output file
        #[arg(long, default_value = "datasets/extracted_track_data.csv")]
        csv: PathBuf,

        /// Skip the CSV output
        #[arg(long)]
        no_csv: bool,

        /// Which dataset to persist
        #[arg(long, value_enum, default_value_t = Dataset::Cleaned)]
        dataset: Dataset,

        /// Fetch and transform without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Spotify client ID (or set SPOTIFY_CLIENT_ID in env/.env)
        #[arg(long, env = "SPOTIFY_CLIENT_ID", hide_env_values = true)]
        client_id: Option<String>,

        /// Spotify client secret (or set SPOTIFY_CLIENT_SECRET in env/.env)
        #[arg(long, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true)]
        client_secret: Option<String>,
    },

    /// Show setup guide
    Setup,
}

fn setup_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            playlist_name,
            database,
            table,
            csv,
            no_csv,
            dataset,
            dry_run,
            client_id,
            client_secret,
        } => {
            let options = RunOptions {
                db_path: database,
                table,
                csv_path: if no_csv { None } else { Some(csv) },
                dataset,
                dry_run,
            };
            run_pipeline(&playlist_name, options, client_id, client_secret).await?;
        }
        Commands::Setup => {
            show_setup_guide();
        }
    }

    Ok(())
}

async fn run_pipeline(
    playlist_name: &str,
    options: RunOptions,
    client_id: Option<String>,
    client_secret: Option<String>,
) -> Result<()> {
    println!("{}", "Spotify Playlist Track Pipeline".cyan().bold());
    println!("{}", "=".repeat(50));

    if options.dry_run {
        println!("{}", "DRY RUN MODE - Nothing will be written".yellow());
    }

    // CLI args (clap also reads the process env for them) win over the
    // .env file.
    let config = match (client_id, client_secret) {
        (Some(client_id), Some(client_secret)) => Config {
            client_id,
            client_secret,
        },
        _ => Config::from_env().context("Failed to load configuration")?,
    };

    let missing = config.get_missing_config();
    if !missing.is_empty() {
        println!("{}", "Missing configuration:".red());
        for item in &missing {
            println!("   - {}", item);
        }
        println!(
            "\n{}",
            "Please create a .env file with your Spotify credentials.".yellow()
        );
        std::process::exit(1);
    }

    let runner = PipelineRunner::new(&config, options)
        .await
        .context("Failed to initialize pipeline")?;

    let report = runner.run(playlist_name).await?;

    if !report.playlist_found() {
        println!("\n{}", "Pipeline finished: no playlist to process".yellow());
    } else if report.load_errors.is_empty() {
        println!("\n{}", "Pipeline executed successfully!".green());
    } else {
        println!("\n{}", "Pipeline finished with load errors".yellow());
    }

    Ok(())
}

fn show_setup_guide() {
    println!("{}", "Spotify Playlist Track Pipeline Setup Guide".cyan().bold());
    println!("{}", "=".repeat(50));

    println!("\n{}", "1. Spotify API Setup".yellow());
    println!("   - Go to https://developer.spotify.com/dashboard/");
    println!("   - Create a new app");
    println!("   - Copy your Client ID and Client Secret");

    println!("\n{}", "2. Configuration".yellow());
    println!("   - Create a .env file with:");
    println!("     SPOTIFY_CLIENT_ID=your_client_id");
    println!("     SPOTIFY_CLIENT_SECRET=your_client_secret");

    println!("\n{}", "3. Usage".yellow());
    println!("   - spotify2sqlite run \"best songs 2023\"              (full pipeline)");
    println!("   - spotify2sqlite run \"best songs 2023\" --dry-run    (fetch only)");
    println!("   - spotify2sqlite run \"best songs 2023\" --dataset raw");
    println!("   - spotify2sqlite run \"best songs 2023\" --no-csv --table my_tracks");

    println!("\n{}", "Ready to extract!".green());
}
