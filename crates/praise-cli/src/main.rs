use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use praise_acquire::{output, AcquiredSong, PraiseClient};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "praise")]
#[command(about = "Scrape Praise! songs and write them as OpenLyrics files")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_HASH"), ")"))]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long, global = true)]
    utc: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Subcommand)]
enum Commands {
    /// Download a song page and save the extracted song data as JSON
    Acquire {
        /// Song-book number to search for
        #[arg(short, long)]
        number: String,

        #[command(flatten)]
        site: SiteArgs,

        /// Output directory for the song JSON and cached HTML
        #[arg(short = 'O', long, env = "PRAISE_OUT_DIR", default_value = ".")]
        output_dir: PathBuf,
    },

    /// Convert a saved song JSON file into an OpenLyrics XML file
    Convert {
        /// Song JSON written by `acquire`
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Download a song and write it straight to an OpenLyrics XML file
    Fetch {
        /// Song-book number to search for
        #[arg(short, long)]
        number: String,

        #[command(flatten)]
        site: SiteArgs,

        #[command(flatten)]
        out: OutputArgs,

        /// Also keep the raw HTML and song JSON next to the XML
        #[arg(long)]
        keep_source: bool,
    },

    /// Log in once, then read song numbers from stdin until a blank line
    Session {
        #[command(flatten)]
        site: SiteArgs,

        #[command(flatten)]
        out: OutputArgs,
    },
}

#[derive(Args)]
struct SiteArgs {
    /// Account user name
    #[arg(short, long, env = "PRAISE_USERNAME")]
    username: String,

    /// Account password
    #[arg(short, long, env = "PRAISE_PASSWORD", hide_env_values = true)]
    password: String,

    /// Site root URL
    #[arg(long, default_value = praise_acquire::client::DEFAULT_BASE_URL)]
    base_url: String,
}

#[derive(Args)]
struct OutputArgs {
    /// Output directory for OpenLyrics files
    #[arg(short = 'O', long, env = "PRAISE_OUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Song-book name written to the songbook entry
    #[arg(long, default_value = "Praise!")]
    songbook: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Map log level, suppressing noisy HTML-parsing crates at debug/trace
    let level = match cli.log_level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn,hyper=info",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn,hyper=info",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Timestamp format: 2026-02-14 19:44:09.123 -08:00
    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z".to_string();

    if cli.utc {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(time_format))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(time_format))
            .init();
    }

    match cli.command {
        Commands::Acquire {
            number,
            site,
            output_dir,
        } => {
            let client = login(&site).await?;
            let dir = output_dir.to_string_lossy();
            let (song, html) = client.acquire_song(&number).await?;
            output::cache_html(&dir, &format!("{number}.html"), &html)?;
            output::write_acquired(&song, &dir)?;
        }
        Commands::Convert { input, out } => {
            tracing::info!(input = %input.display(), "Converting song JSON");
            let song = output::read_acquired(&input)?;
            let path = export(&song, &out)?;
            println!("{}", path.display());
        }
        Commands::Fetch {
            number,
            site,
            out,
            keep_source,
        } => {
            let client = login(&site).await?;
            let path = fetch(&client, &number, &out, keep_source).await?;
            println!("{}", path.display());
        }
        Commands::Session { site, out } => {
            let client = login(&site).await?;
            session(&client, &out).await?;
        }
    }

    Ok(())
}

async fn login(site: &SiteArgs) -> Result<PraiseClient> {
    let client = PraiseClient::new(&site.base_url)?;
    client
        .login(&site.username, &site.password)
        .await
        .context("Login failed")?;
    Ok(client)
}

async fn fetch(client: &PraiseClient, number: &str, out: &OutputArgs, keep_source: bool) -> Result<PathBuf> {
    let (song, html) = client.acquire_song(number).await?;
    if keep_source {
        let dir = out.output_dir.to_string_lossy();
        output::cache_html(&dir, &format!("{number}.html"), &html)?;
        output::write_acquired(&song, &dir)?;
    }
    let path = export(&song, out)?;
    tracing::info!(url = %song.source.url, "Song page");
    Ok(path)
}

/// Parse, validate and write one song. Validation problems are logged but
/// do not stop the file being written.
fn export(song: &AcquiredSong, out: &OutputArgs) -> Result<PathBuf> {
    let record = praise_parse::build_song(song, &out.songbook);

    let problems = praise_validate::validate_song(&record);
    if !problems.is_empty() {
        tracing::warn!(count = problems.len(), number = %record.number, "Song has validation problems");
    }

    let meta = praise_export::DocumentMeta::now();
    let path = praise_export::write_song(&record, Path::new(&out.output_dir), &meta)?;
    Ok(path)
}

async fn session(client: &PraiseClient, out: &OutputArgs) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("Enter the song number (blank to quit): ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let number = line.trim();
        if number.is_empty() {
            break;
        }

        match fetch(client, number, out, false).await {
            Ok(path) => println!("{}", path.display()),
            Err(e) => tracing::error!(number = %number, "{e:#}"),
        }
    }
    Ok(())
}
