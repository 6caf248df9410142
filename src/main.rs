use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use console::Emoji;

use podtube::{
    CLIENT_SECRETS_PATH, ClientSecrets, Config, EpisodeRange, FfmpegEncoder, ImageSlideRenderer,
    ReqwestClient, Rgb, YouTubeUploader, authorize, fetch_feed, process_episode, select_episodes,
    split_tags,
};

// Emoji with fallback for terminals without Unicode support
static MICROPHONE: Emoji<'_, '_> = Emoji("🎙️  ", "");
static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "[~] ");
static HEADPHONES: Emoji<'_, '_> = Emoji("🎧 ", "[i] ");
static CLAPPER: Emoji<'_, '_> = Emoji("🎬 ", "[>] ");
static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "[+] ");
static FAILURE: Emoji<'_, '_> = Emoji("❌ ", "[!] ");
static WARNING: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");

/// Generate title-slide videos from podcast episodes and upload them to
/// YouTube as unlisted videos
#[derive(Parser, Debug)]
#[command(name = "podtube")]
#[command(about = "Turn podcast episodes into slide videos and publish them to YouTube")]
#[command(version)]
struct Args {
    /// URL for the RSS feed
    #[arg(long, default_value = "http://feeds.feedburner.com/GcpPodcast?format=xml")]
    rss: String,

    /// Path to the logo image shown on the slide (PNG, GIF, or JPEG)
    #[arg(long, default_value = "resources/logo.png")]
    logo: PathBuf,

    /// Font used for the slide text
    #[arg(long, default_value = "resources/Roboto-Light.ttf")]
    font: PathBuf,

    /// Template for the video title; fields: {title}, {number}
    #[arg(long, default_value = "{title}: GCPPodcast {number}")]
    title: String,

    /// Hex encoded color for the slide text
    #[arg(long, default_value = "ffffff")]
    fg: Rgb,

    /// Hex encoded color for the slide background
    #[arg(long, default_value = "009688")]
    bg: Rgb,

    /// Width of the generated video in pixels
    #[arg(short = 'W', long, default_value = "1280")]
    width: u32,

    /// Height of the generated video in pixels
    #[arg(short = 'H', long, default_value = "720")]
    height: u32,

    /// Comma separated list of tags appended to every upload
    #[arg(long, default_value = "podcast,gcppodcast")]
    tags: String,
}

impl Args {
    fn into_config(self) -> Config {
        Config {
            feed_url: self.rss,
            logo: self.logo,
            font: self.font,
            title_template: self.title,
            foreground: self.fg,
            background: self.bg,
            width: self.width,
            height: self.height,
            extra_tags: split_tags(&self.tags),
        }
    }
}

/// `Y`, `y`, or just pressing enter confirms publishing
fn is_affirmative(answer: &str) -> bool {
    answer == "Y" || answer == "y" || answer.is_empty()
}

/// Print a prompt and block for one line of input
fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim().to_string())
}

async fn run() -> Result<()> {
    let config = Args::parse().into_config();

    println!(
        "\n{}{} {}\n",
        MICROPHONE,
        "podtube".bold().magenta(),
        "- Podcast to YouTube".dimmed()
    );

    let client = ReqwestClient::new();

    println!("{SEARCH}Fetching feed: {}", config.feed_url.cyan());
    let feed = fetch_feed(&client, &config.feed_url).await?;

    println!(
        "{HEADPHONES}{} • {} episodes",
        feed.title.bold().green(),
        feed.episodes.len().to_string().cyan()
    );

    let unnumbered = feed.episodes.iter().filter(|e| e.number.is_none()).count();
    if unnumbered > 0 {
        eprintln!(
            "{WARNING}{} episodes carry no number and cannot be selected",
            unnumbered.to_string().yellow()
        );
    }

    let answer = prompt("episode number to publish (try 1, or 2-10): ")?;
    let range: EpisodeRange = answer.parse()?;

    let selected = select_episodes(&feed.episodes, range);
    for episode in &selected {
        if let Some(number) = episode.number {
            println!("episode {}: {}", number.to_string().cyan(), episode.title);
        }
    }
    if selected.is_empty() {
        bail!("no episodes selected");
    }

    let answer = prompt("publish? (Y/n): ")?;
    if !is_affirmative(&answer) {
        return Ok(());
    }

    let secrets = ClientSecrets::from_file(Path::new(CLIENT_SECRETS_PATH))
        .context("could not authenticate with YouTube")?;
    let token = authorize(&secrets)
        .await
        .context("could not authenticate with YouTube")?;

    let renderer = ImageSlideRenderer;
    let encoder = FfmpegEncoder::new();
    let uploader = YouTubeUploader::new(token);

    for episode in selected {
        let number = episode.number.unwrap_or_default();
        println!(
            "{CLAPPER}processing episode {}: {}",
            number.to_string().cyan(),
            episode.title
        );

        let workdir = tempfile::tempdir().context("could not create temp directory")?;

        let outcome = process_episode(
            &client, &renderer, &encoder, &uploader, &config, episode,
            workdir.path(),
        )
        .await;

        if let Err(e) = workdir.close() {
            eprintln!("{WARNING}could not remove temp directory: {e}");
        }

        let uploaded = outcome.with_context(|| format!("episode {number}"))?;
        println!(
            "{SUCCESS}episode {}: uploaded as {}",
            number.to_string().cyan(),
            uploaded.id.bold().green()
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{FAILURE}{:#}", err);
        std::process::exit(1);
    }
}
