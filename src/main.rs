//! VidSnare - desktop front-end for yt-dlp
//!
//! Collects a URL and a few options, runs yt-dlp as a child process and
//! shows its progress and output live. `--download` runs the same pipeline
//! without a window.

use anyhow::{bail, Result};
use clap::Parser;
use iced::Application;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{info, warn};
use vidsnare::bridge;
use vidsnare::downloader::{DownloadRequest, FormatChoice, Supervisor};
use vidsnare::gui::{AppFlags, VidSnareApp};
use vidsnare::headless;
use vidsnare::tools::ToolSet;
use vidsnare::utils::{AppSettings, CONFIG_FILE};
use vidsnare::SessionOutcome;

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Settings file
    #[arg(long, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Use this yt-dlp executable instead of searching for one
    #[arg(long)]
    ytdlp: Option<PathBuf>,

    /// Download the URL in the terminal instead of opening the window
    #[arg(long, value_name = "URL")]
    download: Option<String>,

    /// Extract audio to mp3 (needs ffmpeg)
    #[arg(long)]
    audio: bool,

    /// Only download the single item even if the URL is part of a playlist
    #[arg(long)]
    no_playlist: bool,

    /// Prefix playlist items with their index
    #[arg(long)]
    number_items: bool,

    /// Output folder (defaults to the last one used)
    #[arg(long, short)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let tools = ToolSet::detect(args.ytdlp.clone());
    check_ytdlp_installed(&tools.ytdlp);

    let settings = AppSettings::load_from(&args.config);

    if let Some(url) = args.download.clone() {
        return run_headless(&args, url, tools, settings);
    }

    VidSnareApp::run(iced::Settings {
        window: iced::window::Settings {
            size: iced::Size::new(650.0, 600.0),
            min_size: Some(iced::Size::new(520.0, 480.0)),
            exit_on_close_request: false,
            ..Default::default()
        },
        antialiasing: true,
        ..iced::Settings::with_flags(AppFlags {
            settings,
            settings_path: args.config.clone(),
            tools,
        })
    })?;

    Ok(())
}

fn run_headless(args: &Args, url: String, tools: ToolSet, settings: AppSettings) -> Result<()> {
    let output_directory = args
        .output
        .clone()
        .unwrap_or_else(|| settings.output_directory.clone());
    let format = if args.audio {
        FormatChoice::AudioOnly
    } else {
        FormatChoice::VideoAudio
    };
    let request = DownloadRequest::new(url, output_directory)
        .with_format(format)
        .with_playlist(!args.no_playlist, args.number_items);

    let (sender, mut queue) = bridge::channel();
    let mut supervisor = Supervisor::new(tools, sender);

    match headless::run(&mut supervisor, &mut queue, request)? {
        SessionOutcome::Succeeded => Ok(()),
        SessionOutcome::Failed { code } => bail!("yt-dlp exited with code {}", code),
        SessionOutcome::Cancelled => bail!("download cancelled"),
        SessionOutcome::Errored { kind, message } => bail!("{}: {}", kind, message),
    }
}

fn check_ytdlp_installed(program: &Path) {
    match Command::new(program).arg("--version").output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout);
            info!("yt-dlp {} found at {:?}", version.trim(), program);
        }
        _ => {
            // The window still opens; starting a download reports the problem.
            warn!("yt-dlp not found or not runnable: {:?}", program);
            warn!("Please install yt-dlp: pip install yt-dlp, or brew install yt-dlp");
        }
    }
}
