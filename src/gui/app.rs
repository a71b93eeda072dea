//! Main GUI application

use crate::bridge::{channel, Severity, UiUpdate, UpdateQueue, POLL_INTERVAL};
use crate::downloader::{DownloadRequest, FormatChoice, Supervisor};
use crate::gui::clipboard;
use crate::tools::ToolSet;
use crate::utils::{open_folder, open_folder_status, AppSettings};
use anyhow::{bail, Result};
use iced::widget::scrollable;
use iced::{event, window, Application, Command, Element, Event, Subscription, Theme};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Start-up data handed to the window by `main`
#[derive(Debug, Clone)]
pub struct AppFlags {
    pub settings: AppSettings,
    pub settings_path: PathBuf,
    pub tools: ToolSet,
}

/// Status line, progress bar and output log as the worker last reported them
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadPanel {
    pub status: String,
    pub severity: Severity,
    pub progress: f32,
    pub output: Vec<String>,
}

impl Default for DownloadPanel {
    fn default() -> Self {
        Self {
            status: "Idle".to_string(),
            severity: Severity::Info,
            progress: 0.0,
            output: Vec::new(),
        }
    }
}

impl DownloadPanel {
    /// Apply one worker update. Returns true when the update ends the session.
    pub fn apply(&mut self, update: UiUpdate) -> Result<bool> {
        match update {
            UiUpdate::Status { message, severity } => {
                self.status = message;
                self.severity = severity;
            }
            UiUpdate::Progress(value) => {
                if value.is_nan() {
                    bail!("progress value is not a number");
                }
                self.progress = value.clamp(0.0, 1.0);
            }
            UiUpdate::AppendOutput(line) => self.output.push(line),
            UiUpdate::ClearOutput => self.output.clear(),
            UiUpdate::SessionEnded(outcome) => {
                info!("Session ended: {:?}", outcome);
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn status_line(&self) -> String {
        format!("Status: {}", self.status)
    }
}

/// Main application state
pub struct VidSnareApp {
    supervisor: Supervisor,
    updates: UpdateQueue,
    settings_path: PathBuf,

    // Form state
    url_input: String,
    output_directory: String,
    format: FormatChoice,
    download_playlist: bool,
    number_playlist: bool,

    panel: DownloadPanel,
}

/// Application messages
#[derive(Debug, Clone)]
pub enum Message {
    // Input events
    UrlInputChanged(String),
    PasteFromClipboard,
    FormatSelected(FormatChoice),
    PlaylistToggled(bool),
    NumberingToggled(bool),
    OutputDirectoryChanged(String),
    BrowseOutputDirectory,
    OpenOutputFolder,

    // Session control
    DownloadPressed,
    CancelPressed,

    // System
    Tick,
    CloseRequested(window::Id),
}

pub const OUTPUT_LOG_ID: &str = "output-log";

/// How long closing the window waits for a cancelled worker to stop the tool
const CLOSE_GRACE: Duration = Duration::from_secs(2);

impl VidSnareApp {
    fn ffmpeg_available(&self) -> bool {
        self.supervisor.tools().ffmpeg_available
    }

    fn current_settings(&self) -> AppSettings {
        AppSettings {
            output_directory: PathBuf::from(self.output_directory.trim()),
            last_format: self.format,
            download_playlist: self.download_playlist,
            number_playlist: self.number_playlist,
        }
    }

    fn save_settings(&self) {
        match self.current_settings().save_to(&self.settings_path) {
            Ok(()) => info!("Settings saved to {:?}", self.settings_path),
            Err(e) => error!("Failed to save settings: {}", e),
        }
    }

    fn set_status(&mut self, message: impl Into<String>, severity: Severity) {
        self.panel.status = message.into();
        self.panel.severity = severity;
    }

    fn build_request(&self) -> DownloadRequest {
        DownloadRequest::new(
            self.url_input.clone(),
            PathBuf::from(self.output_directory.trim()),
        )
        .with_format(self.format)
        .with_playlist(self.download_playlist, self.number_playlist)
    }

    /// Apply everything the worker queued since the last tick
    fn drain_updates(&mut self) -> Command<Message> {
        let before = self.panel.output.len();
        let mut ended = false;
        let panel = &mut self.panel;

        self.updates.drain(|update| {
            let finished = panel.apply(update)?;
            ended |= finished;
            Ok(())
        });

        if ended {
            self.supervisor.session_ended();
        }

        if self.panel.output.len() != before {
            scrollable::snap_to(
                scrollable::Id::new(OUTPUT_LOG_ID),
                scrollable::RelativeOffset::END,
            )
        } else {
            Command::none()
        }
    }
}

impl Application for VidSnareApp {
    type Executor = iced::executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = AppFlags;

    fn new(flags: Self::Flags) -> (Self, Command<Message>) {
        let AppFlags {
            settings,
            settings_path,
            tools,
        } = flags;

        let mut format = settings.last_format;
        if format == FormatChoice::AudioOnly && !tools.ffmpeg_available {
            warn!("Saved format needs ffmpeg, which is unavailable; using video");
            format = FormatChoice::VideoAudio;
        }

        let (sender, updates) = channel();
        let app = Self {
            supervisor: Supervisor::new(tools, sender),
            updates,
            settings_path,
            url_input: String::new(),
            output_directory: settings.output_directory.to_string_lossy().to_string(),
            format,
            download_playlist: settings.download_playlist,
            number_playlist: settings.number_playlist,
            panel: DownloadPanel::default(),
        };

        (app, Command::none())
    }

    fn title(&self) -> String {
        String::from("VidSnare - yt-dlp Downloader")
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::UrlInputChanged(url) => {
                self.url_input = url;
                Command::none()
            }

            Message::PasteFromClipboard => {
                match clipboard::get_clipboard_content() {
                    Ok(text) if !text.trim().is_empty() => {
                        self.url_input = text.trim().to_string();
                    }
                    Ok(_) => {
                        self.set_status(
                            "Clipboard is empty or does not contain text.",
                            Severity::Error,
                        );
                    }
                    Err(e) => {
                        warn!("Paste failed: {}", e);
                        self.set_status(
                            "Clipboard is empty or does not contain text.",
                            Severity::Error,
                        );
                    }
                }
                Command::none()
            }

            Message::FormatSelected(format) => {
                if format == FormatChoice::AudioOnly && !self.ffmpeg_available() {
                    warn!("Ignoring audio selection without ffmpeg");
                } else {
                    self.format = format;
                }
                Command::none()
            }

            Message::PlaylistToggled(value) => {
                self.download_playlist = value;
                Command::none()
            }

            Message::NumberingToggled(value) => {
                self.number_playlist = value;
                Command::none()
            }

            Message::OutputDirectoryChanged(dir) => {
                self.output_directory = dir;
                Command::none()
            }

            Message::BrowseOutputDirectory => {
                let mut dialog = rfd::FileDialog::new().set_title("Select Download Folder");
                let current = PathBuf::from(self.output_directory.trim());
                if current.is_dir() {
                    dialog = dialog.set_directory(&current);
                }
                if let Some(path) = dialog.pick_folder() {
                    self.output_directory = path.to_string_lossy().to_string();
                }
                Command::none()
            }

            Message::OpenOutputFolder => {
                let result = open_folder(&PathBuf::from(self.output_directory.trim()));
                let severity = if result.is_ok() {
                    Severity::Info
                } else {
                    Severity::Error
                };
                self.set_status(open_folder_status(&result), severity);
                Command::none()
            }

            Message::DownloadPressed => {
                if !self.supervisor.can_start() {
                    return Command::none();
                }
                let request = self.build_request();
                // Rejections are reported through the update queue.
                match self.supervisor.start(request) {
                    Ok(id) => {
                        info!("Started download session {}", id);
                        self.save_settings();
                    }
                    Err(e) if e.is_validation() => debug!("Download request rejected: {}", e),
                    Err(e) => error!("Could not start download: {}", e),
                }
                self.drain_updates()
            }

            Message::CancelPressed => {
                self.supervisor.cancel();
                self.drain_updates()
            }

            Message::Tick => self.drain_updates(),

            Message::CloseRequested(id) => {
                if self.supervisor.is_running() {
                    info!("Window closing, cancelling active download");
                    self.supervisor.cancel();
                    self.supervisor.wait_for_worker(CLOSE_GRACE);
                }
                self.save_settings();
                window::close(id)
            }
        }
    }

    fn view(&self) -> Element<'_, Message> {
        use crate::gui::views::main_view;
        main_view(main_view::MainViewState {
            url_value: &self.url_input,
            output_directory: &self.output_directory,
            format: self.format,
            ffmpeg_available: self.ffmpeg_available(),
            download_playlist: self.download_playlist,
            number_playlist: self.number_playlist,
            can_start: self.supervisor.can_start(),
            can_cancel: self.supervisor.can_cancel(),
            panel: &self.panel,
        })
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            iced::time::every(POLL_INTERVAL).map(|_| Message::Tick),
            event::listen_with(|event, _status| match event {
                Event::Window(id, window::Event::CloseRequested) => {
                    Some(Message::CloseRequested(id))
                }
                _ => None,
            }),
        ])
    }

    fn theme(&self) -> Self::Theme {
        Theme::Light
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::SessionOutcome;

    #[test]
    fn panel_starts_idle() {
        let panel = DownloadPanel::default();
        assert_eq!(panel.status_line(), "Status: Idle");
        assert_eq!(panel.progress, 0.0);
        assert!(panel.output.is_empty());
    }

    #[test]
    fn panel_applies_updates_in_order() {
        let mut panel = DownloadPanel::default();
        panel.apply(UiUpdate::output("stale line")).unwrap();
        panel.apply(UiUpdate::ClearOutput).unwrap();
        panel.apply(UiUpdate::info("Starting...")).unwrap();
        panel.apply(UiUpdate::output("URL: https://x")).unwrap();
        panel.apply(UiUpdate::Progress(0.42)).unwrap();
        panel.apply(UiUpdate::error("Download failed (Code: 1)")).unwrap();

        assert_eq!(panel.output, vec!["URL: https://x".to_string()]);
        assert_eq!(panel.progress, 0.42);
        assert_eq!(panel.status, "Download failed (Code: 1)");
        assert_eq!(panel.severity, Severity::Error);
    }

    #[test]
    fn panel_clamps_progress_and_rejects_nan() {
        let mut panel = DownloadPanel::default();
        panel.apply(UiUpdate::Progress(3.0)).unwrap();
        assert_eq!(panel.progress, 1.0);
        panel.apply(UiUpdate::Progress(-1.0)).unwrap();
        assert_eq!(panel.progress, 0.0);

        assert!(panel.apply(UiUpdate::Progress(f32::NAN)).is_err());
        assert_eq!(panel.progress, 0.0);
    }

    #[test]
    fn panel_reports_session_end() {
        let mut panel = DownloadPanel::default();
        assert!(!panel.apply(UiUpdate::info("Downloading...")).unwrap());
        assert!(panel
            .apply(UiUpdate::SessionEnded(SessionOutcome::Cancelled))
            .unwrap());
        assert_eq!(panel.status, "Downloading...");
    }
}
