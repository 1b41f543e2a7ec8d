use std::{
    io::{self, stdin, Write},
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::{error::ErrorKind, CommandFactory, Parser};
use codetype::{
    app::{validate_duration, App, Settings},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    runtime::{AppEvent, ChannelEventSource, EventSource, FixedTicker, Runner, Ticker},
    session::Mode,
    snippets::{Language, SnippetTable},
    TICK_RATE_MS,
};
use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use log::{info, warn};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

/// typing speed practice for source code
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type real code snippets against the clock or to the last character, then see your wpm, accuracy and errors."
)]
pub struct Cli {
    /// language to pull snippets from
    #[clap(short = 'l', long, value_enum)]
    language: Option<Language>,

    /// end the test on a countdown (time) or when the snippet is done (full)
    #[clap(short = 'm', long, value_enum)]
    mode: Option<Mode>,

    /// countdown length in seconds: 15, 30, 60, 120 or 180
    #[clap(short = 'd', long, value_parser = parse_duration)]
    duration: Option<u64>,

    /// file to write logs to
    #[clap(long)]
    log_file: Option<PathBuf>,
}

fn parse_duration(s: &str) -> Result<u64, String> {
    let secs: u64 = s.parse().map_err(|e| format!("{e}"))?;
    validate_duration(secs).map_err(|e| e.to_string())
}

impl Cli {
    /// Command-line flags win over the saved config
    fn settings(&self, cfg: &Config) -> Settings {
        let base = Settings::from(cfg);
        Settings {
            language: self.language.unwrap_or(base.language),
            mode: self.mode.unwrap_or(base.mode),
            duration_secs: self.duration.unwrap_or(base.duration_secs),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(log_path) = cli.log_file.clone().or_else(AppDirs::log_path) {
        logging::init(&log_path)
            .with_context(|| format!("unable to open log file {}", log_path.display()))?;
    }

    let store = FileConfigStore::new();
    let settings = cli.settings(&store.load());
    let table = SnippetTable::builtin().context("unable to load bundled snippets")?;
    info!(
        "starting: {} / {} / {}s",
        settings.language, settings.mode, settings.duration_secs
    );

    let mut app = App::new(settings, table);

    let outcome = run_in_terminal(&mut app);

    if let Err(e) = store.save(&Config::from(app.settings())) {
        warn!("unable to save settings: {e}");
    }

    outcome
}

/// Raw mode on the alternate screen for as long as it lives. Dropping it
/// restores the terminal, including when setup only got partway.
struct TerminalGuard<W: Write> {
    out: W,
    raw_mode: bool,
}

impl<W: Write> TerminalGuard<W> {
    fn enter(out: W) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut guard = Self { out, raw_mode: true };
        execute!(guard.out, EnterAlternateScreen)?;
        Ok(guard)
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        if self.raw_mode {
            if let Err(e) = disable_raw_mode() {
                warn!("unable to disable raw mode: {e}");
            }
        }
        if let Err(e) = execute!(self.out, LeaveAlternateScreen, Show) {
            warn!("unable to leave the alternate screen: {e}");
        }
    }
}

fn run_in_terminal(app: &mut App) -> Result<()> {
    let _guard = TerminalGuard::enter(io::stdout()).context("unable to set up the terminal")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let runner = Runner::new(
        ChannelEventSource::terminal(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    run(&mut terminal, app, &runner)
}

fn run<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<()> {
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    while !app.should_quit() {
        let redraw = match runner.step() {
            AppEvent::Tick => app.on_tick(Instant::now()),
            AppEvent::Resize => true,
            AppEvent::Key(key) => {
                app.handle_key(key, Instant::now());
                true
            }
            AppEvent::Closed => {
                warn!("input closed, leaving");
                break;
            }
        };

        if redraw {
            terminal.draw(|f| f.render_widget(&*app, f.area()))?;
        }
    }

    Ok(())
}
