use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::countdown::{Countdown, TickOutcome};
use crate::session::{Keystroke, Mode, Session, Transition};
use crate::snippets::{Language, SnippetTable};

/// Test lengths offered in timed mode, in seconds
pub const DURATIONS: [u64; 5] = [15, 30, 60, 120, 180];
pub const DEFAULT_DURATION: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("unsupported duration {0}s, expected one of 15, 30, 60, 120, 180")]
    UnsupportedDuration(u64),
}

pub fn validate_duration(secs: u64) -> Result<u64, SettingsError> {
    if DURATIONS.contains(&secs) {
        Ok(secs)
    } else {
        Err(SettingsError::UnsupportedDuration(secs))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub language: Language,
    pub mode: Mode,
    pub duration_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: Language::default(),
            mode: Mode::default(),
            duration_secs: DEFAULT_DURATION,
        }
    }
}

/// Everything the user can ask for from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Type(char),
    Delete,
    Skip,
    Reset,
    NextLanguage,
    ToggleMode,
    NextDuration,
    Quit,
}

impl Action {
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        // AltGr arrives as Control+Alt on Windows and produces plain characters
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL)
            && !key.modifiers.contains(KeyModifiers::ALT);

        match key.code {
            KeyCode::Esc => Some(Action::Quit),
            KeyCode::Tab => Some(Action::Skip),
            KeyCode::Backspace => Some(Action::Delete),
            KeyCode::Enter => Some(Action::Type('\n')),
            KeyCode::Char(c) if ctrl => match c {
                'c' => Some(Action::Quit),
                'r' => Some(Action::Reset),
                'l' => Some(Action::NextLanguage),
                't' => Some(Action::ToggleMode),
                'd' => Some(Action::NextDuration),
                _ => None,
            },
            KeyCode::Char(c) => Some(Action::Type(c)),
            _ => None,
        }
    }
}

/// Owns the live session and everything that can replace it
#[derive(Debug)]
pub struct App {
    settings: Settings,
    table: SnippetTable,
    session: Session,
    countdown: Countdown,
    rng: StdRng,
    should_quit: bool,
}

impl App {
    pub fn new(settings: Settings, table: SnippetTable) -> Self {
        Self::with_rng(settings, table, StdRng::from_entropy())
    }

    pub fn with_rng(settings: Settings, table: SnippetTable, mut rng: StdRng) -> Self {
        let session = new_session(&settings, &table, &mut rng);
        let mut countdown = Countdown::new();
        countdown.set_remaining(settings.duration_secs);

        Self {
            settings,
            table,
            session,
            countdown,
            rng,
            should_quit: false,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if let Some(action) = Action::from_key(&key) {
            self.apply(action, now);
        }
    }

    pub fn apply(&mut self, action: Action, now: Instant) {
        match action {
            Action::Type(c) => self.keystroke(Keystroke::Char(c), now),
            Action::Delete => self.keystroke(Keystroke::Delete, now),
            Action::Skip => self.skip(),
            Action::Reset => self.reset(),
            Action::NextLanguage => self.cycle_language(),
            Action::ToggleMode => self.toggle_mode(),
            Action::NextDuration => self.cycle_duration(),
            Action::Quit => self.should_quit = true,
        }
    }

    fn keystroke(&mut self, key: Keystroke, now: Instant) {
        match self.session.keystroke(key, now) {
            Transition::Started => self.on_started(now),
            Transition::Finished => self.on_finished(),
            _ => {}
        }
    }

    /// Explicit start, equivalent to the first keystroke
    pub fn start(&mut self, now: Instant) {
        if self.session.start(now) {
            self.on_started(now);
        }
    }

    fn on_started(&mut self, now: Instant) {
        if self.settings.mode == Mode::Time {
            self.countdown.arm(self.settings.duration_secs, now);
        }
    }

    fn on_finished(&mut self) {
        self.countdown.cancel();
        if let Some(results) = self.session.results() {
            info!(
                "{} {} test: {} wpm, {}% accuracy, {} errors",
                self.settings.language, self.settings.mode, results.wpm, results.accuracy, results.errors
            );
        }
    }

    /// Advance the countdown. Returns true when something visible changed.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        if !self.session.is_running() {
            return false;
        }

        match self.countdown.on_tick(now) {
            TickOutcome::Idle | TickOutcome::Pending => false,
            TickOutcome::Second(_) => true,
            TickOutcome::Expired => {
                self.session.finish(now);
                self.on_finished();
                true
            }
        }
    }

    /// Throw away the current session and start over with a fresh snippet
    pub fn reset(&mut self) {
        self.countdown.set_remaining(self.settings.duration_secs);
        self.session = new_session(&self.settings, &self.table, &mut self.rng);
        debug!("session reset");
    }

    pub fn skip(&mut self) {
        self.reset();
    }

    pub fn set_language(&mut self, language: Language) {
        if self.settings.language != language {
            self.settings.language = language;
            self.reset();
        }
    }

    pub fn cycle_language(&mut self) {
        self.set_language(self.settings.language.next());
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if self.settings.mode != mode {
            self.settings.mode = mode;
            self.reset();
        }
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(self.settings.mode.toggle());
    }

    pub fn set_duration(&mut self, secs: u64) -> Result<(), SettingsError> {
        let secs = validate_duration(secs)?;
        if self.settings.duration_secs != secs {
            self.settings.duration_secs = secs;
            self.reset();
        }
        Ok(())
    }

    pub fn cycle_duration(&mut self) {
        let next = DURATIONS
            .iter()
            .position(|d| *d == self.settings.duration_secs)
            .map(|i| DURATIONS[(i + 1) % DURATIONS.len()])
            .unwrap_or(DEFAULT_DURATION);

        self.settings.duration_secs = next;
        self.reset();
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.countdown.cancel();
    }
}

fn new_session(settings: &Settings, table: &SnippetTable, rng: &mut StdRng) -> Session {
    Session::new(
        settings.language,
        settings.mode,
        settings.duration_secs,
        table.pick(settings.language, rng),
    )
}
