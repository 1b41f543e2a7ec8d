use std::time::Instant;

use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::scoring::{self, Results};
use crate::snippets::Language;

/// How a session ends
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    ValueEnum,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    /// ends when the countdown runs out
    #[default]
    Time,
    /// ends when the whole snippet has been typed
    Full,
}

impl Mode {
    pub fn toggle(self) -> Self {
        match self {
            Mode::Time => Mode::Full,
            Mode::Full => Mode::Time,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Waiting,
    Running,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keystroke {
    Char(char),
    Delete,
}

/// What a keystroke did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Ignored,
    Started,
    Typed { correct: bool },
    Deleted,
    Finished,
}

/// One typing attempt over a single snippet
#[derive(Debug, Clone)]
pub struct Session {
    language: Language,
    mode: Mode,
    duration_secs: u64,
    snippet: String,
    snippet_len: usize,
    typed: String,
    typed_len: usize,
    error_count: usize,
    started_at: Option<Instant>,
    status: Status,
    results: Option<Results>,
}

impl Session {
    pub fn new(language: Language, mode: Mode, duration_secs: u64, snippet: impl Into<String>) -> Self {
        let snippet = snippet.into();
        Self {
            language,
            mode,
            duration_secs,
            snippet_len: snippet.chars().count(),
            snippet,
            typed: String::new(),
            typed_len: 0,
            error_count: 0,
            started_at: None,
            status: Status::Waiting,
            results: None,
        }
    }

    /// Move from waiting to running. Returns false in any other state.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.status != Status::Waiting {
            return false;
        }

        self.status = Status::Running;
        self.started_at = Some(now);
        debug!(
            "session started: {} / {} / {}s",
            self.language, self.mode, self.duration_secs
        );
        true
    }

    /// Apply one keystroke. The keystroke that starts a waiting session is
    /// consumed by the start.
    pub fn keystroke(&mut self, key: Keystroke, now: Instant) -> Transition {
        match self.status {
            Status::Finished => Transition::Ignored,
            Status::Waiting => {
                self.start(now);
                Transition::Started
            }
            Status::Running => match key {
                Keystroke::Delete => self.delete(),
                Keystroke::Char(c) => self.write(c, now),
            },
        }
    }

    fn write(&mut self, c: char, now: Instant) -> Transition {
        let Some(expected) = self.expected_char(self.typed_len) else {
            return Transition::Ignored;
        };

        let correct = c == expected;
        if !correct {
            self.error_count += 1;
        }
        self.typed.push(c);
        self.typed_len += 1;

        if self.mode == Mode::Full && self.typed_len == self.snippet_len {
            self.finish(now);
            return Transition::Finished;
        }

        Transition::Typed { correct }
    }

    fn delete(&mut self) -> Transition {
        if self.typed.pop().is_some() {
            self.typed_len -= 1;
            Transition::Deleted
        } else {
            Transition::Ignored
        }
    }

    /// Move from running to finished and compute the results
    pub fn finish(&mut self, now: Instant) -> Option<Results> {
        if self.status != Status::Running {
            return None;
        }

        let minutes = scoring::elapsed_minutes(self.mode, self.duration_secs, self.started_at, now);
        let results = scoring::score(self.typed_len, self.error_count, minutes);

        self.status = Status::Finished;
        self.results = Some(results);
        debug!(
            "session finished after {:.2} min: {} typed, {} errors",
            minutes, self.typed_len, self.error_count
        );
        Some(results)
    }

    pub fn expected_char(&self, idx: usize) -> Option<char> {
        self.snippet.chars().nth(idx)
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn snippet(&self) -> &str {
        &self.snippet
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    pub fn typed_len(&self) -> usize {
        self.typed_len
    }

    pub fn snippet_len(&self) -> usize {
        self.snippet_len
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn results(&self) -> Option<Results> {
        self.results
    }

    pub fn is_running(&self) -> bool {
        self.status == Status::Running
    }

    pub fn is_finished(&self) -> bool {
        self.status == Status::Finished
    }
}
