use std::time::Instant;

use crate::session::Mode;

/// Characters that make up one "word" for wpm purposes
pub const CHARS_PER_WORD: f64 = 5.0;

/// Final numbers for a finished session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Results {
    pub wpm: u32,
    pub accuracy: u32,
    pub errors: usize,
}

/// Minutes the session counts as having lasted. Timed sessions always count
/// the full configured duration.
pub fn elapsed_minutes(
    mode: Mode,
    duration_secs: u64,
    started_at: Option<Instant>,
    finished_at: Instant,
) -> f64 {
    match mode {
        Mode::Time => duration_secs as f64 / 60.0,
        Mode::Full => started_at
            .map(|start| finished_at.saturating_duration_since(start).as_millis() as f64 / 60_000.0)
            .unwrap_or(0.0),
    }
}

pub fn score(typed_len: usize, errors: usize, elapsed_minutes: f64) -> Results {
    if elapsed_minutes <= 0.0 {
        return Results {
            wpm: 0,
            accuracy: 100,
            errors,
        };
    }

    let words_typed = typed_len as f64 / CHARS_PER_WORD;
    let wpm = (words_typed / elapsed_minutes).round() as u32;

    Results {
        wpm,
        accuracy: accuracy(typed_len, errors),
        errors,
    }
}

/// Share of typed characters that were right when typed, clamped at zero
/// since deleted mistakes still count.
pub fn accuracy(typed_len: usize, errors: usize) -> u32 {
    if typed_len == 0 {
        return 100;
    }

    let pct = ((typed_len as f64 - errors as f64) / typed_len as f64) * 100.0;
    pct.round().max(0.0) as u32
}
