// Library surface for headless/integration tests and reuse.
// The binary in main.rs only adds the CLI and the terminal loop.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod countdown;
pub mod highlight;
pub mod logging;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod snippets;
pub mod ui;

/// How often the event loop wakes up when no input arrives
pub const TICK_RATE_MS: u64 = 100;
