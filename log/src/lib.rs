use std::{fmt::Display, str::FromStr};

use backtrace::Backtrace;
use tracing::{debug, error, info, level_filters::LevelFilter, trace, warn};

pub fn init(display_level: &bool, level_filter: &str) -> Result<(), String> {
    let level_filter = parse_level_filter(level_filter)?;

    tracing_subscriber::fmt()
        .with_level(*display_level)
        .with_max_level(level_filter)
        .try_init()
        .map_err(|err| err.to_string())
}

fn parse_level_filter(level_filter: &str) -> Result<LevelFilter, String> {
    LevelFilter::from_str(level_filter.trim())
        .map_err(|err| format!("Invalid log level filter '{level_filter}': {err}"))
}

pub fn trace<T: Display>(prefix: Option<&str>, msg: T) {
    trace!("{} {msg}", prefix.unwrap_or("🐾"));
}

pub fn debug<T: Display>(prefix: Option<&str>, msg: T) {
    debug!("{} {msg}", prefix.unwrap_or("🐞"));
}

pub fn info<T: Display>(prefix: Option<&str>, msg: T) {
    info!("{} {msg}", prefix.unwrap_or("📢"));
}

pub fn warn<T: Display>(prefix: Option<&str>, msg: T) {
    warn!("{} {msg}", prefix.unwrap_or("⚠️"));
}

pub fn error<T: Display>(prefix: Option<&str>, msg: T) {
    let prefix = prefix.unwrap_or("🚨");
    if backtrace_enabled() {
        error!("{prefix} {msg}\n{:?}", Backtrace::new());
    } else {
        error!("{prefix} {msg}");
    }
}

pub fn panic<T: Display>(prefix: Option<&str>, msg: T) -> ! {
    panic!("{} {msg}", prefix.unwrap_or("☠️"))
}

fn backtrace_enabled() -> bool {
    std::env::var("RUST_BACKTRACE").is_ok_and(|var| var == "1" || var == "full")
}
