use std::io::{self, IsTerminal, Write};

use log::{Level, LevelFilter, Metadata, Record};

const LOG_ENV: &str = "MBRINFO_LOG";

trait IntoColor {
    fn into_color(self) -> &'static str;
}

impl IntoColor for Level {
    fn into_color(self) -> &'static str {
        match self {
            Level::Trace => "\x1b[94m",
            Level::Debug => "\x1b[37m",
            Level::Info => "\x1b[97m",
            Level::Warn => "\x1b[33m",
            Level::Error => "\x1b[31m",
        }
    }
}

const RESET: &str = "\x1b[0m";

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }
    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let mut stderr = io::stderr().lock();
            let level = record.level().as_str().to_ascii_lowercase();
            // nowhere left to report a failed write to stderr
            let _ = if stderr.is_terminal() {
                writeln!(stderr, "{}{}{}: {}", record.level().into_color(), level, RESET, record.args())
            } else {
                writeln!(stderr, "{}: {}", level, record.args())
            };
        }
    }
    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

/// Parses a `MBRINFO_LOG` value; unknown values fall back to `Warn`.
fn level_from_env(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(LevelFilter::Warn)
}

static LOGGER: StderrLogger = StderrLogger;

pub fn init() -> Result<(), log::SetLoggerError> {
    let level = level_from_env(std::env::var(LOG_ENV).ok().as_deref());
    log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}
