use crate::severity::LogSeverity;
use crate::time::now;
use once_cell::sync::Lazy;
use std::env;
use std::sync::atomic::{AtomicU8, Ordering};

/// Environment variable holding the initial threshold, e.g. `STRATA_LOG=debug`.
pub const LOG_ENV_VAR: &str = "STRATA_LOG";

static MAX_SEVERITY: Lazy<AtomicU8> = Lazy::new(|| {
    let initial = env::var(LOG_ENV_VAR)
        .ok()
        .and_then(|value| value.parse::<LogSeverity>().ok())
        .unwrap_or(LogSeverity::Info);
    AtomicU8::new(initial.as_u8())
});

/// Lowest severity that is still printed.
pub fn max_severity() -> LogSeverity {
    LogSeverity::from_u8(MAX_SEVERITY.load(Ordering::Relaxed))
}

pub fn set_max_severity(severity: LogSeverity) {
    MAX_SEVERITY.store(severity.as_u8(), Ordering::Relaxed);
}

pub fn enabled(severity: LogSeverity) -> bool {
    severity >= max_severity()
}

pub fn log(msg: String, log_severity: LogSeverity) {
    if enabled(log_severity) {
        eprintln!("[{}] {} {}", log_severity, now(), msg);
    }
}
