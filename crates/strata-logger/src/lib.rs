pub mod log;
pub mod severity;
pub mod time;

pub use log::{enabled, log, max_severity, set_max_severity};
pub use severity::LogSeverity;
