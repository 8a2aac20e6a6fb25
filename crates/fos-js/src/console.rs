//! Console API
//!
//! `console.log`, `console.warn`, `console.error`, etc. Messages go to
//! `tracing` and are kept in the script outcome.

/// Console method that produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLevel {
    Log,
    Info,
    Warn,
    Error,
    Debug,
}

impl ConsoleLevel {
    /// Console method name to level
    pub fn from_method(name: &str) -> Option<Self> {
        Some(match name {
            "log" => Self::Log,
            "info" => Self::Info,
            "warn" => Self::Warn,
            "error" => Self::Error,
            "debug" => Self::Debug,
            _ => return None,
        })
    }
}

/// A single console call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleMessage {
    pub level: ConsoleLevel,
    pub text: String,
}

/// Log values with a specific level
pub(crate) fn log_with_level(level: ConsoleLevel, values: &[String]) -> ConsoleMessage {
    let output = values.join(" ");

    match level {
        ConsoleLevel::Error => tracing::error!("[JS] {}", output),
        ConsoleLevel::Warn => tracing::warn!("[JS] {}", output),
        ConsoleLevel::Debug => tracing::debug!("[JS] {}", output),
        ConsoleLevel::Log | ConsoleLevel::Info => tracing::info!("[JS] {}", output),
    }

    ConsoleMessage { level, text: output }
}
