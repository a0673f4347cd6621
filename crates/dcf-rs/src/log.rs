// crates/dcf-rs/src/log.rs

use alloc::format;
use alloc::string::String;

/// Trait for structs that provide metadata for logging
pub trait LogMetadata {
    fn meta(&self) -> String;
}

/// Identifies which parse stage emitted a log line, and for which input.
pub struct LogContext<'a> {
    pub stage: &'static str,
    pub source: &'a str,
}

impl LogMetadata for LogContext<'_> {
    fn meta(&self) -> String {
        format!("stage={}, source={}", self.stage, self.source)
    }
}

// =============================================
// Logging Macros (namespaced under crate::log)
// =============================================

// ===== dcf_debug! =====
macro_rules! dcf_debug {
    ($ctx:expr, $fmt:literal $(, $($arg:tt)+)?) => {{
        let meta = $crate::log::LogMetadata::meta(&$ctx);
        ::log::debug!(concat!("[{}] ", $fmt), meta $(, $($arg)+)?);
    }};
    ($fmt:literal $(, $($arg:tt)+)?) => {{
        ::log::debug!($fmt $(, $($arg)+)?);
    }};
}

// ===== dcf_trace! =====
macro_rules! dcf_trace {
    ($ctx:expr, $fmt:literal $(, $($arg:tt)+)?) => {{
        let meta = $crate::log::LogMetadata::meta(&$ctx);
        ::log::trace!(concat!("[{}] ", $fmt), meta $(, $($arg)+)?);
    }};
    ($fmt:literal $(, $($arg:tt)+)?) => {{
        ::log::trace!($fmt $(, $($arg)+)?);
    }};
}

// Re-export macros for use in other files
pub(crate) use dcf_debug;
pub(crate) use dcf_trace;
