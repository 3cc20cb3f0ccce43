//! Logging abstraction
//!
//! Unified logging macros that work across targets:
//! - Embedded (`defmt` feature): forwards to defmt
//! - Host tests: `println!` with a level prefix
//! - Host non-test: arguments are evaluated and discarded
//!
//! Logging is for diagnostics only. Command replies, help text and CSV
//! rows go to the console sink handed to each behavior, never through
//! these macros.
//!
//! Arguments must be printable by both `core::fmt` and defmt, so log
//! integers, floats, `&str` and types deriving `defmt::Format`.
//!
//! The backend is chosen when this crate is compiled, so callers in other
//! crates get the same behavior without declaring a `defmt` feature.

#[cfg(feature = "defmt")]
#[doc(hidden)]
#[macro_export]
macro_rules! __log_backend {
    (info, $prefix:literal, $($arg:tt)*) => { ::defmt::info!($($arg)*) };
    (warn, $prefix:literal, $($arg:tt)*) => { ::defmt::warn!($($arg)*) };
    (error, $prefix:literal, $($arg:tt)*) => { ::defmt::error!($($arg)*) };
    (debug, $prefix:literal, $($arg:tt)*) => { ::defmt::debug!($($arg)*) };
    (trace, $prefix:literal, $($arg:tt)*) => { ::defmt::trace!($($arg)*) };
}

#[cfg(all(not(feature = "defmt"), test))]
#[doc(hidden)]
#[macro_export]
macro_rules! __log_backend {
    (error, $prefix:literal, $($arg:tt)*) => {
        eprintln!("[{}] {}", $prefix, format!($($arg)*))
    };
    ($level:ident, $prefix:literal, $($arg:tt)*) => {
        println!("[{}] {}", $prefix, format!($($arg)*))
    };
}

#[cfg(all(not(feature = "defmt"), not(test)))]
#[doc(hidden)]
#[macro_export]
macro_rules! __log_backend {
    ($level:ident, $prefix:literal, $($arg:tt)*) => {{
        let _ = format_args!($($arg)*);
    }};
}

/// Log info message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        $crate::__log_backend!(info, "INFO", $($arg)*);
    }};
}

/// Log warning message
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        $crate::__log_backend!(warn, "WARN", $($arg)*);
    }};
}

/// Log error message
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        $crate::__log_backend!(error, "ERROR", $($arg)*);
    }};
}

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        $crate::__log_backend!(debug, "DEBUG", $($arg)*);
    }};
}

/// Log trace message
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {{
        $crate::__log_backend!(trace, "TRACE", $($arg)*);
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_macros_accept_format_arguments() {
        let left = -40;
        let ratio = 0.99_f32;
        crate::log_info!("throttle {} ratio {}", left, ratio);
        crate::log_warn!("pwm write failed on {}", "left");
        crate::log_error!("unreachable {}", 1);
        crate::log_debug!("tick");
        crate::log_trace!("claimant {}", "Navigator");
    }
}
