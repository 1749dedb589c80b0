//! Exit codes for the `c2g` CLI.
//!
//! Exit code ranges:
//! - 0: Configuration is valid
//! - 10-19: User/input errors (recoverable by fixing properties or arguments)
//! - 20-29: Runtime failures; 20 is a bug to report, 21 an I/O failure to retry

use c2g_common::{Error, ErrorCategory};

/// Exit codes for `c2g` operations.
///
/// These codes are a stable contract for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success: configuration resolved
    Clean = 0,

    // ========================================================================
    // User / Input Errors (10-19)
    // ========================================================================
    /// Job configuration rejected or properties file malformed
    ConfigError = 10,

    /// Invalid arguments (e.g. malformed --prop override)
    ArgsError = 11,

    // ========================================================================
    // Runtime Failures (20-29)
    // ========================================================================
    /// Internal error (bug - please report)
    InternalError = 20,

    /// Properties file unreadable or output not serializable; retryable
    IoError = 21,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Stable name of the code, as shown in diagnostics.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err.category() {
            ErrorCategory::Config => ExitCode::ConfigError,
            ErrorCategory::Input => ExitCode::ArgsError,
            ErrorCategory::Internal => ExitCode::InternalError,
            ErrorCategory::Io => ExitCode::IoError,
        }
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ExitCode::Clean.as_i32(), 0);
        assert_eq!(ExitCode::ConfigError.as_i32(), 10);
        assert_eq!(ExitCode::ArgsError.as_i32(), 11);
        assert_eq!(ExitCode::InternalError.as_i32(), 20);
        assert_eq!(ExitCode::IoError.as_i32(), 21);
    }

    #[test]
    fn test_io_failures_are_retryable_not_bugs() {
        let err = Error::Read {
            path: "/nope".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(ExitCode::from(&err), ExitCode::IoError);
        assert!(err.is_recoverable());
        assert_ne!(ExitCode::from(&err), ExitCode::from(&Error::Internal("x".into())));
    }

    #[test]
    fn test_from_error() {
        let err = Error::InvalidJobConfig { problems: vec![] };
        assert_eq!(ExitCode::from(&err), ExitCode::ConfigError);
        let err = Error::InvalidOverride("x".into());
        assert_eq!(ExitCode::from(&err), ExitCode::ArgsError);
        let err = Error::Internal("x".into());
        assert_eq!(ExitCode::from(&err), ExitCode::InternalError);
        let err = Error::Read {
            path: "p".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(ExitCode::from(&err), ExitCode::IoError);
    }

    #[test]
    fn test_display() {
        assert_eq!(ExitCode::ConfigError.to_string(), "ERR_CONFIG (10)");
    }
}
