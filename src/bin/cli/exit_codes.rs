//! Exit codes for the CLI tool.

use zippatch::{BatchReport, Error};

/// Exit code constants
pub const SUCCESS: i32 = 0;
/// Run completed but something was skipped
pub const WARNING: i32 = 1;
/// Fatal error occurred
pub const FATAL_ERROR: i32 = 2;
/// Input is not a readable zip archive
pub const BAD_ARCHIVE: i32 = 3;
/// I/O error
pub const IO_ERROR: i32 = 5;
/// Ctrl+C (128 + SIGINT)
pub const USER_INTERRUPT: i32 = 130;
/// Invalid command line arguments or commands
pub const BAD_ARGS: i32 = 255;

/// Exit code enum for structured handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    Warning,
    FatalError,
    BadArchive,
    IoError,
    BadArgs,
}

impl ExitCode {
    /// Returns the numeric exit code
    pub fn code(self) -> i32 {
        match self {
            Self::Success => SUCCESS,
            Self::Warning => WARNING,
            Self::FatalError => FATAL_ERROR,
            Self::BadArchive => BAD_ARCHIVE,
            Self::IoError => IO_ERROR,
            Self::BadArgs => BAD_ARGS,
        }
    }
}

/// Converts a zippatch error to an exit code
pub fn error_to_exit_code(error: &Error) -> ExitCode {
    if error.is_command_error() {
        return ExitCode::BadArgs;
    }
    match error {
        Error::Io(_) => ExitCode::IoError,
        Error::Zip(zip::result::ZipError::Io(_)) => ExitCode::IoError,
        Error::Zip(_) => ExitCode::BadArchive,
        Error::InvalidCompressionLevel { .. } => ExitCode::BadArgs,
        // Future error variants - required by #[non_exhaustive]
        _ => ExitCode::FatalError,
    }
}

/// Picks the exit code of a finished run
pub fn report_to_exit_code(report: &BatchReport) -> ExitCode {
    if report.has_warnings() {
        ExitCode::Warning
    } else {
        ExitCode::Success
    }
}
