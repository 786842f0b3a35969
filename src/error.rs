//! Error types for archive patching.
//!
//! This module provides the [`Error`] enum which represents every fatal
//! failure mode of a patch run, along with a convenient [`Result<T>`] alias.
//!
//! Problems that only affect a single item (an archive path that does not
//! exist, an `UPDATE`/`ADD` source file that is missing) are not errors: they
//! are logged and counted in the run report while the batch continues.
//!
//! # Example
//!
//! ```rust
//! use zippatch::{Error, command::Compiler};
//!
//! let compiler = Compiler::default();
//! match compiler.compile_line(&["delete", "[unclosed"]) {
//!     Err(Error::InvalidRegex { pattern, .. }) => assert_eq!(pattern, "[unclosed"),
//!     other => panic!("unexpected result: {:?}", other.map(|c| c.consumed)),
//! }
//! ```

use std::io;
use std::path::PathBuf;

/// The main error type for patch operations.
///
/// # Error Categories
///
/// | Category | Variants | Typical Cause |
/// |----------|----------|---------------|
/// | I/O | [`Io`][Self::Io] | File system operations |
/// | Container | [`Zip`][Self::Zip] | Unreadable or unwritable zip archive |
/// | Commands | [`InvalidRegex`][Self::InvalidRegex], [`InvalidFlag`][Self::InvalidFlag], [`MissingArguments`][Self::MissingArguments], [`Tokenize`][Self::Tokenize], [`CommandFile`][Self::CommandFile] | Malformed command text |
/// | Options | [`InvalidCompressionLevel`][Self::InvalidCompressionLevel] | Bad write configuration |
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The zip library failed to read or write an archive.
    ///
    /// This covers archives that are not zip files, truncated central
    /// directories and unsupported compression methods.
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A pattern in a command could not be compiled.
    ///
    /// Patterns are compiled once, when the command is compiled. A malformed
    /// pattern aborts the whole run before any archive is touched.
    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidRegex {
        /// The invalid regex pattern.
        pattern: String,
        /// Description of why the pattern is invalid.
        reason: String,
    },

    /// The flags word of a `REGEX` command contains an unknown flag.
    #[error("Invalid regex flag '{flag}' in '{flags}': expected any of M, U, I")]
    InvalidFlag {
        /// The offending flag character.
        flag: char,
        /// The full flags word.
        flags: String,
    },

    /// A command was given fewer arguments than it requires.
    ///
    /// Only returned under [`ArityPolicy::Strict`]; the legacy policy skips
    /// such lines silently.
    ///
    /// [`ArityPolicy::Strict`]: crate::command::ArityPolicy::Strict
    #[error("{command} requires {expected} argument(s), got {found}")]
    MissingArguments {
        /// Canonical command name.
        command: &'static str,
        /// Number of required arguments.
        expected: usize,
        /// Number of arguments supplied.
        found: usize,
    },

    /// A command line could not be split into words.
    #[error("Cannot tokenize command line '{input}': {reason}")]
    Tokenize {
        /// The raw command line.
        input: String,
        /// Description of the quoting problem.
        reason: String,
    },

    /// A line of a commands file failed to compile.
    #[error("{}:{line}: {source}", path.display())]
    CommandFile {
        /// The commands file.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// The underlying failure.
        #[source]
        source: Box<Error>,
    },

    /// An invalid compression level was provided.
    #[error("invalid compression level {level}: must be 0-9")]
    InvalidCompressionLevel {
        /// The invalid level that was provided.
        level: u32,
    },
}

impl Error {
    /// Returns `true` if this error was caused by malformed command text.
    ///
    /// Command errors are detected before any archive is opened, so a run
    /// that fails with one has not modified anything.
    pub fn is_command_error(&self) -> bool {
        match self {
            Error::InvalidRegex { .. }
            | Error::InvalidFlag { .. }
            | Error::MissingArguments { .. }
            | Error::Tokenize { .. } => true,
            Error::CommandFile { source, .. } => source.is_command_error(),
            _ => false,
        }
    }

    /// Returns `true` if the zip library rejected an archive.
    pub fn is_archive_error(&self) -> bool {
        match self {
            Error::Zip(zip::result::ZipError::Io(_)) => false,
            Error::Zip(_) => true,
            _ => false,
        }
    }

    /// Creates an InvalidRegex error from a regex compilation failure.
    pub fn invalid_regex(pattern: impl Into<String>, err: &regex::Error) -> Self {
        Error::InvalidRegex {
            pattern: pattern.into(),
            reason: err.to_string(),
        }
    }

    /// Wraps an error with the commands-file location it came from.
    pub fn in_command_file(self, path: impl Into<PathBuf>, line: usize) -> Self {
        Error::CommandFile {
            path: path.into(),
            line,
            source: Box::new(self),
        }
    }
}

/// A specialized Result type for patch operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_from() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_invalid_regex() {
        let err = Error::InvalidRegex {
            pattern: "[invalid".into(),
            reason: "unclosed bracket".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("[invalid"), "Should show pattern");
        assert!(msg.contains("unclosed bracket"), "Should show reason");
        assert!(err.is_command_error());
    }

    #[test]
    fn test_invalid_regex_from_regex_error() {
        let regex_err = regex::Regex::new("(").unwrap_err();
        let err = Error::invalid_regex("(", &regex_err);
        assert!(matches!(err, Error::InvalidRegex { ref pattern, .. } if pattern == "("));
    }

    #[test]
    fn test_invalid_flag() {
        let err = Error::InvalidFlag {
            flag: 'x',
            flags: "Ix".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'x'"));
        assert!(msg.contains("Ix"));
    }

    #[test]
    fn test_missing_arguments() {
        let err = Error::MissingArguments {
            command: "RENAME",
            expected: 2,
            found: 1,
        };
        assert_eq!(err.to_string(), "RENAME requires 2 argument(s), got 1");
        assert!(err.is_command_error());
    }

    #[test]
    fn test_command_file_keeps_source_chain() {
        let err = Error::Tokenize {
            input: "rm 'open".into(),
            reason: "missing closing quote".into(),
        }
        .in_command_file("cmds.txt", 3);

        let msg = err.to_string();
        assert!(msg.starts_with("cmds.txt:3:"), "got: {msg}");
        assert!(err.is_command_error());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_zip_error_classification() {
        let err: Error = zip::result::ZipError::InvalidArchive("bad magic".into()).into();
        assert!(err.is_archive_error());
        assert!(!err.is_command_error());

        let err: Error =
            zip::result::ZipError::Io(io::Error::new(io::ErrorKind::Other, "disk")).into();
        assert!(!err.is_archive_error());
    }

    #[test]
    fn test_invalid_compression_level() {
        let err = Error::InvalidCompressionLevel { level: 15 };
        assert!(err.to_string().contains("15"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
