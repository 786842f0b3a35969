//! The patch command language.
//!
//! Commands are written one per line:
//!
//! ```text
//! DELETE file-pattern
//! UPDATE file-pattern replacement-file
//! ADD    source-file [dest-path]
//! RENAME file-pattern new-name
//! REGEX  file-pattern search-pattern replace-text [flags]
//! ```
//!
//! Lines are split into words with shell quoting rules ([`split_line`]),
//! compiled by a [`Compiler`] into [`Command`] values and collected into a
//! [`CommandSet`]. Every pattern is compiled once, up front; a malformed
//! pattern fails the run before any archive is opened.
//!
//! # Example
//!
//! ```rust
//! use zippatch::command::{CommandSet, Compiler};
//!
//! let commands = CommandSet::from_lines(
//!     "rm '^META-INF/.*\\.SF$'\nregex 'config\\.xml' 'debug=true' 'debug=false'\n",
//!     &Compiler::default(),
//! )?;
//! assert_eq!(commands.len(), 2);
//! # Ok::<(), zippatch::Error>(())
//! ```

mod compiler;
mod flags;
mod kind;
mod operation;
mod set;

pub use compiler::{ArityPolicy, Compiled, Compiler};
pub use flags::RegexFlags;
pub use kind::{ALL_KINDS, CommandKind};
pub use operation::{Command, NamePattern};
pub use set::{CommandSet, split_line};
