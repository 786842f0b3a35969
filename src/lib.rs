//! # zippatch
//!
//! Scripted batch editing of zip archives (including jar, war and other
//! zip-based formats).
//!
//! A small command language describes what should happen to the entries of
//! an archive. The same commands are then applied to any number of
//! archives, each of which is rewritten in full and atomically replaced.
//!
//! ## Commands
//!
//! | Command | Aliases | Effect |
//! |---------|---------|--------|
//! | `DELETE pattern` | `remove`, `del`, `rm` | Drop matching entries |
//! | `UPDATE pattern file` | `replace` | Replace matching entries with a file from disk |
//! | `ADD file [dest]` | `new` | Append a file from disk |
//! | `RENAME pattern name` | `move`, `ren`, `mv` | Rename matching entries |
//! | `REGEX pattern search replace [flags]` | | Search and replace inside matching entries |
//!
//! Entry patterns are regular expressions anchored at the start of the entry
//! name. See [`command`] for the full grammar.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use zippatch::{BatchRunner, Result};
//! use zippatch::command::{CommandSet, Compiler};
//!
//! fn main() -> Result<()> {
//!     let commands = CommandSet::from_file("fix-jars.txt", &Compiler::default())?;
//!     let report = BatchRunner::new(&commands).run(["app.jar", "lib.jar"])?;
//!     if report.has_warnings() {
//!         eprintln!("finished with warnings");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Working in Memory
//!
//! The transformation itself does not care where entries come from:
//!
//! ```rust
//! use zippatch::command::{CommandSet, Compiler};
//! use zippatch::transform::{ArchiveEntry, ArchiveTransformer, FileSystem};
//!
//! let commands = CommandSet::from_line("regex '.*\\.properties' 'env=dev' 'env=prod'", &Compiler::default())?;
//! let out = ArchiveTransformer::new(&commands, FileSystem).transform(vec![
//!     ArchiveEntry::new("app.properties", "env=dev\n"),
//! ])?;
//! assert_eq!(out.entries[0].data, b"env=prod\n");
//! # Ok::<(), zippatch::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli` | Yes | The `zippatch` command line tool |

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod batch;
pub mod command;
pub mod container;
pub mod error;
pub mod transform;

pub use batch::{ArchiveOutcome, BatchReport, BatchRunner, Destination};
pub use command::{ArityPolicy, Command, CommandSet, Compiler};
pub use container::{CompressionMethod, WriteOptions};
pub use error::{Error, Result};
pub use transform::{ArchiveEntry, ArchiveTransformer, TransformStats};
