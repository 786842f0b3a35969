//! Compiled commands.

use std::fmt;
use std::path::{Path, PathBuf};

use regex::Regex;

use super::flags::RegexFlags;
use super::kind::CommandKind;
use crate::{Error, Result};

/// A compiled entry-name pattern.
///
/// Matches from the start of the entry name: `foo\.txt` selects `foo.txt`
/// and `foo.txt.bak` but not `old/foo.txt`. Anchor the end with `$` to
/// require a full match.
#[derive(Debug, Clone)]
pub struct NamePattern {
    source: String,
    regex: Regex,
}

impl NamePattern {
    /// Compiles a name pattern.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRegex`] if the pattern is malformed.
    pub fn new(pattern: &str) -> Result<Self> {
        // Compile on its own first so the error message refers to the user's text.
        Regex::new(pattern).map_err(|e| Error::invalid_regex(pattern, &e))?;
        let regex = Regex::new(&format!("^(?:{pattern})"))
            .map_err(|e| Error::invalid_regex(pattern, &e))?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Returns whether the entry name matches.
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// Returns the pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// A compiled operation to apply to archives.
#[derive(Debug, Clone)]
pub enum Command {
    /// Drop matching entries.
    Delete {
        /// Entries to drop.
        pattern: NamePattern,
    },
    /// Replace matching entries with a file from disk.
    Update {
        /// Entries to replace.
        pattern: NamePattern,
        /// File whose bytes become the entry content.
        source: PathBuf,
    },
    /// Add a file from disk after all existing entries.
    Add {
        /// File to add.
        source: PathBuf,
        /// Entry name; derived from `source` when absent.
        dest: Option<String>,
    },
    /// Rename matching entries.
    Rename {
        /// Entries to rename.
        pattern: NamePattern,
        /// Literal new name.
        new_name: String,
    },
    /// Search and replace inside matching entries.
    RegexReplace {
        /// Entries to edit.
        pattern: NamePattern,
        /// Content search, compiled with `flags`.
        search: regex::bytes::Regex,
        /// Literal replacement text.
        replacement: String,
        /// Flags the search was compiled with.
        flags: RegexFlags,
    },
}

impl Command {
    /// Returns the kind of this command.
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Delete { .. } => CommandKind::Delete,
            Command::Update { .. } => CommandKind::Update,
            Command::Add { .. } => CommandKind::Add,
            Command::Rename { .. } => CommandKind::Rename,
            Command::RegexReplace { .. } => CommandKind::RegexReplace,
        }
    }

    /// Returns the name pattern, or `None` for archive-level commands.
    pub fn pattern(&self) -> Option<&NamePattern> {
        match self {
            Command::Delete { pattern }
            | Command::Update { pattern, .. }
            | Command::Rename { pattern, .. }
            | Command::RegexReplace { pattern, .. } => Some(pattern),
            Command::Add { .. } => None,
        }
    }

    /// Returns whether this command applies to an entry with the given name.
    ///
    /// Archive-level commands never match individual entries.
    pub fn matches(&self, name: &str) -> bool {
        self.pattern().is_some_and(|p| p.matches(name))
    }

    /// Returns whether this command runs once per archive rather than per entry.
    pub fn is_archive_level(&self) -> bool {
        matches!(self, Command::Add { .. })
    }

    /// Returns the disk file this command reads, if any.
    pub fn source_file(&self) -> Option<&Path> {
        match self {
            Command::Update { source, .. } | Command::Add { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Delete { pattern } => write!(f, "DELETE {pattern}"),
            Command::Update { pattern, source } => {
                write!(f, "UPDATE {pattern} {}", source.display())
            }
            Command::Add { source, dest } => {
                write!(f, "ADD {}", source.display())?;
                if let Some(dest) = dest {
                    write!(f, " {dest}")?;
                }
                Ok(())
            }
            Command::Rename { pattern, new_name } => write!(f, "RENAME {pattern} {new_name}"),
            Command::RegexReplace {
                pattern,
                search,
                replacement,
                flags,
            } => {
                write!(f, "REGEX {pattern} {} {replacement}", search.as_str())?;
                if !flags.is_empty() {
                    write!(f, " {flags}")?;
                }
                Ok(())
            }
        }
    }
}
