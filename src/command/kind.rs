//! Command kinds, their aliases and their help text.

use std::fmt;

/// The five operations understood by the command language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Drop entries whose name matches a pattern.
    Delete,
    /// Replace matching entries with a file from disk.
    Update,
    /// Add a file from disk to the archive.
    Add,
    /// Give matching entries a new literal name.
    Rename,
    /// Search and replace inside the content of matching entries.
    RegexReplace,
}

/// Every kind, in the order they are listed in help output.
pub const ALL_KINDS: [CommandKind; 5] = [
    CommandKind::Delete,
    CommandKind::Update,
    CommandKind::Add,
    CommandKind::Rename,
    CommandKind::RegexReplace,
];

impl CommandKind {
    /// Resolves a command word (case-insensitive) through the alias table.
    ///
    /// ```rust
    /// use zippatch::command::CommandKind;
    ///
    /// assert_eq!(CommandKind::from_alias("MV"), Some(CommandKind::Rename));
    /// assert_eq!(CommandKind::from_alias("copy"), None);
    /// ```
    pub fn from_alias(word: &str) -> Option<Self> {
        ALL_KINDS.into_iter().find(|kind| {
            kind.aliases()
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(word))
        })
    }

    /// All words that select this kind, canonical name first.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            CommandKind::Delete => &["delete", "remove", "del", "rm"],
            CommandKind::Update => &["update", "replace"],
            CommandKind::Add => &["add", "new"],
            CommandKind::Rename => &["rename", "move", "ren", "mv"],
            CommandKind::RegexReplace => &["regex"],
        }
    }

    /// Canonical upper-case name.
    pub fn name(self) -> &'static str {
        match self {
            CommandKind::Delete => "DELETE",
            CommandKind::Update => "UPDATE",
            CommandKind::Add => "ADD",
            CommandKind::Rename => "RENAME",
            CommandKind::RegexReplace => "REGEX",
        }
    }

    /// Number of arguments that must follow the command word.
    pub fn required_args(self) -> usize {
        match self {
            CommandKind::Delete | CommandKind::Add => 1,
            CommandKind::Update | CommandKind::Rename => 2,
            CommandKind::RegexReplace => 3,
        }
    }

    /// Number of optional arguments accepted after the required ones.
    ///
    /// Optional arguments are only read when a whole line holds the command.
    pub fn optional_args(self) -> usize {
        match self {
            CommandKind::Add | CommandKind::RegexReplace => 1,
            _ => 0,
        }
    }

    /// One-line synopsis.
    pub fn usage(self) -> &'static str {
        match self {
            CommandKind::Delete => "DELETE file-pattern",
            CommandKind::Update => "UPDATE file-pattern replacement-file",
            CommandKind::Add => "ADD    source-file [dest-path]",
            CommandKind::Rename => "RENAME file-pattern new-name",
            CommandKind::RegexReplace => "REGEX  file-pattern search-pattern replace-text [flags]",
        }
    }

    /// Long help shown by `--help <command>`.
    pub fn help(self) -> &'static str {
        match self {
            CommandKind::Delete => {
                "Command: DELETE file-pattern

Drops every entry whose name matches the pattern. The pattern is a regular
expression matched from the start of the entry name, so one command can
remove several entries or an entry whose name varies.

Aliases: REMOVE DEL RM"
            }
            CommandKind::Update => {
                "Command: UPDATE file-pattern replacement-file

Replaces the content of every matching entry with a file from disk. The
entry keeps its name and position. Missing replacement files are reported
and the entry is left as it was.

Aliases: REPLACE"
            }
            CommandKind::Add => {
                "Command: ADD source-file [dest-path]

Adds a file from disk. With a dest-path the entry is stored under that
name. Otherwise a relative source path is reused inside the archive and an
absolute source path puts the file at the archive root.

Aliases: NEW"
            }
            CommandKind::Rename => {
                "Command: RENAME file-pattern new-name

Renames every matching entry to new-name, which is used literally and may
include a directory part. Later commands see the new name.

Aliases: MOVE REN MV"
            }
            CommandKind::RegexReplace => {
                "Command: REGEX file-pattern search-pattern replace-text [flags]

Runs a regular expression search and replace over the content of every
matching entry. replace-text is inserted literally.

Flags
 M  multi-line: ^ and $ match at line breaks and . matches newlines
 U  Unicode-aware matching
 I  case-insensitive search"
            }
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_resolve_case_insensitively() {
        for kind in ALL_KINDS {
            for alias in kind.aliases() {
                assert_eq!(CommandKind::from_alias(alias), Some(kind));
                assert_eq!(
                    CommandKind::from_alias(&alias.to_uppercase()),
                    Some(kind)
                );
            }
        }
        assert_eq!(CommandKind::from_alias("Rm"), Some(CommandKind::Delete));
    }

    #[test]
    fn test_unknown_alias() {
        assert_eq!(CommandKind::from_alias(""), None);
        assert_eq!(CommandKind::from_alias("copy"), None);
        assert_eq!(CommandKind::from_alias("deletes"), None);
    }

    #[test]
    fn test_required_args() {
        assert_eq!(CommandKind::Delete.required_args(), 1);
        assert_eq!(CommandKind::Update.required_args(), 2);
        assert_eq!(CommandKind::Add.required_args(), 1);
        assert_eq!(CommandKind::Rename.required_args(), 2);
        assert_eq!(CommandKind::RegexReplace.required_args(), 3);
    }

    #[test]
    fn test_help_mentions_name() {
        for kind in ALL_KINDS {
            assert!(kind.help().contains(kind.name()));
            assert!(kind.usage().starts_with(kind.name()));
        }
    }
}
