//! Ordered collections of compiled commands.

use std::path::Path;

use super::compiler::Compiler;
use super::operation::Command;
use crate::{Error, Result};

/// Splits a raw command line into words using POSIX shell quoting rules.
///
/// Single quotes, double quotes and backslash escapes are honoured; a `#`
/// at the start of a word begins a comment.
///
/// ```rust
/// let words = zippatch::command::split_line(r#"regex 'a b' "x\"y" z\ w"#).unwrap();
/// assert_eq!(words, ["regex", "a b", "x\"y", "z w"]);
/// ```
pub fn split_line(line: &str) -> Result<Vec<String>> {
    shell_words::split(line).map_err(|e| Error::Tokenize {
        input: line.to_string(),
        reason: e.to_string(),
    })
}

/// The ordered commands applied to every archive of a run.
///
/// Order matters: each entry is checked against every command in turn and
/// the effects accumulate.
#[derive(Debug, Clone, Default)]
pub struct CommandSet {
    commands: Vec<Command>,
}

impl CommandSet {
    /// Creates an empty set. Applying it rewrites archives unchanged.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a set from one command line (the `--cmd` form).
    pub fn from_line(line: &str, compiler: &Compiler) -> Result<Self> {
        let words = split_line(line)?;
        let compiled = compiler.compile_line(&words)?;
        Ok(compiled.command.into_iter().collect())
    }

    /// Builds a set from command text, one command per line.
    ///
    /// Blank lines and comment lines (first non-blank character `#`) are
    /// skipped. Errors carry no location; see [`from_file`](Self::from_file).
    pub fn from_lines(text: &str, compiler: &Compiler) -> Result<Self> {
        let mut set = Self::empty();
        for line in text.lines() {
            set.push_line(line, compiler)?;
        }
        Ok(set)
    }

    /// Reads a commands file, one command per line.
    ///
    /// # Errors
    ///
    /// Failures to tokenize or compile a line are reported as
    /// [`Error::CommandFile`] with the one-based line number.
    pub fn from_file(path: impl AsRef<Path>, compiler: &Compiler) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let mut set = Self::empty();
        for (idx, line) in text.lines().enumerate() {
            set.push_line(line, compiler)
                .map_err(|e| e.in_command_file(path, idx + 1))?;
        }
        log::debug!(
            "Loaded {} command(s) from {}",
            set.len(),
            path.display()
        );
        Ok(set)
    }

    /// Compiles a command from the front of positional arguments.
    ///
    /// Returns the set (empty if the words do not start with a usable
    /// command) and the number of words it used; the remaining words are
    /// archive paths.
    pub fn from_args<S: AsRef<str>>(words: &[S], compiler: &Compiler) -> Result<(Self, usize)> {
        let compiled = compiler.compile(words)?;
        Ok((compiled.command.into_iter().collect(), compiled.consumed))
    }

    fn push_line(&mut self, line: &str, compiler: &Compiler) -> Result<()> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(());
        }
        let words = split_line(trimmed)?;
        if let Some(command) = compiler.compile_line(&words)?.command {
            self.commands.push(command);
        }
        Ok(())
    }

    /// Appends a compiled command.
    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Returns the number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns whether the set holds no commands.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Iterates over all commands in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Command> {
        self.commands.iter()
    }

    /// Iterates over the commands applied to each entry.
    pub fn entry_commands(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter().filter(|c| !c.is_archive_level())
    }

    /// Iterates over the commands applied once per archive.
    pub fn archive_commands(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter().filter(|c| c.is_archive_level())
    }
}

impl FromIterator<Command> for CommandSet {
    fn from_iter<I: IntoIterator<Item = Command>>(iter: I) -> Self {
        Self {
            commands: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CommandSet {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}
