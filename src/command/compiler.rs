//! Turns tokenized command lines into [`Command`] values.

use std::path::PathBuf;

use super::flags::RegexFlags;
use super::kind::CommandKind;
use super::operation::{Command, NamePattern};
use crate::{Error, Result};

/// What to do with a command that has too few arguments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArityPolicy {
    /// Skip the line silently and compile nothing.
    #[default]
    Legacy,
    /// Fail the run with [`Error::MissingArguments`].
    Strict,
}

/// The outcome of compiling one word list.
#[derive(Debug, Clone)]
#[must_use]
pub struct Compiled {
    /// The compiled command, or `None` if the words held no usable command.
    pub command: Option<Command>,
    /// Number of leading words that belong to the command.
    pub consumed: usize,
}

impl Compiled {
    fn none() -> Self {
        Self {
            command: None,
            consumed: 0,
        }
    }
}

/// Compiles word lists into commands.
///
/// The compiler is stateless apart from its [`ArityPolicy`]; compiling the
/// same words twice yields equivalent commands.
///
/// ```rust
/// use zippatch::command::{Command, Compiler};
///
/// let compiler = Compiler::default();
/// let compiled = compiler.compile(&["delete", r"foo\.txt", "a.zip"]).unwrap();
/// assert_eq!(compiled.consumed, 2);
/// assert!(matches!(compiled.command, Some(Command::Delete { .. })));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Compiler {
    arity: ArityPolicy,
}

impl Compiler {
    /// Creates a compiler with the given arity policy.
    pub fn new(arity: ArityPolicy) -> Self {
        Self { arity }
    }

    /// Returns the arity policy.
    pub fn arity(&self) -> ArityPolicy {
        self.arity
    }

    /// Compiles the command at the front of `words`.
    ///
    /// Words after the required arguments are left alone (they are usually
    /// archive paths), so optional arguments are never read here. Use
    /// [`compile_line`](Self::compile_line) when the words hold exactly one
    /// command.
    pub fn compile<S: AsRef<str>>(&self, words: &[S]) -> Result<Compiled> {
        self.compile_words(words, false)
    }

    /// Compiles a whole command line, including optional arguments.
    pub fn compile_line<S: AsRef<str>>(&self, words: &[S]) -> Result<Compiled> {
        self.compile_words(words, true)
    }

    fn compile_words<S: AsRef<str>>(&self, words: &[S], with_optional: bool) -> Result<Compiled> {
        let Some(first) = words.first() else {
            return Ok(Compiled::none());
        };
        let Some(kind) = CommandKind::from_alias(first.as_ref()) else {
            log::debug!("Ignoring unknown command '{}'", first.as_ref());
            return Ok(Compiled::none());
        };

        let required = kind.required_args();
        if words.len() <= required {
            return match self.arity {
                ArityPolicy::Legacy => {
                    log::debug!(
                        "Skipping {}: needs {} argument(s), got {}",
                        kind,
                        required,
                        words.len() - 1
                    );
                    Ok(Compiled::none())
                }
                ArityPolicy::Strict => Err(Error::MissingArguments {
                    command: kind.name(),
                    expected: required,
                    found: words.len() - 1,
                }),
            };
        }

        let word = |i: usize| words[i].as_ref();
        let optional = |i: usize| {
            if with_optional && i <= required + kind.optional_args() {
                words.get(i).map(|w| w.as_ref())
            } else {
                None
            }
        };

        let (command, consumed) = match kind {
            CommandKind::Delete => (
                Command::Delete {
                    pattern: NamePattern::new(word(1))?,
                },
                2,
            ),
            CommandKind::Update => (
                Command::Update {
                    pattern: NamePattern::new(word(1))?,
                    source: PathBuf::from(word(2)),
                },
                3,
            ),
            CommandKind::Add => {
                let dest = optional(2).map(str::to_string);
                let consumed = if dest.is_some() { 3 } else { 2 };
                (
                    Command::Add {
                        source: PathBuf::from(word(1)),
                        dest,
                    },
                    consumed,
                )
            }
            CommandKind::Rename => (
                Command::Rename {
                    pattern: NamePattern::new(word(1))?,
                    new_name: word(2).to_string(),
                },
                3,
            ),
            CommandKind::RegexReplace => {
                let flags_word = optional(4);
                let flags = flags_word.map(RegexFlags::parse).transpose()?.unwrap_or_default();
                let pattern = NamePattern::new(word(1))?;
                let search = flags.build(word(2))?;
                let consumed = if flags_word.is_some() { 5 } else { 4 };
                (
                    Command::RegexReplace {
                        pattern,
                        search,
                        replacement: word(3).to_string(),
                        flags,
                    },
                    consumed,
                )
            }
        };

        Ok(Compiled {
            command: Some(command),
            consumed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(words: &[&str]) -> Compiled {
        Compiler::default().compile(words).unwrap()
    }

    fn compile_line(words: &[&str]) -> Compiled {
        Compiler::default().compile_line(words).unwrap()
    }

    #[test]
    fn test_delete() {
        let compiled = compile(&["delete", r"foo\.txt"]);
        assert_eq!(compiled.consumed, 2);
        let command = compiled.command.unwrap();
        assert!(command.matches("foo.txt"));
        assert!(!command.matches("foobtxt"));
    }

    #[test]
    fn test_too_few_words_compiles_nothing() {
        let compiled = compile(&["delete"]);
        assert!(compiled.command.is_none());
        assert_eq!(compiled.consumed, 0);

        let compiled = compile(&["regex", "a", "b"]);
        assert!(compiled.command.is_none());
    }

    #[test]
    fn test_strict_arity_reports_missing_arguments() {
        let compiler = Compiler::new(ArityPolicy::Strict);
        match compiler.compile(&["mv", "a"]) {
            Err(Error::MissingArguments {
                command,
                expected,
                found,
            }) => {
                assert_eq!(command, "RENAME");
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
            }
            other => panic!("Expected MissingArguments, got: {:?}", other.map(|c| c.consumed)),
        }

        // Exactly the required arguments is enough under both policies.
        let compiled = compiler.compile(&["mv", "a", "b"]).unwrap();
        assert!(compiled.command.is_some());
    }

    #[test]
    fn test_unknown_and_empty() {
        let empty: [&str; 0] = [];
        assert!(compile(&empty).command.is_none());
        assert!(compile(&["frobnicate", "a", "b"]).command.is_none());
        // Unknown words are not an arity problem, even when strict.
        let strict = Compiler::new(ArityPolicy::Strict);
        assert!(strict.compile(&["frobnicate"]).unwrap().command.is_none());
    }

    #[test]
    fn test_update() {
        let compiled = compile(&["REPLACE", "a", "new/a.txt", "x.zip"]);
        assert_eq!(compiled.consumed, 3);
        match compiled.command.unwrap() {
            Command::Update { pattern, source } => {
                assert_eq!(pattern.as_str(), "a");
                assert_eq!(source, PathBuf::from("new/a.txt"));
            }
            other => panic!("Expected Update, got: {other}"),
        }
    }

    #[test]
    fn test_add_dest_only_in_line_mode() {
        let compiled = compile(&["add", "readme.txt", "x.zip"]);
        assert_eq!(compiled.consumed, 2);
        assert!(matches!(
            compiled.command,
            Some(Command::Add { dest: None, .. })
        ));

        let compiled = compile_line(&["new", "readme.txt", "docs/readme.txt"]);
        assert_eq!(compiled.consumed, 3);
        match compiled.command.unwrap() {
            Command::Add { source, dest } => {
                assert_eq!(source, PathBuf::from("readme.txt"));
                assert_eq!(dest.as_deref(), Some("docs/readme.txt"));
            }
            other => panic!("Expected Add, got: {other}"),
        }
    }

    #[test]
    fn test_rename_keeps_literal_name() {
        let compiled = compile(&["ren", r"^(a)\.txt$", "$1.dat"]);
        match compiled.command.unwrap() {
            Command::Rename { new_name, .. } => assert_eq!(new_name, "$1.dat"),
            other => panic!("Expected Rename, got: {other}"),
        }
    }

    #[test]
    fn test_regex_with_flags() {
        let compiled = compile_line(&["regex", r".*\.txt", "a", "Z", "I"]);
        assert_eq!(compiled.consumed, 5);
        match compiled.command.unwrap() {
            Command::RegexReplace {
                search,
                replacement,
                flags,
                ..
            } => {
                assert!(flags.case_insensitive);
                assert_eq!(replacement, "Z");
                assert!(search.is_match(b"A"));
            }
            other => panic!("Expected RegexReplace, got: {other}"),
        }
    }

    #[test]
    fn test_regex_prefix_mode_ignores_trailing_words() {
        let compiled = compile(&["regex", "x", "a", "b", "archive.zip"]);
        assert_eq!(compiled.consumed, 4);
        match compiled.command.unwrap() {
            Command::RegexReplace { flags, .. } => assert!(flags.is_empty()),
            other => panic!("Expected RegexReplace, got: {other}"),
        }
    }

    #[test]
    fn test_invalid_patterns_are_fatal() {
        let compiler = Compiler::default();
        assert!(matches!(
            compiler.compile(&["rm", "(unclosed"]),
            Err(Error::InvalidRegex { .. })
        ));
        assert!(matches!(
            compiler.compile(&["regex", "x", "[z-a]", "b"]),
            Err(Error::InvalidRegex { .. })
        ));
        assert!(matches!(
            compiler.compile_line(&["regex", "x", "a", "b", "Q"]),
            Err(Error::InvalidFlag { flag: 'Q', .. })
        ));
    }
}
