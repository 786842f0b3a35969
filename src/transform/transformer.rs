//! Applies a command set to the entries of one archive.

use std::collections::HashSet;

use regex::bytes::Captures;

use super::entry::{ArchiveEntry, Entry, EntryState};
use super::sources::{SourceFiles, derive_entry_name};
use crate::Result;
use crate::command::{Command, CommandSet};

/// Statistics for one transformed archive.
#[must_use = "transform statistics should be checked for warnings"]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformStats {
    /// Entries written with their original name and content.
    pub entries_kept: usize,
    /// Entries written under a new name with their original content.
    pub entries_renamed: usize,
    /// Entries whose content was changed by `REGEX`.
    pub entries_edited: usize,
    /// Entries replaced by `UPDATE`.
    pub entries_updated: usize,
    /// Entries dropped by `DELETE`.
    pub entries_deleted: usize,
    /// Entries added by `ADD`.
    pub entries_added: usize,
    /// `UPDATE`/`ADD` commands whose source file did not exist.
    pub missing_sources: usize,
    /// Entries not written because an earlier entry had the same name.
    pub duplicates_skipped: usize,
    /// Individual `REGEX` substitutions.
    pub substitutions: usize,
    /// Uncompressed bytes in the output.
    pub total_bytes: u64,
}

impl TransformStats {
    /// Returns the number of entries in the output.
    pub fn total_entries(&self) -> usize {
        self.entries_kept
            + self.entries_renamed
            + self.entries_edited
            + self.entries_updated
            + self.entries_added
    }

    /// Returns whether anything was reported while transforming.
    pub fn has_warnings(&self) -> bool {
        self.missing_sources > 0 || self.duplicates_skipped > 0
    }

    /// Returns whether the output differs from the input.
    pub fn is_modified(&self) -> bool {
        self.total_entries() != self.entries_kept || self.entries_deleted > 0
    }

    /// Adds another archive's counts to these.
    pub fn merge(&mut self, other: &TransformStats) {
        self.entries_kept += other.entries_kept;
        self.entries_renamed += other.entries_renamed;
        self.entries_edited += other.entries_edited;
        self.entries_updated += other.entries_updated;
        self.entries_deleted += other.entries_deleted;
        self.entries_added += other.entries_added;
        self.missing_sources += other.missing_sources;
        self.duplicates_skipped += other.duplicates_skipped;
        self.substitutions += other.substitutions;
        self.total_bytes += other.total_bytes;
    }
}

/// The entries an output archive must contain, in write order.
#[derive(Debug, Clone, Default)]
pub struct Transformed {
    /// Output entries: original order first, then added files.
    pub entries: Vec<ArchiveEntry>,
    /// What happened along the way.
    pub stats: TransformStats,
}

/// How an emitted entry is counted.
#[derive(Debug, Clone, Copy)]
enum Outcome {
    Kept,
    Renamed,
    Edited,
    Updated,
    Added,
}

impl Transformed {
    /// Appends an entry unless its name was already written.
    fn emit(
        &mut self,
        names: &mut HashSet<String>,
        entry: ArchiveEntry,
        outcome: Outcome,
    ) {
        let ArchiveEntry { name, data, meta } = entry;
        if !names.insert(name.clone()) {
            log::warn!("Skipping duplicate entry {}", name);
            self.stats.duplicates_skipped += 1;
            return;
        }

        let stats = &mut self.stats;
        match outcome {
            Outcome::Kept => stats.entries_kept += 1,
            Outcome::Renamed => stats.entries_renamed += 1,
            Outcome::Edited => stats.entries_edited += 1,
            Outcome::Updated => stats.entries_updated += 1,
            Outcome::Added => stats.entries_added += 1,
        }
        stats.total_bytes += data.len() as u64;
        self.entries.push(ArchiveEntry { name, data, meta });
    }
}

/// Applies a [`CommandSet`] to archive entries.
///
/// Each entry is checked against every per-entry command in declaration
/// order, matching against its *current* name. Effects accumulate:
///
/// - `DELETE` drops the entry. Later commands still see its name, but a
///   dropped entry is never written again.
/// - `UPDATE` writes the source file's bytes under the current name right
///   away and marks the entry written.
/// - `RENAME` replaces the name verbatim.
/// - `REGEX` rewrites live content.
///
/// Surviving entries are written in their original order, followed by the
/// files of every `ADD` command in declaration order.
///
/// # Example
///
/// ```rust
/// use zippatch::command::{CommandSet, Compiler};
/// use zippatch::transform::{ArchiveEntry, ArchiveTransformer, FileSystem};
///
/// let commands = CommandSet::from_line(r"rm '^a\..*'", &Compiler::default())?;
/// let transformer = ArchiveTransformer::new(&commands, FileSystem);
/// let out = transformer.transform(vec![
///     ArchiveEntry::new("a.txt", "A"),
///     ArchiveEntry::new("b.txt", "B"),
/// ])?;
/// assert_eq!(out.entries, vec![ArchiveEntry::new("b.txt", "B")]);
/// # Ok::<(), zippatch::Error>(())
/// ```
pub struct ArchiveTransformer<'a, S: SourceFiles> {
    commands: &'a CommandSet,
    sources: S,
}

impl<'a, S: SourceFiles> ArchiveTransformer<'a, S> {
    /// Creates a transformer reading `UPDATE`/`ADD` files through `sources`.
    pub fn new(commands: &'a CommandSet, sources: S) -> Self {
        Self { commands, sources }
    }

    /// Returns the command set being applied.
    pub fn commands(&self) -> &CommandSet {
        self.commands
    }

    /// Transforms the entries of one archive.
    ///
    /// # Errors
    ///
    /// Only fails if a source file exists but cannot be read.
    pub fn transform(
        &self,
        entries: impl IntoIterator<Item = ArchiveEntry>,
    ) -> Result<Transformed> {
        let mut out = Transformed::default();
        let mut names = HashSet::new();

        for archive_entry in entries {
            let original_name = archive_entry.name.clone();
            let mut entry = Entry::from(archive_entry);
            let mut substitutions = 0;

            for command in self.commands.entry_commands() {
                if !command.matches(&entry.name) {
                    continue;
                }
                substitutions += self.apply(command, &mut entry, &mut out, &mut names)?;
            }

            match entry.state {
                EntryState::Keep(data) => {
                    let mut meta = entry.meta;
                    let outcome = if substitutions > 0 {
                        // Edited content is stamped with the time of writing.
                        meta.modified = None;
                        Outcome::Edited
                    } else if entry.name != original_name {
                        Outcome::Renamed
                    } else {
                        Outcome::Kept
                    };
                    let written = ArchiveEntry::new(entry.name, data).with_meta(meta);
                    out.emit(&mut names, written, outcome);
                }
                EntryState::Dropped => out.stats.entries_deleted += 1,
                EntryState::Written => {}
            }
            out.stats.substitutions += substitutions;
        }

        for command in self.commands.archive_commands() {
            if let Command::Add { source, dest } = command {
                let Some(file) = self.sources.load(source)? else {
                    log::warn!("Unable to add {}: file not found", source.display());
                    out.stats.missing_sources += 1;
                    continue;
                };
                let name = match dest {
                    Some(dest) => Some(dest.clone()).filter(|d| !d.is_empty()),
                    None => derive_entry_name(source),
                };
                let Some(name) = name else {
                    log::warn!("Unable to add {}: no usable entry name", source.display());
                    out.stats.missing_sources += 1;
                    continue;
                };
                log::info!("Adding file {} as {}", source.display(), name);
                let added = ArchiveEntry::new(name, file.data).with_meta(file.meta);
                out.emit(&mut names, added, Outcome::Added);
            }
        }

        Ok(out)
    }

    /// Applies one matching command and returns the number of substitutions.
    fn apply(
        &self,
        command: &Command,
        entry: &mut Entry,
        out: &mut Transformed,
        names: &mut HashSet<String>,
    ) -> Result<usize> {
        match command {
            Command::Delete { .. } => {
                if entry.state != EntryState::Dropped {
                    log::info!("Deleting file {} from archive", entry.name);
                }
                entry.state = EntryState::Dropped;
            }
            Command::Rename { new_name, .. } => {
                log::info!("Renaming {} to {}", entry.name, new_name);
                entry.name = new_name.clone();
            }
            Command::Update { source, .. } => {
                if !entry.is_live() {
                    log::debug!("UPDATE skipped for {}: entry already dropped or written", entry.name);
                    return Ok(0);
                }
                match self.sources.load(source)? {
                    Some(file) => {
                        log::info!("Updating {} with {}", entry.name, source.display());
                        let meta = file.meta.or(entry.meta);
                        let updated = ArchiveEntry::new(entry.name.clone(), file.data).with_meta(meta);
                        out.emit(names, updated, Outcome::Updated);
                        entry.state = EntryState::Written;
                    }
                    None => {
                        log::warn!(
                            "Unable to update {}: file {} not found",
                            entry.name,
                            source.display()
                        );
                        out.stats.missing_sources += 1;
                    }
                }
            }
            Command::RegexReplace {
                search,
                replacement,
                ..
            } => {
                let EntryState::Keep(data) = &mut entry.state else {
                    log::debug!("REGEX skipped for {}: entry already dropped or written", entry.name);
                    return Ok(0);
                };
                log::info!("Running regex search and replace on {}", entry.name);
                let (replaced, count) = replace_literal(search, data, replacement);
                if let Some(replaced) = replaced {
                    *data = replaced;
                }
                return Ok(count);
            }
            Command::Add { .. } => {}
        }
        Ok(0)
    }
}

/// Replaces every match of `search` in `data` with the literal `replacement`.
///
/// Returns the new content (`None` if nothing matched) and the number of
/// replacements.
fn replace_literal(
    search: &regex::bytes::Regex,
    data: &[u8],
    replacement: &str,
) -> (Option<Vec<u8>>, usize) {
    let bytes = replacement.as_bytes();
    let mut count = 0;
    let replaced = search.replace_all(data, |caps: &Captures<'_>| {
        count += 1;
        log::info!(
            "Replacing {} with {}",
            String::from_utf8_lossy(&caps[0]),
            replacement
        );
        bytes
    });
    let replaced = match replaced {
        std::borrow::Cow::Borrowed(_) => None,
        std::borrow::Cow::Owned(bytes) => Some(bytes),
    };
    (replaced, count)
}
