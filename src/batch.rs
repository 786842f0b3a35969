//! Running a command set over a list of archives.
//!
//! Every archive is rewritten into a temporary file next to its target and
//! then renamed into place, so a target is only ever replaced by a fully
//! written archive.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use crate::command::CommandSet;
use crate::container::{WriteOptions, read_entries, write_entries};
use crate::transform::{ArchiveEntry, ArchiveTransformer, FileSystem, SourceFiles, TransformStats};
use crate::{Error, Result};

/// Prefix of temporary archives written next to their targets.
pub const TEMP_PREFIX: &str = ".zippatch-";
/// Suffix of temporary archives written next to their targets.
pub const TEMP_SUFFIX: &str = ".tmp";

/// Where patched archives are written instead of over their input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Write to this exact path. With several inputs, the last one wins.
    File(PathBuf),
    /// Write `<dir>/<input file name>`.
    Directory(PathBuf),
}

impl Destination {
    /// Interprets a user-supplied path: a trailing separator means a directory.
    ///
    /// ```rust
    /// use zippatch::Destination;
    ///
    /// assert!(matches!(Destination::from_arg("out/"), Destination::Directory(_)));
    /// assert!(matches!(Destination::from_arg("out.zip"), Destination::File(_)));
    /// ```
    pub fn from_arg(arg: &str) -> Self {
        if arg.ends_with('/') || arg.ends_with(MAIN_SEPARATOR) {
            Destination::Directory(PathBuf::from(arg))
        } else {
            Destination::File(PathBuf::from(arg))
        }
    }

    /// Creates the destination directory if it does not exist yet.
    pub fn prepare(&self) -> Result<()> {
        if let Destination::Directory(dir) = self {
            if !dir.is_dir() {
                log::debug!("Creating directory {}", dir.display());
                fs::create_dir_all(dir)?;
            }
        }
        Ok(())
    }

    /// Returns the output path for an input archive.
    pub fn target_for(&self, archive: &Path) -> PathBuf {
        match self {
            Destination::File(path) => path.clone(),
            Destination::Directory(dir) => match archive.file_name() {
                Some(name) => dir.join(name),
                None => dir.join(archive),
            },
        }
    }
}

/// What happened to one input archive.
#[derive(Debug, Clone)]
pub enum ArchiveOutcome {
    /// The archive was transformed and written to `target`.
    Patched {
        /// Input archive.
        source: PathBuf,
        /// Written archive.
        target: PathBuf,
        /// Per-entry statistics.
        stats: TransformStats,
    },
    /// The input path did not name a file.
    Missing {
        /// Input archive.
        path: PathBuf,
    },
}

impl ArchiveOutcome {
    /// Returns the input path.
    pub fn path(&self) -> &Path {
        match self {
            ArchiveOutcome::Patched { source, .. } => source,
            ArchiveOutcome::Missing { path } => path,
        }
    }
}

/// Result of a batch run.
#[must_use = "batch reports should be checked for warnings"]
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// One outcome per input, in input order.
    pub outcomes: Vec<ArchiveOutcome>,
    /// Statistics summed over every patched archive.
    pub totals: TransformStats,
}

impl BatchReport {
    /// Returns the number of archives written.
    pub fn patched(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ArchiveOutcome::Patched { .. }))
            .count()
    }

    /// Returns the number of inputs that could not be found.
    pub fn missing(&self) -> usize {
        self.outcomes.len() - self.patched()
    }

    /// Returns whether any recoverable problem was logged during the run.
    pub fn has_warnings(&self) -> bool {
        self.missing() > 0 || self.totals.has_warnings()
    }

    fn record(&mut self, outcome: ArchiveOutcome) {
        if let ArchiveOutcome::Patched { stats, .. } = &outcome {
            self.totals.merge(stats);
        }
        self.outcomes.push(outcome);
    }
}

/// Applies one [`CommandSet`] to each archive in a list.
///
/// # Example
///
/// ```rust,no_run
/// use zippatch::{BatchRunner, Destination};
/// use zippatch::command::{CommandSet, Compiler};
///
/// let commands = CommandSet::from_line("rename '^readme$' README.txt", &Compiler::default())?;
/// let report = BatchRunner::new(&commands)
///     .destination(Destination::from_arg("patched/"))
///     .run(["one.zip", "two.zip"])?;
/// println!("{} archive(s) written", report.patched());
/// # Ok::<(), zippatch::Error>(())
/// ```
pub struct BatchRunner<'a, S: SourceFiles = FileSystem> {
    commands: &'a CommandSet,
    sources: S,
    destination: Option<Destination>,
    options: WriteOptions,
}

impl<'a> BatchRunner<'a, FileSystem> {
    /// Creates a runner that replaces archives in place and reads
    /// `UPDATE`/`ADD` sources from disk.
    pub fn new(commands: &'a CommandSet) -> Self {
        Self {
            commands,
            sources: FileSystem,
            destination: None,
            options: WriteOptions::default(),
        }
    }
}

impl<'a, S: SourceFiles> BatchRunner<'a, S> {
    /// Replaces the source file provider.
    pub fn with_sources<T: SourceFiles>(self, sources: T) -> BatchRunner<'a, T> {
        BatchRunner {
            commands: self.commands,
            sources,
            destination: self.destination,
            options: self.options,
        }
    }

    /// Writes outputs to `destination` instead of over the inputs.
    pub fn destination(mut self, destination: Destination) -> Self {
        self.destination = Some(destination);
        self
    }

    /// Sets how output archives are compressed.
    pub fn with_options(mut self, options: WriteOptions) -> Self {
        self.options = options;
        self
    }

    /// Processes archives in order.
    ///
    /// Missing inputs are logged and skipped. The first fatal error stops
    /// the run; archives finished before it keep their new content.
    pub fn run<P: AsRef<Path>>(&self, archives: impl IntoIterator<Item = P>) -> Result<BatchReport> {
        if let Some(destination) = &self.destination {
            destination.prepare()?;
        }

        let mut report = BatchReport::default();
        for archive in archives {
            let outcome = self.process(archive.as_ref())?;
            report.record(outcome);
        }
        Ok(report)
    }

    /// Processes a single archive.
    pub fn process(&self, archive: &Path) -> Result<ArchiveOutcome> {
        if !archive.is_file() {
            log::warn!("Unable to find {}", archive.display());
            return Ok(ArchiveOutcome::Missing {
                path: archive.to_path_buf(),
            });
        }

        log::info!("Processing {}", archive.display());
        let entries = {
            let file = File::open(archive)?;
            read_entries(BufReader::new(file))?
        };

        let transformer = ArchiveTransformer::new(self.commands, &self.sources);
        let transformed = transformer.transform(entries)?;

        let target = match &self.destination {
            Some(destination) => destination.target_for(archive),
            None => archive.to_path_buf(),
        };
        self.write_atomic(&target, &transformed.entries)?;

        Ok(ArchiveOutcome::Patched {
            source: archive.to_path_buf(),
            target,
            stats: transformed.stats,
        })
    }

    /// Writes `entries` to a temporary file next to `target`, then renames it
    /// into place.
    ///
    /// A symlinked target is resolved so the link survives and its target is
    /// replaced. An existing target keeps its permissions; a new one gets the
    /// usual permissions for newly created files.
    fn write_atomic(&self, target: &Path, entries: &[ArchiveEntry]) -> Result<()> {
        let target = resolve_symlink(target)?;
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_PREFIX).suffix(TEMP_SUFFIX);
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // Masked by the process umask, as for any new file.
            builder.permissions(fs::Permissions::from_mode(0o666));
        }
        let temp = builder.tempfile_in(dir)?;
        log::debug!("Writing {} entries to {}", entries.len(), temp.path().display());

        let writer = write_entries(BufWriter::new(temp), entries, &self.options)?;
        let temp = writer.into_inner().map_err(|err| Error::Io(err.into_error()))?;

        if let Ok(existing) = fs::metadata(&target) {
            temp.as_file().set_permissions(existing.permissions())?;
        }
        temp.persist(&target).map_err(|err| Error::Io(err.error))?;
        Ok(())
    }
}

/// Follows `path` if it is a symbolic link.
fn resolve_symlink(path: &Path) -> Result<PathBuf> {
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.file_type().is_symlink() => {
            let resolved = fs::canonicalize(path)?;
            log::debug!("Resolved {} to {}", path.display(), resolved.display());
            Ok(resolved)
        }
        _ => Ok(path.to_path_buf()),
    }
}
