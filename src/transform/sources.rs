//! Access to files on disk referenced by `UPDATE` and `ADD`.

use std::path::{Component, Path};

use super::entry::EntryMeta;
use crate::Result;
use crate::container::to_zip_datetime;

/// Content and metadata of a file named by a command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFile {
    /// File content.
    pub data: Vec<u8>,
    /// Modification time and mode of the file.
    pub meta: EntryMeta,
}

impl SourceFile {
    /// Creates a source file without metadata.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            meta: EntryMeta::default(),
        }
    }
}

/// Loads the files named by commands.
pub trait SourceFiles {
    /// Returns the file, or `None` if `path` is not a regular file.
    ///
    /// A missing file is not an error; the caller reports it and moves on.
    /// Failing to read a file that does exist is.
    fn load(&self, path: &Path) -> Result<Option<SourceFile>>;
}

impl<T: SourceFiles + ?Sized> SourceFiles for &T {
    fn load(&self, path: &Path) -> Result<Option<SourceFile>> {
        (**self).load(path)
    }
}

/// Reads source files from the local file system.
///
/// The entry takes the file's modification time and, on Unix, its mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystem;

impl SourceFiles for FileSystem {
    fn load(&self, path: &Path) -> Result<Option<SourceFile>> {
        if !path.is_file() {
            return Ok(None);
        }
        let data = std::fs::read(path)?;
        let metadata = std::fs::metadata(path)?;

        #[cfg(unix)]
        let unix_mode = {
            use std::os::unix::fs::PermissionsExt;
            Some(metadata.permissions().mode())
        };
        #[cfg(not(unix))]
        let unix_mode = None;

        let meta = EntryMeta {
            modified: metadata.modified().ok().and_then(to_zip_datetime),
            unix_mode,
        };
        Ok(Some(SourceFile { data, meta }))
    }
}

/// Derives the entry name for an `ADD` without an explicit destination.
///
/// Relative paths keep their directory structure (with `.` and `..`
/// components removed); absolute paths go to the archive root under their
/// file name. Returns `None` if nothing usable remains.
///
/// ```rust
/// use std::path::Path;
/// use zippatch::transform::derive_entry_name;
///
/// assert_eq!(derive_entry_name(Path::new("./conf/app.xml")).as_deref(), Some("conf/app.xml"));
/// assert_eq!(derive_entry_name(Path::new("/etc/app.xml")).as_deref(), Some("app.xml"));
/// ```
pub fn derive_entry_name(source: &Path) -> Option<String> {
    if source.is_absolute() || source.has_root() {
        return source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
    }

    let parts: Vec<_> = source
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
