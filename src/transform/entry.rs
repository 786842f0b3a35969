//! Entry types flowing through a transformation.

/// Metadata written alongside an entry's content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryMeta {
    /// Modification time. `None` stamps the entry with the time it is written.
    pub modified: Option<zip::DateTime>,
    /// Unix mode bits, when known.
    pub unix_mode: Option<u32>,
}

impl EntryMeta {
    /// Fills the fields missing from `self` with those of `base`.
    pub fn or(self, base: EntryMeta) -> Self {
        Self {
            modified: self.modified.or(base.modified),
            unix_mode: self.unix_mode.or(base.unix_mode),
        }
    }
}

/// A named payload read from, or written to, an archive.
///
/// Names ending in `/` are directory entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Path inside the archive.
    pub name: String,
    /// Uncompressed content.
    pub data: Vec<u8>,
    /// Timestamp and mode.
    pub meta: EntryMeta,
}

impl ArchiveEntry {
    /// Creates an entry without metadata.
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            meta: EntryMeta::default(),
        }
    }

    /// Replaces the metadata.
    pub fn with_meta(mut self, meta: EntryMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Returns whether this is a directory entry.
    pub fn is_directory(&self) -> bool {
        self.name.ends_with('/')
    }
}

/// What will happen to an entry's content once all commands have run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryState {
    /// Content to write at the end of the pass. May be empty.
    Keep(Vec<u8>),
    /// Already written with replacement content by `UPDATE`.
    Written,
    /// Deleted; nothing is written.
    Dropped,
}

/// An archive entry while commands are applied to it.
#[derive(Debug, Clone)]
pub struct Entry {
    /// Current name; `RENAME` changes it and later commands match against it.
    pub name: String,
    /// Current content state.
    pub state: EntryState,
    /// Metadata read with the entry.
    pub meta: EntryMeta,
}

impl Entry {
    /// Returns whether the content can still be changed.
    ///
    /// Once an entry is dropped or written it stays that way for the rest
    /// of the pass.
    pub fn is_live(&self) -> bool {
        matches!(self.state, EntryState::Keep(_))
    }
}

impl From<ArchiveEntry> for Entry {
    fn from(entry: ArchiveEntry) -> Self {
        Self {
            name: entry.name,
            state: EntryState::Keep(entry.data),
            meta: entry.meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_detection() {
        assert!(ArchiveEntry::new("docs/", Vec::new()).is_directory());
        assert!(!ArchiveEntry::new("docs/a.txt", Vec::new()).is_directory());
    }

    #[test]
    fn test_empty_content_is_still_live() {
        let entry = Entry::from(ArchiveEntry::new("empty.txt", Vec::new()));
        assert!(entry.is_live());
        assert_eq!(entry.state, EntryState::Keep(Vec::new()));
    }

    #[test]
    fn test_meta_or_keeps_own_fields() {
        let time = zip::DateTime::from_date_and_time(2020, 5, 17, 12, 30, 0).unwrap();
        let source = EntryMeta {
            modified: Some(time),
            unix_mode: None,
        };
        let base = EntryMeta {
            modified: None,
            unix_mode: Some(0o100644),
        };
        let merged = source.or(base);
        assert_eq!(merged.modified, Some(time));
        assert_eq!(merged.unix_mode, Some(0o100644));
    }
}
