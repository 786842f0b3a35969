//! Reading and writing zip containers.
//!
//! Entries are fully decompressed when read and recompressed with the
//! configured [`WriteOptions`] when written.

use std::io::{Read, Seek, Write};
use std::time::SystemTime;

use chrono::{Datelike, Local, Timelike};
use zip::write::SimpleFileOptions;
use zip::{DateTime, ZipArchive, ZipWriter};

use crate::transform::{ArchiveEntry, EntryMeta};
use crate::{Error, Result};

/// Compression applied to every entry of a written archive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompressionMethod {
    /// Deflate, the method every zip reader understands.
    #[default]
    Deflate,
    /// No compression.
    Store,
}

/// Options for writing output archives.
///
/// # Example
///
/// ```rust
/// use zippatch::container::{CompressionMethod, WriteOptions};
///
/// let options = WriteOptions::new().method(CompressionMethod::Deflate).level(9)?;
/// assert_eq!(options.compression_level(), Some(9));
/// assert!(WriteOptions::new().level(10).is_err());
/// # Ok::<(), zippatch::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    method: CompressionMethod,
    level: Option<u32>,
}

impl WriteOptions {
    /// Creates options with deflate at the library's default level.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression method.
    pub fn method(mut self, method: CompressionMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets the compression level (0-9). Ignored when storing.
    pub fn level(mut self, level: u32) -> Result<Self> {
        if level > 9 {
            return Err(Error::InvalidCompressionLevel { level });
        }
        self.level = Some(level);
        Ok(self)
    }

    /// Returns the compression method.
    pub fn compression_method(&self) -> CompressionMethod {
        self.method
    }

    /// Returns the explicit compression level, if any.
    pub fn compression_level(&self) -> Option<u32> {
        self.level
    }

    fn file_options(&self, entry: &ArchiveEntry, now: DateTime) -> SimpleFileOptions {
        let mut options = SimpleFileOptions::default()
            .large_file(entry.data.len() as u64 >= u32::MAX as u64)
            .last_modified_time(entry.meta.modified.unwrap_or(now));
        if let Some(mode) = entry.meta.unix_mode {
            options = options.unix_permissions(mode);
        }
        match self.method {
            CompressionMethod::Deflate => options
                .compression_method(zip::CompressionMethod::Deflated)
                .compression_level(self.level.map(i64::from)),
            CompressionMethod::Store => {
                options.compression_method(zip::CompressionMethod::Stored)
            }
        }
    }
}

/// Converts a file system time to a zip timestamp in local time.
///
/// Returns `None` for times zip cannot represent (before 1980 or after 2107).
pub fn to_zip_datetime(time: SystemTime) -> Option<DateTime> {
    let local: chrono::DateTime<Local> = time.into();
    let year = u16::try_from(local.year()).ok()?;
    DateTime::from_date_and_time(
        year,
        local.month() as u8,
        local.day() as u8,
        local.hour() as u8,
        local.minute() as u8,
        local.second().min(59) as u8,
    )
    .ok()
}

/// Reads every entry of a zip archive, in central directory order.
///
/// Directory entries are returned with empty content and a trailing `/`.
/// Modification times and Unix modes are kept in [`ArchiveEntry::meta`].
pub fn read_entries<R: Read + Seek>(reader: R) -> Result<Vec<ArchiveEntry>> {
    let mut archive = ZipArchive::new(reader)?;
    let mut entries = Vec::with_capacity(archive.len());

    for idx in 0..archive.len() {
        let mut file = archive.by_index(idx)?;
        let name = file.name().to_string();
        let mut data = Vec::new();
        if !file.is_dir() {
            data.reserve(file.size().min(1 << 26) as usize);
            file.read_to_end(&mut data)?;
        }
        let meta = EntryMeta {
            modified: file.last_modified(),
            unix_mode: file.unix_mode(),
        };
        entries.push(ArchiveEntry { name, data, meta });
    }

    Ok(entries)
}

/// Writes entries to a new zip archive and returns the finished writer.
///
/// Entries without a modification time are stamped with the current time.
pub fn write_entries<W: Write + Seek>(
    writer: W,
    entries: &[ArchiveEntry],
    options: &WriteOptions,
) -> Result<W> {
    let mut zip = ZipWriter::new(writer);
    let now = to_zip_datetime(SystemTime::now()).unwrap_or_default();

    for entry in entries {
        let file_options = options.file_options(entry, now);
        if entry.is_directory() && entry.data.is_empty() {
            zip.add_directory(entry.name.as_str(), file_options)?;
        } else {
            zip.start_file(entry.name.as_str(), file_options)?;
            zip.write_all(&entry.data)?;
        }
    }

    Ok(zip.finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn write_to_vec(entries: &[ArchiveEntry], options: &WriteOptions) -> Vec<u8> {
        write_entries(Cursor::new(Vec::new()), entries, options)
            .unwrap()
            .into_inner()
    }

    fn contents(entries: &[ArchiveEntry]) -> Vec<(&str, &[u8])> {
        entries
            .iter()
            .map(|e| (e.name.as_str(), e.data.as_slice()))
            .collect()
    }

    #[test]
    fn test_write_then_read_preserves_order_and_dirs() {
        let entries = vec![
            ArchiveEntry::new("z.txt", "last letter first"),
            ArchiveEntry::new("docs/", ""),
            ArchiveEntry::new("docs/empty.txt", ""),
            ArchiveEntry::new("a.txt", "A"),
        ];
        let bytes = write_to_vec(&entries, &WriteOptions::default());
        let read = read_entries(Cursor::new(bytes)).unwrap();
        assert_eq!(contents(&read), contents(&entries));
    }

    #[test]
    fn test_store_method() {
        let entries = vec![ArchiveEntry::new("a.txt", "A".repeat(1000))];
        let stored = write_to_vec(&entries, &WriteOptions::new().method(CompressionMethod::Store));
        let deflated = write_to_vec(&entries, &WriteOptions::new());
        assert!(stored.len() > deflated.len());
        assert_eq!(
            contents(&read_entries(Cursor::new(stored)).unwrap()),
            contents(&entries)
        );
    }

    #[test]
    fn test_metadata_round_trip() {
        let modified = DateTime::from_date_and_time(2019, 11, 4, 16, 20, 42).unwrap();
        let meta = EntryMeta {
            modified: Some(modified),
            unix_mode: Some(0o100755),
        };
        let entries = vec![ArchiveEntry::new("bin/run.sh", "#!/bin/sh\n").with_meta(meta)];

        let bytes = write_to_vec(&entries, &WriteOptions::default());
        let read = read_entries(Cursor::new(bytes)).unwrap();

        assert_eq!(read[0].meta.modified, Some(modified));
        assert_eq!(read[0].meta.unix_mode.map(|m| m & 0o777), Some(0o755));

        // Reading again and rewriting keeps the same timestamp.
        let bytes = write_to_vec(&read, &WriteOptions::default());
        let again = read_entries(Cursor::new(bytes)).unwrap();
        assert_eq!(again[0].meta, read[0].meta);
    }

    #[test]
    fn test_missing_time_is_stamped_with_now() {
        let before = to_zip_datetime(SystemTime::now()).unwrap();
        let bytes = write_to_vec(&[ArchiveEntry::new("a.txt", "A")], &WriteOptions::default());
        let read = read_entries(Cursor::new(bytes)).unwrap();

        let modified = read[0].meta.modified.unwrap();
        assert_ne!(modified, DateTime::default());
        assert!(modified.year() >= before.year());
    }

    #[test]
    fn test_to_zip_datetime_range() {
        assert!(to_zip_datetime(SystemTime::UNIX_EPOCH).is_none());
        assert!(to_zip_datetime(SystemTime::now()).is_some());
    }

    #[test]
    fn test_read_rejects_non_zip() {
        let result = read_entries(Cursor::new(b"definitely not a zip".to_vec()));
        assert!(matches!(result, Err(Error::Zip(_))));
    }

    #[test]
    fn test_level_validation() {
        assert!(matches!(
            WriteOptions::new().level(15),
            Err(Error::InvalidCompressionLevel { level: 15 })
        ));
        assert_eq!(WriteOptions::new().level(0).unwrap().compression_level(), Some(0));
    }
}
