//! Shared test utilities for integration tests.
//!
//! Zip fixtures are built and inspected with the `zip` crate directly so the
//! crate's own container code is not used to check itself.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{DateTime, ZipArchive, ZipWriter};

/// Creates an in-memory zip archive from `(name, data)` pairs.
///
/// Names ending in `/` become directory entries.
pub fn create_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    for (name, data) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).expect("add directory");
        } else {
            writer.start_file(*name, options).expect("start file");
            writer.write_all(data).expect("write entry");
        }
    }

    writer.finish().expect("finish zip").into_inner()
}

/// Creates an in-memory zip archive whose entries all carry `modified`.
pub fn create_zip_at(entries: &[(&str, &[u8])], modified: DateTime) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .last_modified_time(modified)
        .unix_permissions(0o640);

    for (name, data) in entries {
        writer.start_file(*name, options).expect("start file");
        writer.write_all(data).expect("write entry");
    }

    writer.finish().expect("finish zip").into_inner()
}

/// Reads the modification time and Unix mode of every entry, in order.
pub fn read_zip_meta(bytes: &[u8]) -> Vec<(String, Option<DateTime>, Option<u32>)> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).expect("open zip");
    (0..archive.len())
        .map(|idx| {
            let file = archive.by_index(idx).expect("read entry");
            (
                file.name().to_string(),
                file.last_modified(),
                file.unix_mode().map(|mode| mode & 0o777),
            )
        })
        .collect()
}

/// Reads every entry of an in-memory zip archive, in order.
pub fn read_zip(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).expect("open zip");
    let mut entries = Vec::new();

    for idx in 0..archive.len() {
        let mut file = archive.by_index(idx).expect("read entry");
        let mut data = Vec::new();
        file.read_to_end(&mut data).expect("read entry data");
        entries.push((file.name().to_string(), data));
    }

    entries
}

/// Writes a zip archive to `dir/name` and returns its path.
pub fn write_zip_file(dir: &Path, name: &str, entries: &[(&str, &[u8])]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, create_zip(entries)).expect("write zip file");
    path
}

/// Reads every entry of a zip archive on disk.
pub fn read_zip_file(path: &Path) -> Vec<(String, Vec<u8>)> {
    let bytes = std::fs::read(path).expect("read zip file");
    read_zip(&bytes)
}

/// Converts `(&str, &[u8])` pairs to owned pairs for comparisons.
pub fn owned(entries: &[(&str, &[u8])]) -> Vec<(String, Vec<u8>)> {
    entries
        .iter()
        .map(|(name, data)| (name.to_string(), data.to_vec()))
        .collect()
}

/// Returns the entry names of a read archive.
pub fn names(entries: &[(String, Vec<u8>)]) -> Vec<&str> {
    entries.iter().map(|(name, _)| name.as_str()).collect()
}
