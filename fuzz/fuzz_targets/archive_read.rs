//! Fuzz target for reading and rewriting arbitrary bytes as a zip archive.
//!
//! Run with: cargo +nightly fuzz run archive_read
//!
//! Whatever the reader accepts must survive an identity transform and be
//! written back without error.

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;
use zippatch::command::CommandSet;
use zippatch::container::{WriteOptions, read_entries, write_entries};
use zippatch::transform::{ArchiveTransformer, FileSystem};

fuzz_target!(|data: &[u8]| {
    // We don't care about the result - we're looking for panics or hangs
    let Ok(entries) = read_entries(Cursor::new(data)) else {
        return;
    };

    let commands = CommandSet::empty();
    let Ok(transformed) = ArchiveTransformer::new(&commands, FileSystem).transform(entries) else {
        return;
    };
    let _ = write_entries(
        Cursor::new(Vec::new()),
        &transformed.entries,
        &WriteOptions::default(),
    );
});
