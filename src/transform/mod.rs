//! Applying command sets to archive entries.
//!
//! The transformer works on plain `(name, bytes)` entries and knows nothing
//! about the container format; reading and writing zip files lives in
//! [`crate::container`]. Files referenced by `UPDATE` and `ADD` are loaded
//! through the [`SourceFiles`] trait so the transformation itself can be
//! exercised without touching the disk.

mod entry;
mod sources;
mod transformer;

pub use entry::{ArchiveEntry, Entry, EntryMeta, EntryState};
pub use sources::{FileSystem, SourceFile, SourceFiles, derive_entry_name};
pub use transformer::{ArchiveTransformer, TransformStats, Transformed};
