//! This library reads and patches the **INFO** file tables of *Fire Emblem: Three Houses*.
//!
//! # INFO Table Format Documentation
//!
//! The game locates the files of its archive through three headerless tables that are
//! always used together:
//!
//! | File    | Contents                                        |
//! |---------|-------------------------------------------------|
//! | `INFO0` | Array of [`IndexedFile`] records, addressed by id |
//! | `INFO1` | Array of [`FileInfo`] records, addressed by path  |
//! | `INFO2` | [`EntryCounts`]: the number of records in the other two |
//!
//! ## Records
//!
//! | Offset (bytes) | Field             | Description                                  |
//! |----------------|-------------------|----------------------------------------------|
//! | 0x0000         | Id                | 8 bytes, `INFO0` only                        |
//! | +0x0000        | Decompressed size | 8 bytes                                      |
//! | +0x0008        | Compressed size   | 8 bytes                                      |
//! | +0x0010        | Is compressed     | 8 bytes, zero or one                         |
//! | +0x0018        | File name         | 256 bytes, zero padded, usually `rom:/...`   |
//!
//! ## Mods
//!
//! Loose files below a `mods` directory are made visible to the game by pointing an
//! entry at them, see [`FileTable::apply_mod`].
//!
//! ## Additional Information
//!
//! - **Endianness**: Little-endian for all multi-byte integers
//!

pub mod error;
pub mod patch;
pub mod records;
pub mod table;
pub mod types;

pub use patch::{file_id, ModFile, PatchOutcome};
pub use records::RecordTable;
pub use table::{FileTable, TableFiles};
pub use types::{EntryCounts, FileInfo, IndexedFile, ROM_PREFIX};
