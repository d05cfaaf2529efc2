//! Offset directories locating child blocks inside a parent buffer.

use binrw::{binrw, BinRead, BinWrite};
use derive_more::derive::{Index, IntoIterator};
use tracing::trace;

use crate::cursor::ByteCursor;
use crate::error::{Error, Result};

/// Location of a sub-region inside its parent buffer
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[brw(little)]
pub struct OffsetEntry {
    /// Offset from the start of the parent buffer
    pub offset: u32,

    /// Length of the region in bytes
    pub size: u32,
}

impl OffsetEntry {
    /// Encoded size of a single entry
    pub const SIZE: usize = 8;

    /// Offset one past the last byte of the region
    pub fn end(&self) -> u64 {
        self.offset as u64 + self.size as u64
    }
}

/// A `u32` count followed by that many [`OffsetEntry`] records.
///
/// The count is implied by the number of entries when writing.
#[binrw]
#[brw(little)]
#[br(import(limit: u32))]
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Index, IntoIterator)]
pub struct OffsetTable {
    #[br(temp, assert(count <= limit, "entry count {} exceeds {}", count, limit))]
    #[bw(try_calc(u32::try_from(entries.len())))]
    count: u32,

    #[br(count = count)]
    #[index]
    #[into_iterator(owned, ref)]
    entries: Vec<OffsetEntry>,
}

impl OffsetTable {
    /// Wrap a list of entries
    pub fn new(entries: Vec<OffsetEntry>) -> Self {
        OffsetTable { entries }
    }

    /// Read a table from `cursor`, rejecting more than `limit` entries
    pub fn read_from(cursor: &mut ByteCursor<'_>, limit: u32) -> Result<Self> {
        cursor.read_args::<OffsetTable>((limit,))
    }

    /// Build a table for children of the given lengths laid out back to back after the table
    /// itself, each child starting on a multiple of `alignment`.
    pub fn from_lengths(lengths: &[usize], alignment: usize) -> Result<Self> {
        let mut position = Self::header_size_for(lengths.len());
        let mut entries = Vec::with_capacity(lengths.len());

        for length in lengths {
            entries.push(OffsetEntry {
                offset: to_u32(position)?,
                size: to_u32(*length)?,
            });
            position = (position + length).next_multiple_of(alignment);
        }

        Ok(OffsetTable { entries })
    }

    /// Encoded size of a table holding `count` entries
    pub const fn header_size_for(count: usize) -> usize {
        4 + count * OffsetEntry::SIZE
    }

    /// Encoded size of this table
    pub fn header_size(&self) -> usize {
        Self::header_size_for(self.entries.len())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entries in file order
    pub fn entries(&self) -> &[OffsetEntry] {
        &self.entries
    }

    /// Resolve every entry to its bytes in `parent`.
    ///
    /// Each region has to start at or after the end of this table and end inside `parent`.
    pub fn slices<'a>(&self, parent: &'a [u8]) -> Result<Vec<&'a [u8]>> {
        let cursor = ByteCursor::new(parent);
        let header_size = self.header_size() as u64;

        self.entries
            .iter()
            .map(|entry| {
                if (entry.offset as u64) < header_size {
                    return Err(Error::SchemaMismatch(format!(
                        "region at {:#x} overlaps a {} byte header",
                        entry.offset, header_size
                    )));
                }
                trace!(offset = entry.offset, size = entry.size, "slicing region");
                cursor.slice(entry.offset as usize, entry.size as usize)
            })
            .collect()
    }
}

/// Narrow an offset or length to the 32 bits the containers store it in
pub fn to_u32(value: usize) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::Layout {
        length: value,
        capacity: 4,
    })
}
