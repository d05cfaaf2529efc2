//! The three `INFO` files read and written as one table

use fe3h_binary::{ByteCursor, ByteWriter};
use indexmap::IndexMap;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::types::{EntryCounts, FileInfo, IndexedFile};

/// Encoded contents of the three `INFO` files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableFiles {
    /// Contents of `INFO0`
    pub indexed: Vec<u8>,
    /// Contents of `INFO1`
    pub named: Vec<u8>,
    /// Contents of `INFO2`
    pub counts: Vec<u8>,
}

/// Every file known to the archive.
///
/// Indexed entries are keyed by their id and keep their file order. Writing the table
/// back out regenerates `INFO2` from the number of entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileTable {
    pub(crate) indexed: IndexMap<u64, IndexedFile>,
    pub(crate) named: Vec<FileInfo>,
}

impl FileTable {
    /// Decode the table from the contents of `INFO0`, `INFO1` and `INFO2`
    #[instrument(skip_all, err)]
    pub fn load(indexed: &[u8], named: &[u8], counts: &[u8]) -> Result<Self> {
        let counts = ByteCursor::new(counts).read::<EntryCounts>()?;
        debug!(indexed = counts.indexed, named = counts.named, "loading file table");

        let mut cursor = ByteCursor::new(indexed);
        let mut table = FileTable::default();
        for _ in 0..counts.indexed {
            let file = cursor.read::<IndexedFile>()?;
            table.indexed.insert(file.id, file);
        }

        let mut cursor = ByteCursor::new(named);
        for _ in 0..counts.named {
            table.named.push(cursor.read::<FileInfo>()?);
        }

        Ok(table)
    }

    /// Encode the table into the contents of `INFO0`, `INFO1` and `INFO2`
    #[instrument(skip_all, err)]
    pub fn save(&self) -> Result<TableFiles> {
        let mut indexed = ByteWriter::new();
        for file in self.indexed.values() {
            indexed.write(file)?;
        }

        let mut named = ByteWriter::new();
        for file in &self.named {
            named.write(file)?;
        }

        let mut counts = ByteWriter::new();
        counts.write(&EntryCounts {
            indexed: self.indexed.len() as u64,
            named: self.named.len() as u64,
        })?;

        debug!(
            indexed = self.indexed.len(),
            named = self.named.len(),
            "saved file table"
        );

        Ok(TableFiles {
            indexed: indexed.into_inner(),
            named: named.into_inner(),
            counts: counts.into_inner(),
        })
    }

    /// Indexed entries in file order
    pub fn indexed(&self) -> &IndexMap<u64, IndexedFile> {
        &self.indexed
    }

    /// Named entries in file order
    pub fn named(&self) -> &[FileInfo] {
        &self.named
    }

    /// Look up an indexed entry by id
    pub fn get(&self, id: u64) -> Option<&IndexedFile> {
        self.indexed.get(&id)
    }

    /// Insert or replace an indexed entry, returning the replaced one.
    ///
    /// A replaced entry keeps its position in the file.
    pub fn insert(&mut self, file: IndexedFile) -> Option<IndexedFile> {
        self.indexed.insert(file.id, file)
    }

    /// Total number of entries
    pub fn len(&self) -> usize {
        self.indexed.len() + self.named.len()
    }

    /// Whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
