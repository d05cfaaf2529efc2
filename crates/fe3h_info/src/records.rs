//! A single `INFO0` or `INFO1` buffer, without its companion files

use fe3h_binary::{ByteCursor, ByteWriter, FixedString};
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::types::{FileInfo, IndexedFile, ROM_PREFIX};

/// The records of one table file.
///
/// Neither file carries a header, a buffer is recognised by its length being a multiple
/// of the record size and every record's file name starting with [`ROM_PREFIX`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordTable {
    /// Records of `INFO0`
    Indexed(Vec<IndexedFile>),

    /// Records of `INFO1`
    Named(Vec<FileInfo>),
}

impl RecordTable {
    /// Whether `data` looks like either kind of table
    pub fn is_valid(data: &[u8]) -> bool {
        matches_layout(data, IndexedFile::SIZE, IndexedFile::FILENAME_OFFSET)
            || matches_layout(data, FileInfo::SIZE, FileInfo::FILENAME_OFFSET)
    }

    /// Decode every record. `INFO0` records are tried first.
    #[instrument(skip_all, fields(len = data.len()), err)]
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(data);

        if matches_layout(data, IndexedFile::SIZE, IndexedFile::FILENAME_OFFSET) {
            let count = data.len() / IndexedFile::SIZE;
            debug!(count, "parsing indexed records");
            let records = (0..count)
                .map(|_| cursor.read::<IndexedFile>())
                .collect::<fe3h_binary::error::Result<_>>()?;
            return Ok(RecordTable::Indexed(records));
        }

        if matches_layout(data, FileInfo::SIZE, FileInfo::FILENAME_OFFSET) {
            let count = data.len() / FileInfo::SIZE;
            debug!(count, "parsing named records");
            let records = (0..count)
                .map(|_| cursor.read::<FileInfo>())
                .collect::<fe3h_binary::error::Result<_>>()?;
            return Ok(RecordTable::Named(records));
        }

        Err(Error::InvalidTable)
    }

    /// Number of records
    pub fn len(&self) -> usize {
        match self {
            RecordTable::Indexed(records) => records.len(),
            RecordTable::Named(records) => records.len(),
        }
    }

    /// Whether the table has no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// File names in record order
    pub fn filenames(&self) -> Vec<String> {
        match self {
            RecordTable::Indexed(records) => records
                .iter()
                .map(|r| r.info.filename.to_string())
                .collect(),
            RecordTable::Named(records) => records.iter().map(|r| r.filename.to_string()).collect(),
        }
    }

    /// Replace every file name, in record order.
    ///
    /// Nothing is changed unless all names are accepted.
    pub fn set_filenames<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        if names.len() != self.len() {
            return Err(Error::CountMismatch {
                expected: self.len(),
                found: names.len(),
            });
        }

        let names = names
            .iter()
            .map(|name| FixedString::new(name.as_ref()))
            .collect::<fe3h_binary::error::Result<Vec<_>>>()?;

        match self {
            RecordTable::Indexed(records) => {
                for (record, name) in records.iter_mut().zip(names) {
                    record.info.filename = name;
                }
            }
            RecordTable::Named(records) => {
                for (record, name) in records.iter_mut().zip(names) {
                    record.filename = name;
                }
            }
        }

        Ok(())
    }

    /// Encode the records back into a table file
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = ByteWriter::new();
        match self {
            RecordTable::Indexed(records) => {
                for record in records {
                    writer.write(record)?;
                }
            }
            RecordTable::Named(records) => {
                for record in records {
                    writer.write(record)?;
                }
            }
        }
        Ok(writer.into_inner())
    }
}

fn matches_layout(data: &[u8], record_size: usize, filename_offset: usize) -> bool {
    !data.is_empty()
        && data.len() % record_size == 0
        && data
            .chunks_exact(record_size)
            .all(|record| record[filename_offset..].starts_with(ROM_PREFIX.as_bytes()))
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::error::{Error, Result};
    use crate::records::RecordTable;
    use crate::types::{FileInfo, IndexedFile};

    fn named(name: &str) -> Vec<u8> {
        let mut bytes = vec![0u8; FileInfo::FILENAME_OFFSET];
        bytes.extend_from_slice(name.as_bytes());
        bytes.resize(FileInfo::SIZE, 0);
        bytes
    }

    fn indexed(id: u64, name: &str) -> Vec<u8> {
        let mut bytes = id.to_le_bytes().to_vec();
        bytes.extend(named(name));
        bytes
    }

    #[test]
    fn detect_indexed_records() -> Result<()> {
        let input = [indexed(1, "rom:/a"), indexed(2, "rom:/b")].concat();
        assert!(RecordTable::is_valid(&input));

        let table = RecordTable::parse(&input)?;
        assert!(matches!(table, RecordTable::Indexed(_)));
        assert_eq!(table.filenames(), vec!["rom:/a", "rom:/b"]);
        assert_eq!(table.to_bytes()?, input);

        Ok(())
    }

    #[test]
    fn detect_named_records() -> Result<()> {
        let input = [named("rom:/a"), named("rom:/mods/b")].concat();

        let table = RecordTable::parse(&input)?;
        assert!(matches!(table, RecordTable::Named(_)));
        assert_eq!(table.len(), 2);

        Ok(())
    }

    #[test]
    fn reject_without_prefix() {
        let input = [indexed(1, "rom:/a"), indexed(2, "disk/b")].concat();
        assert!(!RecordTable::is_valid(&input));
        assert!(matches!(
            RecordTable::parse(&input),
            Err(Error::InvalidTable)
        ));

        assert!(!RecordTable::is_valid(&[]));
        assert!(!RecordTable::is_valid(&named("rom:/a")[..100]));
    }

    #[test]
    fn rename_records() -> Result<()> {
        let input = named("rom:/a");
        let mut table = RecordTable::parse(&input)?;

        table.set_filenames(&["rom:/renamed"])?;
        assert_eq!(table.filenames(), vec!["rom:/renamed"]);

        let result = table.set_filenames(&["x", "y"]);
        assert!(matches!(
            result,
            Err(Error::CountMismatch {
                expected: 1,
                found: 2
            })
        ));

        let too_long = "x".repeat(300);
        assert!(table.set_filenames(&[too_long]).is_err());
        assert_eq!(table.filenames(), vec!["rom:/renamed"]);

        Ok(())
    }
}
