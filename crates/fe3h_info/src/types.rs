//! Record layouts of the `INFO0`, `INFO1` and `INFO2` files

use binrw::{BinRead, BinWrite};
use fe3h_binary::FixedString;

/// Width of the file name field
pub const FILENAME_SIZE: usize = 256;

/// Prefix every file name in the tables starts with
pub const ROM_PREFIX: &str = "rom:/";

/// Sizes and location of a single file
#[derive(BinRead, BinWrite, Debug, Clone, Default, PartialEq, Eq, Hash)]
#[brw(little)]
pub struct FileInfo {
    /// Size of the file once decompressed
    pub decompressed_size: u64,

    /// Size of the file as stored
    pub compressed_size: u64,

    /// Whether the stored file is compressed
    #[br(map = |x: u64| x != 0)]
    #[bw(map = |x| *x as u64)]
    pub compressed: bool,

    /// Path of the file, usually starting with [`ROM_PREFIX`]
    pub filename: FixedString<FILENAME_SIZE>,
}

impl FileInfo {
    /// Encoded size of a record
    pub const SIZE: usize = 24 + FILENAME_SIZE;

    /// Offset of the file name inside a record
    pub const FILENAME_OFFSET: usize = 24;
}

/// A [`FileInfo`] addressed by a numeric file id, stored in `INFO0`
#[derive(BinRead, BinWrite, Debug, Clone, Default, PartialEq, Eq, Hash)]
#[brw(little)]
pub struct IndexedFile {
    /// Id the game requests the file by
    pub id: u64,

    /// Sizes and path of the file
    pub info: FileInfo,
}

impl IndexedFile {
    /// Encoded size of a record
    pub const SIZE: usize = 8 + FileInfo::SIZE;

    /// Offset of the file name inside a record
    pub const FILENAME_OFFSET: usize = 8 + FileInfo::FILENAME_OFFSET;
}

/// Number of records in `INFO0` and `INFO1`, stored in `INFO2`
#[derive(BinRead, BinWrite, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[brw(little)]
pub struct EntryCounts {
    /// Records in `INFO0`
    pub indexed: u64,

    /// Records in `INFO1`
    pub named: u64,
}

#[cfg(test)]
mod test {
    use fe3h_binary::{ByteCursor, ByteWriter, FixedString};
    use pretty_assertions::assert_eq;

    use crate::error::Result;
    use crate::types::{EntryCounts, FileInfo, IndexedFile};

    fn record(id: u64, name: &str) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&id.to_le_bytes());
        bytes.extend_from_slice(&0x40u64.to_le_bytes());
        bytes.extend_from_slice(&0x20u64.to_le_bytes());
        bytes.extend_from_slice(&1u64.to_le_bytes());
        bytes.extend_from_slice(name.as_bytes());
        bytes.resize(IndexedFile::SIZE, 0);
        bytes
    }

    #[test]
    fn read_indexed_file() -> Result<()> {
        let input = record(7, "rom:/data/a.bin");

        let mut cursor = ByteCursor::new(&input);
        let file = cursor.read::<IndexedFile>()?;

        assert_eq!(
            file,
            IndexedFile {
                id: 7,
                info: FileInfo {
                    decompressed_size: 0x40,
                    compressed_size: 0x20,
                    compressed: true,
                    filename: FixedString::new("rom:/data/a.bin")?,
                },
            }
        );
        assert_eq!(cursor.position(), IndexedFile::SIZE);

        let mut writer = ByteWriter::new();
        writer.write(&file)?;
        assert_eq!(writer.into_inner(), input);

        Ok(())
    }

    #[test]
    fn any_nonzero_flag_is_compressed() -> Result<()> {
        let mut input = record(0, "rom:/x");
        input[24] = 0x02;

        let file = ByteCursor::new(&input).read::<IndexedFile>()?;
        assert!(file.info.compressed);

        let mut writer = ByteWriter::new();
        writer.write(&file)?;
        assert_eq!(writer.into_inner()[24], 0x01);

        Ok(())
    }

    #[test]
    fn read_counts() -> Result<()> {
        #[rustfmt::skip]
        let input = [
            0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ];

        let counts = ByteCursor::new(&input).read::<EntryCounts>()?;
        assert_eq!(counts, EntryCounts { indexed: 3, named: 1 });

        Ok(())
    }
}
