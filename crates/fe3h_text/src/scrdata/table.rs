//! A single table block: header, pointer records and string blob

use binrw::binrw;
use fe3h_binary::entry::to_u32;
use fe3h_binary::{ByteCursor, ByteWriter};
use tracing::trace;

use crate::error::{Error, Result};
use crate::scrdata::schema::{Layout, Slot};

/// Magic number every table header starts with
pub const TABLE_MAGIC: u32 = 0x0013_4C58;

/// Pointer value of a slot without a string
pub const ABSENT: u32 = u32::MAX;

/// Fill byte between the encoded header and `header_size`
const HEADER_FILL: u8 = 0xFF;

/// Fixed part of a table header
///
/// | Offset (bytes) | Field          | Description                                 |
/// |----------------|----------------|---------------------------------------------|
/// | 0x0000         | Magic          | 4 bytes: `0x00134C58`                       |
/// | 0x0004         | Size           | 2 bytes                                     |
/// | 0x0006         | Flag size      | 2 bytes: length of the flag array           |
/// | 0x0008         | Messages count | 2 bytes: number of pointer records          |
/// | 0x000A         | Pointer size   | 2 bytes: size of one pointer record         |
/// | 0x000C         | Header size    | 4 bytes: where the pointer records start    |
/// | 0x0010         | Flags          | one byte per flag                           |
#[binrw]
#[brw(little, magic = 0x0013_4C58u32)]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableHeader {
    /// Declared size field, kept as read
    pub size: u16,

    #[br(temp)]
    #[bw(try_calc(u16::try_from(flags.len())))]
    flag_size: u16,

    /// Number of pointer records
    pub messages_count: u16,

    /// Size of one pointer record in bytes
    pub pointer_size: u16,

    /// Offset of the first pointer record, string offsets are relative to it
    pub header_size: u32,

    /// One byte per slot, zero marks a string offset
    #[br(count = flag_size)]
    pub flags: Vec<u8>,
}

impl TableHeader {
    /// Encoded size of the header
    pub fn encoded_size(&self) -> usize {
        16 + self.flags.len()
    }

    /// Size of the pointer record region
    pub fn pointer_region(&self) -> usize {
        self.pointer_size as usize * self.messages_count as usize
    }

    fn check(&self, arity: usize) -> Result<()> {
        if self.pointer_size as usize != arity * 4 {
            return Err(Error::SchemaMismatch(format!(
                "pointer size {} does not match {arity} slots",
                self.pointer_size
            )));
        }
        if (self.header_size as usize) < self.encoded_size() {
            return Err(Error::SchemaMismatch(format!(
                "header size {} is smaller than the {} byte header",
                self.header_size,
                self.encoded_size()
            )));
        }
        Ok(())
    }
}

/// One message: a fixed number of 32-bit slots
#[binrw]
#[brw(little)]
#[br(import(arity: usize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PointerRecord {
    /// String offsets, [`ABSENT`] or opaque data depending on the slot
    #[br(count = arity)]
    pub slots: Vec<u32>,
}

/// Decoded state of a table, kept between import and export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBlock {
    /// Header as read, written back unchanged
    pub header: TableHeader,

    /// Meaning of each slot of a record
    pub slots: Vec<Slot>,

    /// Pointer records in file order
    pub records: Vec<PointerRecord>,
}

impl TableBlock {
    /// Decode the table at position `index` of its language and return its strings
    pub fn parse(data: &[u8], layout: Layout, index: usize) -> Result<(Self, Vec<String>)> {
        let mut cursor = ByteCursor::new(data);
        let header = cursor.read::<TableHeader>()?;
        let slots = layout.slots(index, &header)?;
        header.check(slots.len())?;

        cursor.seek(header.header_size as usize)?;
        let records = (0..header.messages_count)
            .map(|_| cursor.read_args::<PointerRecord>((slots.len(),)))
            .collect::<fe3h_binary::error::Result<Vec<_>>>()?;

        let block = TableBlock {
            header,
            slots,
            records,
        };

        let strings = block
            .text_offsets()
            .map(|offset| -> Result<String> {
                let position = (block.header.header_size as usize).saturating_add(offset as usize);
                cursor.seek(position)?;
                Ok(cursor.read_cstring()?)
            })
            .collect::<Result<Vec<_>>>()?;

        trace!(
            index,
            messages = block.records.len(),
            strings = strings.len(),
            "decoded table"
        );
        Ok((block, strings))
    }

    /// Values of every string slot holding an offset, in record then slot order
    pub fn text_offsets(&self) -> impl Iterator<Item = u32> + '_ {
        self.records.iter().flat_map(move |record| {
            record
                .slots
                .iter()
                .zip(&self.slots)
                .filter(|(value, slot)| **slot == Slot::Text && **value != ABSENT)
                .map(|(value, _)| *value)
        })
    }

    /// Number of strings the table holds
    pub fn text_count(&self) -> usize {
        self.text_offsets().count()
    }

    /// Encode the table with its strings replaced by `strings`.
    ///
    /// The header is written unchanged and padded to its declared size, string offsets
    /// are reassigned in order and absent slots stay absent.
    pub fn write(&self, strings: &[String]) -> Result<Vec<u8>> {
        let expected = self.text_count();
        if strings.len() != expected {
            return Err(Error::CountMismatch {
                expected,
                found: strings.len(),
            });
        }

        let pointer_region = self.header.pointer_region();
        let mut blob = ByteWriter::new();
        let mut strings = strings.iter();
        let mut records = self.records.clone();

        for record in &mut records {
            for (value, slot) in record.slots.iter_mut().zip(&self.slots) {
                if *slot == Slot::Data || *value == ABSENT {
                    continue;
                }

                let text = strings.next().ok_or(Error::CountMismatch {
                    expected,
                    found: expected + 1,
                })?;
                *value = to_u32(blob.position() + pointer_region)?;
                blob.write_cstring(text)?;
            }
        }

        let mut writer = ByteWriter::new();
        writer.write(&self.header)?;
        writer.fill_to(self.header.header_size as usize, HEADER_FILL)?;
        for record in &records {
            writer.write(record)?;
        }
        writer.write_bytes(&blob.into_inner())?;

        Ok(writer.into_inner())
    }
}
