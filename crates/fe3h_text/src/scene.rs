//! Scene text: an offset table followed by the strings it points at

use fe3h_binary::entry::to_u32;
use fe3h_binary::{ByteCursor, ByteWriter, OffsetEntry, OffsetTable};
use tracing::{debug, instrument, trace};

use crate::error::Result;

/// Bytes below this value never occur inside scene strings
const CONTROL_LIMIT: u8 = 10;

/// A scene text container.
///
/// | Offset (bytes) | Field    | Description                                          |
/// |----------------|----------|------------------------------------------------------|
/// | 0x0000         | Count    | 4 bytes: number of strings                           |
/// | 0x0004         | Entries  | 8 bytes each: offset and UTF-8 length of a string    |
/// | 8n + 4         | Strings  | zero terminated, padded to an even length            |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneText {
    data: Vec<u8>,
}

impl SceneText {
    /// Wrap the raw contents of a scene file
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        SceneText { data: data.into() }
    }

    /// Whether `data` looks like a scene text container.
    ///
    /// The first offset has to point right behind the entry table, strings have to follow
    /// each other in order, each preceded by a terminator, and contain no control bytes.
    pub fn is_valid(data: &[u8]) -> bool {
        validate(data).unwrap_or(false)
    }

    /// Decode every string in table order
    #[instrument(skip_all, fields(len = self.data.len()), err)]
    pub fn import(&mut self) -> Result<Vec<String>> {
        let mut cursor = ByteCursor::new(&self.data);
        let table = OffsetTable::read_from(&mut cursor, entry_limit(&self.data))?;
        debug!(count = table.len(), "reading scene strings");

        table
            .entries()
            .iter()
            .map(|entry| -> Result<String> {
                cursor.seek(entry.offset as usize)?;
                // The stored length excludes the terminator
                let bytes = cursor.read_bytes(entry.size as usize + 1)?;
                let end = bytes.iter().rposition(|b| *b != 0).map_or(0, |last| last + 1);
                Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
            })
            .collect()
    }

    /// Encode `lines` as a new container, laying the strings out back to back
    #[instrument(skip_all, fields(count = lines.len()), err)]
    pub fn export(&self, lines: &[String]) -> Result<Vec<u8>> {
        let base = OffsetTable::header_size_for(lines.len());
        let mut blob = ByteWriter::new();
        let mut entries = Vec::with_capacity(lines.len());

        for line in lines {
            entries.push(OffsetEntry {
                offset: to_u32(base + blob.position())?,
                size: to_u32(line.len())?,
            });
            blob.write_bytes(line.as_bytes())?;
            blob.write_bytes(&[0, 0])?;
            blob.align(2, 0)?;
        }

        let mut writer = ByteWriter::new();
        writer.write(&OffsetTable::new(entries))?;
        writer.write_bytes(&blob.into_inner())?;

        Ok(writer.into_inner())
    }
}

fn entry_limit(data: &[u8]) -> u32 {
    u32::try_from(data.len() / OffsetEntry::SIZE).unwrap_or(u32::MAX)
}

fn validate(data: &[u8]) -> Result<bool> {
    let mut cursor = ByteCursor::new(data);
    let count = cursor.read::<u32>()?;
    let first = cursor.read::<u32>()?;

    let header_size = count as u64 * OffsetEntry::SIZE as u64 + 4;
    if header_size != first as u64 {
        return Ok(false);
    }

    cursor.seek(0)?;
    let table = OffsetTable::read_from(&mut cursor, entry_limit(data))?;

    let mut last_end = 0;
    for (index, entry) in table.entries().iter().enumerate() {
        let offset = entry.offset as usize;
        if offset > data.len() || offset < first as usize || last_end > offset {
            trace!(index, offset, "entry out of order");
            return Ok(false);
        }

        let bytes = cursor.slice(offset, entry.size as usize)?;
        last_end = offset + bytes.len();

        if bytes.iter().any(|b| *b < CONTROL_LIMIT) {
            trace!(index, offset, "control byte in string");
            return Ok(false);
        }

        if index > 0 && data[offset - 1] != 0 {
            trace!(index, offset, "previous string is not terminated");
            return Ok(false);
        }
    }

    Ok(true)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::error::Result;
    use crate::scene::SceneText;

    #[rustfmt::skip]
    const SCENE: [u8; 32] = [
        0x02, 0x00, 0x00, 0x00,
        0x14, 0x00, 0x00, 0x00, 0x05, 0x00, 0x00, 0x00,
        0x1B, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00,
        b'h', b'e', b'l', b'l', b'o', 0x00, 0x00,
        b'h', b'i', 0x00, 0x00, 0x00,
    ];

    #[test]
    fn import_trims_terminators() -> Result<()> {
        let mut scene = SceneText::new(SCENE);
        assert_eq!(scene.import()?, vec!["hello", "hi"]);

        Ok(())
    }

    #[test]
    fn export_recomputes_offsets() -> Result<()> {
        let scene = SceneText::new(SCENE);
        let output = scene.export(&["hello world".to_string(), "ok".to_string()])?;

        #[rustfmt::skip]
        let expected = vec![
            0x02, 0x00, 0x00, 0x00,
            0x14, 0x00, 0x00, 0x00, 0x0B, 0x00, 0x00, 0x00,
            0x22, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00,
            b'h', b'e', b'l', b'l', b'o', b' ', b'w', b'o', b'r', b'l', b'd', 0x00, 0x00, 0x00,
            b'o', b'k', 0x00, 0x00,
        ];
        assert_eq!(output, expected);
        assert!(SceneText::is_valid(&output));

        Ok(())
    }

    #[test]
    fn export_counts_utf8_bytes() -> Result<()> {
        let output = SceneText::new(Vec::<u8>::new()).export(&["é".to_string(), String::new()])?;

        // Length excludes padding, the empty string still gets its terminators
        assert_eq!(&output[8..12], &[0x02, 0x00, 0x00, 0x00]);
        assert_eq!(&output[12..16], &[0x18, 0x00, 0x00, 0x00]);
        assert_eq!(output.len(), 0x18 + 2);

        let mut scene = SceneText::new(output);
        assert_eq!(scene.import()?, vec!["é", ""]);

        Ok(())
    }

    #[test]
    fn validity_heuristic() {
        assert!(SceneText::is_valid(&SCENE));
        assert!(!SceneText::is_valid(&[]));
        assert!(!SceneText::is_valid(&[0x02, 0x00, 0x00, 0x00]));

        // First offset does not point behind the table
        let mut shifted = SCENE;
        shifted[4] = 0x15;
        assert!(!SceneText::is_valid(&shifted));

        // Second string not preceded by a terminator
        let mut unterminated = SCENE;
        unterminated[26] = b'!';
        assert!(!SceneText::is_valid(&unterminated));

        // Binary data inside a string
        let mut binary = SCENE;
        binary[21] = 0x01;
        assert!(!SceneText::is_valid(&binary));

        // Offset past the end of the buffer
        let mut past_end = SCENE;
        past_end[12] = 0xF0;
        assert!(!SceneText::is_valid(&past_end));
    }
}
