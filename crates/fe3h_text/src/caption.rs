//! Timed captions for cutscenes

use binrw::{binrw, BinRead, BinWrite};
use fe3h_binary::entry::to_u32;
use fe3h_binary::{ByteCursor, ByteWriter};
use tracing::{debug, instrument};

use crate::error::{Error, Result};

/// Leading bytes of every caption file
pub const CAPTION_MAGIC: [u8; 4] = [0x62, 0x29, 0x00, 0x00];

#[binrw]
#[brw(little, magic = b"\x62\x29\x00\x00")]
#[br(import(limit: u32))]
#[derive(Debug, Clone, PartialEq, Eq)]
struct CaptionHeader {
    #[br(temp, assert(count <= limit, "caption count {} exceeds {}", count, limit))]
    #[bw(try_calc(u32::try_from(offsets.len())))]
    count: u32,

    #[br(count = count)]
    offsets: Vec<u32>,
}

impl CaptionHeader {
    const fn size_for(count: usize) -> usize {
        8 + 4 * count
    }
}

/// When a caption is shown, in seconds
#[derive(BinRead, BinWrite, Debug, Default, Clone, Copy, PartialEq)]
#[brw(little)]
pub struct CaptionTiming {
    /// Time the caption appears at
    pub start: f32,

    /// How long the caption stays visible
    pub duration: f32,
}

/// A single caption
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionEntry {
    /// When the caption is shown
    pub timing: CaptionTiming,

    /// Text of the caption
    pub text: String,
}

/// A caption container.
///
/// The header holds the magic, a count and one offset per caption. Each caption is
/// its timing followed by zero terminated text. Export keeps the timing of the imported
/// captions and only replaces their text.
#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    data: Vec<u8>,
    entries: Option<Vec<CaptionEntry>>,
}

impl Caption {
    /// Wrap the raw contents of a caption file
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Caption {
            data: data.into(),
            entries: None,
        }
    }

    /// Whether `data` starts with the caption magic and every offset points past the header
    pub fn is_valid(data: &[u8]) -> bool {
        data.starts_with(&CAPTION_MAGIC) && read_header(data).is_ok()
    }

    /// Captions read by the last import
    pub fn entries(&self) -> Option<&[CaptionEntry]> {
        self.entries.as_deref()
    }

    /// Decode every caption text in header order
    #[instrument(skip_all, fields(len = self.data.len()), err)]
    pub fn import(&mut self) -> Result<Vec<String>> {
        let header = read_header(&self.data)?;
        debug!(count = header.offsets.len(), "reading captions");

        let mut cursor = ByteCursor::new(&self.data);
        let mut entries = Vec::with_capacity(header.offsets.len());
        for offset in &header.offsets {
            cursor.seek(*offset as usize)?;
            let timing = cursor.read::<CaptionTiming>()?;
            let text = cursor.read_cstring()?;
            entries.push(CaptionEntry { timing, text });
        }

        let texts = entries.iter().map(|e| e.text.clone()).collect();
        self.entries = Some(entries);
        Ok(texts)
    }

    /// Encode the imported captions with their text replaced by `lines`
    #[instrument(skip_all, fields(count = lines.len()), err)]
    pub fn export(&self, lines: &[String]) -> Result<Vec<u8>> {
        let entries = self.entries.as_ref().ok_or(Error::NotImported)?;
        if entries.len() != lines.len() {
            return Err(Error::CountMismatch {
                expected: entries.len(),
                found: lines.len(),
            });
        }

        let header_size = CaptionHeader::size_for(entries.len());
        let mut blob = ByteWriter::new();
        let mut offsets = Vec::with_capacity(entries.len());

        for (entry, line) in entries.iter().zip(lines) {
            offsets.push(to_u32(header_size + blob.position())?);
            blob.write(&entry.timing)?;
            blob.write_cstring(line)?;
            blob.write_bytes(&[0])?;
            blob.align(4, 0)?;
        }

        let mut writer = ByteWriter::new();
        writer.write(&CaptionHeader { offsets })?;
        writer.write_bytes(&blob.into_inner())?;

        Ok(writer.into_inner())
    }
}

fn read_header(data: &[u8]) -> Result<CaptionHeader> {
    let limit = u32::try_from(data.len() / 4).unwrap_or(u32::MAX);
    let mut cursor = ByteCursor::new(data);
    let header = cursor.read_args::<CaptionHeader>((limit,))?;

    let header_end = cursor.position();
    if let Some(offset) = header
        .offsets
        .iter()
        .find(|o| **o as usize >= data.len() || (**o as usize) < header_end)
    {
        return Err(Error::SchemaMismatch(format!(
            "caption offset {offset:#x} outside of {header_end:#x}..{:#x}",
            data.len()
        )));
    }

    Ok(header)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::caption::{Caption, CaptionTiming};
    use crate::error::{Error, Result};

    #[rustfmt::skip]
    const CAPTION: [u8; 40] = [
        0x62, 0x29, 0x00, 0x00,
        0x02, 0x00, 0x00, 0x00,
        0x10, 0x00, 0x00, 0x00,
        0x1C, 0x00, 0x00, 0x00,
        // 1.0, 2.5, "Hi"
        0x00, 0x00, 0x80, 0x3F, 0x00, 0x00, 0x20, 0x40, b'H', b'i', 0x00, 0x00,
        // 4.0, 0.5, "Bye"
        0x00, 0x00, 0x80, 0x40, 0x00, 0x00, 0x00, 0x3F, b'B', b'y', b'e', 0x00,
    ];

    #[test]
    fn import_captions() -> Result<()> {
        assert!(Caption::is_valid(&CAPTION));

        let mut caption = Caption::new(CAPTION);
        assert_eq!(caption.import()?, vec!["Hi", "Bye"]);
        assert_eq!(
            caption.entries().map(|e| e[1].timing),
            Some(CaptionTiming { start: 4.0, duration: 0.5 })
        );

        Ok(())
    }

    #[test]
    fn export_keeps_timing() -> Result<()> {
        let mut caption = Caption::new(CAPTION);
        caption.import()?;

        let output = caption.export(&["Hello".to_string(), String::new()])?;

        #[rustfmt::skip]
        let expected = vec![
            0x62, 0x29, 0x00, 0x00,
            0x02, 0x00, 0x00, 0x00,
            0x10, 0x00, 0x00, 0x00,
            0x20, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x80, 0x3F, 0x00, 0x00, 0x20, 0x40,
            b'H', b'e', b'l', b'l', b'o', 0x00, 0x00, 0x00,
            0x00, 0x00, 0x80, 0x40, 0x00, 0x00, 0x00, 0x3F,
            0x00, 0x00, 0x00, 0x00,
        ];
        assert_eq!(output, expected);

        let mut reread = Caption::new(output);
        assert_eq!(reread.import()?, vec!["Hello", ""]);

        Ok(())
    }

    #[test]
    fn export_requires_import() {
        let caption = Caption::new(CAPTION);
        assert!(matches!(
            caption.export(&["x".to_string(), "y".to_string()]),
            Err(Error::NotImported)
        ));
    }

    #[test]
    fn export_requires_same_count() -> Result<()> {
        let mut caption = Caption::new(CAPTION);
        caption.import()?;

        assert!(matches!(
            caption.export(&["only".to_string()]),
            Err(Error::CountMismatch {
                expected: 2,
                found: 1
            })
        ));

        Ok(())
    }

    #[test]
    fn reject_bad_headers() {
        let mut wrong_magic = CAPTION;
        wrong_magic[1] = 0x28;
        assert!(!Caption::is_valid(&wrong_magic));

        let mut into_header = CAPTION;
        into_header[8] = 0x0C;
        assert!(!Caption::is_valid(&into_header));

        let mut past_end = CAPTION;
        past_end[12] = 0x28;
        assert!(!Caption::is_valid(&past_end));

        assert!(!Caption::is_valid(&CAPTION[..10]));
    }
}
