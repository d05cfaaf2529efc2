//! Telling containers apart and opening them without knowing their format

use derive_more::derive::{Display, IsVariant};
use fe3h_info::RecordTable;
use tracing::{debug, instrument, trace};

use crate::caption::Caption;
use crate::error::{Error, Result};
use crate::scene::SceneText;
use crate::scrdata::{Layout, ScrData};

/// Known container formats
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Format {
    /// Array of fixed size file records
    #[display("records")]
    Records,

    /// Offset table followed by strings, see [`SceneText`]
    #[display("scene")]
    Scene,

    /// Timed captions, see [`Caption`]
    #[display("caption")]
    Caption,

    /// Multi-language container, see [`ScrData`]
    #[display("scrdata ({_0})")]
    Nested(Layout),
}

impl Format {
    /// Every format, in the order detection tries them
    pub const PRIORITY: [Format; 6] = [
        Format::Records,
        Format::Scene,
        Format::Caption,
        Format::Nested(Layout::Scenario),
        Format::Nested(Layout::Compact),
        Format::Nested(Layout::Flagged),
    ];

    /// The nested container layouts, in the order detection tries them
    pub const NESTED: [Format; 3] = [
        Format::Nested(Layout::Scenario),
        Format::Nested(Layout::Compact),
        Format::Nested(Layout::Flagged),
    ];

    /// Suffix of file stems holding this format, as in `1234_scene.bin`
    pub fn suffix(&self) -> &'static str {
        match self {
            Format::Records => "records",
            Format::Scene => "scene",
            Format::Caption => "caption",
            Format::Nested(_) => "scrdata",
        }
    }

    /// Formats worth trying for a file, narrowed down by the suffix of its stem
    pub fn candidates(file_stem: &str) -> &'static [Format] {
        match file_stem.rsplit_once('_').map(|(_, suffix)| suffix) {
            Some("records") => &[Format::Records],
            Some("scene") => &[Format::Scene],
            Some("caption") => &[Format::Caption],
            Some("scrdata") => &Format::NESTED,
            _ => &Format::PRIORITY,
        }
    }

    /// Whether `data` passes the check of this format. Decoding errors count as a miss.
    pub fn matches(&self, data: &[u8]) -> bool {
        match self {
            Format::Records => RecordTable::is_valid(data),
            Format::Scene => SceneText::is_valid(data),
            Format::Caption => Caption::is_valid(data),
            Format::Nested(layout) => ScrData::is_valid(data, *layout),
        }
    }
}

/// First format in [`Format::PRIORITY`] that `data` matches
pub fn detect(data: &[u8]) -> Option<Format> {
    detect_among(data, &Format::PRIORITY)
}

/// First format in `candidates` that `data` matches
pub fn detect_among(data: &[u8], candidates: &[Format]) -> Option<Format> {
    let format = candidates.iter().copied().find(|format| {
        let found = format.matches(data);
        trace!(%format, found, "trying format");
        found
    });
    debug!(len = data.len(), ?format, "detected format");
    format
}

/// Strings of a document
#[derive(Debug, Clone, PartialEq, Eq, IsVariant)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Text {
    /// A single sequence of strings
    Lines(Vec<String>),

    /// One sequence of strings per language
    Languages(Vec<Vec<String>>),
}

impl Text {
    /// Total number of strings
    pub fn len(&self) -> usize {
        match self {
            Text::Lines(lines) => lines.len(),
            Text::Languages(languages) => languages.iter().map(Vec::len).sum(),
        }
    }

    /// Whether there are no strings at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An imported container of any format, ready to be exported with new text
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Records(RecordTable),
    Scene(SceneText),
    Caption(Caption),
    Nested(ScrData),
}

impl Document {
    /// Detect the format of `data` and import it
    pub fn open(data: &[u8]) -> Result<(Self, Text)> {
        Self::open_with(data, &Format::PRIORITY)
    }

    /// Import `data` as the first of `candidates` it matches
    pub fn open_with(data: &[u8], candidates: &[Format]) -> Result<(Self, Text)> {
        let format = detect_among(data, candidates).ok_or(Error::InvalidFormat)?;
        Self::open_as(data, format)
    }

    /// Import `data` as `format` without checking it first
    #[instrument(skip(data), fields(len = data.len()), err)]
    pub fn open_as(data: &[u8], format: Format) -> Result<(Self, Text)> {
        Ok(match format {
            Format::Records => {
                let table = RecordTable::parse(data)?;
                let lines = table.filenames();
                (Document::Records(table), Text::Lines(lines))
            }
            Format::Scene => {
                let mut scene = SceneText::new(data);
                let lines = scene.import()?;
                (Document::Scene(scene), Text::Lines(lines))
            }
            Format::Caption => {
                let mut caption = Caption::new(data);
                let lines = caption.import()?;
                (Document::Caption(caption), Text::Lines(lines))
            }
            Format::Nested(layout) => {
                let mut scrdata = ScrData::new(data, layout);
                let languages = scrdata.import()?;
                (Document::Nested(scrdata), Text::Languages(languages))
            }
        })
    }

    /// Format the document was opened as
    pub fn format(&self) -> Format {
        match self {
            Document::Records(_) => Format::Records,
            Document::Scene(_) => Format::Scene,
            Document::Caption(_) => Format::Caption,
            Document::Nested(scrdata) => Format::Nested(scrdata.layout()),
        }
    }

    /// Encode the document with its strings replaced by `text`.
    ///
    /// Single sequence formats only accept [`Text::Lines`]. Nested containers accept
    /// either shape, lines are split up by the number of strings of each language.
    pub fn export(&self, text: &Text) -> Result<Vec<u8>> {
        match (self, text) {
            (Document::Records(table), Text::Lines(lines)) => {
                let mut table = table.clone();
                table.set_filenames(lines.as_slice())?;
                Ok(table.to_bytes()?)
            }
            (Document::Scene(scene), Text::Lines(lines)) => scene.export(lines),
            (Document::Caption(caption), Text::Lines(lines)) => caption.export(lines),
            (Document::Nested(scrdata), Text::Languages(languages)) => scrdata.export(languages),
            (Document::Nested(scrdata), Text::Lines(lines)) => scrdata.export_flat(lines),
            (_, Text::Languages(languages)) => Err(Error::CountMismatch {
                expected: 1,
                found: languages.len(),
            }),
        }
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::detect::{detect, Document, Format, Text};
    use crate::error::{Error, Result};
    use crate::scrdata::Layout;

    #[rustfmt::skip]
    const SCENE: [u8; 24] = [
        0x02, 0x00, 0x00, 0x00,
        0x14, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
        0x16, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
        b'a', 0x00, b'b', 0x00,
    ];

    #[test]
    fn candidates_by_suffix() {
        assert_eq!(Format::candidates("12_scene"), &[Format::Scene]);
        assert_eq!(Format::candidates("12_scrdata").len(), 3);
        assert_eq!(Format::candidates("TEXT_TALK"), &Format::PRIORITY);
        assert_eq!(Format::candidates("plain"), &Format::PRIORITY);
    }

    #[test]
    fn display_names() {
        assert_eq!(Format::Nested(Layout::Compact).to_string(), "scrdata (compact)");
        assert_eq!(Format::Records.to_string(), "records");
        assert_eq!(Format::Nested(Layout::Flagged).suffix(), "scrdata");
    }

    #[test]
    fn open_and_export() -> Result<()> {
        assert_eq!(detect(&SCENE), Some(Format::Scene));

        let (document, text) = Document::open(&SCENE)?;
        assert_eq!(document.format(), Format::Scene);
        assert_eq!(text, Text::Lines(vec!["a".to_string(), "b".to_string()]));

        let output = document.export(&Text::Lines(vec!["xyz".to_string(), "b".to_string()]))?;
        let (_, text) = Document::open(&output)?;
        assert_eq!(text.len(), 2);
        assert!(text.is_lines());

        assert!(matches!(
            document.export(&Text::Languages(vec![Vec::new(), Vec::new()])),
            Err(Error::CountMismatch { .. })
        ));

        Ok(())
    }

    #[test]
    fn unknown_data() {
        assert_eq!(detect(&[0xAB; 16]), None);
        assert!(matches!(Document::open(&[]), Err(Error::InvalidFormat)));
    }
}
