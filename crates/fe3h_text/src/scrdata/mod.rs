//! Multi-language scenario data.
//!
//! A nested container is three offset directories deep:
//!
//! | Level     | Contents                                                           |
//! |-----------|--------------------------------------------------------------------|
//! | Container | count + `(offset, size)` per language, relative to the container   |
//! | Language  | count + `(offset, size)` per table, relative to the language block |
//! | Table     | [`TableHeader`], pointer records, then the string blob             |
//!
//! String offsets inside pointer records are relative to the table's `header_size`.
//! Slots holding [`ABSENT`] have no string. Every language has to contain the same
//! number of tables.

mod schema;
mod table;

pub use schema::{Layout, Slot, TableSchema};
pub use table::{PointerRecord, TableBlock, TableHeader, ABSENT, TABLE_MAGIC};

use fe3h_binary::{ByteCursor, ByteWriter, OffsetTable};
use tracing::{debug, instrument};

use crate::error::{Error, Result};

/// Most languages a container may declare
pub const LANGUAGE_LIMIT: u32 = 64;

/// Most tables a language may declare
pub const TABLE_LIMIT: u32 = 64;

/// Alignment of table blocks inside a language block
const TABLE_ALIGNMENT: usize = 4;

/// A nested scenario container.
///
/// ```
/// # fn doit() -> fe3h_text::error::Result<()> {
/// use fe3h_text::scrdata::{Layout, ScrData};
///
/// # let data = vec![0u8; 4];
/// let mut container = ScrData::new(data, Layout::Compact);
/// let mut languages = container.import()?;
/// for line in languages.iter_mut().flatten() {
///     line.make_ascii_uppercase();
/// }
/// let _bytes = container.export(&languages)?;
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrData {
    data: Vec<u8>,
    layout: Layout,
    languages: Option<Vec<Vec<TableBlock>>>,
}

impl ScrData {
    /// Wrap the raw contents of a container using the given record layout
    pub fn new(data: impl Into<Vec<u8>>, layout: Layout) -> Self {
        ScrData {
            data: data.into(),
            layout,
            languages: None,
        }
    }

    /// Record layout the container is read with
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Whether `data` decodes with `layout` and holds more than one string
    pub fn is_valid(data: &[u8], layout: Layout) -> bool {
        match decode(data, layout) {
            Ok((_, text)) => text.iter().map(Vec::len).sum::<usize>() > 1,
            Err(_) => false,
        }
    }

    /// Decode the strings of every language, keeping the table layout for [`ScrData::export`]
    #[instrument(skip_all, fields(len = self.data.len(), layout = %self.layout), err)]
    pub fn import(&mut self) -> Result<Vec<Vec<String>>> {
        let (languages, text) = decode(&self.data, self.layout)?;
        self.languages = Some(languages);
        Ok(text)
    }

    /// [`ScrData::import`] with the languages concatenated
    pub fn import_flat(&mut self) -> Result<Vec<String>> {
        Ok(self.import()?.into_iter().flatten().collect())
    }

    /// Number of strings of every language found by the last import
    pub fn string_counts(&self) -> Option<Vec<usize>> {
        self.languages.as_ref().map(|languages| {
            languages
                .iter()
                .map(|tables| tables.iter().map(TableBlock::text_count).sum())
                .collect()
        })
    }

    /// Encode the container with the strings of each language replaced
    #[instrument(skip_all, fields(languages = languages.len()), err)]
    pub fn export(&self, languages: &[Vec<String>]) -> Result<Vec<u8>> {
        let tables = self.languages.as_ref().ok_or(Error::NotImported)?;
        if tables.len() != languages.len() {
            return Err(Error::CountMismatch {
                expected: tables.len(),
                found: languages.len(),
            });
        }

        let blocks = tables
            .iter()
            .zip(languages)
            .map(|(tables, strings)| encode_language(tables, strings))
            .collect::<Result<Vec<_>>>()?;

        let lengths = blocks.iter().map(Vec::len).collect::<Vec<_>>();
        let directory = OffsetTable::from_lengths(&lengths, 1)?;

        let mut writer = ByteWriter::new();
        writer.write(&directory)?;
        for block in &blocks {
            writer.write_bytes(block)?;
        }

        debug!(len = writer.position(), "encoded container");
        Ok(writer.into_inner())
    }

    /// [`ScrData::export`] taking the languages concatenated
    pub fn export_flat(&self, strings: &[String]) -> Result<Vec<u8>> {
        let counts = self.string_counts().ok_or(Error::NotImported)?;
        let expected = counts.iter().sum();
        if strings.len() != expected {
            return Err(Error::CountMismatch {
                expected,
                found: strings.len(),
            });
        }

        let mut rest = strings;
        let languages = counts
            .iter()
            .map(|count| {
                let (language, tail) = rest.split_at(*count);
                rest = tail;
                language.to_vec()
            })
            .collect::<Vec<_>>();

        self.export(&languages)
    }
}

type Decoded = (Vec<Vec<TableBlock>>, Vec<Vec<String>>);

fn decode(data: &[u8], layout: Layout) -> Result<Decoded> {
    let mut cursor = ByteCursor::new(data);
    let directory = OffsetTable::read_from(&mut cursor, LANGUAGE_LIMIT)?;

    let mut expected = layout.table_count();
    let mut languages = Vec::with_capacity(directory.len());
    let mut text = Vec::with_capacity(directory.len());

    for (index, language) in directory.slices(data)?.into_iter().enumerate() {
        let mut cursor = ByteCursor::new(language);
        let tables = OffsetTable::read_from(&mut cursor, TABLE_LIMIT)?;

        let expected = *expected.get_or_insert(tables.len());
        if tables.len() != expected {
            return Err(Error::SchemaMismatch(format!(
                "language {index} holds {} tables instead of {expected}",
                tables.len()
            )));
        }

        let mut blocks = Vec::with_capacity(tables.len());
        let mut strings = Vec::new();
        for (position, table) in tables.slices(language)?.into_iter().enumerate() {
            let (block, table_strings) = TableBlock::parse(table, layout, position)?;
            blocks.push(block);
            strings.extend(table_strings);
        }

        debug!(
            language = index,
            tables = blocks.len(),
            strings = strings.len(),
            "decoded language"
        );
        languages.push(blocks);
        text.push(strings);
    }

    Ok((languages, text))
}

fn encode_language(tables: &[TableBlock], strings: &[String]) -> Result<Vec<u8>> {
    let expected = tables.iter().map(TableBlock::text_count).sum();
    if strings.len() != expected {
        return Err(Error::CountMismatch {
            expected,
            found: strings.len(),
        });
    }

    let mut rest = strings;
    let mut encoded = Vec::with_capacity(tables.len());
    for table in tables {
        let (own, tail) = rest.split_at(table.text_count());
        encoded.push(table.write(own)?);
        rest = tail;
    }

    let lengths = encoded.iter().map(Vec::len).collect::<Vec<_>>();
    let directory = OffsetTable::from_lengths(&lengths, TABLE_ALIGNMENT)?;

    let mut writer = ByteWriter::new();
    writer.write(&directory)?;
    for table in &encoded {
        writer.write_bytes(table)?;
        writer.align(TABLE_ALIGNMENT, 0)?;
    }

    Ok(writer.into_inner())
}
