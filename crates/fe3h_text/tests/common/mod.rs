//! Hand built containers shared by the integration tests

#![allow(dead_code)]

use fe3h_text::scrdata::{Slot, TableSchema, ABSENT, TABLE_MAGIC};

/// Value of one pointer record slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Text(&'static str),
    Absent,
    Data(u32),
}

/// Encode a table block the way the game lays them out
pub fn table(arity: usize, flags: &[u8], records: &[Vec<Value>]) -> Vec<u8> {
    let header_size = (16 + flags.len()).next_multiple_of(4) + 4;
    let pointer_region = 4 * arity * records.len();

    let mut pointers = Vec::new();
    let mut blob = Vec::new();
    for record in records {
        assert_eq!(record.len(), arity);
        for value in record {
            let slot = match value {
                Value::Text(text) => {
                    let offset = (pointer_region + blob.len()) as u32;
                    blob.extend_from_slice(text.as_bytes());
                    blob.push(0);
                    offset
                }
                Value::Absent => ABSENT,
                Value::Data(data) => *data,
            };
            pointers.extend_from_slice(&slot.to_le_bytes());
        }
    }

    let mut table = Vec::new();
    table.extend_from_slice(&TABLE_MAGIC.to_le_bytes());
    table.extend_from_slice(&0x0101u16.to_le_bytes());
    table.extend_from_slice(&(flags.len() as u16).to_le_bytes());
    table.extend_from_slice(&(records.len() as u16).to_le_bytes());
    table.extend_from_slice(&((4 * arity) as u16).to_le_bytes());
    table.extend_from_slice(&(header_size as u32).to_le_bytes());
    table.extend_from_slice(flags);
    table.resize(header_size, 0xFF);
    table.extend(pointers);
    table.extend(blob);
    table
}

/// A directory of blocks, each starting on a multiple of `alignment`
pub fn directory(blocks: &[Vec<u8>], alignment: usize) -> Vec<u8> {
    let mut data = (blocks.len() as u32).to_le_bytes().to_vec();
    let mut offset = 4 + 8 * blocks.len();
    for block in blocks {
        data.extend_from_slice(&(offset as u32).to_le_bytes());
        data.extend_from_slice(&(block.len() as u32).to_le_bytes());
        offset = (offset + block.len()).next_multiple_of(alignment);
    }
    for block in blocks {
        data.extend_from_slice(block);
        data.resize(data.len().next_multiple_of(alignment), 0);
    }
    data
}

/// A language block of tables
pub fn language(tables: &[Vec<u8>]) -> Vec<u8> {
    directory(tables, 4)
}

/// A container of language blocks
pub fn container(languages: &[Vec<u8>]) -> Vec<u8> {
    directory(languages, 1)
}

/// A scenario language: every table holds two records, the text of each string slot
/// is taken from `texts` in order. Slots named `None` stay absent.
pub fn scenario_language(texts: &[Option<&'static str>]) -> Vec<u8> {
    let mut texts = texts.iter();
    let tables = TableSchema::ALL
        .iter()
        .enumerate()
        .map(|(index, schema)| {
            let records = (0..2)
                .map(|record| {
                    schema
                        .slots()
                        .iter()
                        .enumerate()
                        .map(|(slot, kind)| match kind {
                            Slot::Text => match texts.next().copied().flatten() {
                                Some(text) => Value::Text(text),
                                None => Value::Absent,
                            },
                            Slot::Data => Value::Data((index * 100 + record * 10 + slot) as u32),
                        })
                        .collect::<Vec<_>>()
                })
                .collect::<Vec<_>>();
            table(schema.slots().len(), &[], &records)
        })
        .collect::<Vec<_>>();

    language(&tables)
}

/// Number of string slots in a [`scenario_language`]
pub fn scenario_slots() -> usize {
    TableSchema::ALL
        .iter()
        .map(|s| 2 * s.slots().iter().filter(|s| **s == Slot::Text).count())
        .sum()
}

/// Texts for every slot of a [`scenario_language`], leaving every third slot absent
pub fn scenario_texts(prefix: &'static str) -> Vec<Option<&'static str>> {
    let texts: &'static [&'static str] = match prefix {
        "en" => &["Hello", "Good morning", "Farewell", "Attack", "Defend", "Wait"],
        _ => &["Bonjour", "Salut", "Adieu", "Attaque", "Défense", "Attente"],
    };
    (0..scenario_slots())
        .map(|i| (i % 3 != 2).then(|| texts[i % texts.len()]))
        .collect()
}
