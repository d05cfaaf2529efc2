//! Which pointer record slots hold string offsets

use derive_more::derive::Display;

use crate::error::{Error, Result};
use crate::scrdata::table::TableHeader;

/// Meaning of one 32-bit slot of a pointer record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Offset of a string, relative to the end of the table header
    Text,

    /// Value the game uses for something else, copied through untouched
    Data,
}

use Slot::{Data, Text};

/// Record shapes of the eight scenario tables, by table position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableSchema {
    /// Three lines, three voice ids, a portrait and one unknown value
    Table0,
    /// Eight lines
    Table1,
    /// Eight lines and four unknown values
    Table2,
    /// Two lines and three unknown values
    Table3,
    /// One line and three unknown values
    Table4,
    /// One line and three unknown values
    Table5,
    /// Seven lines
    Table6,
    /// Three unknown values
    Table7,
}

impl TableSchema {
    /// Every schema in table order
    pub const ALL: [TableSchema; 8] = [
        TableSchema::Table0,
        TableSchema::Table1,
        TableSchema::Table2,
        TableSchema::Table3,
        TableSchema::Table4,
        TableSchema::Table5,
        TableSchema::Table6,
        TableSchema::Table7,
    ];

    /// Slots of one record
    pub const fn slots(self) -> &'static [Slot] {
        match self {
            TableSchema::Table0 => &[Text, Text, Text, Data, Data, Data, Data, Data],
            TableSchema::Table1 => &[Text; 8],
            TableSchema::Table2 => &[
                Text, Text, Text, Text, Text, Text, Text, Text, Data, Data, Data, Data,
            ],
            TableSchema::Table3 => &[Text, Text, Data, Data, Data],
            TableSchema::Table4 | TableSchema::Table5 => &[Text, Data, Data, Data],
            TableSchema::Table6 => &[Text; 7],
            TableSchema::Table7 => &[Data, Data, Data],
        }
    }
}

impl TryFrom<usize> for TableSchema {
    type Error = Error;

    fn try_from(index: usize) -> Result<Self> {
        TableSchema::ALL
            .get(index)
            .copied()
            .ok_or_else(|| Error::SchemaMismatch(format!("no scenario table at position {index}")))
    }
}

/// Family of record layouts a nested container uses
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Layout {
    /// Eight tables with fixed record shapes, see [`TableSchema`]
    #[display("scenario")]
    Scenario,

    /// Three tables with a single string per record
    #[display("compact")]
    Compact,

    /// Any number of tables, slot meaning taken from the flag bytes of each table header
    #[display("flagged")]
    Flagged,
}

impl Layout {
    /// Every layout in detection order
    pub const ALL: [Layout; 3] = [Layout::Scenario, Layout::Compact, Layout::Flagged];

    /// Number of tables each language has to hold, if fixed
    pub const fn table_count(self) -> Option<usize> {
        match self {
            Layout::Scenario => Some(TableSchema::ALL.len()),
            Layout::Compact => Some(3),
            Layout::Flagged => None,
        }
    }

    /// Slots of the records of the table at `index`
    pub fn slots(self, index: usize, header: &TableHeader) -> Result<Vec<Slot>> {
        Ok(match self {
            Layout::Scenario => TableSchema::try_from(index)?.slots().to_vec(),
            Layout::Compact => vec![Text],
            Layout::Flagged => header
                .flags
                .iter()
                .map(|flag| if *flag == 0 { Text } else { Data })
                .collect(),
        })
    }
}
