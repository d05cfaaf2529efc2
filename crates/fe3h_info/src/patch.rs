//! Pointing table entries at loose files placed in the `mods` directory
//!

use bon::Builder;
use fe3h_binary::FixedString;
use std::path::Path;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::table::FileTable;
use crate::types::{FileInfo, IndexedFile, ROM_PREFIX};

/// A loose file that should replace or add a table entry
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct ModFile {
    /// Path relative to the `mods` directory, either separator is accepted
    #[builder(into)]
    pub path: String,

    /// Size of the file in bytes
    pub size: u64,
}

impl ModFile {
    /// Path with forward slashes and no leading separator
    pub fn normalized_path(&self) -> String {
        self.path.replace('\\', "/").trim_start_matches('/').to_string()
    }

    /// Archive path the file would have had without the `mods` directory
    pub fn rom_path(&self) -> String {
        format!("{ROM_PREFIX}{}", self.normalized_path())
    }

    /// Archive path of the file inside the `mods` directory
    pub fn replacement_path(&self) -> String {
        format!("{ROM_PREFIX}mods/{}", self.normalized_path())
    }

    fn matches(&self, filename: &str) -> bool {
        filename.eq_ignore_ascii_case(&self.rom_path())
            || filename.eq_ignore_ascii_case(&self.replacement_path())
    }

    fn info(&self) -> Result<FileInfo> {
        Ok(FileInfo {
            decompressed_size: self.size,
            compressed_size: self.size,
            compressed: false,
            filename: FixedString::new(self.replacement_path())?,
        })
    }
}

/// What [`FileTable::apply_mod`] did with a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The indexed entry with this id now points at the file
    Indexed(u64),

    /// The named entry at this position now points at the file
    Renamed(usize),

    /// Neither an id nor a matching entry was found
    Skipped,
}

/// The id encoded as leading decimal digits of a file name, as in `1234_scene.bin`
pub fn file_id(path: impl AsRef<Path>) -> Option<u64> {
    let stem = path.as_ref().file_stem()?.to_str()?;
    let end = stem
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(stem.len());
    stem[..end].parse().ok()
}

impl FileTable {
    /// Point the matching entry at `file`.
    ///
    /// The entry is located by the id in the file name, then by the file's archive path
    /// among the indexed entries and finally among the named entries.
    #[instrument(skip(self), fields(path = %file.path), err)]
    pub fn apply_mod(&mut self, file: &ModFile) -> Result<PatchOutcome> {
        let id = match file_id(file.normalized_path()) {
            Some(id) => Some(id),
            None => self.find_indexed(file)?,
        };

        if let Some(id) = id {
            debug!(id, "replacing indexed entry");
            self.insert(IndexedFile {
                id,
                info: file.info()?,
            });
            return Ok(PatchOutcome::Indexed(id));
        }

        let Some(index) = self.named.iter().position(|e| file.matches(&e.filename)) else {
            debug!("no entry found");
            return Ok(PatchOutcome::Skipped);
        };

        debug!(index, "replacing named entry");
        self.named[index] = file.info()?;
        Ok(PatchOutcome::Renamed(index))
    }

    fn find_indexed(&self, file: &ModFile) -> Result<Option<u64>> {
        let mut matches = self
            .indexed
            .values()
            .filter(|e| file.matches(&e.info.filename));

        match (matches.next(), matches.next()) {
            (Some(entry), None) => Ok(Some(entry.id)),
            (Some(_), Some(_)) => Err(Error::AmbiguousEntry(file.rom_path())),
            _ => Ok(None),
        }
    }
}
