//! Fixed width text fields

use binrw::{BinRead, BinResult, BinWrite, Endian};
use derive_more::derive::{AsRef, Deref, Display};
use std::io::{Read, Seek, Write};

use crate::error::{Error, Result};

/// Text stored in a field that always occupies exactly `N` bytes.
///
/// Shorter text is padded with zero bytes when written and trailing zero bytes
/// are trimmed when read. Text longer than `N` bytes can not be constructed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, AsRef, Deref, Display)]
#[as_ref(forward)]
#[deref(forward)]
pub struct FixedString<const N: usize>(String);

impl<const N: usize> FixedString<N> {
    /// Width of the field in bytes
    pub const CAPACITY: usize = N;

    /// Wrap `text`, failing with [`Error::Layout`] if it does not fit into `N` bytes
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.len() > N {
            return Err(Error::Layout {
                length: text.len(),
                capacity: N,
            });
        }
        Ok(FixedString(text))
    }

    /// The contained text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwrap the contained text
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl<const N: usize> TryFrom<&str> for FixedString<N> {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl<const N: usize> TryFrom<String> for FixedString<N> {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl<const N: usize> BinRead for FixedString<N> {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(reader: &mut R, _: Endian, _: Self::Args<'_>) -> BinResult<Self> {
        let mut buffer = [0u8; N];
        reader.read_exact(&mut buffer)?;

        let length = buffer.iter().rposition(|b| *b != 0).map_or(0, |last| last + 1);
        Ok(FixedString(
            String::from_utf8_lossy(&buffer[..length]).into_owned(),
        ))
    }
}

impl<const N: usize> BinWrite for FixedString<N> {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(&self, writer: &mut W, _: Endian, _: Self::Args<'_>) -> BinResult<()> {
        let mut buffer = [0u8; N];
        buffer[..self.0.len()].copy_from_slice(self.0.as_bytes());
        writer.write_all(&buffer)?;
        Ok(())
    }
}
