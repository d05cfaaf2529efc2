//! Bounds-checked positions over in-memory buffers
//!

use binrw::{BinRead, BinWrite};
use byteorder::{ByteOrder, LittleEndian};
use std::io::{self, Cursor};
use tracing::trace;

use crate::error::{Error, Result};

/// A read position into a byte buffer.
///
/// Every access is checked against the end of the buffer and fails with
/// [`Error::BufferBounds`] instead of returning partial data.
///
/// ```
/// # fn doit() -> fe3h_binary::error::Result<()> {
/// use fe3h_binary::ByteCursor;
///
/// let mut cursor = ByteCursor::new(b"\x02\x00\x00\x00hi\x00");
/// assert_eq!(cursor.read::<u32>()?, 2);
/// assert_eq!(cursor.read_cstring()?, "hi");
/// assert!(cursor.read::<u8>().is_err());
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor positioned at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        ByteCursor { data, position: 0 }
    }

    /// Current offset from the start of the buffer
    pub fn position(&self) -> usize {
        self.position
    }

    /// Total length of the underlying buffer
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the underlying buffer is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of bytes left after the current position
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// The underlying buffer
    pub fn get_ref(&self) -> &'a [u8] {
        self.data
    }

    /// Move to an absolute offset. Seeking exactly to the end is allowed.
    pub fn seek(&mut self, position: usize) -> Result<()> {
        if position > self.data.len() {
            return Err(self.out_of_bounds(position));
        }
        self.position = position;
        Ok(())
    }

    /// Borrow `length` bytes at the current position and advance past them
    pub fn read_bytes(&mut self, length: usize) -> Result<&'a [u8]> {
        let end = self
            .position
            .checked_add(length)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| self.out_of_bounds(self.position.saturating_add(length)))?;

        let bytes = &self.data[self.position..end];
        self.position = end;
        Ok(bytes)
    }

    /// Read a single byte
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Read a little endian `u32` without advancing
    pub fn peek_u32(&self) -> Result<u32> {
        self.clone().read_bytes(4).map(LittleEndian::read_u32)
    }

    /// Read a null terminated UTF-8 string, consuming the terminator.
    ///
    /// Invalid sequences are replaced rather than rejected, the game data is not
    /// guaranteed to be clean.
    pub fn read_cstring(&mut self) -> Result<String> {
        let rest = &self.data[self.position..];
        let length = rest
            .iter()
            .position(|b| *b == 0)
            .ok_or_else(|| self.out_of_bounds(self.data.len() + 1))?;

        let text = String::from_utf8_lossy(&rest[..length]).into_owned();
        self.position += length + 1;

        trace!(length, "read cstring");
        Ok(text)
    }

    /// Decode a record that needs no arguments
    pub fn read<T>(&mut self) -> Result<T>
    where
        T: for<'b> BinRead<Args<'b> = ()>,
    {
        self.read_args::<T>(())
    }

    /// Decode a record, passing `args` to its reader
    pub fn read_args<T: BinRead>(&mut self, args: T::Args<'_>) -> Result<T> {
        let mut reader = Cursor::new(self.data);
        reader.set_position(self.position as u64);

        match T::read_le_args(&mut reader, args) {
            Ok(value) => {
                self.position = reader.position() as usize;
                Ok(value)
            }
            Err(e) if e.is_eof() => Err(self.out_of_bounds(self.data.len() + 1)),
            Err(e) => Err(e.into()),
        }
    }

    /// Split off `length` bytes at `offset` as an independent buffer
    pub fn slice(&self, offset: usize, length: usize) -> Result<&'a [u8]> {
        let end = offset
            .checked_add(length)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| self.out_of_bounds(offset.saturating_add(length)))?;

        Ok(&self.data[offset..end])
    }

    fn out_of_bounds(&self, position: usize) -> Error {
        Error::BufferBounds {
            position: position as u64,
            size: self.data.len() as u64,
        }
    }
}

/// A growable output buffer for re-encoding containers
#[derive(Debug, Default)]
pub struct ByteWriter {
    inner: Cursor<Vec<u8>>,
}

impl ByteWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        ByteWriter::default()
    }

    /// Number of bytes written so far
    pub fn position(&self) -> usize {
        self.inner.get_ref().len()
    }

    /// Encode a record that needs no arguments
    pub fn write<T>(&mut self, value: &T) -> Result<()>
    where
        T: for<'b> BinWrite<Args<'b> = ()>,
    {
        value.write_le(&mut self.inner)?;
        Ok(())
    }

    /// Append raw bytes
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        io::Write::write_all(&mut self.inner, bytes)?;
        Ok(())
    }

    /// Append `text` as UTF-8 followed by a zero terminator
    pub fn write_cstring(&mut self, text: &str) -> Result<()> {
        self.write_bytes(text.as_bytes())?;
        self.write_bytes(&[0])
    }

    /// Append `fill` until the buffer is `length` bytes long. Longer buffers are left alone.
    pub fn fill_to(&mut self, length: usize, fill: u8) -> Result<()> {
        let missing = length.saturating_sub(self.position());
        self.write_bytes(&vec![fill; missing])
    }

    /// Append `fill` until the length is a multiple of `alignment`
    pub fn align(&mut self, alignment: usize, fill: u8) -> Result<()> {
        let length = self.position().next_multiple_of(alignment);
        self.fill_to(length, fill)
    }

    /// Consume the writer, returning the encoded bytes
    pub fn into_inner(self) -> Vec<u8> {
        self.inner.into_inner()
    }
}

#[cfg(test)]
mod test {
    use binrw::{BinRead, BinWrite};
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use crate::cursor::{ByteCursor, ByteWriter};
    use crate::error::{Error, Result};

    #[derive(BinRead, BinWrite, Debug, PartialEq)]
    struct Pair {
        first: u16,
        second: u32,
    }

    #[test]
    fn read_scalars_and_records() -> Result<()> {
        #[rustfmt::skip]
        let input = [
            0x01, 0x00,
            0x02, 0x00, 0x00, 0x00,
            0xFF,
        ];

        let mut cursor = ByteCursor::new(&input);
        assert_eq!(cursor.read::<Pair>()?, Pair { first: 1, second: 2 });
        assert_eq!(cursor.position(), 6);
        assert_eq!(cursor.read_u8()?, 0xFF);
        assert_eq!(cursor.remaining(), 0);

        Ok(())
    }

    #[test]
    fn read_past_end_is_out_of_bounds() {
        let input = [0x01, 0x00, 0x02];

        let mut cursor = ByteCursor::new(&input);
        let err = cursor.read::<Pair>().unwrap_err();
        assert!(err.is_out_of_bounds(), "{err:?}");

        // A failed read leaves the position untouched
        assert_eq!(cursor.position(), 0);
        assert!(cursor.read_bytes(4).is_err());
        assert!(cursor.seek(4).is_err());
        assert!(cursor.seek(3).is_ok());
    }

    #[traced_test]
    #[test]
    fn read_cstring_consumes_terminator() -> Result<()> {
        let input = b"abc\0\0d\0";

        let mut cursor = ByteCursor::new(input);
        assert_eq!(cursor.read_cstring()?, "abc");
        assert_eq!(cursor.position(), 4);
        assert_eq!(cursor.read_cstring()?, "");
        assert_eq!(cursor.read_cstring()?, "d");
        assert!(logs_contain("read cstring"));

        Ok(())
    }

    #[test]
    fn read_cstring_without_terminator() {
        let mut cursor = ByteCursor::new(b"abc");
        assert!(matches!(
            cursor.read_cstring(),
            Err(Error::BufferBounds { size: 3, .. })
        ));
    }

    #[test]
    fn peek_does_not_advance() -> Result<()> {
        let cursor = ByteCursor::new(&[0x58, 0x4C, 0x13, 0x00]);
        assert_eq!(cursor.peek_u32()?, 0x0013_4C58);
        assert_eq!(cursor.position(), 0);

        Ok(())
    }

    #[test]
    fn slice_checks_bounds() -> Result<()> {
        let input = [0u8, 1, 2, 3, 4];
        let cursor = ByteCursor::new(&input);

        assert_eq!(cursor.slice(1, 3)?, &[1, 2, 3]);
        assert_eq!(cursor.slice(5, 0)?, &[] as &[u8]);
        assert!(cursor.slice(3, 3).is_err());
        assert!(cursor.slice(usize::MAX, 2).is_err());

        Ok(())
    }

    #[test]
    fn write_pads_and_aligns() -> Result<()> {
        let mut writer = ByteWriter::new();
        writer.write(&Pair { first: 1, second: 2 })?;
        writer.fill_to(8, 0xFF)?;
        writer.write_cstring("ok")?;
        writer.align(4, 0)?;
        writer.fill_to(4, 0xEE)?;

        #[rustfmt::skip]
        let expected = vec![
            0x01, 0x00, 0x02, 0x00, 0x00, 0x00, 0xFF, 0xFF,
            b'o', b'k', 0x00, 0x00,
        ];
        assert_eq!(writer.into_inner(), expected);

        Ok(())
    }
}
