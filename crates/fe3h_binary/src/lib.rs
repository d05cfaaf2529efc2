//! Shared binary plumbing for the *Fire Emblem: Three Houses* text containers.
//!
//! None of the containers carry a format tag and all of them address their contents
//! through byte offsets, so every codec in the workspace is built from the same few
//! pieces:
//!
//! - [`ByteCursor`]: a read position over an in-memory buffer that refuses to read
//!   past the end. Records are decoded with [`binrw`] derives through
//!   [`ByteCursor::read`] and [`ByteCursor::read_args`].
//! - [`ByteWriter`]: the matching growable output buffer with padding helpers.
//! - [`FixedString`]: text stored in a field of a fixed byte width.
//! - [`OffsetTable`]: a count followed by `(offset, size)` pairs locating child blocks.
//!
//! ## Field layouts
//!
//! | Field kind             | Declared as                                            |
//! |------------------------|--------------------------------------------------------|
//! | Scalar                 | `u16`, `u32`, `u64`, `f32`, ...                        |
//! | Fixed array            | `[T; N]`                                               |
//! | Count prefixed array   | `#[br(count = sibling)]` + `#[bw(try_calc(...))]`      |
//! | Fixed width string     | [`FixedString<N>`]                                     |
//! | Null terminated string | [`ByteCursor::read_cstring`] / [`ByteWriter::write_cstring`] |
//!
//! ## Additional Information
//!
//! - **Endianness**: Little-endian for all multi-byte integers
//!

pub mod cursor;
pub mod entry;
pub mod error;
pub mod string;

pub use cursor::{ByteCursor, ByteWriter};
pub use entry::{OffsetEntry, OffsetTable};
pub use string::FixedString;
