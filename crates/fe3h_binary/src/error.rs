//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent wrapper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(binrw::Error),

    /// A read, seek or slice reached outside of the buffer
    #[error("access at {position:#x} is outside of a {size} byte buffer")]
    #[diagnostic(help("the file is either corrupt or not of the expected format"))]
    BufferBounds {
        /// Offset the access started at or tried to reach
        position: u64,
        /// Length of the buffer being accessed
        size: u64,
    },

    /// A value does not fit the fixed width field it is stored in
    #[error("{length} bytes do not fit into a {capacity} byte field")]
    Layout {
        /// Encoded length of the value
        length: usize,
        /// Width of the field
        capacity: usize,
    },

    /// A magic number, count or layout differs from the expected one
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),
}

impl Error {
    /// Whether this error was caused by touching bytes outside of a buffer
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, Error::BufferBounds { .. })
    }
}

impl From<binrw::Error> for Error {
    fn from(value: binrw::Error) -> Self {
        match value.root_cause() {
            binrw::Error::BadMagic { pos, .. } => {
                Error::SchemaMismatch(format!("bad magic at {pos:#x}"))
            }
            binrw::Error::AssertFail { pos, message } => {
                Error::SchemaMismatch(format!("{message} at {pos:#x}"))
            }
            _ => Error::BinRWError(value),
        }
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
