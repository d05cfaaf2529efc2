//! Error types that can be emitted from this library
//!

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`fe3h_binary::error::Error`]
    #[error(transparent)]
    #[diagnostic(transparent)]
    Binary(#[from] fe3h_binary::error::Error),

    /// Buffer is not an array of file records
    #[error("Invalid file record table")]
    InvalidTable,

    /// The number of supplied values differs from the number of records
    #[error("expected {expected} values but {found} were supplied")]
    CountMismatch {
        /// Number of records in the table
        expected: usize,
        /// Number of values supplied
        found: usize,
    },

    /// More than one indexed entry carries the same file name
    #[error("{0} matches more than one indexed entry")]
    AmbiguousEntry(String),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
