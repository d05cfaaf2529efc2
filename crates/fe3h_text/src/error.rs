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

    /// Transparent wrapper for [`fe3h_info::error::Error`]
    #[error(transparent)]
    #[diagnostic(transparent)]
    Info(#[from] fe3h_info::error::Error),

    /// A magic number, table count or record layout differs from the expected one
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// The number of supplied strings differs from the number imported
    #[error("expected {expected} strings but {found} were supplied")]
    #[diagnostic(help("export takes exactly the strings returned by import, in the same order"))]
    CountMismatch {
        /// Number of strings the container holds
        expected: usize,
        /// Number of strings supplied
        found: usize,
    },

    /// Export was called before import
    #[error("the container has not been imported yet")]
    NotImported,

    /// The buffer matches none of the known containers
    #[error("unrecognised text container")]
    InvalidFormat,
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
