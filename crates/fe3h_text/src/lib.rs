//! This library extracts and re-inserts the text of the containers used by
//! *Fire Emblem: Three Houses*.
//!
//! None of the containers carry a format tag. Each codec offers a heuristic `is_valid`
//! check and [`detect`] tries them in a fixed order, so a buffer passing several checks
//! is always classified the same way.
//!
//! | Format                 | Codec                     | Strings                          |
//! |------------------------|---------------------------|----------------------------------|
//! | File records           | [`fe3h_info::RecordTable`] | one file name per record        |
//! | Scene text             | [`SceneText`]             | one per offset table entry       |
//! | Captions               | [`Caption`]               | one per caption                  |
//! | Nested scenario data   | [`ScrData`]               | one sequence per language        |
//!
//! Every codec follows the same life cycle: wrap the raw bytes, `import` the strings,
//! edit them, then `export` new bytes. Strings may change length freely, every offset is
//! recomputed on export. Exporting needs the same number of strings that import returned.
//!
//! ```
//! # fn doit() -> fe3h_text::error::Result<()> {
//! use fe3h_text::{Document, Text};
//!
//! # let data = fe3h_text::SceneText::new(Vec::<u8>::new())
//! #     .export(&["Hello".to_string(), "World".to_string()])?;
//! let (document, text) = Document::open(&data)?;
//! let Text::Lines(mut lines) = text else { unreachable!() };
//! lines[0] = "Goodbye".to_string();
//!
//! let patched = document.export(&Text::Lines(lines))?;
//! # assert!(patched.len() > data.len());
//! # Ok(())
//! # }
//! # doit().unwrap();
//! ```
//!
//! ## Additional Information
//!
//! - **Endianness**: Little-endian for all multi-byte integers
//! - **Encoding**: UTF-8, invalid sequences are replaced when importing
//!

pub mod caption;
pub mod detect;
pub mod error;
pub mod scene;
pub mod scrdata;

pub use caption::Caption;
pub use detect::{detect, detect_among, Document, Format, Text};
pub use scene::SceneText;
pub use scrdata::{Layout, ScrData};
