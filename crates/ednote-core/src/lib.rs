//! ednote core: section vocabulary, structured note model, abbreviation tables, configuration.

pub mod abbreviations;
pub mod config;
pub mod error;
pub mod note;
pub mod section;

pub use abbreviations::AbbreviationTable;
pub use config::EdNoteConfig;
pub use error::{Error, Result};
pub use note::{FormatWarning, StructuredNote, TextUnit, MISSING_DATA};
pub use section::{CanonicalSection, SegmentMode};
