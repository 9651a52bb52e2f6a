//! Privacy protocol applied before formatting.
//!
//! Heuristic, regex-based removal of person names: honorific-prefixed names
//! and labeled name fields. The formatter is unaware of it.

pub mod redact;

pub use redact::{EntityKind, NameRedactor, Redaction, RedactedEntity, Redactor, REDACTED};
