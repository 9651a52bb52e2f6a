//! Fold classified units back into per-section bodies.

use ednote_core::{CanonicalSection, StructuredNote, TextUnit, MISSING_DATA};

/// Inserted between units that land in the same section.
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Append every unit to its section in encounter order. Units with no section
/// go to `Uncategorized`. With `mark_missing`, headed sections left empty get
/// the [`MISSING_DATA`] placeholder.
pub fn assemble<I>(units: I, mark_missing: bool) -> StructuredNote
where
    I: IntoIterator<Item = TextUnit>,
{
    let mut note = StructuredNote::new();

    for unit in units {
        let text = unit.text.trim();
        if text.is_empty() {
            continue;
        }
        let body = note.body_mut(unit.section_or_uncategorized());
        body.push_str(text);
        body.push_str(PARAGRAPH_SEPARATOR);
    }

    for section in CanonicalSection::ALL {
        let body = note.body_mut(section);
        let trimmed_len = body.trim_end().len();
        body.truncate(trimmed_len);

        if mark_missing && section != CanonicalSection::Uncategorized && body.is_empty() {
            body.push_str(MISSING_DATA);
        }
    }

    note
}
