//! Plain-text rendering for export.

use ednote_core::StructuredNote;

use crate::document::{SectionContent, SoapDocument};

/// One `## <Section>` block per section with content, canonical order.
pub fn render_note(note: &StructuredNote) -> String {
    let mut out = String::new();
    for (section, body) in note.present() {
        out.push_str(&format!("## {}\n{}\n\n", section, body.trim()));
    }
    finish(out)
}

/// Category headings, section sub-headings, medication lists as bullets.
/// Categories with no sections are skipped.
pub fn render_document(doc: &SoapDocument) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "ED Note v{} (generated {})\n\n",
        doc.metadata.note_version,
        doc.metadata
            .generated_at
            .to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
    ));

    let mut current = None;
    for (category, section, content) in doc.note.sections() {
        if current != Some(category) {
            out.push_str(&format!("# {}\n\n", category));
            current = Some(category);
        }
        out.push_str(&format!("## {}\n", section));
        match content {
            SectionContent::Text(text) => {
                out.push_str(text.trim());
                out.push_str("\n\n");
            }
            SectionContent::Medications(meds) => {
                for (label, entries) in meds.lists() {
                    if entries.is_empty() {
                        continue;
                    }
                    out.push_str(label);
                    out.push('\n');
                    for entry in entries {
                        out.push_str(&format!("- {}\n", entry));
                    }
                }
                out.push('\n');
            }
        }
    }
    finish(out)
}

fn finish(mut out: String) -> String {
    let len = out.trim_end().len();
    out.truncate(len);
    if !out.is_empty() {
        out.push('\n');
    }
    out
}
