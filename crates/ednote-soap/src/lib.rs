//! ednote SOAP: structured note → SOAP document.
//!
//! Sections are grouped into Subjective/Objective/Assessment/Plan/Other,
//! the Medications body is split into infusion/scheduled/PRN lists when it
//! carries those sub-headings, and the result is stamped with generation
//! metadata from an injected [`Clock`].

pub mod clock;
pub mod document;
pub mod export;
pub mod mapping;
pub mod medications;

pub use clock::{Clock, SystemClock};
pub use document::{to_soap, DocumentBuilder, Metadata, SectionContent, SoapDocument, SoapNote};
pub use export::{render_document, render_note};
pub use mapping::{SoapCategory, SoapMapper, SoapMapping};
pub use medications::MedicationBreakdown;
