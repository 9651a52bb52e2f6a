//! Section → SOAP category mapping.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use ednote_core::{CanonicalSection, StructuredNote};

use crate::document::{SectionContent, SoapNote};
use crate::medications::MedicationBreakdown;

/// SOAP categories, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SoapCategory {
    Subjective,
    Objective,
    Assessment,
    Plan,
    Other,
}

impl SoapCategory {
    pub const COUNT: usize = 5;

    pub const ALL: [SoapCategory; Self::COUNT] = [
        SoapCategory::Subjective,
        SoapCategory::Objective,
        SoapCategory::Assessment,
        SoapCategory::Plan,
        SoapCategory::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SoapCategory::Subjective => "Subjective",
            SoapCategory::Objective => "Objective",
            SoapCategory::Assessment => "Assessment",
            SoapCategory::Plan => "Plan",
            SoapCategory::Other => "Other",
        }
    }

    pub fn rank(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for SoapCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which SOAP category each canonical section belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapMapping {
    categories: [SoapCategory; CanonicalSection::COUNT],
}

impl SoapMapping {
    pub fn category(&self, section: CanonicalSection) -> SoapCategory {
        self.categories[section.rank()]
    }

    /// Move `section` to another category.
    pub fn with(mut self, section: CanonicalSection, category: SoapCategory) -> Self {
        self.categories[section.rank()] = category;
        self
    }

    /// Sections mapped to `category`, in canonical order.
    pub fn sections_in(&self, category: SoapCategory) -> impl Iterator<Item = CanonicalSection> + '_ {
        CanonicalSection::ALL
            .into_iter()
            .filter(move |s| self.category(*s) == category)
    }
}

impl Default for SoapMapping {
    fn default() -> Self {
        use CanonicalSection::*;

        let mut categories = [SoapCategory::Other; CanonicalSection::COUNT];
        for section in CanonicalSection::ALL {
            categories[section.rank()] = match section {
                ChiefComplaint | Hpi | Ros => SoapCategory::Subjective,
                EdVitals | PhysicalExam | LabsImaging | Medications => SoapCategory::Objective,
                Mdm => SoapCategory::Assessment,
                PriorToAdmission => SoapCategory::Plan,
                Uncategorized => SoapCategory::Other,
            };
        }
        Self { categories }
    }
}

/// Groups a structured note's non-empty sections into SOAP categories.
#[derive(Debug, Clone)]
pub struct SoapMapper {
    mapping: SoapMapping,
    split_medications: bool,
}

impl SoapMapper {
    pub fn new(mapping: SoapMapping) -> Self {
        Self {
            mapping,
            split_medications: true,
        }
    }

    /// Keep Medications as plain text even when sub-headings are present.
    pub fn without_medication_breakdown(mut self) -> Self {
        self.split_medications = false;
        self
    }

    pub fn mapping(&self) -> &SoapMapping {
        &self.mapping
    }

    /// Empty and `[Missing Data]` sections are left out.
    pub fn map(&self, note: &StructuredNote) -> SoapNote {
        let mut soap = SoapNote::default();

        for (section, body) in note.present() {
            let body = body.trim();
            let content = match section {
                CanonicalSection::Medications if self.split_medications => {
                    match MedicationBreakdown::parse(body) {
                        Some(breakdown) => SectionContent::Medications(breakdown),
                        None => {
                            debug!("No medication sub-headings, keeping Medications as text");
                            SectionContent::Text(body.to_string())
                        }
                    }
                }
                _ => SectionContent::Text(body.to_string()),
            };
            soap.push(self.mapping.category(section), section, content);
        }

        soap
    }
}

impl Default for SoapMapper {
    fn default() -> Self {
        Self::new(SoapMapping::default())
    }
}
