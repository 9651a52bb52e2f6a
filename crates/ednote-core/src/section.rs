//! Canonical section vocabulary and segmentation modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Clinical section a piece of note text belongs to.
///
/// Declaration order is significant: it is the classifier's priority order
/// and the order in which header patterns are scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CanonicalSection {
    #[serde(rename = "Chief Complaint")]
    ChiefComplaint,
    #[serde(rename = "HPI")]
    Hpi,
    #[serde(rename = "ROS")]
    Ros,
    #[serde(rename = "ED Vitals")]
    EdVitals,
    #[serde(rename = "Physical Exam")]
    PhysicalExam,
    #[serde(rename = "Labs & Imaging")]
    LabsImaging,
    #[serde(rename = "Medications")]
    Medications,
    #[serde(rename = "MDM")]
    Mdm,
    #[serde(rename = "Prior to Admission")]
    PriorToAdmission,
    #[serde(rename = "Uncategorized")]
    Uncategorized,
}

impl CanonicalSection {
    pub const COUNT: usize = 10;

    /// All sections in canonical order.
    pub const ALL: [CanonicalSection; Self::COUNT] = [
        CanonicalSection::ChiefComplaint,
        CanonicalSection::Hpi,
        CanonicalSection::Ros,
        CanonicalSection::EdVitals,
        CanonicalSection::PhysicalExam,
        CanonicalSection::LabsImaging,
        CanonicalSection::Medications,
        CanonicalSection::Mdm,
        CanonicalSection::PriorToAdmission,
        CanonicalSection::Uncategorized,
    ];

    /// Sections that can be introduced by a header (everything but `Uncategorized`).
    pub fn headed() -> impl Iterator<Item = CanonicalSection> {
        Self::ALL
            .into_iter()
            .filter(|s| *s != CanonicalSection::Uncategorized)
    }

    /// Display label, also used as the JSON key.
    pub fn label(&self) -> &'static str {
        match self {
            CanonicalSection::ChiefComplaint => "Chief Complaint",
            CanonicalSection::Hpi => "HPI",
            CanonicalSection::Ros => "ROS",
            CanonicalSection::EdVitals => "ED Vitals",
            CanonicalSection::PhysicalExam => "Physical Exam",
            CanonicalSection::LabsImaging => "Labs & Imaging",
            CanonicalSection::Medications => "Medications",
            CanonicalSection::Mdm => "MDM",
            CanonicalSection::PriorToAdmission => "Prior to Admission",
            CanonicalSection::Uncategorized => "Uncategorized",
        }
    }

    /// Position in canonical order.
    pub fn rank(&self) -> usize {
        *self as usize
    }

    /// Look a section up by its label, ignoring ASCII case.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for CanonicalSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How raw text is cut into units before classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentMode {
    /// Sentence splitting followed by keyword classification.
    #[default]
    Sentence,
    /// Header-anchored block extraction.
    Header,
}

impl SegmentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentMode::Sentence => "sentence",
            SegmentMode::Header => "header",
        }
    }
}

impl fmt::Display for SegmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SegmentMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sentence" | "keyword" => Ok(SegmentMode::Sentence),
            "header" => Ok(SegmentMode::Header),
            other => Err(Error::Config(format!(
                "unknown segment mode '{}' (expected 'sentence' or 'header')",
                other
            ))),
        }
    }
}
