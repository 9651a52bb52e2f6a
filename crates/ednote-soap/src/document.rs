//! SOAP document model and builder.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use tracing::info;

use ednote_core::config::DEFAULT_NOTE_VERSION;
use ednote_core::{CanonicalSection, Result, StructuredNote};

use crate::clock::Clock;
use crate::mapping::{SoapCategory, SoapMapper};
use crate::medications::MedicationBreakdown;

/// Body of one section inside a SOAP category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SectionContent {
    Text(String),
    Medications(MedicationBreakdown),
}

/// Sections grouped by SOAP category, canonical order inside each category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoapNote {
    categories: [Vec<(CanonicalSection, SectionContent)>; SoapCategory::COUNT],
}

impl SoapNote {
    pub(crate) fn push(
        &mut self,
        category: SoapCategory,
        section: CanonicalSection,
        content: SectionContent,
    ) {
        self.categories[category.rank()].push((section, content));
    }

    pub fn category(&self, category: SoapCategory) -> &[(CanonicalSection, SectionContent)] {
        &self.categories[category.rank()]
    }

    /// Every (category, section, content) triple in document order.
    pub fn sections(&self) -> impl Iterator<Item = (SoapCategory, CanonicalSection, &SectionContent)> {
        SoapCategory::ALL.into_iter().flat_map(move |category| {
            self.category(category)
                .iter()
                .map(move |(section, content)| (category, *section, content))
        })
    }

    pub fn section(&self, section: CanonicalSection) -> Option<&SectionContent> {
        self.sections()
            .find(|(_, s, _)| *s == section)
            .map(|(_, _, content)| content)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.iter().all(Vec::is_empty)
    }
}

impl Serialize for SoapNote {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(SoapCategory::COUNT))?;
        for category in SoapCategory::ALL {
            map.serialize_entry(category.label(), &CategoryEntries(self.category(category)))?;
        }
        map.end()
    }
}

struct CategoryEntries<'a>(&'a [(CanonicalSection, SectionContent)]);

impl Serialize for CategoryEntries<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (section, content) in self.0 {
            map.serialize_entry(section.label(), content)?;
        }
        map.end()
    }
}

/// Generation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    /// UTC, ISO-8601 with microseconds and a `Z` suffix.
    #[serde(serialize_with = "serialize_timestamp")]
    pub generated_at: DateTime<Utc>,
    pub note_version: String,
}

fn serialize_timestamp<S: Serializer>(
    at: &DateTime<Utc>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Micros, true))
}

/// The final output document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoapDocument {
    pub metadata: Metadata,
    pub note: SoapNote,
}

impl SoapDocument {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Maps a structured note to SOAP and stamps it with metadata.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    mapper: SoapMapper,
    note_version: String,
}

impl DocumentBuilder {
    pub fn new(mapper: SoapMapper, note_version: impl Into<String>) -> Self {
        Self {
            mapper,
            note_version: note_version.into(),
        }
    }

    pub fn note_version(&self) -> &str {
        &self.note_version
    }

    pub fn build(&self, note: &StructuredNote, clock: &dyn Clock) -> SoapDocument {
        let soap = self.mapper.map(note);
        info!(
            "Built SOAP document v{} with {} sections",
            self.note_version,
            soap.sections().count()
        );
        SoapDocument {
            metadata: Metadata {
                generated_at: clock.now(),
                note_version: self.note_version.clone(),
            },
            note: soap,
        }
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new(SoapMapper::default(), DEFAULT_NOTE_VERSION)
    }
}

/// Build a SOAP document with the default mapping and note version.
pub fn to_soap(note: &StructuredNote, clock: &dyn Clock) -> SoapDocument {
    DocumentBuilder::default().build(note, clock)
}
