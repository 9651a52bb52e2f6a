//! Medication sub-list parsing.
//!
//! Best effort: the Medications body is split only when it contains one of the
//! exact sub-headings below. Entries are separated by line breaks or
//! semicolons; list bullets are stripped.

use serde::{Deserialize, Serialize};

const CONTINUOUS_INFUSIONS: &str = "Continuous Infusions:";
const SCHEDULED_MEDS: &str = "Scheduled Meds:";
const PRN_MEDS: &str = "PRN Meds:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MedList {
    Continuous,
    Scheduled,
    Prn,
}

const HEADINGS: [(MedList, &str); 3] = [
    (MedList::Continuous, CONTINUOUS_INFUSIONS),
    (MedList::Scheduled, SCHEDULED_MEDS),
    (MedList::Prn, PRN_MEDS),
];

/// Medications split by administration schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationBreakdown {
    #[serde(rename = "Continuous Infusions")]
    pub continuous_infusions: Vec<String>,
    #[serde(rename = "Scheduled Meds")]
    pub scheduled: Vec<String>,
    #[serde(rename = "PRN Meds")]
    pub prn: Vec<String>,
    /// Text ahead of the first sub-heading.
    #[serde(rename = "Other Meds", default, skip_serializing_if = "Vec::is_empty")]
    pub other: Vec<String>,
}

impl MedicationBreakdown {
    /// Split `body` by sub-heading. `None` when no sub-heading is present.
    pub fn parse(body: &str) -> Option<Self> {
        let mut marks: Vec<(usize, usize, MedList)> = HEADINGS
            .iter()
            .flat_map(|(list, heading)| {
                body.match_indices(heading)
                    .map(move |(start, h)| (start, start + h.len(), *list))
            })
            .collect();
        if marks.is_empty() {
            return None;
        }
        marks.sort_by_key(|(start, _, _)| *start);

        let mut breakdown = Self {
            other: entries(strip_label(&body[..marks[0].0])),
            ..Self::default()
        };

        for (i, (_, block_start, list)) in marks.iter().enumerate() {
            let block_end = marks.get(i + 1).map_or(body.len(), |(next, _, _)| *next);
            let items = entries(&body[*block_start..block_end]);
            breakdown.list_mut(*list).extend(items);
        }

        Some(breakdown)
    }

    fn list_mut(&mut self, list: MedList) -> &mut Vec<String> {
        match list {
            MedList::Continuous => &mut self.continuous_infusions,
            MedList::Scheduled => &mut self.scheduled,
            MedList::Prn => &mut self.prn,
        }
    }

    /// Labeled lists in display order, including `Other Meds` when non-empty.
    pub fn lists(&self) -> Vec<(&'static str, &[String])> {
        let mut lists = vec![
            ("Continuous Infusions", self.continuous_infusions.as_slice()),
            ("Scheduled Meds", self.scheduled.as_slice()),
            ("PRN Meds", self.prn.as_slice()),
        ];
        if !self.other.is_empty() {
            lists.push(("Other Meds", self.other.as_slice()));
        }
        lists
    }

    pub fn is_empty(&self) -> bool {
        self.continuous_infusions.is_empty()
            && self.scheduled.is_empty()
            && self.prn.is_empty()
            && self.other.is_empty()
    }
}

/// Drop a leading "Medications:" label so it is not read as an entry.
fn strip_label(text: &str) -> &str {
    let trimmed = text.trim_start();
    let label = "medications:";
    match trimmed.get(..label.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(label) => &trimmed[label.len()..],
        _ => trimmed,
    }
}

fn entries(block: &str) -> Vec<String> {
    block
        .split(['\n', ';'])
        .map(|line| {
            line.trim()
                .trim_start_matches(['-', '*', '•'])
                .trim()
        })
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
