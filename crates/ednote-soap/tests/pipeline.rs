//! End-to-end: raw note text → structured note → SOAP document.

use chrono::{DateTime, TimeZone, Utc};
use ednote_core::{AbbreviationTable, CanonicalSection, SegmentMode};
use ednote_ingest::format;
use ednote_soap::{to_soap, SectionContent, SoapCategory};

fn clock() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

const NOTE: &str = "Chief complaint: shortness of breath. \
    Pt c/o SOB for two days. \
    Denies chest pain. \
    BP 138/84, HR 96, O2 sat 91% on RA. \
    Lungs with diffuse wheezes. \
    CXR without consolidation; labs pending. \
    Assessment: COPD exacerbation. \
    Received albuterol nebs prior to admission. \
    Wife at bedside.";

#[test]
fn test_header_example_to_soap() {
    let note = format(
        "CC: chest pain. HPI: pain started 2 hours ago. Vitals: BP 140/90, HR 88.",
        &AbbreviationTable::default(),
        SegmentMode::Header,
    )
    .unwrap();
    let doc = to_soap(&note, &clock);
    let json = serde_json::to_value(&doc).unwrap();

    assert_eq!(json["note"]["Subjective"]["Chief Complaint"], "chest pain.");
    assert_eq!(json["note"]["Subjective"]["HPI"], "pain started 2 hours ago.");
    assert_eq!(json["note"]["Objective"]["ED Vitals"], "BP 140/90, HR 88.");
    // "[Missing Data]" sections are omitted.
    assert_eq!(json["note"]["Subjective"].as_object().unwrap().len(), 2);
    assert_eq!(json["note"]["Objective"].as_object().unwrap().len(), 1);
    assert!(json["note"]["Assessment"].as_object().unwrap().is_empty());
    assert!(json["note"]["Plan"].as_object().unwrap().is_empty());
    assert!(json["note"]["Other"].as_object().unwrap().is_empty());
    assert_eq!(json["metadata"]["generated_at"], "2024-06-01T12:00:00.000000Z");
}

#[test]
fn test_every_present_section_appears_once() {
    let note = format(NOTE, &AbbreviationTable::default(), SegmentMode::Sentence).unwrap();
    let doc = to_soap(&note, &clock);

    let mut seen: Vec<CanonicalSection> = doc.note.sections().map(|(_, s, _)| s).collect();
    let present: Vec<CanonicalSection> = note.present().map(|(s, _)| s).collect();
    assert_eq!(seen, present);
    seen.dedup();
    assert_eq!(seen.len(), present.len());

    assert!(doc.note.section(CanonicalSection::Hpi).is_none());
    assert_eq!(
        doc.note.category(SoapCategory::Assessment)[0].0,
        CanonicalSection::Mdm
    );
    assert_eq!(
        doc.note.category(SoapCategory::Plan)[0].0,
        CanonicalSection::PriorToAdmission
    );
    assert_eq!(
        doc.note.category(SoapCategory::Other)[0].1,
        SectionContent::Text("Wife at bedside.".into())
    );
}

#[test]
fn test_abbreviations_applied_before_soap() {
    let note = format(NOTE, &AbbreviationTable::default(), SegmentMode::Sentence).unwrap();
    let doc = to_soap(&note, &clock);
    let json = serde_json::to_value(&doc).unwrap();
    let cc = json["note"]["Subjective"]["Chief Complaint"].as_str().unwrap();
    assert_eq!(
        cc,
        "Chief complaint: shortness of breath.\n\nPt complains of shortness of breath for two days."
    );
}

#[test]
fn test_deterministic_output() {
    for mode in [SegmentMode::Sentence, SegmentMode::Header] {
        let a = format(NOTE, &AbbreviationTable::default(), mode).unwrap();
        let b = format(NOTE, &AbbreviationTable::default(), mode).unwrap();
        let doc_a = serde_json::to_string(&to_soap(&a, &clock)).unwrap();
        let doc_b = serde_json::to_string(&to_soap(&b, &clock)).unwrap();
        assert_eq!(doc_a, doc_b);
    }
}

#[test]
fn test_header_mode_medication_breakdown() {
    let note = format(
        "Medications: Continuous Infusions: heparin 18 units/kg/hr; \
         Scheduled Meds: aspirin 81 mg; PRN Meds: morphine 2 mg IV. MDM: NSTEMI.",
        &AbbreviationTable::default(),
        SegmentMode::Header,
    )
    .unwrap();
    let doc = to_soap(&note, &clock);
    let json = serde_json::to_value(&doc).unwrap();
    let meds = &json["note"]["Objective"]["Medications"];

    assert_eq!(meds["Continuous Infusions"][0], "heparin 18 units/kg/hr");
    assert_eq!(meds["Scheduled Meds"][0], "aspirin 81 mg");
    assert_eq!(meds["PRN Meds"][0], "morphine 2 mg IV.");
    assert_eq!(json["note"]["Assessment"]["MDM"], "NSTEMI.");
}
