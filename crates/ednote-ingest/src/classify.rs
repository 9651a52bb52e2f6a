//! Rule-based section classification.
//!
//! Rules are evaluated in canonical section order and the first section with
//! any matching trigger wins. Text matching nothing is `Uncategorized`.

use regex::Regex;

use ednote_core::{CanonicalSection, Error, Result};

/// A phrase, whole word or pattern whose presence votes for a section.
#[derive(Debug, Clone)]
pub enum Trigger {
    /// Case-insensitive substring.
    Phrase(String),
    /// Case-insensitive whole word: word-character edges must not touch
    /// other word characters ("hr" matches "HR 88", not "three").
    Word(String),
    /// Case-insensitive regular expression.
    Pattern(Regex),
}

impl Trigger {
    pub fn phrase(phrase: &str) -> Self {
        Trigger::Phrase(phrase.to_lowercase())
    }

    pub fn word(word: &str) -> Self {
        Trigger::Word(word.to_lowercase())
    }

    pub fn pattern(pattern: &str) -> Result<Self> {
        Regex::new(&format!("(?i){}", pattern))
            .map(Trigger::Pattern)
            .map_err(|e| Error::Config(format!("invalid trigger pattern '{}': {}", pattern, e)))
    }

    /// The trigger's source text.
    pub fn as_str(&self) -> &str {
        match self {
            Trigger::Phrase(p) | Trigger::Word(p) => p,
            Trigger::Pattern(re) => re.as_str(),
        }
    }

    /// `lowered` must be `text.to_lowercase()`.
    fn matches(&self, text: &str, lowered: &str) -> bool {
        match self {
            Trigger::Phrase(p) => !p.is_empty() && lowered.contains(p.as_str()),
            Trigger::Word(w) => contains_word(lowered, w),
            Trigger::Pattern(re) => re.is_match(text),
        }
    }
}

/// The triggers for one section.
#[derive(Debug, Clone)]
pub struct SectionRule {
    pub section: CanonicalSection,
    pub triggers: Vec<Trigger>,
}

impl SectionRule {
    pub fn new(section: CanonicalSection, triggers: Vec<Trigger>) -> Self {
        Self { section, triggers }
    }

    fn matches(&self, text: &str, lowered: &str) -> bool {
        self.triggers.iter().any(|t| t.matches(text, lowered))
    }
}

/// Ordered rule list; first matching section wins.
#[derive(Debug, Clone)]
pub struct SectionClassifier {
    rules: Vec<SectionRule>,
}

impl SectionClassifier {
    /// Rules are put into canonical section order regardless of input order.
    pub fn new(mut rules: Vec<SectionRule>) -> Self {
        rules.sort_by_key(|r| r.section.rank());
        Self { rules }
    }

    pub fn classify(&self, text: &str) -> CanonicalSection {
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(text, &lowered))
            .map(|rule| rule.section)
            .unwrap_or(CanonicalSection::Uncategorized)
    }

    pub fn rules(&self) -> &[SectionRule] {
        &self.rules
    }

    pub fn triggers_for(&self, section: CanonicalSection) -> impl Iterator<Item = &Trigger> {
        self.rules
            .iter()
            .filter(move |r| r.section == section)
            .flat_map(|r| r.triggers.iter())
    }
}

impl Default for SectionClassifier {
    fn default() -> Self {
        use CanonicalSection::*;
        use Trigger as T;

        Self::new(vec![
            SectionRule::new(
                ChiefComplaint,
                vec![T::phrase("chief complaint"), T::word("c/o"), T::phrase("complains of")],
            ),
            SectionRule::new(Hpi, vec![T::word("hpi"), T::phrase("history of present illness")]),
            SectionRule::new(
                Ros,
                vec![
                    T::word("ros"),
                    T::phrase("review of systems"),
                    T::word("denies"),
                    T::phrase("reports no"),
                ],
            ),
            SectionRule::new(
                EdVitals,
                vec![
                    T::phrase("blood pressure"),
                    T::word("bp"),
                    T::phrase("heart rate"),
                    T::word("hr"),
                    T::phrase("o2 sat"),
                    T::phrase("temperature"),
                    T::phrase("vitals"),
                    T::phrase("vital signs"),
                ],
            ),
            SectionRule::new(
                PhysicalExam,
                vec![
                    T::phrase("physical exam"),
                    T::word("exam"),
                    T::word("heent"),
                    T::word("lungs"),
                    T::word("extremities"),
                    T::phrase("no edema"),
                ],
            ),
            SectionRule::new(
                LabsImaging,
                vec![
                    T::word("lab"),
                    T::word("labs"),
                    T::word("wbc"),
                    T::word("hgb"),
                    T::phrase("x-ray"),
                    T::phrase("ct scan"),
                    T::word("mri"),
                    T::word("imaging"),
                    T::word("ekg"),
                ],
            ),
            SectionRule::new(
                Medications,
                vec![
                    T::phrase("medications:"),
                    T::phrase("infusion"),
                    T::phrase("scheduled meds"),
                    T::phrase("prn meds"),
                ],
            ),
            SectionRule::new(
                Mdm,
                vec![
                    T::word("mdm"),
                    T::phrase("medical decision"),
                    T::word("plan"),
                    T::word("assessment"),
                    T::word("differential"),
                ],
            ),
            SectionRule::new(
                PriorToAdmission,
                vec![
                    T::phrase("prior to admission"),
                    T::word("pta"),
                    T::phrase("before arrival"),
                    T::phrase("prior treatment"),
                ],
            ),
        ])
    }
}

/// Whole-word search in already-lowercased text.
fn contains_word(haystack: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    let check_before = word.starts_with(is_word_char);
    let check_after = word.ends_with(is_word_char);

    haystack.match_indices(word).any(|(i, _)| {
        let before_ok = !check_before
            || !haystack[..i].chars().next_back().is_some_and(is_word_char);
        let after_ok = !check_after
            || !haystack[i + word.len()..].chars().next().is_some_and(is_word_char);
        before_ok && after_ok
    })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use CanonicalSection::*;

    fn classify(text: &str) -> CanonicalSection {
        SectionClassifier::default().classify(text)
    }

    #[test]
    fn test_keyword_sections() {
        assert_eq!(classify("Chief complaint is chest pain."), ChiefComplaint);
        assert_eq!(classify("Pt c/o nausea."), ChiefComplaint);
        assert_eq!(classify("History of present illness: 3 days of cough."), Hpi);
        assert_eq!(classify("Denies fever or chills."), Ros);
        assert_eq!(classify("BP 140/90 on arrival."), EdVitals);
        assert_eq!(classify("Lungs clear bilaterally."), PhysicalExam);
        assert_eq!(classify("WBC 14.2 with left shift."), LabsImaging);
        assert_eq!(classify("Scheduled meds: aspirin 81 mg."), Medications);
        assert_eq!(classify("Differential includes PE."), Mdm);
        assert_eq!(classify("Received nitro before arrival."), PriorToAdmission);
    }

    #[test]
    fn test_unmatched_is_uncategorized() {
        assert_eq!(classify("Daughter at bedside."), Uncategorized);
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(classify("Chief complaint noted, vitals stable."), ChiefComplaint);
        assert_eq!(classify("Plan to repeat labs."), LabsImaging);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("REVIEW OF SYSTEMS negative"), Ros);
        assert_eq!(classify("hpi as above"), Hpi);
    }

    #[test]
    fn test_word_triggers_respect_boundaries() {
        // "hr" inside "three", "ros" inside "across", "exam" inside "example"
        assert_eq!(classify("Three episodes across the example day."), Uncategorized);
        assert_eq!(classify("HR 88, regular."), EdVitals);
        assert_eq!(classify("Heparin at 18 units/kg/hr."), EdVitals);
    }

    #[test]
    fn test_deterministic() {
        let classifier = SectionClassifier::default();
        let text = "Exam notable for wheezing; plan nebs.";
        assert_eq!(classifier.classify(text), classifier.classify(text));
    }

    #[test]
    fn test_rules_are_in_canonical_order() {
        let classifier = SectionClassifier::new(vec![
            SectionRule::new(Mdm, vec![Trigger::phrase("stable")]),
            SectionRule::new(Hpi, vec![Trigger::phrase("stable")]),
        ]);
        let order: Vec<_> = classifier.rules().iter().map(|r| r.section).collect();
        assert_eq!(order, vec![Hpi, Mdm]);
        assert_eq!(classifier.classify("stable"), Hpi);
    }

    #[test]
    fn test_default_rules_enumerable() {
        let classifier = SectionClassifier::default();
        assert_eq!(classifier.rules().len(), CanonicalSection::COUNT - 1);
        let cc: Vec<_> = classifier.triggers_for(ChiefComplaint).map(|t| t.as_str()).collect();
        assert_eq!(cc, vec!["chief complaint", "c/o", "complains of"]);
        assert_eq!(classifier.triggers_for(Uncategorized).count(), 0);
    }

    #[test]
    fn test_pattern_trigger() {
        let classifier = SectionClassifier::new(vec![SectionRule::new(
            EdVitals,
            vec![Trigger::pattern(r"\bspo2\s*\d+%").unwrap()],
        )]);
        assert_eq!(classifier.classify("SpO2 94% on RA"), EdVitals);
        assert_eq!(classifier.classify("spo2 pending"), Uncategorized);
        assert!(Trigger::pattern("[").is_err());
    }

    #[test]
    fn test_contains_word() {
        assert!(contains_word("pt c/o pain", "c/o"));
        assert!(contains_word("hr: 88", "hr"));
        assert!(!contains_word("chronic", "hr"));
        assert!(contains_word("medications: none", "medications:"));
        assert!(!contains_word("anything", ""));
    }
}
