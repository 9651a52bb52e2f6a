//! Shared application state.

use ednote_core::{AbbreviationTable, EdNoteConfig};
use ednote_ingest::{Formatter, Normalizer};
use ednote_protocol::NameRedactor;
use ednote_soap::{Clock, DocumentBuilder, SoapMapper, SystemClock};
use tracing::{info, warn};

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: EdNoteConfig,
    pub formatter: Formatter,
    /// Table used when a request brings none.
    pub abbreviations: AbbreviationTable,
    /// Precompiled from `abbreviations`.
    pub normalizer: Normalizer,
    pub documents: DocumentBuilder,
    pub redactor: NameRedactor,
    pub clock: Box<dyn Clock + Send + Sync>,
}

impl AppState {
    pub fn new(config: EdNoteConfig) -> Self {
        let (abbreviations, error) = config.load_abbreviations();
        if let Some(e) = error {
            warn!("Using built-in abbreviations: {}", e);
        }
        info!(
            "Loaded {} abbreviations, default mode {}",
            abbreviations.len(),
            config.mode
        );

        let normalizer = Normalizer::new(&abbreviations);
        let documents = DocumentBuilder::new(SoapMapper::default(), config.note_version.clone());

        Self {
            config,
            formatter: Formatter::default(),
            abbreviations,
            normalizer,
            documents,
            redactor: NameRedactor::new(),
            clock: Box::new(SystemClock),
        }
    }

    /// Replace the time source used for document metadata.
    pub fn with_clock(mut self, clock: impl Clock + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }
}
