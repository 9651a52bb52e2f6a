//! `ednote format`: one-shot formatting from a file or stdin.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};

use ednote_core::{AbbreviationTable, EdNoteConfig, SegmentMode};
use ednote_ingest::Formatter;
use ednote_protocol::{NameRedactor, Redactor};
use ednote_soap::{render_document, Clock, DocumentBuilder, SoapMapper};

/// Parsed `format` arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatArgs {
    /// Input path, or `-` for stdin.
    pub input: String,
    pub mode: Option<SegmentMode>,
    pub abbreviations: Option<PathBuf>,
    pub redact: bool,
    /// Print plain text instead of JSON.
    pub text: bool,
}

impl FormatArgs {
    /// Parse the arguments following `format`.
    pub fn parse(args: &[String]) -> anyhow::Result<Self> {
        let mut input = None;
        let mut mode = None;
        let mut abbreviations = None;
        let mut redact = false;
        let mut text = false;

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--mode" => {
                    let value = iter.next().ok_or_else(|| anyhow!("--mode needs a value"))?;
                    mode = Some(value.parse::<SegmentMode>()?);
                }
                "--abbreviations" => {
                    let value = iter
                        .next()
                        .ok_or_else(|| anyhow!("--abbreviations needs a file path"))?;
                    abbreviations = Some(PathBuf::from(value));
                }
                "--redact" => redact = true,
                "--text" => text = true,
                flag if flag.starts_with("--") => bail!("Unknown option: {}", flag),
                path => {
                    if input.replace(path.to_string()).is_some() {
                        bail!("Only one input may be given");
                    }
                }
            }
        }

        Ok(Self {
            input: input.ok_or_else(|| anyhow!("Usage: ednote format <file|-> [options]"))?,
            mode,
            abbreviations,
            redact,
            text,
        })
    }

    fn read_input(&self) -> anyhow::Result<String> {
        if self.input == "-" {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        } else {
            std::fs::read_to_string(&self.input)
                .with_context(|| format!("Failed to read {}", self.input))
        }
    }
}

/// Run the full pipeline and return what should be printed.
pub fn run_format(args: &FormatArgs, config: &EdNoteConfig, clock: &dyn Clock) -> anyhow::Result<String> {
    let raw = args.read_input()?;

    // A bad table never aborts the run; the fallback is logged by the loader.
    let (table, _) = match &args.abbreviations {
        Some(path) => AbbreviationTable::load_file_or_default(path),
        None => config.load_abbreviations(),
    };

    let text = if args.redact || config.redact {
        NameRedactor::new().redact(&raw)
    } else {
        raw
    };

    let mode = args.mode.unwrap_or(config.mode);
    let note = Formatter::default().format(&text, &table, mode)?;
    for warning in note.warnings() {
        tracing::warn!("{}", warning);
    }

    let document = DocumentBuilder::new(SoapMapper::default(), config.note_version.clone())
        .build(&note, clock);
    if args.text {
        Ok(render_document(&document))
    } else {
        Ok(document.to_json_pretty()?)
    }
}
