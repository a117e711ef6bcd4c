//! Text extraction for uploaded resumes (PDF, DOCX and legacy DOC).

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use thiserror::Error;
use zip::result::ZipError;
use zip::ZipArchive;

const DOCX_BODY_PART: &str = "word/document.xml";
/// Shortest printable run kept when salvaging text from a binary `.doc`.
const MIN_LEGACY_RUN: usize = 4;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("Document archive error: {0}")]
    Archive(#[from] ZipError),

    #[error("Document XML error: {0}")]
    Xml(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Unsupported file type: {0}")]
    Unsupported(String),
}

/// Resume file formats accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    Docx,
    Doc,
}

impl ResumeFormat {
    /// Derives the format from a file name's extension (case-insensitive).
    pub fn from_filename(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "doc" => Some(Self::Doc),
            _ => None,
        }
    }
}

/// Extracts raw text from resume bytes.
///
/// `.doc` uploads are first read as DOCX, since renamed DOCX files are common;
/// genuine binary Word files fall back to printable-run recovery.
pub fn extract_text(bytes: &[u8], format: ResumeFormat) -> Result<String, ExtractionError> {
    match format {
        ResumeFormat::Pdf => extract_pdf(bytes),
        ResumeFormat::Docx => extract_docx(bytes),
        ResumeFormat::Doc => match extract_docx(bytes) {
            Ok(text) => Ok(text),
            Err(ExtractionError::Archive(_)) => Ok(extract_legacy_doc(bytes)),
            Err(e) => Err(e),
        },
    }
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractionError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractionError::Pdf(e.to_string()))
}

fn extract_docx(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive.by_name(DOCX_BODY_PART)?.read_to_string(&mut xml)?;
    document_xml_to_text(&xml)
}

/// Flattens WordprocessingML into plain text: `w:t` runs are kept, paragraph
/// ends and `w:br` become newlines, `w:tab` becomes a tab.
fn document_xml_to_text(xml: &str) -> Result<String, ExtractionError> {
    let mut reader = quick_xml::Reader::from_str(xml);
    let mut text = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:cr" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) if in_text_run => {
                let decoded = e
                    .decode()
                    .map_err(|err| ExtractionError::Xml(err.to_string()))?;
                text.push_str(&decoded);
            }
            Ok(Event::GeneralRef(e)) if in_text_run => {
                let resolved = match e
                    .resolve_char_ref()
                    .map_err(|err| ExtractionError::Xml(err.to_string()))?
                {
                    Some(c) => Some(c),
                    None => {
                        let name = e
                            .decode()
                            .map_err(|err| ExtractionError::Xml(err.to_string()))?;
                        predefined_entity(&name)
                    }
                };
                if let Some(c) = resolved {
                    text.push(c);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractionError::Xml(format!(
                    "at position {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }

    Ok(text)
}

fn predefined_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => None,
    }
}

/// Salvages readable text from a binary Word 97-2003 file.
///
/// Word stores body text either as 8-bit characters or as UTF-16LE, so both
/// readings are scanned for printable runs.
fn extract_legacy_doc(bytes: &[u8]) -> String {
    let mut runs = printable_runs(bytes.iter().map(|&b| b as u16));
    runs.extend(printable_runs(
        bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]])),
    ));
    runs.join("\n")
}

fn printable_runs(units: impl Iterator<Item = u16>) -> Vec<String> {
    let mut runs = Vec::new();
    let mut current = String::new();

    for unit in units {
        match char::from_u32(u32::from(unit)) {
            Some(c) if c == '\t' || (' '..='~').contains(&c) => current.push(c),
            _ => {
                if current.trim().len() >= MIN_LEGACY_RUN {
                    runs.push(current.trim().to_string());
                }
                current.clear();
            }
        }
    }
    if current.trim().len() >= MIN_LEGACY_RUN {
        runs.push(current.trim().to_string());
    }

    runs
}
