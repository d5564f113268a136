//! Upload conversion into backend-ingestible text.
//!
//! Most formats pass through untouched; PDFs are converted to markdown text
//! before they are forwarded, and the logical file name is rewritten to `.md`
//! so the backend indexes the converted content under a text name.

use thiserror::Error;

/// Errors produced while converting an uploaded file.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The PDF extraction capability rejected the document.
    #[error("Failed to extract text from PDF: {0}")]
    PdfExtraction(#[from] pdf_extract::OutputError),
    /// The PDF parsed but yielded no usable text.
    #[error("No text content could be extracted from the PDF")]
    EmptyPdf,
}

/// A file received from the client, before conversion.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied file name; the extension drives conversion.
    pub name: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

/// Converted content ready to be forwarded to the ingestion endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestibleContent {
    /// Logical name the backend will index the content under.
    pub name: String,
    /// Text payload submitted as the file body.
    pub text: Vec<u8>,
}

/// Convert an uploaded file into ingestible text.
///
/// PDF input is extracted in memory and normalized into markdown paragraphs;
/// everything else passes through byte-for-byte.
pub fn convert(file: UploadedFile) -> Result<IngestibleContent, ConversionError> {
    if extension(&file.name).eq_ignore_ascii_case("pdf") {
        let markdown = pdf_to_markdown(&file.bytes)?;
        Ok(IngestibleContent {
            name: replace_extension(&file.name, "md"),
            text: markdown.into_bytes(),
        })
    } else {
        Ok(IngestibleContent {
            name: file.name,
            text: file.bytes,
        })
    }
}

/// Extract PDF text and reflow it into blank-line-separated paragraphs.
fn pdf_to_markdown(bytes: &[u8]) -> Result<String, ConversionError> {
    let raw = pdf_extract::extract_text_from_mem(bytes)?;
    let markdown = reflow_paragraphs(&raw.replace('\0', ""));
    if markdown.is_empty() {
        return Err(ConversionError::EmptyPdf);
    }
    Ok(markdown)
}

/// Join wrapped lines into paragraphs, separating paragraphs by blank lines.
fn reflow_paragraphs(raw: &str) -> String {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }

    paragraphs.join("\n\n")
}

fn extension(name: &str) -> &str {
    name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("")
}

fn replace_extension(name: &str, new_ext: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, _)) => format!("{stem}.{new_ext}"),
        None => format!("{name}.{new_ext}"),
    }
}
