//! The document rewrite engine.
//!
//! Everything format-specific lives here: deciding what kind of document an
//! upload is, and applying a find/replace pass that keeps the document
//! structurally valid. The engine is synchronous and CPU-bound; callers on the
//! async side run it under `spawn_blocking`.
//!
//! Failure kinds are deliberately distinct so the API layer can map them to
//! different responses:
//!
//! - [`EngineError::Corrupt`]: the input could not be parsed as its format
//! - [`EngineError::Unrepresentable`]: the replacement text cannot be encoded
//!   where the match was found without breaking the document
//! - [`EngineError::Serialize`]: the rewritten document could not be written
//!   back out (an internal failure, not a client error)

use std::fmt;
use std::path::Path;

use thiserror::Error as ThisError;

pub mod csv;
pub mod pdf;

/// Document formats the engine can rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Csv,
}

impl DocumentFormat {
    /// All formats the engine supports, in the order they are advertised.
    pub const ALL: [DocumentFormat; 2] = [DocumentFormat::Pdf, DocumentFormat::Csv];

    /// Match a filename extension (case-insensitive) to a format.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "csv" => Some(DocumentFormat::Csv),
            _ => None,
        }
    }

    /// Sniff the leading bytes of a document.
    ///
    /// Only the PDF magic prefix is reliable enough to act on; CSV has no
    /// signature, so it is never sniffed.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"%PDF-") {
            Some(DocumentFormat::Pdf)
        } else {
            None
        }
    }

    /// Canonical filename extension.
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Csv => "csv",
        }
    }

    /// MIME type used for responses carrying this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "application/pdf",
            DocumentFormat::Csv => "text/csv",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Errors produced while rewriting a document.
#[derive(ThisError, Debug)]
pub enum EngineError {
    /// Input bytes could not be parsed as the claimed format.
    #[error("failed to parse {format} document: {message}")]
    Corrupt { format: DocumentFormat, message: String },

    /// The replacement text cannot be encoded at the match site.
    #[error("replacement is not representable in the document: {message}")]
    Unrepresentable { message: String },

    /// Writing the modified document back out failed.
    #[error("failed to serialize modified {format} document: {message}")]
    Serialize { format: DocumentFormat, message: String },
}

/// A successfully rewritten document.
#[derive(Debug)]
pub struct ReplaceOutcome {
    pub bytes: Vec<u8>,
    /// Number of occurrences that were substituted. Zero is a valid outcome.
    pub replacements: usize,
}

/// Resolve the format of an upload from its filename, falling back to content
/// sniffing when the extension is missing or unknown.
pub fn detect_format(file_name: &str, bytes: &[u8]) -> Option<DocumentFormat> {
    DocumentFormat::from_file_name(file_name).or_else(|| DocumentFormat::sniff(bytes))
}

/// Apply a find/replace pass appropriate to the document's format.
pub fn replace(
    format: DocumentFormat,
    bytes: &[u8],
    find: &str,
    replace_with: &str,
) -> Result<ReplaceOutcome, EngineError> {
    match format {
        DocumentFormat::Pdf => pdf::replace(bytes, find, replace_with),
        DocumentFormat::Csv => csv::replace(bytes, find, replace_with),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_format_from_extension() {
        assert_eq!(DocumentFormat::from_file_name("report.pdf"), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_file_name("DATA.CSV"), Some(DocumentFormat::Csv));
        assert_eq!(DocumentFormat::from_file_name("notes.txt"), None);
        assert_eq!(DocumentFormat::from_file_name("no_extension"), None);
    }

    #[test]
    fn sniffs_pdf_magic() {
        assert_eq!(DocumentFormat::sniff(b"%PDF-1.7 ..."), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::sniff(b"a,b,c\n1,2,3\n"), None);
    }

    #[test]
    fn detection_prefers_extension_then_sniffs() {
        assert_eq!(detect_format("x.csv", b"a,b\n"), Some(DocumentFormat::Csv));
        // No usable extension, but the content is unmistakably a PDF
        assert_eq!(detect_format("upload.bin", b"%PDF-1.4\n"), Some(DocumentFormat::Pdf));
        assert_eq!(detect_format("upload.bin", b"hello"), None);
    }
}
