pub mod pdftohtml;

use crate::error::SiftError;

/// A run of text sharing one style within a line.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledSpan {
    pub text: String,
    pub bold: bool,
    /// Font size in PDF points.
    pub font_size: f32,
}

impl StyledSpan {
    pub fn new(text: impl Into<String>, bold: bool, font_size: f32) -> Self {
        StyledSpan {
            text: text.into(),
            bold,
            font_size,
        }
    }
}

/// One physical line of a page, spans in reading order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextLine {
    pub spans: Vec<StyledSpan>,
}

/// Styled content extracted from a single page of a PDF.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledPage {
    /// 1-based page number.
    pub page_number: usize,
    pub lines: Vec<TextLine>,
}

/// Trait for styled PDF text extraction backends.
pub trait SpanExtractor: Send + Sync {
    /// Extract styled lines from PDF bytes, returning one StyledPage per page
    /// in document order.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<StyledPage>, SiftError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
