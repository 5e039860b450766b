use crate::error::SiftError;
use crate::extraction::{SpanExtractor, StyledPage, StyledSpan, TextLine};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::Write;
use std::process::Command;

/// Maximum vertical distance between two `<text>` fragments of one line.
const SAME_LINE_TOLERANCE: f32 = 3.0;

/// Styled extraction backend using pdftohtml (from poppler-utils).
///
/// Runs `pdftohtml -xml` at zoom 1 so font sizes are reported in PDF points,
/// then rebuilds lines of styled spans from the XML.
pub struct PdftohtmlExtractor;

impl PdftohtmlExtractor {
    pub fn new() -> Self {
        PdftohtmlExtractor
    }

    /// Check if pdftohtml is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftohtml")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PdftohtmlExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SpanExtractor for PdftohtmlExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<StyledPage>, SiftError> {
        let mut tmpfile =
            tempfile::NamedTempFile::new().map_err(|e| SiftError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(pdf_bytes)
            .map_err(|e| SiftError::Extraction(e.to_string()))?;

        let output = Command::new("pdftohtml")
            .args(["-xml", "-stdout", "-i", "-q", "-nomerge", "-fontfullname"])
            .args(["-zoom", "1"])
            .arg(tmpfile.path())
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    SiftError::PdftohtmlNotFound
                } else {
                    SiftError::Extraction(format!("pdftohtml failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(SiftError::PdftohtmlFailed { code, stderr });
        }

        let xml = String::from_utf8_lossy(&output.stdout);
        parse_pdf2xml(&xml)
    }

    fn backend_name(&self) -> &str {
        "pdftohtml"
    }
}

#[derive(Debug, Clone, Copy)]
struct FontSpec {
    size: f32,
    bold: bool,
}

/// One `<text>` element: a positioned fragment in a single font.
#[derive(Debug)]
struct Fragment {
    top: f32,
    left: f32,
    font: FontSpec,
    spans: Vec<StyledSpan>,
}

impl Fragment {
    fn push_run(&mut self, text: &str, in_bold_tag: bool) {
        let bold = in_bold_tag || self.font.bold;
        match self.spans.last_mut() {
            Some(last) if last.bold == bold => last.text.push_str(text),
            _ => self.spans.push(StyledSpan::new(text, bold, self.font.size)),
        }
    }
}

struct PageBuilder {
    page_number: usize,
    lines: Vec<TextLine>,
    last_pos: Option<(f32, f32)>,
}

impl PageBuilder {
    fn new(page_number: usize) -> Self {
        PageBuilder {
            page_number,
            lines: Vec::new(),
            last_pos: None,
        }
    }

    fn push(&mut self, fragment: Fragment) {
        if fragment.spans.is_empty() {
            return;
        }
        let continues_line = match (self.last_pos, self.lines.last()) {
            (Some((top, left)), Some(_)) => {
                (fragment.top - top).abs() <= SAME_LINE_TOLERANCE && fragment.left >= left
            }
            _ => false,
        };
        self.last_pos = Some((fragment.top, fragment.left));
        match self.lines.last_mut() {
            Some(line) if continues_line => line.spans.extend(fragment.spans),
            _ => self.lines.push(TextLine {
                spans: fragment.spans,
            }),
        }
    }

    fn finish(self) -> StyledPage {
        StyledPage {
            page_number: self.page_number,
            lines: self.lines,
        }
    }
}

/// Parse `pdftohtml -xml` output into styled pages.
///
/// Font ids are global to the document; a `<fontspec>` may appear on any
/// earlier page than the text that uses it.
fn parse_pdf2xml(xml: &str) -> Result<Vec<StyledPage>, SiftError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().check_end_names = false;

    let mut fonts: HashMap<String, FontSpec> = HashMap::new();
    let mut pages = Vec::new();
    let mut page: Option<PageBuilder> = None;
    let mut fragment: Option<Fragment> = None;
    let mut bold_depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"page" => {
                    let number = attr(&e, b"number")
                        .and_then(|n| n.parse().ok())
                        .unwrap_or(pages.len() + 1);
                    page = Some(PageBuilder::new(number));
                }
                b"fontspec" => register_font(&mut fonts, &e),
                b"text" => {
                    fragment = Some(start_fragment(&e, &fonts));
                    bold_depth = 0;
                }
                b"b" => bold_depth += 1,
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                if e.name().as_ref() == b"fontspec" {
                    register_font(&mut fonts, &e);
                }
            }
            Ok(Event::Text(t)) => {
                if let Some(frag) = fragment.as_mut() {
                    let text = t
                        .unescape()
                        .map(|c| c.into_owned())
                        .unwrap_or_else(|_| String::from_utf8_lossy(&t).into_owned());
                    frag.push_run(&text, bold_depth > 0);
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"b" => bold_depth = bold_depth.saturating_sub(1),
                b"text" => {
                    if let (Some(frag), Some(p)) = (fragment.take(), page.as_mut()) {
                        p.push(frag);
                    }
                }
                b"page" => {
                    if let Some(p) = page.take() {
                        pages.push(p.finish());
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(SiftError::Extraction(format!(
                    "malformed pdftohtml XML at byte {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    // Truncated output: keep what was read.
    if let Some(p) = page.take() {
        pages.push(p.finish());
    }

    Ok(pages)
}

fn register_font(fonts: &mut HashMap<String, FontSpec>, e: &BytesStart) {
    let Some(id) = attr(e, b"id") else {
        return;
    };
    let size = attr(e, b"size")
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.0);
    let bold = attr(e, b"family")
        .map(|f| f.to_lowercase().contains("bold"))
        .unwrap_or(false);
    fonts.insert(id, FontSpec { size, bold });
}

fn start_fragment(e: &BytesStart, fonts: &HashMap<String, FontSpec>) -> Fragment {
    let font = attr(e, b"font")
        .and_then(|id| fonts.get(&id).copied())
        .unwrap_or(FontSpec {
            size: 0.0,
            bold: false,
        });
    Fragment {
        top: attr_f32(e, b"top"),
        left: attr_f32(e, b"left"),
        font,
        spans: Vec::new(),
    }
}

fn attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

fn attr_f32(e: &BytesStart, name: &[u8]) -> f32 {
    attr(e, name).and_then(|v| v.parse().ok()).unwrap_or(0.0)
}
