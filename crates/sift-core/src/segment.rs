use crate::extraction::{StyledPage, TextLine};
use crate::model::Chunk;

/// Section title used until the first title line of a document is seen.
pub const DEFAULT_SECTION_TITLE: &str = "Introduction";

/// Lines whose first span is larger than this (in points) are titles.
pub const TITLE_FONT_SIZE: f32 = 12.0;

/// How a single line is treated by the segmenter.
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    /// Updates the active section title; never becomes a chunk.
    Title(String),
    /// Joined span text, already trimmed. May be empty.
    Content(String),
    /// No spans at all.
    Blank,
}

/// Classify a line by the style of its first span: bold or larger than
/// 12pt makes the whole line a title, whatever the remaining spans look like.
pub fn classify_line(line: &TextLine) -> LineKind {
    let Some(first) = line.spans.first() else {
        return LineKind::Blank;
    };

    if first.bold || first.font_size > TITLE_FONT_SIZE {
        return LineKind::Title(first.text.trim().to_string());
    }

    let text = line
        .spans
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    LineKind::Content(text.trim().to_string())
}

/// Turn one document's styled pages into chunks.
///
/// Pages and lines are consumed in the order given. The active section
/// title carries over page boundaries and starts at
/// [`DEFAULT_SECTION_TITLE`] for every document.
pub fn segment(document: &str, pages: &[StyledPage]) -> Vec<Chunk> {
    let mut section_title = DEFAULT_SECTION_TITLE.to_string();
    let mut chunks = Vec::new();

    for page in pages {
        for line in &page.lines {
            match classify_line(line) {
                LineKind::Title(title) => section_title = title,
                LineKind::Content(text) if !text.is_empty() => chunks.push(Chunk {
                    document: document.to_string(),
                    page_number: page.page_number,
                    section_title: section_title.clone(),
                    text,
                }),
                LineKind::Content(_) | LineKind::Blank => {}
            }
        }
    }

    chunks
}
