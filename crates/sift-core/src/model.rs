use serde::{Deserialize, Serialize};

/// One content-bearing line of PDF text, attributed to its document, page
/// and the section title active when it was read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Source filename.
    pub document: String,
    /// 1-based page number within the document.
    pub page_number: usize,
    pub section_title: String,
    /// Never empty.
    pub text: String,
}

impl Chunk {
    pub fn section_key(&self) -> SectionKey {
        SectionKey {
            document: self.document.clone(),
            section_title: self.section_title.clone(),
            page_number: self.page_number,
        }
    }
}

/// A chunk with its cosine similarity to the synthesized query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    #[serde(flatten)]
    pub chunk: Chunk,
    /// Raw cosine similarity in [-1, 1].
    pub relevance_score: f32,
}

/// Aggregation key: chunks sharing one of these collapse into one section.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SectionKey {
    pub document: String,
    pub section_title: String,
    pub page_number: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSection {
    pub document: String,
    pub section_title: String,
    /// 1-based, dense.
    pub importance_rank: usize,
    pub page_number: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsectionExcerpt {
    pub document: String,
    pub refined_text: String,
    pub page_number: usize,
}
