use std::collections::HashMap;

use crate::model::{RankedSection, ScoredChunk, SectionKey, SubsectionExcerpt};

/// Maximum number of verbatim excerpts in the subsection analysis.
pub const EXCERPT_LIMIT: usize = 20;

/// The two output views derived from a ranked chunk list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    pub excerpts: Vec<SubsectionExcerpt>,
    pub sections: Vec<RankedSection>,
}

pub fn aggregate(ranked: &[ScoredChunk]) -> Aggregation {
    Aggregation {
        excerpts: top_excerpts(ranked),
        sections: rank_sections(ranked),
    }
}

/// The first [`EXCERPT_LIMIT`] chunks, in the order given.
pub fn top_excerpts(ranked: &[ScoredChunk]) -> Vec<SubsectionExcerpt> {
    ranked
        .iter()
        .take(EXCERPT_LIMIT)
        .map(|sc| SubsectionExcerpt {
            document: sc.chunk.document.clone(),
            refined_text: sc.chunk.text.clone(),
            page_number: sc.chunk.page_number,
        })
        .collect()
}

/// Collapse chunks onto (document, section title, page) keys, keeping the
/// best score per key, and rank the keys by that score.
///
/// A retained score is only replaced by a strictly greater one. Keys with
/// equal scores stay in the order they were first seen.
pub fn rank_sections(ranked: &[ScoredChunk]) -> Vec<RankedSection> {
    let mut index: HashMap<SectionKey, usize> = HashMap::new();
    let mut best: Vec<(SectionKey, f32)> = Vec::new();

    for sc in ranked {
        let key = sc.chunk.section_key();
        match index.get(&key) {
            Some(&i) => {
                if sc.relevance_score > best[i].1 {
                    best[i].1 = sc.relevance_score;
                }
            }
            None => {
                index.insert(key.clone(), best.len());
                best.push((key, sc.relevance_score));
            }
        }
    }

    best.sort_by(|a, b| b.1.total_cmp(&a.1));

    best.into_iter()
        .enumerate()
        .map(|(i, (key, _))| RankedSection {
            document: key.document,
            section_title: key.section_title,
            importance_rank: i + 1,
            page_number: key.page_number,
        })
        .collect()
}
