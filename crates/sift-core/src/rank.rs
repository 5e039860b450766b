use std::cmp::Ordering;

use crate::embedding::{cosine_scores, EmbeddingProvider};
use crate::error::SiftError;
use crate::model::{Chunk, ScoredChunk};

/// Build the single query string chunks are ranked against.
pub fn synthesize_query(persona: &str, job: &str) -> String {
    format!("Query based on role and task. Role: {persona}. Task: {job}")
}

/// Score every chunk against the synthesized query and sort by descending
/// relevance.
///
/// The sort is stable, so chunks with equal scores keep their input order.
/// An empty input returns immediately without touching the provider.
/// Vectors of mismatched or zero dimension and non-finite similarities are
/// embedding errors.
pub fn rank(
    chunks: Vec<Chunk>,
    persona: &str,
    job: &str,
    provider: &dyn EmbeddingProvider,
) -> Result<Vec<ScoredChunk>, SiftError> {
    if chunks.is_empty() {
        return Ok(Vec::new());
    }

    let query = synthesize_query(persona, job);
    let mut inputs: Vec<&str> = Vec::with_capacity(chunks.len() + 1);
    inputs.push(&query);
    inputs.extend(chunks.iter().map(|c| c.text.as_str()));

    tracing::info!(
        chunks = chunks.len(),
        model = provider.model_name(),
        "creating embeddings for query and chunks"
    );
    let mut vectors = provider.embed(&inputs)?;
    if vectors.len() != inputs.len() {
        return Err(SiftError::Embedding(format!(
            "provider returned {} vectors for {} inputs",
            vectors.len(),
            inputs.len()
        )));
    }

    let chunk_vectors = vectors.split_off(1);
    let dimension = vectors[0].len();
    if dimension == 0 {
        return Err(SiftError::Embedding("query embedding is empty".into()));
    }
    if let Some(i) = chunk_vectors.iter().position(|v| v.len() != dimension) {
        return Err(SiftError::Embedding(format!(
            "chunk {} embedding has {} dimensions, query has {}",
            i,
            chunk_vectors[i].len(),
            dimension
        )));
    }

    let scores = cosine_scores(&vectors[0], &chunk_vectors);
    if let Some(i) = scores.iter().position(|s| !s.is_finite()) {
        return Err(SiftError::Embedding(format!(
            "non-finite similarity for chunk {i}"
        )));
    }

    let mut ranked: Vec<ScoredChunk> = chunks
        .into_iter()
        .zip(scores)
        .map(|(chunk, relevance_score)| ScoredChunk {
            chunk,
            relevance_score,
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.relevance_score
            .partial_cmp(&a.relevance_score)
            .unwrap_or(Ordering::Equal)
    });

    Ok(ranked)
}
