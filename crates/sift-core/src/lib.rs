pub mod aggregate;
pub mod embedding;
pub mod error;
pub mod extraction;
pub mod model;
pub mod rank;
pub mod report;
pub mod segment;

use std::path::Path;

use embedding::EmbeddingProvider;
use error::SiftError;
use extraction::SpanExtractor;
use model::Chunk;
use report::{AnalysisReport, DocumentRef, RunInput};

/// A document entry that had no filename, or could not be read or extracted,
/// and was left out of the run.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedDocument {
    /// `None` when the input entry had no filename.
    pub filename: Option<String>,
    pub reason: String,
}

/// Chunks of every readable document, in input order.
#[derive(Debug, Clone, Default)]
pub struct CollectedChunks {
    pub chunks: Vec<Chunk>,
    pub skipped: Vec<SkippedDocument>,
}

/// Result of a full run.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub report: AnalysisReport,
    pub chunk_count: usize,
    pub skipped: Vec<SkippedDocument>,
}

/// Extract and segment a single PDF.
pub fn segment_pdf(
    document: &str,
    pdf_bytes: &[u8],
    extractor: &dyn SpanExtractor,
) -> Result<Vec<Chunk>, SiftError> {
    let pages = extractor.extract_pages(pdf_bytes)?;
    Ok(segment::segment(document, &pages))
}

/// Segment every document under `pdf_dir`.
///
/// A document that has no filename or cannot be read or extracted is
/// logged, recorded in `skipped` and left out; it never fails the whole
/// collection.
pub fn collect_chunks(
    documents: &[DocumentRef],
    pdf_dir: &Path,
    extractor: &dyn SpanExtractor,
) -> CollectedChunks {
    let mut collected = CollectedChunks::default();

    for (position, doc) in documents.iter().enumerate() {
        let Some(filename) = doc.filename.as_deref() else {
            tracing::warn!(position, "document entry has no filename, skipping");
            collected.skipped.push(SkippedDocument {
                filename: None,
                reason: format!("document entry {position} has no filename"),
            });
            continue;
        };

        let path = pdf_dir.join(filename);
        let result = std::fs::read(&path)
            .map_err(SiftError::from)
            .and_then(|bytes| segment_pdf(filename, &bytes, extractor));

        match result {
            Ok(chunks) => {
                tracing::debug!(
                    document = %filename,
                    chunks = chunks.len(),
                    backend = extractor.backend_name(),
                    "segmented document"
                );
                collected.chunks.extend(chunks);
            }
            Err(e) => {
                tracing::warn!(
                    document = %filename,
                    "could not open or process document, skipping: {e}"
                );
                collected.skipped.push(SkippedDocument {
                    filename: Some(filename.to_string()),
                    reason: e.to_string(),
                });
            }
        }
    }

    collected
}

/// Main API entry point: segment, rank and aggregate a document set for the
/// persona and task in `input`.
///
/// Fails without producing a report when no chunks could be extracted or
/// when embedding fails.
pub fn analyze(
    input: &RunInput,
    pdf_dir: &Path,
    extractor: &dyn SpanExtractor,
    provider: &dyn EmbeddingProvider,
) -> Result<Analysis, SiftError> {
    tracing::info!(documents = input.documents.len(), "starting PDF processing");
    let collected = collect_chunks(&input.documents, pdf_dir, extractor);
    if collected.chunks.is_empty() {
        return Err(SiftError::NoChunks);
    }
    let chunk_count = collected.chunks.len();
    tracing::info!(chunks = chunk_count, "extracted text chunks");

    tracing::info!("ranking content based on persona and job");
    let ranked = rank::rank(
        collected.chunks,
        &input.persona.role,
        &input.job_to_be_done.task,
        provider,
    )?;

    let aggregation = aggregate::aggregate(&ranked);
    let report = report::assemble(input, aggregation, chrono::Utc::now());

    Ok(Analysis {
        report,
        chunk_count,
        skipped: collected.skipped,
    })
}
