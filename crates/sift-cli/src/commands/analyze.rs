use sift_core::embedding::openai::{EmbedderConfig, OpenAiEmbedder};
use sift_core::error::SiftError;
use sift_core::extraction::pdftohtml::PdftohtmlExtractor;
use sift_core::report;
use std::path::PathBuf;
use std::time::Duration;

use crate::output;
use crate::EmbedArgs;

pub fn run(
    input_file: PathBuf,
    pdf_dir: Option<PathBuf>,
    out: Option<PathBuf>,
    embed: EmbedArgs,
) -> Result<(), SiftError> {
    let input = report::load_run_input(&input_file)?;
    let pdf_dir = pdf_dir.unwrap_or_else(|| report::default_pdf_dir(&input_file));
    let out_path = out.unwrap_or_else(|| report::default_output_path(&input_file));
    tracing::debug!(pdf_dir = %pdf_dir.display(), out = %out_path.display(), "resolved paths");

    let extractor = PdftohtmlExtractor::new();
    if !PdftohtmlExtractor::is_available() {
        return Err(SiftError::PdftohtmlNotFound);
    }

    let embedder = OpenAiEmbedder::new(EmbedderConfig {
        base_url: embed.embed_base_url,
        model: embed.embed_model,
        api_key: embed.embed_api_key,
        dimensions: embed.embed_dimensions,
        timeout: Duration::from_secs(embed.embed_timeout_secs.max(1)),
        batch_size: embed.embed_batch_size,
    })?;

    let analysis = sift_core::analyze(&input, &pdf_dir, &extractor, &embedder)?;
    report::write_report(&out_path, &analysis.report)?;

    output::table::print_summary(&analysis, &out_path);
    Ok(())
}
