use sift_core::error::SiftError;
use sift_core::extraction::pdftohtml::PdftohtmlExtractor;
use std::path::PathBuf;

use crate::output;

pub fn run(pdf_file: PathBuf, output_format: &str) -> Result<(), SiftError> {
    let pdf_bytes = std::fs::read(&pdf_file)?;
    let document = pdf_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| pdf_file.display().to_string());

    let extractor = PdftohtmlExtractor::new();
    let chunks = sift_core::segment_pdf(&document, &pdf_bytes, &extractor)?;

    match output_format {
        "json" => output::json::print(&chunks)?,
        _ => println!("{}", output::table::format_chunks(&chunks)),
    }

    Ok(())
}
