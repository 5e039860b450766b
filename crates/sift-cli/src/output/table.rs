use sift_core::model::Chunk;
use sift_core::Analysis;
use std::fmt::Write;
use std::path::Path;

/// Width at which chunk text is cut in table output.
const TEXT_WIDTH: usize = 72;

/// Render segmenter output grouped by section title as it changes.
pub fn format_chunks(chunks: &[Chunk]) -> String {
    let mut out = String::new();
    if chunks.is_empty() {
        out.push_str("No text chunks extracted.");
        return out;
    }

    let mut current: Option<(&str, usize)> = None;
    for chunk in chunks {
        let key = (chunk.section_title.as_str(), chunk.page_number);
        if current != Some(key) {
            if current.is_some() {
                out.push('\n');
            }
            let _ = writeln!(out, "=== {} (page {}) ===", key.0, key.1);
            current = Some(key);
        }
        let _ = writeln!(out, "  {}", truncate(&chunk.text, TEXT_WIDTH));
    }

    let _ = write!(out, "\n{} chunk(s)", chunks.len());
    out
}

pub fn print_summary(analysis: &Analysis, out_path: &Path) {
    let report = &analysis.report;

    for skipped in &analysis.skipped {
        eprintln!(
            "  warning: skipped {}: {}",
            skipped.filename.as_deref().unwrap_or("<no filename>"),
            skipped.reason
        );
    }

    eprintln!(
        "Ranked {} chunk(s) into {} section(s) from {} document(s)",
        analysis.chunk_count,
        report.extracted_sections.len(),
        report
            .metadata
            .input_documents
            .len()
            .saturating_sub(analysis.skipped.len())
    );

    let max_doc = report
        .extracted_sections
        .iter()
        .take(5)
        .map(|s| s.document.len())
        .max()
        .unwrap_or(10);
    for section in report.extracted_sections.iter().take(5) {
        eprintln!(
            "  {:>3}. {:<width$}  p.{:<4} {}",
            section.importance_rank,
            section.document,
            section.page_number,
            section.section_title,
            width = max_doc
        );
    }

    eprintln!("Analysis complete. Output saved to {}", out_path.display());
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let cut: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{cut}...")
}
