//! Integration tests for the analyze() end-to-end pipeline.
//!
//! Uses a MockExtractor keyed by file contents, so no pdftohtml is needed,
//! and a bag-of-words embedding provider with deterministic vectors.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use sift_core::embedding::EmbeddingProvider;
use sift_core::error::SiftError;
use sift_core::extraction::{SpanExtractor, StyledPage, StyledSpan, TextLine};
use sift_core::report::{self, DocumentRef, JobToBeDone, Persona, RunInput};
use sift_core::{analyze, collect_chunks};

struct MockExtractor {
    documents: HashMap<Vec<u8>, Vec<StyledPage>>,
}

impl MockExtractor {
    fn new() -> Self {
        MockExtractor {
            documents: HashMap::new(),
        }
    }

    fn with(mut self, marker: &str, pages: Vec<StyledPage>) -> Self {
        self.documents.insert(marker.as_bytes().to_vec(), pages);
        self
    }
}

impl SpanExtractor for MockExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<StyledPage>, SiftError> {
        self.documents
            .get(pdf_bytes)
            .cloned()
            .ok_or_else(|| SiftError::Extraction("not a PDF".into()))
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

const VOCAB: &[&str] = &[
    "trip", "plan", "day", "travel", "beach", "hotel", "museum", "tax", "invoice", "form",
];

/// Counts vocabulary words; texts without any get a constant off-axis vector.
struct BagOfWords {
    calls: AtomicUsize,
}

impl BagOfWords {
    fn new() -> Self {
        BagOfWords {
            calls: AtomicUsize::new(0),
        }
    }
}

impl EmbeddingProvider for BagOfWords {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, SiftError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts
            .iter()
            .map(|text| {
                let lower = text.to_lowercase();
                let mut v: Vec<f32> = VOCAB
                    .iter()
                    .map(|w| lower.matches(w).count() as f32)
                    .collect();
                v.push(0.1);
                v
            })
            .collect())
    }

    fn model_name(&self) -> &str {
        "bag-of-words"
    }
}

struct FailingProvider;

impl EmbeddingProvider for FailingProvider {
    fn embed(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>, SiftError> {
        Err(SiftError::Embedding("model unavailable".into()))
    }

    fn model_name(&self) -> &str {
        "failing"
    }
}

fn line(text: &str, bold: bool) -> TextLine {
    TextLine {
        spans: vec![StyledSpan::new(text, bold, 10.0)],
    }
}

fn page(number: usize, lines: Vec<TextLine>) -> StyledPage {
    StyledPage {
        page_number: number,
        lines,
    }
}

fn run_input(files: &[&str]) -> RunInput {
    RunInput {
        persona: Persona {
            role: "Travel Planner".into(),
        },
        job_to_be_done: JobToBeDone {
            task: "Plan a 3-day trip".into(),
        },
        documents: files
            .iter()
            .map(|f| DocumentRef {
                filename: Some(f.to_string()),
                title: None,
            })
            .collect(),
    }
}

fn write_pdfs(dir: &Path, files: &[(&str, &str)]) {
    std::fs::create_dir_all(dir).unwrap();
    for (name, marker) in files {
        std::fs::write(dir.join(name), marker).unwrap();
    }
}

fn overview_doc(first: &str, second: &str) -> Vec<StyledPage> {
    vec![page(
        1,
        vec![
            line("Overview", true),
            line(first, false),
            line(second, false),
        ],
    )]
}

// ---------------------------------------------------------------------------
// Test 1: Two documents, one title each, ranked end to end
// ---------------------------------------------------------------------------
#[test]
fn two_documents_with_overview_sections() {
    let tmp = tempfile::tempdir().unwrap();
    let pdf_dir = tmp.path().join("PDFs");
    write_pdfs(&pdf_dir, &[("nice.pdf", "NICE"), ("lyon.pdf", "LYON")]);

    let extractor = MockExtractor::new()
        .with(
            "NICE",
            overview_doc("Plan a beach day on your trip", "Parking is limited"),
        )
        .with(
            "LYON",
            overview_doc("A three day trip plan for travel", "Museum opening hours"),
        );
    let provider = BagOfWords::new();
    let input = run_input(&["nice.pdf", "lyon.pdf"]);

    let analysis = analyze(&input, &pdf_dir, &extractor, &provider).unwrap();
    let report = &analysis.report;

    assert_eq!(analysis.chunk_count, 4);
    assert!(analysis.skipped.is_empty());
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

    assert_eq!(report.subsection_analysis.len(), 4);
    assert_eq!(
        report.subsection_analysis[0].refined_text,
        "A three day trip plan for travel"
    );
    assert_eq!(report.subsection_analysis[0].document, "lyon.pdf");

    assert_eq!(report.extracted_sections.len(), 2);
    assert!(report
        .extracted_sections
        .iter()
        .all(|s| s.section_title == "Overview" && s.page_number == 1));
    assert_eq!(report.extracted_sections[0].document, "lyon.pdf");
    assert_eq!(report.extracted_sections[0].importance_rank, 1);
    assert_eq!(report.extracted_sections[1].document, "nice.pdf");
    assert_eq!(report.extracted_sections[1].importance_rank, 2);

    assert_eq!(
        report.metadata.input_documents,
        vec![Some("nice.pdf".to_string()), Some("lyon.pdf".to_string())]
    );
    assert_eq!(report.metadata.persona, "Travel Planner");
    assert_eq!(report.metadata.job_to_be_done, "Plan a 3-day trip");
}

// ---------------------------------------------------------------------------
// Test 2: Unreadable and missing documents are skipped, run continues
// ---------------------------------------------------------------------------
#[test]
fn unreadable_documents_are_skipped() {
    let tmp = tempfile::tempdir().unwrap();
    let pdf_dir = tmp.path().join("PDFs");
    write_pdfs(&pdf_dir, &[("good.pdf", "GOOD"), ("corrupt.pdf", "???")]);

    let extractor = MockExtractor::new().with(
        "GOOD",
        vec![page(1, vec![line("Hotel list", false), line("", false)])],
    );

    let docs = run_input(&["missing.pdf", "corrupt.pdf", "good.pdf"]).documents;
    let collected = collect_chunks(&docs, &pdf_dir, &extractor);

    assert_eq!(collected.chunks.len(), 1);
    assert_eq!(collected.chunks[0].document, "good.pdf");
    assert_eq!(collected.chunks[0].section_title, "Introduction");

    let skipped: Vec<&str> = collected
        .skipped
        .iter()
        .filter_map(|s| s.filename.as_deref())
        .collect();
    assert_eq!(skipped, vec!["missing.pdf", "corrupt.pdf"]);
}

// ---------------------------------------------------------------------------
// Test 3: No chunks at all is fatal and never reaches the provider
// ---------------------------------------------------------------------------
#[test]
fn no_chunks_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let pdf_dir = tmp.path().join("PDFs");
    write_pdfs(&pdf_dir, &[("titles.pdf", "TITLES")]);

    let extractor = MockExtractor::new().with(
        "TITLES",
        vec![page(1, vec![line("Only", true), line("Headings", true)])],
    );
    let provider = BagOfWords::new();

    let result = analyze(&run_input(&["titles.pdf"]), &pdf_dir, &extractor, &provider);

    assert!(matches!(result, Err(SiftError::NoChunks)));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

// ---------------------------------------------------------------------------
// Test 4: Embedding failure aborts the run
// ---------------------------------------------------------------------------
#[test]
fn embedding_failure_aborts() {
    let tmp = tempfile::tempdir().unwrap();
    let pdf_dir = tmp.path().join("PDFs");
    write_pdfs(&pdf_dir, &[("a.pdf", "A")]);

    let extractor = MockExtractor::new().with("A", overview_doc("one", "two"));
    let result = analyze(&run_input(&["a.pdf"]), &pdf_dir, &extractor, &FailingProvider);

    assert!(matches!(result, Err(SiftError::Embedding(_))));
}

// ---------------------------------------------------------------------------
// Test 5: Section keys split by page and title, excerpts capped at 20
// ---------------------------------------------------------------------------
#[test]
fn sections_split_by_page_and_excerpts_capped() {
    let tmp = tempfile::tempdir().unwrap();
    let pdf_dir = tmp.path().join("PDFs");
    write_pdfs(&pdf_dir, &[("guide.pdf", "GUIDE")]);

    let body: Vec<TextLine> = (0..12)
        .map(|i| line(&format!("travel note {i}"), false))
        .collect();
    let mut page_one = vec![line("Hotels", true)];
    page_one.extend(body.clone());
    let mut page_two = body;
    page_two.push(line("Beaches", true));
    page_two.push(line("beach day trip", false));

    let extractor = MockExtractor::new().with("GUIDE", vec![page(1, page_one), page(2, page_two)]);
    let analysis = analyze(
        &run_input(&["guide.pdf"]),
        &pdf_dir,
        &extractor,
        &BagOfWords::new(),
    )
    .unwrap();
    let report = analysis.report;

    assert_eq!(analysis.chunk_count, 25);
    assert_eq!(report.subsection_analysis.len(), 20);

    // (Hotels, 1), (Hotels, 2), (Beaches, 2)
    assert_eq!(report.extracted_sections.len(), 3);
    let ranks: Vec<usize> = report
        .extracted_sections
        .iter()
        .map(|s| s.importance_rank)
        .collect();
    assert_eq!(ranks, vec![1, 2, 3]);
    assert_eq!(report.extracted_sections[0].section_title, "Beaches");
    assert_eq!(report.extracted_sections[0].page_number, 2);
}

// ---------------------------------------------------------------------------
// Test 6: Report round-trips through the output file
// ---------------------------------------------------------------------------
#[test]
fn report_written_next_to_input() {
    let tmp = tempfile::tempdir().unwrap();
    let input_path = tmp.path().join("challenge1b_input.json");
    let input = run_input(&["a.pdf"]);
    std::fs::write(&input_path, serde_json::to_string(&input).unwrap()).unwrap();

    let pdf_dir = report::default_pdf_dir(&input_path);
    write_pdfs(&pdf_dir, &[("a.pdf", "A")]);
    let extractor = MockExtractor::new().with("A", overview_doc("trip plan", "hotel"));

    let loaded = report::load_run_input(&input_path).unwrap();
    let analysis = analyze(&loaded, &pdf_dir, &extractor, &BagOfWords::new()).unwrap();

    let out_path = report::default_output_path(&input_path);
    report::write_report(&out_path, &analysis.report).unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    assert_eq!(written["metadata"]["input_documents"][0], "a.pdf");
    assert_eq!(written["extracted_sections"].as_array().unwrap().len(), 1);
    assert_eq!(written["subsection_analysis"].as_array().unwrap().len(), 2);
    assert!(written["metadata"]["processing_timestamp"]
        .as_str()
        .unwrap()
        .ends_with("+00:00"));
}

// ---------------------------------------------------------------------------
// Test 7: Entry without a filename is skipped and listed as null
// ---------------------------------------------------------------------------
#[test]
fn document_without_filename_is_skipped() {
    let tmp = tempfile::tempdir().unwrap();
    let input_path = tmp.path().join("challenge1b_input.json");
    std::fs::write(
        &input_path,
        r#"{
            "persona": { "role": "Travel Planner" },
            "job_to_be_done": { "task": "Plan a 3-day trip" },
            "documents": [
                { "title": "No file" },
                { "filename": "a.pdf", "title": "Guide" }
            ]
        }"#,
    )
    .unwrap();

    let pdf_dir = report::default_pdf_dir(&input_path);
    write_pdfs(&pdf_dir, &[("a.pdf", "A")]);
    let extractor = MockExtractor::new().with("A", overview_doc("trip plan", "hotel"));

    let input = report::load_run_input(&input_path).unwrap();
    let analysis = analyze(&input, &pdf_dir, &extractor, &BagOfWords::new()).unwrap();

    assert_eq!(analysis.chunk_count, 2);
    assert_eq!(analysis.skipped.len(), 1);
    assert!(analysis.skipped[0].filename.is_none());

    let value = serde_json::to_value(&analysis.report).unwrap();
    assert_eq!(
        value["metadata"]["input_documents"],
        serde_json::json!([null, "a.pdf"])
    );
    assert!(value["extracted_sections"]
        .as_array()
        .unwrap()
        .iter()
        .all(|s| s["document"] == "a.pdf"));
}
