use crate::aggregate::Aggregation;
use crate::error::SiftError;
use crate::model::{RankedSection, SubsectionExcerpt};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory holding the PDFs, next to the input file.
pub const PDF_DIR_NAME: &str = "PDFs";

/// Output file name, written next to the input file.
pub const DEFAULT_OUTPUT_FILE: &str = "challenge1b_output.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Persona {
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobToBeDone {
    #[serde(default)]
    pub task: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRef {
    /// Entries without a filename are skipped but still listed in metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// The run input specification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunInput {
    #[serde(default)]
    pub persona: Persona,
    #[serde(default)]
    pub job_to_be_done: JobToBeDone,
    #[serde(default)]
    pub documents: Vec<DocumentRef>,
}

/// Load and decode the input specification.
pub fn load_run_input(path: &Path) -> Result<RunInput, SiftError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SiftError::InputNotFound {
                path: path.to_path_buf(),
            }
        } else {
            SiftError::Io(e)
        }
    })?;
    parse_run_input(&content, path)
}

pub fn parse_run_input(json: &str, source: &Path) -> Result<RunInput, SiftError> {
    serde_json::from_str(json).map_err(|e| SiftError::InputInvalid {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })
}

/// `<input dir>/PDFs`
pub fn default_pdf_dir(input_path: &Path) -> PathBuf {
    base_dir(input_path).join(PDF_DIR_NAME)
}

/// `<input dir>/challenge1b_output.json`
pub fn default_output_path(input_path: &Path) -> PathBuf {
    base_dir(input_path).join(DEFAULT_OUTPUT_FILE)
}

fn base_dir(input_path: &Path) -> &Path {
    input_path.parent().unwrap_or_else(|| Path::new(""))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Filenames in input order, including documents that were skipped.
    /// Entries without a filename are written as `null`.
    pub input_documents: Vec<Option<String>>,
    pub persona: String,
    pub job_to_be_done: String,
    pub processing_timestamp: String,
}

/// The final artifact of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub metadata: ReportMetadata,
    pub extracted_sections: Vec<RankedSection>,
    pub subsection_analysis: Vec<SubsectionExcerpt>,
}

/// Merge aggregation output with run metadata.
pub fn assemble(
    input: &RunInput,
    aggregation: Aggregation,
    processed_at: DateTime<Utc>,
) -> AnalysisReport {
    AnalysisReport {
        metadata: ReportMetadata {
            input_documents: input.documents.iter().map(|d| d.filename.clone()).collect(),
            persona: input.persona.role.clone(),
            job_to_be_done: input.job_to_be_done.task.clone(),
            processing_timestamp: format_timestamp(processed_at),
        },
        extracted_sections: aggregation.sections,
        subsection_analysis: aggregation.excerpts,
    }
}

/// RFC 3339 with an explicit `+00:00` offset. Microseconds are written only
/// when non-zero.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    let precision = if ts.timestamp_subsec_micros() == 0 {
        SecondsFormat::Secs
    } else {
        SecondsFormat::Micros
    };
    ts.to_rfc3339_opts(precision, false)
}

/// Write the report as pretty-printed JSON.
pub fn write_report(path: &Path, report: &AnalysisReport) -> Result<(), SiftError> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    Ok(())
}
