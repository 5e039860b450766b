use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SiftError {
    #[error("input file not found: {path}")]
    InputNotFound { path: PathBuf },

    #[error("could not decode input specification {path}: {reason}")]
    InputInvalid { path: PathBuf, reason: String },

    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    #[error("pdftohtml not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftohtmlNotFound,

    #[error("pdftohtml failed with exit code {code}: {stderr}")]
    PdftohtmlFailed { code: i32, stderr: String },

    #[error("embedding failed: {0}")]
    Embedding(String),

    #[error("no text chunks were extracted from the input documents")]
    NoChunks,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
