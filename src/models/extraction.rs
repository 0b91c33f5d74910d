use serde::{Deserialize, Serialize};

use super::Reagent;

/// A chemical as reported by the document-analysis service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedChemical {
    pub name: String,
    pub formula: String,
}

/// Completion signal from the document-analysis service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExtractionCompletion {
    Complete { chemicals: Vec<ExtractedChemical> },
    Failed { reason: String },
}

/// Input for applying an extraction result to a session.
///
/// `ticket` is the one returned when the upload started; a completion for any
/// upload other than the latest in-flight one is discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyExtractionInput {
    pub ticket: u64,
    pub completion: ExtractionCompletion,
}

/// Input for uploading a document for server-side analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInput {
    /// `data:<mimetype>;base64,<encoded_data>`
    pub file_data_uri: String,
}

/// Extracted chemicals split by whether the catalog knows them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionSummary {
    /// Catalog reagents, deduplicated by id in first-seen order.
    pub available: Vec<Reagent>,
    pub unmatched: Vec<ExtractedChemical>,
}
