use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ExtractedChemical, MixtureSnapshot, OutcomeSummary, QuizVerdict, Reagent};

/// A user's lab session.
///
/// Sessions are **independent**: each owns its own mixture and nothing is
/// shared between them except the read-only catalog. They live only in memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabSession {
    pub id: Uuid,
    /// Bumped on every document upload; completions for older tickets are dropped.
    pub upload_ticket: u64,
    /// True between the start of an upload and its completion.
    pub extracting: bool,
    /// Catalog reagents found in the most recent document.
    pub available: Vec<Reagent>,
    /// Chemicals from the most recent document that the catalog does not know.
    pub unmatched: Vec<ExtractedChemical>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A session together with the current state of its vessel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(flatten)]
    pub session: LabSession,
    pub mixture: MixtureSnapshot,
}

/// Input for staging a reagent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddReagentInput {
    /// Catalog id. Names and formulas are accepted too and resolved via lookup.
    pub id: String,
}

/// Input for changing a staged reagent's quantity. Out-of-range values are clamped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetQuantityInput {
    pub quantity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizAnswerInput {
    pub answer: String,
}

/// Response to staging a reagent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddReagentResponse {
    /// False when the reagent was already staged; the vessel is unchanged.
    pub added: bool,
    pub session: SessionSnapshot,
}

/// Response to mixing the vessel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MixResponse {
    pub outcome: OutcomeSummary,
    pub session: SessionSnapshot,
}

/// Response to a submitted quiz answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizAnswerResponse {
    #[serde(flatten)]
    pub verdict: QuizVerdict,
    pub session: SessionSnapshot,
}

/// Response to an upload start or an extraction completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResponse {
    pub ticket: u64,
    /// False when the completion was stale and therefore ignored.
    pub applied: bool,
    pub session: SessionSnapshot,
}
