use serde::{Deserialize, Serialize};

use super::{Hsla, OutcomeSummary, QuizPrompt, Reagent};

/// A catalog reagent placed in the vessel.
///
/// At most one entry exists per reagent id. `quantity` is unit-less and always
/// within the clamped range enforced by the mixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagedReagent {
    #[serde(flatten)]
    pub reagent: Reagent,
    pub quantity: f64,
}

/// Lifecycle position of a mixture.
///
/// - `Empty`: Nothing staged (initial state, and the state after every reset)
/// - `Staging`: Reagents staged, no resolved reaction
/// - `Reacted`: A benign reaction resolved
/// - `Hazard`: A hazardous reaction resolved; its quiz, if any, is not shown yet
/// - `QuizPending`: The quiz is shown and awaits an answer
/// - `QuizAnswered`: An answer was recorded; acknowledging returns to `Empty`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MixturePhase {
    Empty,
    Staging,
    Reacted,
    Hazard,
    QuizPending,
    QuizAnswered,
}

impl MixturePhase {
    pub fn is_resolved(&self) -> bool {
        matches!(
            self,
            Self::Reacted | Self::Hazard | Self::QuizPending | Self::QuizAnswered
        )
    }
}

/// A single solid grain drawn in the vessel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub id: String,
    pub color: Hsla,
}

/// Appearance of the vessel, derived purely from the mixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselVisuals {
    pub liquid_color: Hsla,
    /// Percentage in `0.0..=100.0`.
    pub fill_percent: f64,
    pub particles: Vec<Particle>,
}

/// Read-only view of a mixture handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixtureSnapshot {
    pub phase: MixturePhase,
    pub generation: u64,
    pub staged: Vec<StagedReagent>,
    pub outcome: Option<OutcomeSummary>,
    pub resulting_product: Option<String>,
    /// Present only while the quiz is shown and unanswered.
    pub quiz: Option<QuizPrompt>,
    pub visuals: VesselVisuals,
}
