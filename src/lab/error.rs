use thiserror::Error;
use uuid::Uuid;

use crate::extract::ExtractionError;

/// Errors raised by session operations. None of them are fatal to the process.
#[derive(Debug, Error)]
pub enum LabError {
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("Unknown reagent: {0}")]
    UnknownReagent(String),

    #[error("Reagent not staged: {0}")]
    NotStaged(String),

    #[error("A quiz is in progress; answer it or reset the workspace")]
    QuizInProgress,

    #[error("No quiz is awaiting an answer")]
    NoQuizPending,

    #[error("No answered quiz to acknowledge")]
    NothingToAcknowledge,

    #[error("Document analysis is not configured")]
    ExtractionUnavailable,

    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}
