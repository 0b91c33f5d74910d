use std::path::PathBuf;

use thiserror::Error;

/// Problems found while loading a catalog. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate reagent id: {0}")]
    DuplicateReagent(String),

    #[error("Reagent with empty id at position {0}")]
    EmptyReagentId(usize),

    #[error("Reaction #{0} has no reagents")]
    EmptyReaction(usize),

    #[error("Reactions #{first} and #{second} share the reagent set {{{reagents}}}")]
    DuplicateReaction {
        first: usize,
        second: usize,
        reagents: String,
    },

    #[error("Quiz for reaction #{0} has no options")]
    QuizWithoutOptions(usize),

    #[error("Quiz for reaction #{index}: correct answer {answer:?} is not one of the options")]
    QuizAnswerNotAnOption { index: usize, answer: String },
}
