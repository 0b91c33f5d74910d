use serde::{Deserialize, Serialize};

/// Discrete notifications emitted by a session, drained by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LabEvent {
    Notice {
        level: NoticeLevel,
        title: String,
        message: String,
    },
    Reaction {
        product: String,
    },
    Hazard {
        product: String,
    },
    QuizPrompt {
        question: String,
        options: Vec<String>,
    },
    QuizResult {
        correct: bool,
        correct_answer: String,
    },
}

impl LabEvent {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Notice {
            level: NoticeLevel::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Notice {
            level: NoticeLevel::Warning,
            title: title.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
}
