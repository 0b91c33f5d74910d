use serde::{Deserialize, Serialize};

use super::Hsla;

/// A static rule mapping an exact, unordered set of reagent ids to an outcome.
///
/// Within a catalog no two rules share the same reagent set; this is checked
/// when the catalog is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionRule {
    pub reagents: Vec<String>,
    pub hazardous: bool,
    pub product: Product,
    /// Only meaningful for hazardous rules, where it is shown after the hazard animation.
    #[serde(default)]
    pub quiz: Option<Quiz>,
}

/// What a reaction produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    /// Overrides the blended liquid color once the reaction resolves.
    pub color: Hsla,
}

/// A multiple-choice question attached to a reaction rule.
///
/// `correct_answer` must be one of `options`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

impl Quiz {
    /// The question as shown to the user, without the answer.
    pub fn prompt(&self) -> QuizPrompt {
        QuizPrompt {
            question: self.question.clone(),
            options: self.options.clone(),
        }
    }

    pub fn is_correct(&self, answer: &str) -> bool {
        answer.trim() == self.correct_answer
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizPrompt {
    pub question: String,
    pub options: Vec<String>,
}

/// Feedback for a submitted quiz answer. Both correct and incorrect answers
/// close the quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizVerdict {
    pub correct: bool,
    pub correct_answer: String,
}
