use serde::{Deserialize, Serialize};

use super::{Product, Quiz, ReactionRule};

/// The result of resolving a set of staged reagent ids against the rule table.
///
/// None of the variants is an error: resolution is total over any set of ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// The vessel was empty.
    NothingToMix,
    /// Reagents were staged but no rule matches them exactly.
    NoReaction,
    /// A benign rule matched.
    Reaction { product: Product },
    /// A hazardous rule matched. The quiz, if any, is revealed after the hazard animation.
    Hazard {
        product: Product,
        quiz: Option<Quiz>,
    },
}

impl Outcome {
    pub fn from_rule(rule: &ReactionRule) -> Self {
        if rule.hazardous {
            Self::Hazard {
                product: rule.product.clone(),
                quiz: rule.quiz.clone(),
            }
        } else {
            Self::Reaction {
                product: rule.product.clone(),
            }
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::NothingToMix => OutcomeKind::NothingToMix,
            Self::NoReaction => OutcomeKind::NoReaction,
            Self::Reaction { .. } => OutcomeKind::Reaction,
            Self::Hazard { .. } => OutcomeKind::Hazard,
        }
    }

    pub fn is_hazardous(&self) -> bool {
        matches!(self, Self::Hazard { .. })
    }

    pub fn product(&self) -> Option<&Product> {
        match self {
            Self::Reaction { product } | Self::Hazard { product, .. } => Some(product),
            Self::NothingToMix | Self::NoReaction => None,
        }
    }

    pub fn quiz(&self) -> Option<&Quiz> {
        match self {
            Self::Hazard { quiz, .. } => quiz.as_ref(),
            _ => None,
        }
    }

    /// Presentation-safe summary; never includes the quiz answer.
    pub fn summary(&self) -> OutcomeSummary {
        OutcomeSummary {
            kind: self.kind(),
            product: self.product().cloned(),
            has_quiz: self.quiz().is_some(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    NothingToMix,
    NoReaction,
    Reaction,
    Hazard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeSummary {
    pub kind: OutcomeKind,
    pub product: Option<Product>,
    pub has_quiz: bool,
}
