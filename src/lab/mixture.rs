use std::collections::VecDeque;

use crate::models::{
    LabEvent, MixturePhase, MixtureSnapshot, Outcome, Quiz, QuizPrompt, QuizVerdict,
    ReactionRule, Reagent, StagedReagent,
};

use super::{visuals, LabError, ReagentSet, Resolver};

/// Quantity given to a freshly staged reagent.
pub const DEFAULT_QUANTITY: f64 = 100.0;
pub const MIN_QUANTITY: f64 = 10.0;
pub const MAX_QUANTITY: f64 = 1000.0;

/// Undrained events kept per vessel; older ones are dropped first.
pub const MAX_PENDING_EVENTS: usize = 64;

/// Clamp a requested quantity into `MIN_QUANTITY..=MAX_QUANTITY`.
/// Non-finite input falls back to the minimum.
pub fn clamp_quantity(quantity: f64) -> f64 {
    if quantity.is_nan() {
        return MIN_QUANTITY;
    }
    quantity.clamp(MIN_QUANTITY, MAX_QUANTITY)
}

/// Result of staging a reagent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddResult {
    Added,
    /// The reagent was already in the vessel; nothing changed.
    AlreadyStaged,
}

/// The contents of one session's mixing vessel.
///
/// Staged entries keep insertion order. Every resolution and every reset bumps
/// `generation`, which delayed callbacks (quiz reveal, post-quiz reset) compare
/// against so that a callback scheduled before a reset does nothing.
#[derive(Debug, Clone)]
pub struct Mixture {
    staged: Vec<StagedReagent>,
    phase: MixturePhase,
    resolved: Option<ReactionRule>,
    outcome: Option<Outcome>,
    generation: u64,
    events: VecDeque<LabEvent>,
}

impl Default for Mixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Mixture {
    pub fn new() -> Self {
        Self {
            staged: Vec::new(),
            phase: MixturePhase::Empty,
            resolved: None,
            outcome: None,
            generation: 0,
            events: VecDeque::new(),
        }
    }

    pub fn phase(&self) -> MixturePhase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn staged(&self) -> &[StagedReagent] {
        &self.staged
    }

    pub fn staged_ids(&self) -> ReagentSet {
        self.staged.iter().map(|s| s.reagent.id.as_str()).collect()
    }

    pub fn quantity(&self, id: &str) -> Option<f64> {
        self.staged
            .iter()
            .find(|s| s.reagent.id == id)
            .map(|s| s.quantity)
    }

    /// The rule matched by the last mix, if it still applies.
    pub fn resolved_reaction(&self) -> Option<&ReactionRule> {
        self.resolved.as_ref()
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn resulting_product(&self) -> Option<&str> {
        self.resolved.as_ref().map(|r| r.product.name.as_str())
    }

    /// Stage a catalog reagent at the default quantity.
    pub fn add(&mut self, reagent: &Reagent) -> Result<AddResult, LabError> {
        self.ensure_no_quiz()?;

        if self.staged.iter().any(|s| s.reagent.id == reagent.id) {
            tracing::debug!("Reagent {} already staged", reagent.id);
            self.push_event(LabEvent::info(
                "Chemical already added",
                "You can adjust the quantity in the staging area.",
            ));
            return Ok(AddResult::AlreadyStaged);
        }

        self.discard_resolution();
        self.staged.push(StagedReagent {
            reagent: reagent.clone(),
            quantity: DEFAULT_QUANTITY,
        });
        self.phase = MixturePhase::Staging;
        Ok(AddResult::Added)
    }

    pub fn remove(&mut self, id: &str) -> Result<(), LabError> {
        self.ensure_no_quiz()?;

        let index = self
            .staged
            .iter()
            .position(|s| s.reagent.id == id)
            .ok_or_else(|| LabError::NotStaged(id.to_string()))?;

        self.discard_resolution();
        self.staged.remove(index);
        self.phase = if self.staged.is_empty() {
            MixturePhase::Empty
        } else {
            MixturePhase::Staging
        };
        Ok(())
    }

    /// Change a staged reagent's quantity, returning the clamped value stored.
    pub fn set_quantity(&mut self, id: &str, quantity: f64) -> Result<f64, LabError> {
        self.ensure_no_quiz()?;

        let index = self
            .staged
            .iter()
            .position(|s| s.reagent.id == id)
            .ok_or_else(|| LabError::NotStaged(id.to_string()))?;

        self.discard_resolution();
        let clamped = clamp_quantity(quantity);
        self.staged[index].quantity = clamped;
        self.phase = MixturePhase::Staging;
        Ok(clamped)
    }

    /// Resolve the staged reagents.
    ///
    /// An empty vessel yields [`Outcome::NothingToMix`] and changes nothing else.
    pub fn mix(&mut self, resolver: &Resolver) -> Result<Outcome, LabError> {
        self.ensure_no_quiz()?;

        let ids = self.staged_ids();
        if ids.is_empty() {
            self.push_event(LabEvent::info(
                "Empty Beaker",
                "Add some chemicals to start an experiment.",
            ));
            self.outcome = Some(Outcome::NothingToMix);
            return Ok(Outcome::NothingToMix);
        }

        self.generation += 1;
        let rule = resolver.find_rule(&ids).cloned();
        let outcome = match &rule {
            Some(rule) => Outcome::from_rule(rule),
            None => Outcome::NoReaction,
        };

        match &outcome {
            Outcome::Reaction { product } => {
                tracing::info!("Mixed {{{}}}: {}", ids, product.name);
                self.phase = MixturePhase::Reacted;
                self.push_event(LabEvent::Reaction {
                    product: product.name.clone(),
                });
                self.push_event(LabEvent::info(
                    "Reaction Successful!",
                    format!("You've created {}.", product.name),
                ));
            }
            Outcome::Hazard { product, .. } => {
                tracing::info!("Mixed {{{}}}: hazardous, {}", ids, product.name);
                self.phase = MixturePhase::Hazard;
                self.push_event(LabEvent::Hazard {
                    product: product.name.clone(),
                });
            }
            Outcome::NoReaction | Outcome::NothingToMix => {
                tracing::debug!("Mixed {{{}}}: no reaction", ids);
                self.phase = MixturePhase::Staging;
                self.push_event(LabEvent::warning(
                    "No Reaction",
                    "These chemicals don't seem to react with each other.",
                ));
            }
        }

        self.resolved = rule;
        self.outcome = Some(outcome.clone());
        Ok(outcome)
    }

    /// Show the quiz of a hazardous reaction once its animation has finished.
    ///
    /// Returns `None` when `generation` is stale or there is no quiz to show.
    pub fn reveal_quiz(&mut self, generation: u64) -> Option<QuizPrompt> {
        if generation != self.generation {
            tracing::debug!(
                "Ignoring quiz reveal for generation {} (current {})",
                generation,
                self.generation
            );
            return None;
        }
        if self.phase != MixturePhase::Hazard {
            return None;
        }

        let prompt = self.pending_quiz()?.prompt();
        self.phase = MixturePhase::QuizPending;
        self.push_event(LabEvent::QuizPrompt {
            question: prompt.question.clone(),
            options: prompt.options.clone(),
        });
        Some(prompt)
    }

    /// Record an answer. Correct and incorrect answers both close the quiz.
    pub fn submit_quiz_answer(&mut self, answer: &str) -> Result<QuizVerdict, LabError> {
        if self.phase != MixturePhase::QuizPending {
            return Err(LabError::NoQuizPending);
        }
        let quiz = self.pending_quiz().ok_or(LabError::NoQuizPending)?;

        let verdict = QuizVerdict {
            correct: quiz.is_correct(answer),
            correct_answer: quiz.correct_answer.clone(),
        };
        self.phase = MixturePhase::QuizAnswered;
        self.push_event(LabEvent::QuizResult {
            correct: verdict.correct,
            correct_answer: verdict.correct_answer.clone(),
        });
        Ok(verdict)
    }

    /// Close an answered quiz, returning the vessel to empty.
    pub fn acknowledge(&mut self) -> Result<(), LabError> {
        if self.phase != MixturePhase::QuizAnswered {
            return Err(LabError::NothingToAcknowledge);
        }
        self.reset();
        Ok(())
    }

    /// Delayed form of [`acknowledge`](Self::acknowledge); does nothing for a stale generation.
    pub fn acknowledge_if_current(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.phase != MixturePhase::QuizAnswered {
            return false;
        }
        self.reset();
        true
    }

    /// Discard everything and return to `Empty`, with a notice.
    pub fn reset(&mut self) {
        self.clear();
        self.push_event(LabEvent::info(
            "Workspace Cleared",
            "The lab bench has been reset.",
        ));
    }

    /// Discard everything and return to `Empty` silently.
    pub fn clear(&mut self) {
        self.staged.clear();
        self.resolved = None;
        self.outcome = None;
        self.phase = MixturePhase::Empty;
        self.generation += 1;
    }

    pub fn push_event(&mut self, event: LabEvent) {
        if self.events.len() == MAX_PENDING_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn drain_events(&mut self) -> Vec<LabEvent> {
        self.events.drain(..).collect()
    }

    pub fn snapshot(&self) -> MixtureSnapshot {
        let product = self.resolved.as_ref().map(|r| &r.product);
        let quiz = match self.phase {
            MixturePhase::QuizPending => self.pending_quiz().map(|q| q.prompt()),
            _ => None,
        };

        MixtureSnapshot {
            phase: self.phase,
            generation: self.generation,
            staged: self.staged.clone(),
            outcome: self.outcome.as_ref().map(Outcome::summary),
            resulting_product: self.resulting_product().map(str::to_string),
            quiz,
            visuals: visuals::derive(&self.staged, product),
        }
    }

    fn pending_quiz(&self) -> Option<&Quiz> {
        self.resolved
            .as_ref()
            .filter(|r| r.hazardous)
            .and_then(|r| r.quiz.as_ref())
    }

    /// True while a hazardous reaction's quiz is still to be shown, shown or answered.
    fn quiz_outstanding(&self) -> bool {
        match self.phase {
            MixturePhase::QuizPending | MixturePhase::QuizAnswered => true,
            MixturePhase::Hazard => self.pending_quiz().is_some(),
            _ => false,
        }
    }

    fn ensure_no_quiz(&self) -> Result<(), LabError> {
        if self.quiz_outstanding() {
            tracing::warn!("Rejected vessel change while a quiz is outstanding");
            return Err(LabError::QuizInProgress);
        }
        Ok(())
    }

    /// Editing the vessel invalidates the last mix, whatever its outcome.
    fn discard_resolution(&mut self) {
        self.outcome = None;
        if self.phase.is_resolved() {
            self.resolved = None;
            self.phase = MixturePhase::Staging;
        }
    }
}
