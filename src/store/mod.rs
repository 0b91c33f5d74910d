//! In-memory session store.
//!
//! Each session owns an independent [`Mixture`]; the only shared piece is the
//! stateless [`Resolver`]. Operations lock the map briefly and never await
//! while holding the lock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::lab::{AddResult, LabError, Mixture, Resolver};
use crate::models::*;

struct SessionEntry {
    session: LabSession,
    mixture: Mixture,
}

impl SessionEntry {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session: self.session.clone(),
            mixture: self.mixture.snapshot(),
        }
    }

    fn touch(&mut self) {
        self.session.updated_at = Utc::now();
    }
}

#[derive(Clone)]
pub struct LabStore {
    resolver: Resolver,
    sessions: Arc<Mutex<HashMap<Uuid, SessionEntry>>>,
}

impl LabStore {
    pub fn new(resolver: Resolver) -> Self {
        Self {
            resolver,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn with_catalog(catalog: Catalog) -> Self {
        Self::new(Resolver::new(Arc::new(catalog)))
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn catalog(&self) -> &Catalog {
        self.resolver.catalog()
    }

    /// Run `f` against one session's entry under the lock.
    fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut SessionEntry, &Resolver) -> Result<T, LabError>,
    ) -> Result<T, LabError> {
        let mut sessions = self.sessions.lock().expect("session lock poisoned");
        let entry = sessions
            .get_mut(&id)
            .ok_or(LabError::SessionNotFound(id))?;
        f(entry, &self.resolver)
    }

    // ============================================================
    // Session lifecycle
    // ============================================================

    pub fn create_session(&self) -> SessionSnapshot {
        let now = Utc::now();
        let entry = SessionEntry {
            session: LabSession {
                id: Uuid::new_v4(),
                upload_ticket: 0,
                extracting: false,
                available: Vec::new(),
                unmatched: Vec::new(),
                created_at: now,
                updated_at: now,
            },
            mixture: Mixture::new(),
        };
        let snapshot = entry.snapshot();

        let mut sessions = self.sessions.lock().expect("session lock poisoned");
        sessions.insert(entry.session.id, entry);
        tracing::info!("Created lab session {}", snapshot.session.id);
        snapshot
    }

    pub fn get_session(&self, id: Uuid) -> Result<SessionSnapshot, LabError> {
        self.with_session(id, |entry, _| Ok(entry.snapshot()))
    }

    pub fn delete_session(&self, id: Uuid) -> bool {
        let mut sessions = self.sessions.lock().expect("session lock poisoned");
        let removed = sessions.remove(&id).is_some();
        if removed {
            tracing::info!("Deleted lab session {}", id);
        }
        removed
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().expect("session lock poisoned").len()
    }

    /// Drop sessions untouched for longer than `max_idle`. Returns how many were removed.
    pub fn expire_idle(&self, max_idle: Duration) -> usize {
        let cutoff = Utc::now() - max_idle;
        let mut sessions = self.sessions.lock().expect("session lock poisoned");
        let before = sessions.len();
        sessions.retain(|_, entry| entry.session.updated_at >= cutoff);
        let removed = before - sessions.len();
        drop(sessions);

        if removed > 0 {
            tracing::info!(
                "Expired {} idle sessions, {} remain",
                removed,
                self.session_count()
            );
        }
        removed
    }

    // ============================================================
    // Vessel operations
    // ============================================================

    /// Stage a reagent by id (or name/formula). Unknown reagents are rejected.
    pub fn add_reagent(
        &self,
        id: Uuid,
        reagent: &str,
    ) -> Result<(AddResult, SessionSnapshot), LabError> {
        self.with_session(id, |entry, resolver| {
            let Some(reagent) = resolver.catalog().lookup(reagent) else {
                tracing::warn!("Session {}: unknown reagent {:?}", id, reagent);
                entry.mixture.push_event(LabEvent::warning(
                    "Unknown Chemical",
                    format!("{} is not in the reagent catalog.", reagent),
                ));
                return Err(LabError::UnknownReagent(reagent.to_string()));
            };
            let result = entry.mixture.add(reagent)?;
            entry.touch();
            Ok((result, entry.snapshot()))
        })
    }

    pub fn remove_reagent(&self, id: Uuid, reagent_id: &str) -> Result<SessionSnapshot, LabError> {
        self.with_session(id, |entry, _| {
            entry.mixture.remove(reagent_id)?;
            entry.touch();
            Ok(entry.snapshot())
        })
    }

    pub fn set_quantity(
        &self,
        id: Uuid,
        reagent_id: &str,
        quantity: f64,
    ) -> Result<SessionSnapshot, LabError> {
        self.with_session(id, |entry, _| {
            entry.mixture.set_quantity(reagent_id, quantity)?;
            entry.touch();
            Ok(entry.snapshot())
        })
    }

    /// Resolve the session's vessel. Returns the outcome, the generation it
    /// belongs to and the updated snapshot.
    pub fn mix(&self, id: Uuid) -> Result<(Outcome, u64, SessionSnapshot), LabError> {
        self.with_session(id, |entry, resolver| {
            let outcome = entry.mixture.mix(resolver)?;
            entry.touch();
            Ok((outcome, entry.mixture.generation(), entry.snapshot()))
        })
    }

    pub fn reset(&self, id: Uuid) -> Result<SessionSnapshot, LabError> {
        self.with_session(id, |entry, _| {
            entry.mixture.reset();
            entry.touch();
            Ok(entry.snapshot())
        })
    }

    // ============================================================
    // Quiz flow
    // ============================================================

    /// Reveal the quiz for `generation`. `Ok(None)` means the reveal was stale.
    pub fn reveal_quiz(&self, id: Uuid, generation: u64) -> Result<Option<QuizPrompt>, LabError> {
        self.with_session(id, |entry, _| {
            let prompt = entry.mixture.reveal_quiz(generation);
            if prompt.is_some() {
                entry.touch();
            }
            Ok(prompt)
        })
    }

    pub fn submit_quiz_answer(
        &self,
        id: Uuid,
        answer: &str,
    ) -> Result<(QuizVerdict, u64, SessionSnapshot), LabError> {
        self.with_session(id, |entry, _| {
            let verdict = entry.mixture.submit_quiz_answer(answer)?;
            entry.touch();
            Ok((verdict, entry.mixture.generation(), entry.snapshot()))
        })
    }

    pub fn acknowledge(&self, id: Uuid) -> Result<SessionSnapshot, LabError> {
        self.with_session(id, |entry, _| {
            entry.mixture.acknowledge()?;
            entry.touch();
            Ok(entry.snapshot())
        })
    }

    /// Delayed acknowledgement; returns whether the vessel was reset.
    pub fn acknowledge_if_current(&self, id: Uuid, generation: u64) -> Result<bool, LabError> {
        self.with_session(id, |entry, _| {
            let reset = entry.mixture.acknowledge_if_current(generation);
            if reset {
                entry.touch();
            }
            Ok(reset)
        })
    }

    pub fn drain_events(&self, id: Uuid) -> Result<Vec<LabEvent>, LabError> {
        self.with_session(id, |entry, _| Ok(entry.mixture.drain_events()))
    }

    // ============================================================
    // Document extraction
    // ============================================================

    /// Start a new upload: supersedes any earlier one and clears the vessel.
    /// Returns the ticket the completion must carry.
    pub fn begin_extraction(&self, id: Uuid) -> Result<(u64, SessionSnapshot), LabError> {
        self.with_session(id, |entry, _| {
            entry.session.upload_ticket += 1;
            entry.session.extracting = true;
            entry.session.available.clear();
            entry.session.unmatched.clear();
            entry.mixture.clear();
            entry.mixture.push_event(LabEvent::info(
                "Analyzing Document...",
                "Extracting chemicals from your syllabus. This may take a moment.",
            ));
            entry.touch();
            tracing::debug!(
                "Session {}: upload {} started",
                id,
                entry.session.upload_ticket
            );
            Ok((entry.session.upload_ticket, entry.snapshot()))
        })
    }

    /// Apply an extraction completion.
    ///
    /// Only the completion for the latest upload, while that upload is still
    /// in flight, is applied. Anything else is reported back with `applied: false`.
    pub fn complete_extraction(
        &self,
        id: Uuid,
        ticket: u64,
        completion: ExtractionCompletion,
    ) -> Result<ExtractionResponse, LabError> {
        self.with_session(id, |entry, resolver| {
            let current = entry.session.upload_ticket;
            if ticket != current || !entry.session.extracting {
                tracing::warn!(
                    "Session {}: dropping extraction result for upload {} (current {}, in flight: {})",
                    id,
                    ticket,
                    current,
                    entry.session.extracting
                );
                return Ok(ExtractionResponse {
                    ticket,
                    applied: false,
                    session: entry.snapshot(),
                });
            }

            entry.session.extracting = false;
            match completion {
                ExtractionCompletion::Complete { chemicals } => {
                    let summary = resolver.catalog().summarize_extraction(&chemicals);
                    tracing::info!(
                        "Session {}: extraction found {} chemicals ({} in catalog)",
                        id,
                        chemicals.len(),
                        summary.available.len()
                    );
                    entry.mixture.push_event(LabEvent::info(
                        "Analysis Complete!",
                        format!("Found {} chemicals to work with.", chemicals.len()),
                    ));
                    entry.session.available = summary.available;
                    entry.session.unmatched = summary.unmatched;
                }
                ExtractionCompletion::Failed { reason } => {
                    tracing::warn!("Session {}: extraction failed: {}", id, reason);
                    entry.session.available.clear();
                    entry.session.unmatched.clear();
                    entry.mixture.clear();
                    entry.mixture.push_event(LabEvent::warning(
                        "Analysis Failed",
                        "Could not process the uploaded document. Please try a different file.",
                    ));
                }
            }
            entry.touch();

            Ok(ExtractionResponse {
                ticket: current,
                applied: true,
                session: entry.snapshot(),
            })
        })
    }
}
