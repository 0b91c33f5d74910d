mod handlers;

use std::time::Duration;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::LabConfig;
use crate::extract::HttpExtractor;
use crate::store::LabStore;

/// Delays used to sequence the presentation layer's animations.
#[derive(Debug, Clone, Copy)]
pub struct Timing {
    /// Hazard animation length before the quiz is revealed.
    pub hazard_animation: Duration,
    /// How long quiz feedback stays up before the vessel resets.
    pub quiz_feedback: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            hazard_animation: Duration::from_millis(2000),
            quiz_feedback: Duration::from_millis(1500),
        }
    }
}

impl From<&LabConfig> for Timing {
    fn from(config: &LabConfig) -> Self {
        Self {
            hazard_animation: config.hazard_animation(),
            quiz_feedback: config.quiz_feedback(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: LabStore,
    pub extractor: Option<HttpExtractor>,
    pub timing: Timing,
}

impl AppState {
    pub fn new(store: LabStore) -> Self {
        Self {
            store,
            extractor: None,
            timing: Timing::default(),
        }
    }

    pub fn with_extractor(mut self, extractor: Option<HttpExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }
}

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        // Catalog
        .route("/catalog/reagents", get(handlers::list_reagents))
        .route("/catalog/reactions", get(handlers::list_reactions))
        .route("/catalog/lookup", get(handlers::lookup_reagent))
        // Sessions
        .route("/sessions", post(handlers::create_session))
        .route(
            "/sessions/{id}",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        // Vessel
        .route("/sessions/{id}/reagents", post(handlers::add_reagent))
        .route(
            "/sessions/{id}/reagents/{reagent_id}",
            put(handlers::set_quantity).delete(handlers::remove_reagent),
        )
        .route("/sessions/{id}/mix", post(handlers::mix))
        .route("/sessions/{id}/reset", post(handlers::reset))
        // Quiz
        .route("/sessions/{id}/quiz", post(handlers::submit_quiz_answer))
        .route("/sessions/{id}/acknowledge", post(handlers::acknowledge))
        // Events
        .route("/sessions/{id}/events", get(handlers::drain_events))
        // Document extraction
        .route("/sessions/{id}/uploads", post(handlers::begin_upload))
        .route("/sessions/{id}/document", post(handlers::upload_document))
        .route("/sessions/{id}/extraction", post(handlers::apply_extraction))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
