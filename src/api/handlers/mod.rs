use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::AppState;
use crate::extract::ExtractionError;
use crate::lab::{AddResult, LabError};
use crate::models::*;

type ApiResult<T> = Result<T, (StatusCode, String)>;

// ============================================================
// Error Handling
// ============================================================

/// Map a lab error to a status code. Every variant is a client-visible
/// condition, so the message is returned as-is.
fn lab_error(e: LabError) -> (StatusCode, String) {
    let status = match &e {
        LabError::SessionNotFound(_) | LabError::UnknownReagent(_) | LabError::NotStaged(_) => {
            StatusCode::NOT_FOUND
        }
        LabError::QuizInProgress | LabError::NoQuizPending | LabError::NothingToAcknowledge => {
            StatusCode::CONFLICT
        }
        LabError::ExtractionUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        LabError::Extraction(ExtractionError::InvalidDocument(_)) => StatusCode::BAD_REQUEST,
        LabError::Extraction(_) => StatusCode::BAD_GATEWAY,
    };

    if status.is_server_error() {
        tracing::error!("{}", e);
    } else {
        tracing::warn!("Rejected request: {}", e);
    }
    (status, e.to_string())
}

// ============================================================
// Timed sequencing
// ============================================================

/// Reveal the quiz once the hazard animation is over, unless the session moved on.
fn schedule_quiz_reveal(state: &AppState, id: Uuid, generation: u64) {
    let store = state.store.clone();
    let delay = state.timing.hazard_animation;
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        match store.reveal_quiz(id, generation) {
            Ok(Some(_)) => tracing::debug!("Session {}: quiz revealed", id),
            Ok(None) => tracing::debug!("Session {}: stale quiz reveal suppressed", id),
            Err(e) => tracing::debug!("Session {}: quiz reveal skipped: {}", id, e),
        }
    });
}

/// Reset the vessel after the quiz feedback has been shown.
fn schedule_acknowledge(state: &AppState, id: Uuid, generation: u64) {
    let store = state.store.clone();
    let delay = state.timing.quiz_feedback;
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        match store.acknowledge_if_current(id, generation) {
            Ok(true) => tracing::debug!("Session {}: quiz acknowledged", id),
            Ok(false) => tracing::debug!("Session {}: stale acknowledgement suppressed", id),
            Err(e) => tracing::debug!("Session {}: acknowledgement skipped: {}", id, e),
        }
    });
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Catalog
// ============================================================

pub async fn list_reagents(State(state): State<AppState>) -> Json<Vec<Reagent>> {
    Json(state.store.catalog().reagents().to_vec())
}

pub async fn list_reactions(State(state): State<AppState>) -> Json<Vec<ReactionRule>> {
    Json(state.store.catalog().rules().to_vec())
}

/// Query parameters for reagent lookup.
#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    /// Reagent id, name or formula.
    pub q: String,
}

pub async fn lookup_reagent(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> ApiResult<Json<Reagent>> {
    state
        .store
        .catalog()
        .lookup(&query.q)
        .cloned()
        .map(Json)
        .ok_or((
            StatusCode::NOT_FOUND,
            format!("Unknown reagent: {}", query.q),
        ))
}

// ============================================================
// Sessions
// ============================================================

pub async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionSnapshot>) {
    (StatusCode::CREATED, Json(state.store.create_session()))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SessionSnapshot>> {
    state.store.get_session(id).map(Json).map_err(lab_error)
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if state.store.delete_session(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(lab_error(LabError::SessionNotFound(id)))
    }
}

// ============================================================
// Vessel
// ============================================================

pub async fn add_reagent(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<AddReagentInput>,
) -> ApiResult<(StatusCode, Json<AddReagentResponse>)> {
    let (result, session) = state.store.add_reagent(id, &input.id).map_err(lab_error)?;
    let added = result == AddResult::Added;
    let status = if added {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(AddReagentResponse { added, session })))
}

pub async fn remove_reagent(
    State(state): State<AppState>,
    Path((id, reagent_id)): Path<(Uuid, String)>,
) -> ApiResult<Json<SessionSnapshot>> {
    state
        .store
        .remove_reagent(id, &reagent_id)
        .map(Json)
        .map_err(lab_error)
}

pub async fn set_quantity(
    State(state): State<AppState>,
    Path((id, reagent_id)): Path<(Uuid, String)>,
    Json(input): Json<SetQuantityInput>,
) -> ApiResult<Json<SessionSnapshot>> {
    state
        .store
        .set_quantity(id, &reagent_id, input.quantity)
        .map(Json)
        .map_err(lab_error)
}

pub async fn mix(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MixResponse>> {
    let (outcome, generation, session) = state.store.mix(id).map_err(lab_error)?;

    if outcome.quiz().is_some() {
        schedule_quiz_reveal(&state, id, generation);
    }

    Ok(Json(MixResponse {
        outcome: outcome.summary(),
        session,
    }))
}

pub async fn reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SessionSnapshot>> {
    state.store.reset(id).map(Json).map_err(lab_error)
}

// ============================================================
// Quiz
// ============================================================

pub async fn submit_quiz_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<QuizAnswerInput>,
) -> ApiResult<Json<QuizAnswerResponse>> {
    let (verdict, generation, session) = state
        .store
        .submit_quiz_answer(id, &input.answer)
        .map_err(lab_error)?;

    schedule_acknowledge(&state, id, generation);

    Ok(Json(QuizAnswerResponse { verdict, session }))
}

pub async fn acknowledge(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SessionSnapshot>> {
    state.store.acknowledge(id).map(Json).map_err(lab_error)
}

// ============================================================
// Events
// ============================================================

pub async fn drain_events(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<LabEvent>>> {
    state.store.drain_events(id).map(Json).map_err(lab_error)
}

// ============================================================
// Document extraction
// ============================================================

/// Start an upload whose analysis is performed by the caller.
pub async fn begin_upload(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<(StatusCode, Json<ExtractionResponse>)> {
    let (ticket, session) = state.store.begin_extraction(id).map_err(lab_error)?;
    Ok((
        StatusCode::ACCEPTED,
        Json(ExtractionResponse {
            ticket,
            applied: false,
            session,
        }),
    ))
}

/// Upload a document and analyze it with the configured extractor.
///
/// The session lock is not held while the extractor runs, so a newer upload
/// can start in the meantime; this request's result is then discarded.
pub async fn upload_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<DocumentInput>,
) -> ApiResult<Json<ExtractionResponse>> {
    let extractor = state
        .extractor
        .clone()
        .ok_or_else(|| lab_error(LabError::ExtractionUnavailable))?;
    crate::extract::validate_data_uri(&input.file_data_uri)
        .map_err(|e| lab_error(LabError::from(e)))?;

    let (ticket, _) = state.store.begin_extraction(id).map_err(lab_error)?;

    let completion = match extractor.analyze(&input.file_data_uri).await {
        Ok(chemicals) => ExtractionCompletion::Complete { chemicals },
        Err(e) => {
            tracing::error!("Session {}: document analysis failed: {}", id, e);
            ExtractionCompletion::Failed {
                reason: e.to_string(),
            }
        }
    };

    state
        .store
        .complete_extraction(id, ticket, completion)
        .map(Json)
        .map_err(lab_error)
}

/// Apply an extraction result produced outside this service.
pub async fn apply_extraction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ApplyExtractionInput>,
) -> ApiResult<Json<ExtractionResponse>> {
    state
        .store
        .complete_extraction(id, input.ticket, input.completion)
        .map(Json)
        .map_err(lab_error)
}
