//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::error::port_error_response;
use crate::web::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use mood_journal_core::coping::suggestions_for;
use mood_journal_core::history::DEFAULT_HISTORY_LIMIT;
use mood_journal_core::ports::PortError;
use mood_journal_core::{JournalEntryInput, MoodObservation, MoodObservationInput};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};
use utoipa::{IntoParams, OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        log_mood_handler,
        mood_stats_handler,
        mood_history_handler,
        save_journal_entry_handler,
        health_handler,
    ),
    components(
        schemas(
            LogMoodRequest,
            LogMoodResponse,
            MoodCountResponse,
            MoodStatsResponse,
            MoodHistoryEntry,
            MoodHistoryResponse,
            SaveJournalEntryRequest,
            JournalEntryResponse,
            HealthResponse,
        )
    ),
    tags(
        (name = "Mood Journal API", description = "Mood logging, journaling and mood insights.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// Missing string fields deserialize as empty and are rejected as invalid input.
#[derive(Deserialize, ToSchema)]
pub struct LogMoodRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub mood: String,
    /// Defaults to the time the request is handled.
    pub timestamp: Option<DateTime<Utc>>,
}

/// Returned after a mood is logged, together with the fixed coping suggestions for it.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct LogMoodResponse {
    pub id: String,
    pub mood: String,
    pub coping_suggestions: Vec<String>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct MoodCountResponse {
    pub mood: String,
    pub count: u64,
}

/// Per-mood counts ordered by count descending, then mood label ascending.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct MoodStatsResponse {
    pub user_id: String,
    pub total: u64,
    pub moods: Vec<MoodCountResponse>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct MoodHistoryEntry {
    pub id: String,
    pub mood: String,
    pub timestamp: DateTime<Utc>,
}

impl From<MoodObservation> for MoodHistoryEntry {
    fn from(obs: MoodObservation) -> Self {
        Self {
            id: obs.id.0,
            mood: obs.mood,
            timestamp: obs.timestamp,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct MoodHistoryResponse {
    pub history: Vec<MoodHistoryEntry>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryParams {
    /// Maximum number of entries to return (1-100, default 10).
    pub limit: Option<usize>,
}

#[derive(Deserialize, ToSchema)]
pub struct SaveJournalEntryRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub text: String,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct JournalEntryResponse {
    pub id: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

/// Logs the failure at a level matching its cause and builds the client response.
fn reject(context: &str, e: PortError) -> (StatusCode, String) {
    let response = port_error_response(&e);
    if response.0.is_server_error() {
        error!("{}: {:?}", context, e);
    } else {
        warn!("{}: {}", context, e);
    }
    response
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Log a mood for a user.
///
/// Persists one mood observation and returns its id along with coping
/// suggestions for the mood. Retrying after a 503 or 504 is safe from the
/// client's perspective but may log the mood twice if the first write landed.
#[utoipa::path(
    post,
    path = "/moods",
    request_body = LogMoodRequest,
    responses(
        (status = 201, description = "Mood logged", body = LogMoodResponse),
        (status = 400, description = "Empty user_id or mood"),
        (status = 503, description = "Document store unavailable"),
        (status = 504, description = "Request timed out")
    )
)]
pub async fn log_mood_handler(
    State(app_state): State<Arc<AppState>>,
    Json(req): Json<LogMoodRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let cancel = app_state.request_token();
    let input = MoodObservationInput {
        user_id: req.user_id,
        mood: req.mood.clone(),
        timestamp: req.timestamp,
    };

    let id = app_state
        .bounded(app_state.mood_writer.append(input, &cancel))
        .await
        .map_err(|e| reject("Failed to log mood", e))?;

    let response = LogMoodResponse {
        id: id.0,
        coping_suggestions: suggestions_for(&req.mood)
            .iter()
            .map(|s| s.to_string())
            .collect(),
        mood: req.mood,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Get a user's mood statistics.
#[utoipa::path(
    get,
    path = "/users/{user_id}/mood-stats",
    params(
        ("user_id" = String, Path, description = "The user whose observations are counted.")
    ),
    responses(
        (status = 200, description = "Ordered per-mood counts", body = MoodStatsResponse),
        (status = 503, description = "Document store unavailable"),
        (status = 504, description = "Request timed out")
    )
)]
pub async fn mood_stats_handler(
    State(app_state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<MoodStatsResponse>, (StatusCode, String)> {
    let cancel = app_state.request_token();
    let report = app_state
        .bounded(app_state.mood_stats.compute(&user_id, &cancel))
        .await
        .map_err(|e| reject("Failed to compute mood stats", e))?;

    Ok(Json(MoodStatsResponse {
        total: report.total(),
        moods: report
            .entries
            .into_iter()
            .map(|e| MoodCountResponse {
                mood: e.mood,
                count: e.count,
            })
            .collect(),
        user_id,
    }))
}

/// Get a user's most recent mood observations, newest first.
#[utoipa::path(
    get,
    path = "/users/{user_id}/mood-history",
    params(
        ("user_id" = String, Path, description = "The user whose history is listed."),
        HistoryParams
    ),
    responses(
        (status = 200, description = "Recent observations", body = MoodHistoryResponse),
        (status = 400, description = "Invalid limit"),
        (status = 503, description = "Document store unavailable")
    )
)]
pub async fn mood_history_handler(
    State(app_state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<MoodHistoryResponse>, (StatusCode, String)> {
    let cancel = app_state.request_token();
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let history = app_state
        .bounded(app_state.mood_history.recent(&user_id, limit, &cancel))
        .await
        .map_err(|e| reject("Failed to read mood history", e))?;

    Ok(Json(MoodHistoryResponse {
        history: history.into_iter().map(MoodHistoryEntry::from).collect(),
    }))
}

/// Save a journal entry.
#[utoipa::path(
    post,
    path = "/journal-entries",
    request_body = SaveJournalEntryRequest,
    responses(
        (status = 201, description = "Entry saved", body = JournalEntryResponse),
        (status = 400, description = "Empty user_id or text"),
        (status = 503, description = "Document store unavailable")
    )
)]
pub async fn save_journal_entry_handler(
    State(app_state): State<Arc<AppState>>,
    Json(req): Json<SaveJournalEntryRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let cancel = app_state.request_token();
    let input = JournalEntryInput {
        user_id: req.user_id,
        text: req.text,
        timestamp: req.timestamp,
    };

    let id = app_state
        .bounded(app_state.journal.save(input, &cancel))
        .await
        .map_err(|e| reject("Failed to save journal entry", e))?;

    Ok((StatusCode::CREATED, Json(JournalEntryResponse { id: id.0 })))
}

/// Liveness check.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
    })
}
