use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{Archetype, Badge, BadgeSet, SessionContext, SessionRecord},
    services::{
        recommendations::{recommendations_for, recommendations_for_label},
        soulprint::{self, LogOutcome, Prediction},
        ArchetypeEngine, ModelReport,
    },
};

use super::{run_blocking, AppState};

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct ArchetypeRequest {
    /// An omitted selection counts as no badges
    #[serde(default)]
    pub badges: Vec<String>,
    /// Traveler name for the session log
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ArchetypeResponse {
    #[serde(flatten)]
    pub prediction: Prediction,
    pub session_log: LogOutcome,
}

#[derive(Debug, Serialize)]
pub struct ArchetypeSummary {
    pub archetype: Archetype,
    pub destinations: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub archetype: String,
    pub destinations: &'static [&'static str],
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// The badge vocabulary, in encoder order
pub async fn list_badges() -> Json<&'static [Badge]> {
    Json(Badge::ALL)
}

/// Every archetype with its destinations
pub async fn list_archetypes() -> Json<Vec<ArchetypeSummary>> {
    let summaries = Archetype::ALL
        .iter()
        .map(|&archetype| ArchetypeSummary {
            archetype,
            destinations: recommendations_for(archetype),
        })
        .collect();
    Json(summaries)
}

/// Destinations for one archetype label; unknown labels get an empty list
pub async fn get_recommendations(Path(label): Path<String>) -> Json<RecommendationsResponse> {
    let destinations = recommendations_for_label(&label);
    Json(RecommendationsResponse {
        archetype: label,
        destinations,
    })
}

/// Summary of the model currently serving predictions
pub async fn model_info(State(state): State<AppState>) -> Json<ModelReport> {
    let engine = state.engine.read().await;
    Json(engine.report().clone())
}

/// Regenerates the synthetic users and fits a new model
pub async fn retrain_model(
    State(state): State<AppState>,
    request_id: RequestId,
) -> AppResult<Json<ModelReport>> {
    tracing::info!(request_id = %request_id, "Retraining archetype model");

    let settings = state.engine_settings.clone();
    let engine = run_blocking(move || ArchetypeEngine::train(&settings)).await?;
    let report = engine.report().clone();

    *state.engine.write().await = engine;

    Ok(Json(report))
}

/// Predicts an archetype for a badge selection
///
/// When a session log is configured the submission is also recorded. A
/// failed write is reported in `session_log` but the prediction is still
/// returned.
pub async fn find_archetype(
    State(state): State<AppState>,
    request_id: RequestId,
    session: Option<SessionContext>,
    payload: Result<Json<ArchetypeRequest>, JsonRejection>,
) -> AppResult<Json<ArchetypeResponse>> {
    let Json(request) = payload?;
    if state.require_login && session.is_none() {
        return Err(AppError::Unauthorized("Please log in first.".to_string()));
    }

    let badges = BadgeSet::parse(&request.badges)
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;

    let name = request
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .or_else(|| session.as_ref().map(|s| s.username.clone()));

    soulprint::validate_submission(&badges, name.as_deref(), state.session_log.is_some())?;

    tracing::info!(
        request_id = %request_id,
        badge_count = badges.len(),
        "Processing archetype request"
    );

    let prediction = {
        let engine = state.engine.read().await;
        soulprint::predict(&engine, &badges)
    };

    let session_log = match (&state.session_log, name) {
        (Some(log), Some(name)) => {
            let record = SessionRecord::new(name, &badges, prediction.archetype);
            soulprint::log_submission(log.as_ref(), &record).await
        }
        _ => LogOutcome::skipped(),
    };

    tracing::info!(
        request_id = %request_id,
        archetype = %prediction.archetype,
        logged = session_log.logged,
        "Archetype assigned"
    );

    Ok(Json(ArchetypeResponse {
        prediction,
        session_log,
    }))
}
