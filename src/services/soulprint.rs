//! A single archetype submission: validate, predict, and (optionally) log.

use serde::Serialize;

use crate::{
    db::SessionLog,
    error::{AppError, AppResult},
    models::{Archetype, BadgeSet, SessionRecord},
    services::{
        engine::ArchetypeEngine,
        recommendations::recommendations_for,
        similarity::{SimilarUser, DEFAULT_TOP_K},
    },
};

/// What the model says about a badge selection
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub archetype: Archetype,
    pub recommendations: Vec<&'static str>,
    pub similar_users: Vec<SimilarUser>,
}

/// Whether the submission made it into the session log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogOutcome {
    pub logged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LogOutcome {
    pub fn skipped() -> Self {
        Self {
            logged: false,
            error: None,
        }
    }
}

/// Rejects submissions that would produce no prediction or an unnamed log row
pub fn validate_submission(
    badges: &BadgeSet,
    name: Option<&str>,
    name_required: bool,
) -> AppResult<()> {
    if badges.is_empty() {
        return Err(AppError::InvalidInput(
            "Please select at least one badge.".to_string(),
        ));
    }

    let has_name = name.is_some_and(|n| !n.trim().is_empty());
    if name_required && !has_name {
        return Err(AppError::InvalidInput("Please enter your name.".to_string()));
    }

    Ok(())
}

pub fn predict(engine: &ArchetypeEngine, badges: &BadgeSet) -> Prediction {
    let archetype = engine.predict(badges);
    Prediction {
        archetype,
        recommendations: recommendations_for(archetype).to_vec(),
        similar_users: engine.similar(badges, DEFAULT_TOP_K),
    }
}

/// Appends the submission to the session log, best effort
///
/// A failed write is reported in the outcome and never turns into an error:
/// the prediction has already been made and is returned regardless.
pub async fn log_submission(log: &dyn SessionLog, record: &SessionRecord) -> LogOutcome {
    match log.append(record).await {
        Ok(()) => {
            tracing::info!(
                backend = log.name(),
                name = %record.name,
                archetype = %record.archetype,
                "Soulprint logged"
            );
            LogOutcome {
                logged: true,
                error: None,
            }
        }
        Err(e) => {
            tracing::error!(
                backend = log.name(),
                error = %e,
                "Failed to log soulprint"
            );
            LogOutcome {
                logged: false,
                error: Some(e.to_string()),
            }
        }
    }
}
