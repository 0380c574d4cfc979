use axum::{Json, extract::State};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::extract::ValidJson;
use crate::metrics::{REQUEST_LATENCY, REQUEST_TOTAL, SURVEY_SUBMISSIONS};
use crate::models::{RecordedSubmission, SubmissionReceipt, SurveySubmission};
use crate::state::AppState;
use crate::telemetry::email_fingerprint;

pub async fn submit_survey_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    ValidJson(submission): ValidJson<SurveySubmission>,
) -> Result<Json<SubmissionReceipt>, AppError> {
    REQUEST_TOTAL.inc();
    let start_time = Instant::now();

    submission.validate()?;

    let id = state.submission_id();
    SURVEY_SUBMISSIONS.inc();

    let respondent = identity
        .email
        .as_deref()
        .map(email_fingerprint)
        .unwrap_or_else(|| identity.sub.clone());
    info!(id, respondent = %respondent, "Survey submitted");

    REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());

    Ok(Json(SubmissionReceipt {
        success: true,
        message: "Avaliação enviada com sucesso",
        data: RecordedSubmission {
            id,
            created_at: Utc::now(),
            submission,
        },
    }))
}
