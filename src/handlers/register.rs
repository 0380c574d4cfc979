use axum::{Json, extract::State};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::error::AppError;
use crate::extract::ValidJson;
use crate::mailer::Invitation;
use crate::metrics::{
    INVITATION_FAILURES, RATE_LIMIT_TRACKED, REGISTRATIONS, REGISTRATIONS_LIMITED,
    REQUEST_LATENCY, REQUEST_TOTAL,
};
use crate::models::{MessageResponse, RegisterEmailRequest};
use crate::state::AppState;
use crate::telemetry::email_fingerprint;

pub async fn register_email_handler(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<RegisterEmailRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    REQUEST_TOTAL.inc();
    let start_time = Instant::now();

    let email = payload.validate()?;
    let tag = email_fingerprint(&email);

    // one quota per mailbox, whatever the casing
    let admitted = state.rate_limiter.check_and_record(&email.to_lowercase());
    RATE_LIMIT_TRACKED.set(state.rate_limiter.tracked() as f64);

    if !admitted {
        REGISTRATIONS_LIMITED.inc();
        warn!(email = %tag, "Registration rate limited");
        return Err(AppError::RateLimited);
    }
    REGISTRATIONS.inc();

    let invitation = Invitation::new(&state.base_url, &email);
    if let Err(e) = state.mailer.send(&invitation).await {
        INVITATION_FAILURES.inc();
        return Err(e);
    }

    REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());
    info!(email = %tag, "Invitation dispatched");

    Ok(Json(MessageResponse {
        message: "Email enviado com sucesso!",
    }))
}
