use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;

use crate::auth::{AuthUser, Identity};
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: Identity,
    pub is_admin: bool,
}

pub async fn session_handler(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
) -> Json<SessionResponse> {
    let is_admin = state.is_admin(&identity);
    Json(SessionResponse {
        user: identity,
        is_admin,
    })
}
