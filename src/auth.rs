use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header::AUTHORIZATION, request::Parts};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

// Signed-in user as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

/// Turns an OAuth access token into the identity it was issued for.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<Identity, AppError>;
}

// OpenID Connect userinfo lookup (Google by default)
pub struct UserInfoProvider {
    client: reqwest::Client,
    userinfo_url: Url,
}

impl UserInfoProvider {
    pub fn new(client: reqwest::Client, userinfo_url: Url) -> Self {
        Self {
            client,
            userinfo_url,
        }
    }
}

#[async_trait]
impl IdentityProvider for UserInfoProvider {
    async fn resolve(&self, token: &str) -> Result<Identity, AppError> {
        let res = self
            .client
            .get(self.userinfo_url.clone())
            .bearer_auth(token)
            .send()
            .await?;

        // provider refused the token
        if matches!(res.status(), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            debug!(status = %res.status(), "Access token rejected");
            return Err(AppError::Unauthorized);
        }

        let identity = res.error_for_status()?.json::<Identity>().await?;
        Ok(identity)
    }
}

// `Authorization: Bearer <token>`, anything else is ignored
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

// Extractor for handlers that need a signed-in user
pub struct AuthUser(pub Identity);

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AppError::Unauthorized)?;
        let identity = state.identity.resolve(token).await?;
        Ok(AuthUser(identity))
    }
}

// Fixed token -> identity table for tests
#[cfg(test)]
pub struct StaticIdentity {
    pub tokens: std::collections::HashMap<String, Identity>,
}

#[cfg(test)]
#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn resolve(&self, token: &str) -> Result<Identity, AppError> {
        self.tokens.get(token).cloned().ok_or(AppError::Unauthorized)
    }
}
