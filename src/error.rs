use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::error;

// Field name -> validation messages, as the form renders them
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Dados inválidos")]
    Validation(FieldErrors),

    #[error("Limite de tentativas excedido. Tente novamente mais tarde.")]
    RateLimited,

    #[error("Não autenticado")]
    Unauthorized,

    #[error("Erro ao enviar email. Verifique se o endereço está correto.")]
    EmailDelivery(String),

    #[error("Serviço de autenticação indisponível")]
    IdentityProvider(#[from] reqwest::Error),

    #[error("Erro interno do servidor")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a FieldErrors>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::EmailDelivery(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::IdentityProvider(_) => StatusCode::BAD_GATEWAY,
        };

        match &self {
            AppError::EmailDelivery(detail) | AppError::Internal(detail) => {
                error!(%detail, "{}", self)
            }
            AppError::IdentityProvider(e) => error!(error = %e, "Identity lookup failed"),
            _ => {}
        }

        let errors = match &self {
            AppError::Validation(fields) => Some(fields),
            _ => None,
        };
        let body = ErrorBody {
            message: self.to_string(),
            errors,
        };

        (status, Json(body)).into_response()
    }
}
