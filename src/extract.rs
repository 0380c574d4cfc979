use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;

use crate::error::{AppError, FieldErrors};

// Prefix axum puts in front of the serde error of a JSON data rejection
const DATA_ERROR_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// `Json<T>` whose rejections come back as the same 400 validation body
/// the handlers produce, keyed by the offending field when there is one.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ValidJson(value)),
            Err(rejection) => Err(AppError::Validation(rejection_errors(&rejection))),
        }
    }
}

fn rejection_errors(rejection: &JsonRejection) -> FieldErrors {
    let (field, message) = match rejection {
        JsonRejection::JsonDataError(e) => (data_error_field(&e.body_text()), "Valor inválido"),
        JsonRejection::JsonSyntaxError(_) => ("body".to_string(), "JSON inválido"),
        JsonRejection::MissingJsonContentType(_) => (
            "body".to_string(),
            "O corpo deve ser enviado como application/json",
        ),
        _ => ("body".to_string(), "Corpo da requisição inválido"),
    };

    let mut errors = FieldErrors::new();
    errors.insert(field, vec![message.to_string()]);
    errors
}

// "termsAccepted: invalid type: ..." -> "termsAccepted"; errors without a
// field path (wrong top-level type) land on "body"
fn data_error_field(body_text: &str) -> String {
    let detail = body_text.strip_prefix(DATA_ERROR_PREFIX).unwrap_or(body_text);
    match detail.split_once(": ") {
        Some((path, _)) if !path.is_empty() && !path.contains(' ') => path.to_string(),
        _ => "body".to_string(),
    }
}
