//! Custom Axum extractors.
//!
//! - `JsonPayload`: JSON body whose rejections render as `{"error": ...}`
//!
//! A request without a JSON content type is not parsed at all: its body reads
//! as an empty object, so validation reports the missing fields.
//!
//! # Examples
//!
//! ```ignore
//! use slotbook_web::extractors::JsonPayload;
//!
//! async fn handler(JsonPayload(request): JsonPayload<CreateBookingRequest>) -> impl IntoResponse {
//!     // request is already deserialized
//! }
//! ```

use crate::error::AppError;
use axum::{
    Json, async_trait,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// JSON request body.
///
/// Wraps [`axum::Json`] so that an unreadable body or malformed JSON becomes
/// a 400 [`AppError`] instead of axum's plain-text rejection. Without a JSON
/// content type the body is ignored and `T` is read from `{}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPayload<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonPayload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(JsonRejection::MissingJsonContentType(_)) => {
                tracing::debug!("Body without JSON content type, reading as empty object");
                serde_json::from_value(Value::Object(Map::new()))
                    .map(Self)
                    .map_err(|e| AppError::bad_request(e.to_string()))
            }
            Err(rejection) => {
                tracing::debug!(reason = %rejection.body_text(), "Rejected request body");
                Err(rejection_error(&rejection))
            }
        }
    }
}

fn rejection_error(rejection: &JsonRejection) -> AppError {
    let message = match rejection {
        JsonRejection::JsonSyntaxError(_) => "Request body is not valid JSON".to_string(),
        other => other.body_text(),
    };
    AppError::bad_request(message)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{StatusCode, header};
    use serde::Deserialize;

    async fn extract(content_type: Option<&str>, body: &'static str) -> Result<JsonPayload<Value>, AppError> {
        let mut builder = Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let req = builder.body(Body::from(body)).unwrap();
        JsonPayload::<Value>::from_request(req, &()).await
    }

    #[tokio::test]
    async fn test_valid_json() {
        let JsonPayload(value) = extract(Some("application/json"), r#"{"memberName":"Ada"}"#)
            .await
            .unwrap();
        assert_eq!(value["memberName"], "Ada");
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let err = extract(Some("application/json"), "{not json").await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Request body is not valid JSON");
    }

    #[tokio::test]
    async fn test_missing_content_type_reads_empty_object() {
        let JsonPayload(value) = extract(None, r#"{"memberName":"Ada"}"#).await.unwrap();
        assert_eq!(value, Value::Object(Map::new()));

        let JsonPayload(value) = extract(Some("text/plain"), r#"{"memberName":"Ada"}"#)
            .await
            .unwrap();
        assert_eq!(value, Value::Object(Map::new()));
    }

    #[derive(Debug, Deserialize)]
    struct Strict {
        #[allow(dead_code)]
        name: String,
    }

    #[tokio::test]
    async fn test_missing_content_type_without_defaults_is_bad_request() {
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from("name=Ada"))
            .unwrap();
        let err = JsonPayload::<Strict>::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
