//! JSON envelopes wrapping every HTTP response body.
//!
//! Success: `{"status": "success", "message": ..., "data": ...}`.
//! Failure: `{"status": ..., "message": ..., "statusCode": ..., "errors": [...]}`
//! with `errors` present only for field-level failures.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::FieldError;

const SUCCESS: &str = "success";

/// Body of every 2xx response.
#[derive(Debug, Serialize)]
pub struct SuccessEnvelope<T> {
    status: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl<T: Serialize> SuccessEnvelope<T> {
    pub fn new(message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            status: SUCCESS,
            message: message.into(),
            data,
        }
    }
}

/// Render `data` inside a success envelope with the given status.
pub fn success<T: Serialize>(status: StatusCode, message: &str, data: T) -> HttpResponse {
    HttpResponse::build(status).json(SuccessEnvelope::new(message, Some(data)))
}

/// Success envelope carrying only a message.
pub fn success_message(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(SuccessEnvelope::<()>::new(message, None))
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FailureEnvelope {
    #[schema(example = "Bad request")]
    pub status: String,
    #[schema(example = "Authentication failed")]
    pub message: String,
    #[schema(example = 401)]
    pub status_code: u16,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

/// Short label used in the failure envelope's `status` field.
pub fn status_label(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::UNPROCESSABLE_ENTITY => {
            "Bad request"
        }
        StatusCode::FORBIDDEN => "Forbidden",
        StatusCode::NOT_FOUND => "Not found",
        StatusCode::METHOD_NOT_ALLOWED => "Method not allowed",
        StatusCode::SERVICE_UNAVAILABLE => "Service unavailable",
        _ => "Internal server error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case(StatusCode::UNPROCESSABLE_ENTITY, "Bad request")]
    #[case(StatusCode::UNAUTHORIZED, "Bad request")]
    #[case(StatusCode::FORBIDDEN, "Forbidden")]
    #[case(StatusCode::NOT_FOUND, "Not found")]
    #[case(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")]
    #[case(StatusCode::SERVICE_UNAVAILABLE, "Service unavailable")]
    #[case(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")]
    fn labels_follow_status(#[case] status: StatusCode, #[case] expected: &str) {
        assert_eq!(status_label(status), expected);
    }

    #[rstest]
    fn message_only_success_omits_data() {
        let body = serde_json::to_value(SuccessEnvelope::<()>::new("done", None)).expect("json");
        assert_eq!(body, json!({"status": "success", "message": "done"}));
    }

    #[rstest]
    fn failure_omits_empty_errors() {
        let body = serde_json::to_value(FailureEnvelope {
            status: "Not found".to_owned(),
            message: "User not found".to_owned(),
            status_code: 404,
            errors: Vec::new(),
            trace_id: None,
        })
        .expect("json");
        assert_eq!(body.get("errors"), None);
        assert_eq!(body.get("statusCode"), Some(&Value::from(404)));
    }
}
