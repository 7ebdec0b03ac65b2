//! Server Request Wrappers
//!
//! Background (non-navigating) requests to the server, organized by kind.

mod form;
mod fragments;

use gloo_net::http::{Request, Response};
use serde_json::Value;
use thiserror::Error;

pub use form::*;
pub use fragments::*;

/// Marks a request as background so the server answers with JSON
pub const AJAX_HEADER: (&str, &str) = ("X-Requested-With", "XMLHttpRequest");

const GENERIC_FAILURE: &str = "Network error. Please try again.";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP {status}")]
    Status { status: u16, message: Option<String> },
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("request failed")]
    Failed,
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// What the toast says. Only a server-provided message is shown
    /// verbatim; everything else is the generic failure.
    pub fn toast_message(&self) -> String {
        match self {
            ApiError::Rejected(message) | ApiError::Status { message: Some(message), .. } => {
                message.clone()
            }
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

fn message_of(body: &Option<Value>) -> Option<String> {
    body.as_ref()?
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// Check status and the `success` flag of a JSON reply
pub fn check_envelope(ok: bool, status: u16, body: Option<Value>) -> Result<Value, ApiError> {
    if !ok {
        return Err(ApiError::Status { status, message: message_of(&body) });
    }
    let Some(body) = body else {
        return Err(ApiError::Decode("response body is not JSON".to_string()));
    };
    let success = body.get("success").and_then(Value::as_bool) == Some(true);
    if success {
        return Ok(body);
    }
    match message_of(&Some(body)) {
        Some(message) => Err(ApiError::Rejected(message)),
        None => Err(ApiError::Failed),
    }
}

async fn read_json(response: Response) -> (bool, u16, Option<Value>) {
    let ok = response.ok();
    let status = response.status();
    let body = response.json::<Value>().await.ok();
    (ok, status, body)
}

/// POST form fields; the reply must carry `success: true`
pub async fn post_form(path: &str, fields: &[(&'static str, String)]) -> Result<Value, ApiError> {
    let form = web_sys::FormData::new().map_err(|e| ApiError::Network(format!("{:?}", e)))?;
    for (name, value) in fields {
        form.append_with_str(name, value)
            .map_err(|e| ApiError::Network(format!("{:?}", e)))?;
    }

    log::debug!("[FORM] POST {}", path);
    let response = Request::post(path)
        .header(AJAX_HEADER.0, AJAX_HEADER.1)
        .body(form)
        .map_err(|e| ApiError::Network(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    let (ok, status, body) = read_json(response).await;
    check_envelope(ok, status, body)
}

/// GET a JSON document; no `success` envelope is required
pub async fn get_json(path: &str) -> Result<Value, ApiError> {
    let response = Request::get(path)
        .header(AJAX_HEADER.0, AJAX_HEADER.1)
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    let (ok, status, body) = read_json(response).await;
    if !ok {
        return Err(ApiError::Status { status, message: message_of(&body) });
    }
    body.ok_or_else(|| ApiError::Decode("response body is not JSON".to_string()))
}

/// GET a server-rendered HTML fragment
pub async fn get_text(path: &str) -> Result<String, ApiError> {
    let response = Request::get(path)
        .header(AJAX_HEADER.0, AJAX_HEADER.1)
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if !response.ok() {
        return Err(ApiError::Status { status: response.status(), message: None });
    }
    response.text().await.map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_passes_body_through() {
        let body = check_envelope(true, 200, Some(json!({"success": true, "x": 1}))).unwrap();
        assert_eq!(body["x"], 1);
    }

    #[test]
    fn test_rejection_with_message_is_shown() {
        let err = check_envelope(true, 200, Some(json!({"success": false, "message": "Nope"}))).unwrap_err();
        assert_eq!(err, ApiError::Rejected("Nope".into()));
        assert_eq!(err.toast_message(), "Nope");
    }

    #[test]
    fn test_non_2xx_uses_body_message_when_present() {
        let err = check_envelope(false, 403, Some(json!({"success": false, "message": "Permission denied."}))).unwrap_err();
        assert_eq!(err.toast_message(), "Permission denied.");

        let err = check_envelope(false, 500, None).unwrap_err();
        assert_eq!(err, ApiError::Status { status: 500, message: None });
        assert_eq!(err.toast_message(), GENERIC_FAILURE);
    }

    #[test]
    fn test_fragment_failures_get_generic_toast() {
        // Shapes returned by get_text / get_json for background fetches
        assert_eq!(ApiError::Decode("body".into()).toast_message(), GENERIC_FAILURE);
        let err = ApiError::Status { status: 404, message: None };
        assert_eq!(err.toast_message(), GENERIC_FAILURE);
    }

    #[test]
    fn test_missing_success_flag_is_a_failure() {
        assert_eq!(check_envelope(true, 200, Some(json!({}))).unwrap_err(), ApiError::Failed);
        assert_eq!(ApiError::Failed.toast_message(), GENERIC_FAILURE);
        assert_eq!(ApiError::Network("offline".into()).toast_message(), GENERIC_FAILURE);
    }
}
