//! Unifies Telegraph responses into a typed payload or a structured error.

use anyhow::{Context, Result};
use log::debug;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ClientError};

/// Fallback description when an `ok: false` envelope carries no error text.
const GENERIC_FAILURE: &str = "API returned ok: false";

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Outer wrapper every successful Telegraph response carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Error body sent with a non-200 status.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error_code: Option<i64>,
    description: Option<String>,
}

/// Turns a raw response into the caller's payload.
///
/// Returns `Ok(None)` when the envelope reports success but carries no result.
pub fn unify<T: DeserializeOwned>(raw: &RawResponse) -> Result<Option<T>> {
    if raw.status != StatusCode::OK {
        return Err(status_error(raw).into());
    }

    let envelope: Envelope = serde_json::from_slice(&raw.body)
        .context(ClientError::Decode("response envelope"))?;

    if !envelope.ok {
        let description = envelope
            .error
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE.to_string());
        debug!("Telegraph reported failure: {}", description);
        return Err(ApiError::new(0, description).into());
    }

    match envelope.result {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(value) => {
            let payload =
                serde_json::from_value(value).context(ClientError::Decode("result payload"))?;
            Ok(Some(payload))
        }
    }
}

/// Builds the structured error for a non-200 response.
fn status_error(raw: &RawResponse) -> ApiError {
    match serde_json::from_slice::<ErrorEnvelope>(&raw.body) {
        Ok(ErrorEnvelope {
            error_code,
            description,
        }) if error_code.is_some() || description.is_some() => ApiError {
            code: error_code.unwrap_or(0),
            description: description.unwrap_or_default(),
        },
        _ => ApiError::new(i64::from(raw.status.as_u16()), raw.text()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use std::collections::HashMap;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Account {
        short_name: String,
    }

    fn ok(body: &str) -> RawResponse {
        RawResponse::new(StatusCode::OK, body)
    }

    #[test]
    fn test_unify_success() {
        let raw = ok(r#"{"ok": true, "result": {"short_name": "Sandbox"}}"#);
        let account: Option<Account> = unify(&raw).unwrap();
        assert_eq!(
            account,
            Some(Account {
                short_name: "Sandbox".to_string()
            })
        );
    }

    #[test]
    fn test_unify_missing_result_is_empty_success() {
        let raw = ok(r#"{"ok": true}"#);
        let account: Option<Account> = unify(&raw).unwrap();
        assert_eq!(account, None);

        let raw = ok(r#"{"ok": true, "result": null}"#);
        let account: Option<Account> = unify(&raw).unwrap();
        assert_eq!(account, None);
    }

    #[test]
    fn test_unify_ok_false_uses_error_field() {
        let raw = ok(r#"{"ok": false, "error": "SHORT_NAME_REQUIRED"}"#);
        let err = unify::<Account>(&raw).unwrap_err();
        let api = err.downcast_ref::<ApiError>().unwrap();
        assert_eq!(api.code, 0);
        assert_eq!(api.description, "SHORT_NAME_REQUIRED");
    }

    #[test]
    fn test_unify_ok_false_without_error_field() {
        let raw = ok(r#"{"ok": false}"#);
        let err = unify::<Account>(&raw).unwrap_err();
        let api = err.downcast_ref::<ApiError>().unwrap();
        assert_eq!(api.description, GENERIC_FAILURE);
    }

    #[test]
    fn test_unify_non_200_with_error_envelope() {
        let raw = RawResponse::new(
            StatusCode::BAD_REQUEST,
            r#"{"error_code": 400, "description": "Bad Request: PAGE_NOT_FOUND"}"#,
        );
        let err = unify::<Account>(&raw).unwrap_err();
        let api = err.downcast_ref::<ApiError>().unwrap();
        assert_eq!(api.code, 400);
        assert_eq!(api.description, "Bad Request: PAGE_NOT_FOUND");
    }

    #[test]
    fn test_unify_non_200_with_plain_body() {
        let raw = RawResponse::new(StatusCode::NOT_FOUND, "404 page not found");
        let err = unify::<Account>(&raw).unwrap_err();
        let api = err.downcast_ref::<ApiError>().unwrap();
        assert_eq!(api.code, 404);
        assert_eq!(api.description, "404 page not found");
    }

    #[test]
    fn test_unify_non_200_with_unrelated_json() {
        let raw = RawResponse::new(StatusCode::FORBIDDEN, r#"{"message": "nope"}"#);
        let err = unify::<Account>(&raw).unwrap_err();
        let api = err.downcast_ref::<ApiError>().unwrap();
        assert_eq!(api.code, 403);
        assert_eq!(api.description, r#"{"message": "nope"}"#);
    }

    #[test]
    fn test_unify_malformed_envelope_is_decode_error() {
        let raw = ok("<html>gateway</html>");
        let err = unify::<Account>(&raw).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ClientError>(),
            Some(&ClientError::Decode("response envelope"))
        );
    }

    #[test]
    fn test_unify_schema_mismatch_is_decode_error() {
        let raw = ok(r#"{"ok": true, "result": {"short_name": 12}}"#);
        let err = unify::<Account>(&raw).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ClientError>(),
            Some(&ClientError::Decode("result payload"))
        );
        assert!(err.to_string().starts_with("decode:"));
    }

    #[test]
    fn test_node_tree_survives_envelope_round_trip() {
        let tree = vec![
            Node::element_with(
                "p",
                HashMap::new(),
                vec![
                    Node::text("Hello, "),
                    Node::element_with(
                        "a",
                        HashMap::from([("href".to_string(), "https://telegra.ph".to_string())]),
                        vec![Node::text("world")],
                    ),
                ],
            ),
            Node::element("hr"),
            Node::text("  trailing  "),
        ];

        let envelope = Envelope {
            ok: true,
            result: Some(serde_json::to_value(&tree).unwrap()),
            error: None,
        };
        let raw = ok(&serde_json::to_string(&envelope).unwrap());

        let decoded: Option<Vec<Node>> = unify(&raw).unwrap();
        assert_eq!(decoded, Some(tree));
    }
}
