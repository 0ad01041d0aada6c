//! HTTP response handling.

use crate::{Envelope, FetchError};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// An HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    /// The HTTP status code.
    pub status: u16,
    /// The response headers.
    pub headers: HashMap<String, String>,
    /// The response body.
    pub body: Vec<u8>,
}

impl Response {
    /// Create a new response.
    pub fn new(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Check if the response was successful (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get the response body as text.
    pub fn text(&self) -> Result<String, FetchError> {
        String::from_utf8(self.body.clone())
            .map_err(|e| FetchError::ParseError(format!("Invalid UTF-8: {}", e)))
    }

    /// Parse the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_slice(&self.body).map_err(|e| FetchError::ParseError(e.to_string()))
    }

    /// Decode the `{code, message, data}` envelope.
    ///
    /// Error responses whose body is not an envelope are reported as
    /// [`FetchError::HttpError`] so the HTTP status still reaches the caller.
    pub fn envelope(&self) -> Result<Envelope, FetchError> {
        match serde_json::from_slice::<Envelope>(&self.body) {
            Ok(envelope) => Ok(envelope),
            Err(e) if self.is_success() => Err(FetchError::ParseError(e.to_string())),
            Err(_) => Err(FetchError::HttpError {
                status: self.status,
                message: self.text().unwrap_or_else(|_| "Unknown error".to_string()),
            }),
        }
    }

    /// Decode the envelope, check its code and decode `data` as `T`.
    pub fn data<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        self.envelope()?.into_data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_response(status: u16, body: &[u8]) -> Response {
        Response::new(status, HashMap::new(), body.to_vec())
    }

    // === Status Check Tests ===

    #[test]
    fn test_response_is_success() {
        assert!(make_response(200, b"").is_success());
        assert!(make_response(299, b"").is_success());
        assert!(!make_response(199, b"").is_success());
        assert!(!make_response(401, b"").is_success());
    }

    // === Body Tests ===

    #[test]
    fn test_response_text_invalid_utf8() {
        let resp = make_response(200, &[0xff, 0xfe]);
        assert!(resp.text().is_err());
    }

    #[test]
    fn test_response_json() {
        use serde::Deserialize;

        #[derive(Deserialize, Debug, PartialEq)]
        struct Data {
            value: i32,
        }

        let resp = make_response(200, br#"{"value": 42}"#);
        let data: Data = resp.json().unwrap();
        assert_eq!(data, Data { value: 42 });
    }

    // === Envelope Tests ===

    #[test]
    fn test_response_data() {
        let resp = make_response(200, br#"{"code": "200", "message": "Success", "data": {"id": "A1"}}"#);
        let data: serde_json::Value = resp.data().unwrap();
        assert_eq!(data["id"], "A1");
    }

    #[test]
    fn test_envelope_code_wins_over_http_status() {
        let resp = make_response(200, br#"{"code": 404, "message": "Cart not found"}"#);
        let err = resp.data::<serde_json::Value>().unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_error_status_without_envelope() {
        let resp = make_response(401, b"Unauthorized");
        let err = resp.envelope().unwrap_err();
        assert_eq!(
            err,
            FetchError::HttpError {
                status: 401,
                message: "Unauthorized".to_string()
            }
        );
    }

    #[test]
    fn test_success_status_with_garbage_body() {
        let resp = make_response(200, b"<html>");
        assert!(matches!(resp.envelope(), Err(FetchError::ParseError(_))));
    }
}
