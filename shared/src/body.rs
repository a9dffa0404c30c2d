use serde_json::Value;

use crate::ClientError;

/// Body of an HTTP response, classified the way the page treats it.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Empty,
    Json(Value),
    Text(String),
}

impl ResponseBody {
    pub fn classify(status: u16, content_type: Option<&str>, text: &str) -> Self {
        if status == 204 || status == 205 || text.is_empty() {
            return ResponseBody::Empty;
        }
        let is_json = content_type.is_some_and(|ct| ct.contains("application/json"));
        if is_json {
            match serde_json::from_str(text) {
                Ok(value) => ResponseBody::Json(value),
                Err(e) => {
                    log::warn!("malformed JSON body: {e}");
                    ResponseBody::Text(text.to_string())
                }
            }
        } else {
            // Plain-text bodies sometimes still hold JSON.
            match serde_json::from_str::<Value>(text) {
                Ok(value @ Value::Object(_)) => ResponseBody::Json(value),
                _ => ResponseBody::Text(text.to_string()),
            }
        }
    }

    /// Human-readable text of a successful response.
    pub fn message(&self) -> Option<String> {
        match self {
            ResponseBody::Empty => None,
            ResponseBody::Text(t) => Some(t.trim().to_string()).filter(|t| !t.is_empty()),
            ResponseBody::Json(v) => string_field(v, "message"),
        }
    }

    pub fn into_error(self, status: u16) -> ClientError {
        ClientError::Http {
            status,
            message: error_message(status, &self),
        }
    }
}

/// Picks the most specific error text out of a failed response.
pub fn error_message(status: u16, body: &ResponseBody) -> String {
    let found = match body {
        ResponseBody::Json(v) => v
            .get("validationErrors")
            .and_then(Value::as_array)
            .and_then(|errs| errs.first())
            .and_then(|e| string_field(e, "message"))
            .or_else(|| string_field(v, "detail"))
            .or_else(|| string_field(v, "message")),
        ResponseBody::Text(t) => Some(t.trim().to_string()).filter(|t| !t.is_empty()),
        ResponseBody::Empty => None,
    };
    found.unwrap_or_else(|| format!("HTTP error! status: {status}"))
}

fn string_field(v: &Value, key: &str) -> Option<String> {
    v.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn validation_errors_win_over_detail() {
        let body = ResponseBody::Json(json!({
            "detail": "bad request",
            "validationErrors": [{"field": "loginId", "message": "too short"}]
        }));
        assert_eq!(error_message(400, &body), "too short");
    }

    #[test]
    fn detail_then_message() {
        let body = ResponseBody::Json(json!({"detail": "no chapter", "message": "x"}));
        assert_eq!(error_message(404, &body), "no chapter");
        let body = ResponseBody::Json(json!({"message": "server failed"}));
        assert_eq!(error_message(500, &body), "server failed");
    }

    #[test]
    fn plain_text_body_is_used_verbatim() {
        let body = ResponseBody::classify(409, Some("text/plain;charset=UTF-8"), "already voted");
        assert_eq!(error_message(409, &body), "already voted");
    }

    #[test]
    fn empty_body_falls_back_to_status() {
        let body = ResponseBody::classify(502, None, "");
        assert_eq!(body, ResponseBody::Empty);
        assert_eq!(error_message(502, &body), "HTTP error! status: 502");
    }

    #[test]
    fn no_content_is_empty_even_with_text() {
        assert_eq!(ResponseBody::classify(204, None, "x"), ResponseBody::Empty);
    }

    #[test]
    fn malformed_json_degrades_to_text() {
        let body = ResponseBody::classify(500, Some("application/json"), "{oops");
        assert_eq!(body, ResponseBody::Text("{oops".to_string()));
    }

    #[test]
    fn json_in_text_plain_is_still_read() {
        let body = ResponseBody::classify(200, Some("text/plain"), r#"{"message": "closed"}"#);
        assert_eq!(body.message().as_deref(), Some("closed"));
    }

    #[test]
    fn http_error_displays_server_text() {
        let err = ResponseBody::Text("Internal failure".to_string()).into_error(500);
        assert_eq!(err.to_string(), "Internal failure");
        assert!(matches!(err, ClientError::Http { status: 500, .. }));
        assert!(!err.is_local());
    }
}
