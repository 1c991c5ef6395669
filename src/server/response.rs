use crate::dispatcher::HandlerResponse;
use may_minihttp::Response;
use serde_json::Value;

/// Canonical reason phrase for `status`.
pub(crate) fn status_reason(status: u16) -> &'static str {
    http::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown")
}

/// Write a handler's response.
///
/// A string body goes out as `text/plain`, `null` as an empty body and
/// anything else as JSON.
pub fn write_handler_response(res: &mut Response, response: &HandlerResponse) {
    res.status_code(usize::from(response.status), status_reason(response.status));
    match &response.body {
        Value::Null => {}
        Value::String(s) => {
            res.header("Content-Type: text/plain; charset=utf-8");
            res.body_vec(s.clone().into_bytes());
        }
        other => {
            res.header("Content-Type: application/json");
            res.body_vec(serde_json::to_vec(other).unwrap_or_default());
        }
    }
}
