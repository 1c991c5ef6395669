use crate::dispatcher::{HandlerRequest, HeaderVec};
use crate::ids::{RequestId, REQUEST_ID_HEADER};
use crate::router::ParamVec;
use may_minihttp::Request;
use percent_encoding::percent_decode_str;
use std::io::Read;
use std::sync::Arc;
use tracing::{debug, warn};

/// Split a request target into path and query string.
///
/// The query is empty when there is no `?`.
#[must_use]
pub fn split_path_and_query(target: &str) -> (&str, &str) {
    match target.split_once('?') {
        Some((path, query)) => (path, query),
        None => (target, ""),
    }
}

/// Decode a query string (without the leading `?`).
///
/// Repeated names are all kept, in order.
#[must_use]
pub fn parse_query_params(query: &str) -> ParamVec {
    url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (Arc::<str>::from(k.as_ref()), v.into_owned()))
        .collect()
}

/// Percent-decode a request path.
///
/// `%2F` becomes a real `/`, so it splits segments during matching. Invalid
/// escapes are kept verbatim and invalid UTF-8 is replaced.
#[must_use]
pub fn decode_path(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

/// Convert a `may_minihttp` request into a [`HandlerRequest`].
///
/// The path is percent-decoded and header names are lowercased. The body is
/// read last because reading it consumes the request.
pub fn parse_request(req: Request) -> HandlerRequest {
    let method = req.method().to_string();
    let (path, query) = split_path_and_query(req.path());
    let path = if path.is_empty() {
        "/".to_string()
    } else {
        decode_path(path)
    };
    let query_params = parse_query_params(query);

    let headers: HeaderVec = req
        .headers()
        .iter()
        .map(|h| {
            (
                Arc::<str>::from(h.name.to_ascii_lowercase()),
                String::from_utf8_lossy(h.value).into_owned(),
            )
        })
        .collect();

    let request_id = RequestId::from_header_or_new(
        headers
            .iter()
            .find(|(k, _)| k.as_ref() == REQUEST_ID_HEADER)
            .map(|(_, v)| v.as_str()),
    );

    let mut body = Vec::new();
    if let Err(e) = req.body().read_to_end(&mut body) {
        warn!(request_id = %request_id, error = %e, "Failed to read request body");
        body.clear();
    }

    debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        header_count = headers.len(),
        query_count = query_params.len(),
        body_size_bytes = body.len(),
        "HTTP request parsed"
    );

    HandlerRequest {
        request_id,
        method,
        path,
        query_params,
        headers,
        body,
    }
}
