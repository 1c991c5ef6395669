use super::request::parse_request;
use super::response::write_handler_response;
use crate::attributes::Attributes;
use crate::dispatcher::{dispatch, HandlerRequest, HandlerResponse};
use crate::router::SharedRouter;
use may_minihttp::{HttpService, Request, Response};
use serde_json::json;
use std::io;
use std::sync::{Arc, PoisonError};
use tracing::warn;

/// The `may_minihttp` service: resolve, dispatch, write.
///
/// The router sits behind a lock so it can be replaced while serving
/// (see [`crate::hot_reload`]). The lock is held only to take a snapshot of
/// the current router; resolution and dispatch run on that snapshot.
#[derive(Clone)]
pub struct AppService {
    pub router: SharedRouter,
    pub attributes: Arc<Attributes>,
}

impl AppService {
    #[must_use]
    pub fn new(router: SharedRouter, attributes: Arc<Attributes>) -> Self {
        Self { router, attributes }
    }

    /// Produce the response for one request.
    ///
    /// Routing failures become JSON error bodies with the status from
    /// [`RouteError::status`](crate::router::RouteError::status).
    #[must_use]
    pub fn handle(&self, request: &HandlerRequest) -> HandlerResponse {
        let router = {
            let guard = self.router.read().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(&*guard)
        };
        match router.resolve_match(&request.method, &request.path) {
            Ok(matched) => dispatch(&matched, request, &router, &self.attributes),
            Err(e) => {
                warn!(
                    request_id = %request.request_id,
                    method = %request.method,
                    path = %request.path,
                    status = e.status(),
                    error = %e,
                    "Request not routed"
                );
                HandlerResponse::new(
                    e.status(),
                    json!({
                        "error": e.to_string(),
                        "method": request.method,
                        "path": request.path,
                    }),
                )
            }
        }
    }
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let request = parse_request(req);
        let response = self.handle(&request);
        write_handler_response(res, &response);
        Ok(())
    }
}
