//! HTTP transport on top of `may_minihttp`.

mod http_server;
mod request;
mod response;
mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{decode_path, parse_query_params, parse_request, split_path_and_query};
pub use response::write_handler_response;
pub use service::AppService;
