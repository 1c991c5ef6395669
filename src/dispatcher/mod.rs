//! # Dispatcher Module
//!
//! The dispatcher module defines what a handler is and how the transport
//! invokes one once the [`router`](crate::router) has resolved a request.
//!
//! ## Overview
//!
//! - [`Handler`] is the capability interface applications implement.
//!   Plain functions `fn(&mut Context<'_>) -> anyhow::Result<()>` qualify.
//! - [`HandlerRegistry`] holds handlers by name until routes are built.
//! - [`Context`] carries one invocation's inputs: the parsed
//!   [`HandlerRequest`], the [`HandlerResponse`] sink, the owning
//!   [`Router`](crate::router::Router), the match result and the
//!   application [`Attributes`](crate::attributes::Attributes).
//! - [`dispatch`] runs a handler with panic recovery.
//!
//! ## Request Flow
//!
//! 1. The transport resolves `(method, path)` to a `RouteMatch`
//! 2. It builds a `HandlerRequest` from the wire request
//! 3. [`dispatch`] creates the `Context` and calls the handler
//! 4. The filled-in `HandlerResponse` is written back to the client
//!
//! ## Error Handling
//!
//! - A handler returning `Err` produces a `500` response
//! - A handler panic is caught, logged at error level and produces a `500` response
//!
//! Handlers run on the coroutine serving the connection; there is no
//! per-handler queue.

mod core;

pub use core::{
    dispatch, Context, Handler, HandlerRegistry, HandlerRequest, HandlerResponse, HeaderVec,
    MAX_INLINE_HEADERS,
};
