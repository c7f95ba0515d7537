//! HTTP API layer for circles.
//!
//! Every procedure is a `POST /{resource}/{procedure}` taking a camelCase
//! JSON body and answering with a `{"data": ...}` envelope. Errors use the
//! [`AppError`](circles_common::AppError) body.
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware};
