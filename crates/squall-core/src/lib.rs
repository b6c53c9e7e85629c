//! squall-core: Trie-based HTTP request router
//!
//! Maps an incoming request's method and path to a single registered
//! handler. Patterns combine static segments, named parameters (`:id`) and
//! catch-alls (`*filepath`), registered on prefix groups with per-method
//! trees plus an `ANY` pseudo-method that is consulted first. Matching
//! itself lives in the `squall-router` crate; this crate adds the
//! group/dispatch layer, the per-request [`Context`], and the hyper/tokio
//! serving boundary.
//!
//! ```no_run
//! use squall_core::{Engine, Response};
//!
//! # async fn example() -> squall_core::Result<()> {
//! let mut engine = Engine::new();
//! engine.group("/api").get("/users/:id", |ctx| async move {
//!     Response::text(format!("user {}", ctx.param("id")))
//! })?;
//! engine.run(":8081").await
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod context;
pub mod engine;
pub mod error;
pub mod group;
pub mod request;
pub mod response;
pub mod server;

// Re-exports
pub use context::Context;
pub use engine::Engine;
pub use error::{Error, Result};
pub use group::{Handler, RouteGroup, ANY};
pub use request::{Method, Request, RequestBuilder};
pub use response::{Response, ResponseBuilder, StatusCode};
pub use server::{from_hyper_request, to_hyper_response, ServerConfig};
