//! Request dispatch across an ordered collection of route groups

use crate::group::ANY;
use crate::{Context, Request, Response, RouteGroup};
use squall_router::{extract_params, segment_path};

/// The router engine.
///
/// Groups are consulted in registration order; within a group the ANY tree
/// is tried before the request method's tree, and the first resolved
/// handler wins. Registration happens strictly before serving: once the
/// engine is handed to [`Engine::run`](crate::server) it is moved behind an
/// `Arc` and never mutated again, so concurrent dispatch reads need no
/// locking.
#[derive(Default)]
pub struct Engine {
    groups: Vec<RouteGroup>,
}

impl Engine {
    /// Create an engine with no routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a group of routes under `prefix` and return it for registration.
    pub fn group(&mut self, prefix: impl Into<String>) -> &mut RouteGroup {
        let idx = self.groups.len();
        self.groups.push(RouteGroup::new(prefix.into()));
        &mut self.groups[idx]
    }

    /// Route one request to its handler and produce the response.
    ///
    /// Falls through to 405 when the path is registered under a different
    /// method only, 404 when nothing covers it.
    pub async fn dispatch(&self, request: Request) -> Response {
        let method = request.method.as_str();
        let segments = segment_path(&request.path);

        for group in &self.groups {
            let hit = group
                .match_route(ANY, &segments)
                .or_else(|| group.match_route(method, &segments));
            if let Some((pattern, handler)) = hit {
                tracing::debug!(method, path = %request.path, pattern, "route matched");
                let params = extract_params(pattern, &segments);
                let handler = handler.clone();
                let ctx = Context::new(request, params);
                return handler(ctx).await;
            }
        }

        if self
            .groups
            .iter()
            .any(|g| g.allows_other_method(method, &segments))
        {
            tracing::debug!(method, path = %request.path, "method not allowed");
            return Response::method_not_allowed();
        }

        tracing::debug!(method, path = %request.path, "no route matched");
        Response::not_found()
    }
}
