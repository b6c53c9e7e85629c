//! Route groups: prefix-scoped registration onto per-method trees

use crate::{Context, Error, Method, Response, Result};
use squall_router::RouteTree;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Pseudo-method matched before any concrete HTTP method.
pub const ANY: &str = "ANY";

/// Async route handler: consumes the request context, returns the response.
pub type Handler = Arc<
    dyn Fn(Context) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync,
>;

fn route_key(method: &str, pattern: &str) -> String {
    format!("{method}-{pattern}")
}

fn boxed<H, Fut>(handler: H) -> Handler
where
    H: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    Arc::new(move |ctx| Box::pin(handler(ctx)))
}

/// A set of routes sharing a path prefix.
///
/// The group owns one [`RouteTree`] per HTTP method seen (plus one for
/// [`ANY`]), created lazily, and a `"METHOD-pattern"` handler table. The
/// composed pattern is the prefix concatenated with the sub-pattern; no
/// slash normalization is applied.
pub struct RouteGroup {
    prefix: String,
    trees: HashMap<String, RouteTree>,
    handlers: HashMap<String, Handler>,
}

impl RouteGroup {
    pub(crate) fn new(prefix: String) -> Self {
        Self {
            prefix,
            trees: HashMap::new(),
            handlers: HashMap::new(),
        }
    }

    /// The group's path prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Register a handler for `method` (or [`ANY`]) under `prefix + pattern`.
    ///
    /// Registering the same method and composed pattern twice is a
    /// configuration error and leaves the existing mapping untouched.
    pub fn add_route(&mut self, method: &str, pattern: &str, handler: Handler) -> Result<()> {
        let method = method.to_uppercase();
        let full_pattern = format!("{}{}", self.prefix, pattern);
        let key = route_key(&method, &full_pattern);

        if self.handlers.contains_key(&key) {
            return Err(Error::DuplicateRoute {
                method,
                pattern: full_pattern,
            });
        }

        self.trees
            .entry(method)
            .or_default()
            .insert(&full_pattern)
            .map_err(|e| Error::InvalidPattern {
                pattern: full_pattern.clone(),
                reason: e.to_string(),
            })?;
        self.handlers.insert(key, handler);
        Ok(())
    }

    /// Register a GET route
    pub fn get<H, Fut>(&mut self, pattern: &str, handler: H) -> Result<()>
    where
        H: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.add_route(Method::Get.as_str(), pattern, boxed(handler))
    }

    /// Register a POST route
    pub fn post<H, Fut>(&mut self, pattern: &str, handler: H) -> Result<()>
    where
        H: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.add_route(Method::Post.as_str(), pattern, boxed(handler))
    }

    /// Register a PUT route
    pub fn put<H, Fut>(&mut self, pattern: &str, handler: H) -> Result<()>
    where
        H: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.add_route(Method::Put.as_str(), pattern, boxed(handler))
    }

    /// Register a PATCH route
    pub fn patch<H, Fut>(&mut self, pattern: &str, handler: H) -> Result<()>
    where
        H: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.add_route(Method::Patch.as_str(), pattern, boxed(handler))
    }

    /// Register a DELETE route
    pub fn delete<H, Fut>(&mut self, pattern: &str, handler: H) -> Result<()>
    where
        H: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.add_route(Method::Delete.as_str(), pattern, boxed(handler))
    }

    /// Register an OPTIONS route
    pub fn options<H, Fut>(&mut self, pattern: &str, handler: H) -> Result<()>
    where
        H: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.add_route(Method::Options.as_str(), pattern, boxed(handler))
    }

    /// Register a HEAD route
    pub fn head<H, Fut>(&mut self, pattern: &str, handler: H) -> Result<()>
    where
        H: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.add_route(Method::Head.as_str(), pattern, boxed(handler))
    }

    /// Register a route matched for every HTTP method
    pub fn any<H, Fut>(&mut self, pattern: &str, handler: H) -> Result<()>
    where
        H: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.add_route(ANY, pattern, boxed(handler))
    }

    /// Match `segments` against this group's tree for `method`, resolving
    /// the matched pattern through the handler table.
    pub(crate) fn match_route(&self, method: &str, segments: &[&str]) -> Option<(&str, &Handler)> {
        let tree = self.trees.get(method)?;
        let pattern = tree.find(segments)?;
        let handler = self.handlers.get(&route_key(method, pattern))?;
        Some((pattern, handler))
    }

    /// Whether some method other than `method` (and other than ANY) has a
    /// registered route covering this path. Used for the 405 distinction.
    pub(crate) fn allows_other_method(&self, method: &str, segments: &[&str]) -> bool {
        self.trees.iter().any(|(m, tree)| {
            m != method
                && m != ANY
                && tree
                    .find(segments)
                    .is_some_and(|pattern| self.handlers.contains_key(&route_key(m, pattern)))
        })
    }
}
