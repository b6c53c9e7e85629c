//! Per-request context handed to handlers

use crate::Request;
use std::collections::HashMap;

/// Carries one request and the path parameters extracted for it.
///
/// A fresh context is created for every dispatched request and consumed by
/// the handler; parameter bindings are never shared between requests.
#[derive(Debug)]
pub struct Context {
    /// The incoming request
    pub request: Request,
    params: HashMap<String, String>,
}

impl Context {
    pub(crate) fn new(request: Request, params: HashMap<String, String>) -> Self {
        Self { request, params }
    }

    /// Value bound to a named or catch-all parameter, or `""` if unbound.
    pub fn param(&self, name: &str) -> &str {
        self.params.get(name).map(|v| v.as_str()).unwrap_or("")
    }

    /// All extracted parameters.
    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }
}
