//! squall-router: Zero-dependency prefix-tree HTTP router
//!
//! Single Source of Truth (SSOT) matching engine used by squall-core.
//! Stores route patterns in a tree of path segments and resolves a concrete
//! request path against them with backtracking.
//!
//! ## Path Syntax
//! - `users`, `api` - Static segment (matched literally)
//! - `:name` - Named parameter (captures one segment)
//! - `*name` - Catch-all (must be last, captures the remaining path)
//!
//! ## Matching order
//! At each tree position the static child with the same text *and* the
//! wildcard child are both candidates; they are tried depth-first in
//! child-insertion order and the first branch that reaches a registered
//! pattern wins. Two different wildcard tokens at the same position are
//! rejected at insertion time, so insertion order never has to break a
//! wildcard/wildcard tie.
//!
//! ## Example
//! ```
//! use squall_router::{segment_path, RouteTree};
//!
//! let mut tree = RouteTree::new();
//! tree.insert("/users/:id").unwrap();
//! tree.insert("/files/*path").unwrap();
//!
//! let segments = segment_path("/users/42");
//! assert_eq!(tree.find(&segments), Some("/users/:id"));
//! ```

use std::collections::HashMap;
use std::fmt;

/// Error returned when a pattern cannot be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertError {
    /// A different wildcard token already occupies this tree position.
    WildcardConflict { existing: String, inserted: String },
    /// A catch-all segment appeared before the end of the pattern.
    CatchAllNotLast { pattern: String },
    /// A `:` segment with no parameter name.
    EmptyParamName { pattern: String },
}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::WildcardConflict { existing, inserted } => write!(
                f,
                "wildcard `{inserted}` conflicts with `{existing}` at the same position"
            ),
            InsertError::CatchAllNotLast { pattern } => {
                write!(f, "catch-all segment must be last in `{pattern}`")
            }
            InsertError::EmptyParamName { pattern } => {
                write!(f, "parameter segment without a name in `{pattern}`")
            }
        }
    }
}

impl std::error::Error for InsertError {}

/// Split a URL path into its non-empty segments.
///
/// Empty segments from leading, trailing or doubled slashes are dropped.
/// A `*`-leading segment is kept and ends segmentation: the catch-all
/// absorbs the rest of the path at search time, not here.
pub fn segment_path(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    for part in path.split('/') {
        if part.is_empty() {
            continue;
        }
        segments.push(part);
        if part.starts_with('*') {
            break;
        }
    }
    segments
}

/// One segment position in the aggregated set of inserted patterns.
#[derive(Debug, Default)]
struct Node {
    /// Raw token this node was created for ("users", ":id", "*path").
    part: String,
    /// Token starts with ':' or '*'.
    is_wild: bool,
    /// Full registration string, set only on terminal nodes.
    pattern: Option<String>,
    /// Insertion-ordered children; no two share the same `part`.
    children: Vec<Node>,
}

/// Prefix tree over route patterns.
///
/// Insertion matches children by raw text equality; search is an exhaustive
/// depth-first walk where both the matching static child and the wildcard
/// child are candidates. The root node itself can be terminal (pattern `/`).
#[derive(Debug, Default)]
pub struct RouteTree {
    root: Node,
}

impl RouteTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pattern.
    ///
    /// Re-inserting an identical pattern is structurally idempotent; the
    /// caller is responsible for treating duplicate registrations as an
    /// error. Malformed patterns and conflicting wildcard siblings are
    /// rejected here.
    pub fn insert(&mut self, pattern: &str) -> Result<(), InsertError> {
        validate_pattern(pattern)?;
        let segments = segment_path(pattern);
        Self::insert_node(&mut self.root, pattern, &segments, 0)
    }

    fn insert_node(
        node: &mut Node,
        pattern: &str,
        segments: &[&str],
        height: usize,
    ) -> Result<(), InsertError> {
        if segments.len() == height {
            node.pattern = Some(pattern.to_string());
            return Ok(());
        }

        let part = segments[height];
        let is_wild = part.starts_with(':') || part.starts_with('*');

        if is_wild {
            if let Some(other) = node.children.iter().find(|c| c.is_wild && c.part != part) {
                return Err(InsertError::WildcardConflict {
                    existing: other.part.clone(),
                    inserted: part.to_string(),
                });
            }
        }

        let idx = match node.children.iter().position(|c| c.part == part) {
            Some(idx) => idx,
            None => {
                node.children.push(Node {
                    part: part.to_string(),
                    is_wild,
                    ..Node::default()
                });
                node.children.len() - 1
            }
        };
        Self::insert_node(&mut node.children[idx], pattern, segments, height + 1)
    }

    /// Resolve a segmented request path to the pattern it satisfies.
    ///
    /// Returns the full registration string of the matched terminal node,
    /// or `None` when no registered pattern covers the path.
    pub fn find(&self, segments: &[&str]) -> Option<&str> {
        Self::search_node(&self.root, segments, 0).and_then(|node| node.pattern.as_deref())
    }

    fn search_node<'t>(node: &'t Node, segments: &[&str], height: usize) -> Option<&'t Node> {
        // A catch-all terminates the search no matter how much input is left.
        if segments.len() == height || node.part.starts_with('*') {
            return node.pattern.is_some().then_some(node);
        }

        let part = segments[height];
        node.children
            .iter()
            .filter(|c| c.part == part || c.is_wild)
            .find_map(|c| Self::search_node(c, segments, height + 1))
    }
}

/// Bind parameters by walking a pattern's tokens against request segments.
///
/// `:name` binds the same-positioned segment; `*name` binds the `/`-joined
/// remainder and ends extraction. Later bindings of the same name win.
pub fn extract_params(pattern: &str, segments: &[&str]) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for (idx, token) in segment_path(pattern).into_iter().enumerate() {
        if let Some(name) = token.strip_prefix(':') {
            if let Some(value) = segments.get(idx) {
                params.insert(name.to_string(), (*value).to_string());
            }
        } else if let Some(name) = token.strip_prefix('*') {
            let name = if name.is_empty() { "*" } else { name };
            params.insert(name.to_string(), segments[idx..].join("/"));
            break;
        }
    }
    params
}

fn validate_pattern(pattern: &str) -> Result<(), InsertError> {
    let parts: Vec<&str> = pattern.split('/').filter(|p| !p.is_empty()).collect();
    for (idx, part) in parts.iter().enumerate() {
        if part.starts_with('*') && idx + 1 != parts.len() {
            return Err(InsertError::CatchAllNotLast {
                pattern: pattern.to_string(),
            });
        }
        if *part == ":" {
            return Err(InsertError::EmptyParamName {
                pattern: pattern.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_path() {
        assert_eq!(segment_path("/user/profile"), vec!["user", "profile"]);
        assert_eq!(segment_path("/user/:id"), vec!["user", ":id"]);
        assert_eq!(segment_path("/static/*filepath"), vec!["static", "*filepath"]);
        assert_eq!(segment_path("/"), Vec::<&str>::new());
        assert_eq!(segment_path(""), Vec::<&str>::new());
        assert_eq!(segment_path("/user/profile/"), vec!["user", "profile"]);
        assert_eq!(segment_path("//user///profile"), vec!["user", "profile"]);
        assert_eq!(
            segment_path("/api/v1/user/:id/posts"),
            vec!["api", "v1", "user", ":id", "posts"]
        );
    }

    #[test]
    fn test_segment_path_stops_at_catch_all() {
        // Everything after the catch-all token is ignored at parse time.
        assert_eq!(
            segment_path("/static/*filepath/ignored/tail"),
            vec!["static", "*filepath"]
        );
    }

    #[test]
    fn test_insert_and_find() {
        let mut tree = RouteTree::new();
        for pattern in [
            "/",
            "/user",
            "/user/profile",
            "/user/:id",
            "/user/:id/posts",
            "/post/:post_id/comments",
            "/static/*filepath",
        ] {
            tree.insert(pattern).unwrap();
        }

        assert_eq!(tree.find(&segment_path("/")), Some("/"));
        assert_eq!(tree.find(&segment_path("/user")), Some("/user"));
        assert_eq!(tree.find(&segment_path("/user/profile")), Some("/user/profile"));
        assert_eq!(tree.find(&segment_path("/user/123")), Some("/user/:id"));
        assert_eq!(
            tree.find(&segment_path("/user/456/posts")),
            Some("/user/:id/posts")
        );
        assert_eq!(
            tree.find(&segment_path("/post/789/comments")),
            Some("/post/:post_id/comments")
        );
        assert_eq!(
            tree.find(&segment_path("/static/css/style.css")),
            Some("/static/*filepath")
        );
        assert_eq!(
            tree.find(&segment_path("/static/js/lib/jquery.min.js")),
            Some("/static/*filepath")
        );
        assert_eq!(tree.find(&segment_path("/unknown/path")), None);
        assert_eq!(tree.find(&segment_path("/user/123/unknown")), None);
    }

    #[test]
    fn test_backtracking_over_param_branch() {
        let mut tree = RouteTree::new();
        // The ":id" child is inserted first, so it is tried first. It dead-ends
        // at "settings" and the search must back out into the static branch.
        tree.insert("/user/:id").unwrap();
        tree.insert("/user/profile/settings").unwrap();

        assert_eq!(
            tree.find(&segment_path("/user/profile/settings")),
            Some("/user/profile/settings")
        );
        assert_eq!(tree.find(&segment_path("/user/profile")), Some("/user/:id"));
    }

    #[test]
    fn test_insertion_order_breaks_static_param_tie() {
        let mut tree = RouteTree::new();
        tree.insert("/user/:id").unwrap();
        tree.insert("/user/me").unwrap();

        // Both children terminate; the earlier-inserted ":id" branch wins.
        assert_eq!(tree.find(&segment_path("/user/me")), Some("/user/:id"));
    }

    #[test]
    fn test_duplicate_insert_is_idempotent() {
        let mut tree = RouteTree::new();
        tree.insert("/user/profile").unwrap();
        tree.insert("/user/profile").unwrap();

        assert_eq!(tree.root.children.len(), 1);
        assert_eq!(tree.root.children[0].part, "user");
        assert_eq!(tree.root.children[0].children.len(), 1);
    }

    #[test]
    fn test_root_only_tree() {
        let mut tree = RouteTree::new();
        tree.insert("/").unwrap();

        assert_eq!(tree.find(&segment_path("/")), Some("/"));
        assert_eq!(tree.find(&segment_path("/anything")), None);
    }

    #[test]
    fn test_catch_all_requires_a_remaining_segment() {
        let mut tree = RouteTree::new();
        tree.insert("/static/*filepath").unwrap();

        assert_eq!(tree.find(&segment_path("/static")), None);
        assert_eq!(tree.find(&segment_path("/static/app.js")), Some("/static/*filepath"));
    }

    #[test]
    fn test_wildcard_conflict_rejected() {
        let mut tree = RouteTree::new();
        tree.insert("/user/:id").unwrap();

        let err = tree.insert("/user/:uid").unwrap_err();
        assert_eq!(
            err,
            InsertError::WildcardConflict {
                existing: ":id".to_string(),
                inserted: ":uid".to_string(),
            }
        );

        let err = tree.insert("/user/*rest").unwrap_err();
        assert!(matches!(err, InsertError::WildcardConflict { .. }));

        // Same token again is fine.
        tree.insert("/user/:id/posts").unwrap();
    }

    #[test]
    fn test_malformed_patterns_rejected() {
        let mut tree = RouteTree::new();
        assert!(matches!(
            tree.insert("/files/*path/extra"),
            Err(InsertError::CatchAllNotLast { .. })
        ));
        assert!(matches!(
            tree.insert("/user/:"),
            Err(InsertError::EmptyParamName { .. })
        ));
    }

    #[test]
    fn test_extract_single_param() {
        let params = extract_params("/user/:id", &segment_path("/user/123"));
        assert_eq!(params.get("id"), Some(&"123".to_string()));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_extract_multiple_params() {
        let params = extract_params(
            "/user/:id/posts/:postId",
            &segment_path("/user/42/posts/7"),
        );
        assert_eq!(params.get("id"), Some(&"42".to_string()));
        assert_eq!(params.get("postId"), Some(&"7".to_string()));
    }

    #[test]
    fn test_extract_catch_all_joins_remainder() {
        let params = extract_params(
            "/static/*filepath",
            &segment_path("/static/css/style.css"),
        );
        assert_eq!(params.get("filepath"), Some(&"css/style.css".to_string()));
    }

    #[test]
    fn test_extract_bare_star_binds_star() {
        let params = extract_params("/static/*", &segment_path("/static/js/app.js"));
        assert_eq!(params.get("*"), Some(&"js/app.js".to_string()));
    }

    #[test]
    fn test_extract_no_params_for_static_pattern() {
        let params = extract_params("/user/profile", &segment_path("/user/profile"));
        assert!(params.is_empty());
    }
}
