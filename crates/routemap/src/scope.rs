//! Request scope types
//!
//! A [`Scope`] is the resolver's view of one incoming request or connection:
//! the protocol kind, the raw path, and a slot for the raw path-parameter
//! values the resolver writes back. The resolver also rewrites `path` in
//! place when a mounted sub-application absorbs the remainder of the path,
//! so the mounted handler sees a path relative to its own root.

use std::collections::HashMap;
use std::fmt;

/// HTTP request method, as used for dispatch-key lookup.
///
/// Covers the common verbs; anything else is carried verbatim (upper-cased)
/// in [`Method::Other`] so unusual verbs stay routable without widening the
/// enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Method {
    /// HTTP GET
    Get,
    /// HTTP POST
    Post,
    /// HTTP PUT
    Put,
    /// HTTP PATCH
    Patch,
    /// HTTP DELETE
    Delete,
    /// HTTP HEAD
    Head,
    /// HTTP OPTIONS
    Options,
    /// Any other verb, stored upper-cased
    Other(String),
}

impl Method {
    /// Parse a method string, normalizing to upper case.
    ///
    /// Never fails: unknown verbs land in [`Method::Other`].
    pub fn parse(method: &str) -> Self {
        match method.to_ascii_uppercase().as_str() {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "PATCH" => Self::Patch,
            "DELETE" => Self::Delete,
            "HEAD" => Self::Head,
            "OPTIONS" => Self::Options,
            other => Self::Other(other.to_string()),
        }
    }

    /// Upper-case method name
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Protocol kind of an incoming scope.
///
/// Mounted sub-applications intercept every kind; the distinction only
/// matters for leaves that dispatch per method or per connection type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeKind {
    /// An HTTP request carrying its method
    Http(Method),
    /// A WebSocket connection attempt
    WebSocket,
}

/// One incoming request or connection, as the resolver sees it.
///
/// # Example
///
/// ```rust,ignore
/// let mut scope = Scope::http(Method::Get, "/items/42");
/// let matched = map.resolve(&mut scope)?;
/// assert_eq!(scope.path_params["id"], "42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    /// Protocol kind (HTTP with its method, or WebSocket)
    pub kind: ScopeKind,
    /// Request path. Rewritten in place when a mount absorbs the remainder.
    pub path: String,
    /// Raw path-parameter values, written by the resolver on every match.
    /// Typed coercion is a separate step; see `parse_path_params`.
    pub path_params: HashMap<String, String>,
}

impl Scope {
    /// Create an HTTP scope
    pub fn http(method: Method, path: impl Into<String>) -> Self {
        Self {
            kind: ScopeKind::Http(method),
            path: path.into(),
            path_params: HashMap::new(),
        }
    }

    /// Create a WebSocket scope
    pub fn websocket(path: impl Into<String>) -> Self {
        Self {
            kind: ScopeKind::WebSocket,
            path: path.into(),
            path_params: HashMap::new(),
        }
    }

    /// The HTTP method, if this is an HTTP scope
    pub fn method(&self) -> Option<&Method> {
        match &self.kind {
            ScopeKind::Http(method) => Some(method),
            ScopeKind::WebSocket => None,
        }
    }
}
