//! Error types for route registration and resolution
//!
//! Two failure families exist and they never mix: [`ConfigError`] is raised
//! while routes are being registered and is fatal to startup, while
//! [`ResolveError`] is raised per request and is translated by the calling
//! layer into a protocol-appropriate response (404 / 405 equivalents).

use crate::route::DispatchKey;
use crate::scope::Method;

/// Build-time registration failure.
///
/// Any of these means the route table itself is wrong; the application must
/// not start serving. The resolver can never raise one of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Two routes declared different parameter shapes (names, order, or
    /// kinds) at the same tree position
    #[error("Routes with conflicting path parameters at '{path}'")]
    ConflictingParameters {
        /// Path of the later registration that collided
        path: String,
    },

    /// A WebSocket or mount entry was registered where HTTP-method entries
    /// already live, or the other way around
    #[error("Cannot register {incoming} at '{path}': leaf already holds {existing} entries")]
    ConflictingDispatch {
        /// Path of the later registration that collided
        path: String,
        /// Dispatch kind already present at the leaf
        existing: DispatchKey,
        /// Dispatch kind of the rejected registration
        incoming: DispatchKey,
    },

    /// A handler is already registered for this path and dispatch key and
    /// the active policy rejects overrides
    #[error("A {key} handler is already registered at '{path}'")]
    DuplicateHandler {
        /// Path of the duplicate registration
        path: String,
        /// Dispatch key that was already taken
        key: DispatchKey,
    },

    /// A `{name:kind}` token declared a kind the parameter parser does not
    /// know
    #[error("Unknown parameter kind in token '{{{token}}}' at '{path}'")]
    UnknownParamKind {
        /// Full token body as written in the template
        token: String,
        /// Path template containing the token
        path: String,
    },

    /// The path template itself is malformed (stray braces, empty parameter
    /// name, or a token embedded inside a wider segment)
    #[error("Invalid path template '{path}': {reason}")]
    InvalidTemplate {
        /// Offending path template
        path: String,
        /// What was wrong with it
        reason: String,
    },

    /// The same parameter name appears twice in one path template
    #[error("Duplicate path parameter '{name}' in '{path}'")]
    DuplicateParamName {
        /// Repeated parameter name
        name: String,
        /// Path template containing the repetition
        path: String,
    },

    /// A mount path declared path parameters; mount prefixes must be literal
    /// so they can be stripped from the outward path
    #[error("Mount path '{path}' cannot declare path parameters")]
    MountWithParameters {
        /// Offending mount path
        path: String,
    },
}

impl ConfigError {
    /// Create a conflicting-parameters error
    pub fn conflicting_parameters(path: impl Into<String>) -> Self {
        Self::ConflictingParameters { path: path.into() }
    }

    /// Create a duplicate-handler error
    pub fn duplicate_handler(path: impl Into<String>, key: DispatchKey) -> Self {
        Self::DuplicateHandler {
            path: path.into(),
            key,
        }
    }

    /// Create an invalid-template error
    pub fn invalid_template(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Request-time resolution failure.
///
/// Deterministic for a given route table and scope: retrying reproduces the
/// same failure, so callers translate rather than retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// No registered route matches the path
    #[error("No route found for path '{path}'")]
    NotFound {
        /// Path that failed to match
        path: String,
    },

    /// The path matched but the leaf has no handler for the requested HTTP
    /// method
    #[error("Method {method} not allowed for '{path}' (allow: {})", format_allow(.allowed))]
    MethodNotAllowed {
        /// Path that matched
        path: String,
        /// Method that was requested
        method: Method,
        /// Methods the leaf does handle, sorted for stable output
        allowed: Vec<Method>,
    },
}

impl ResolveError {
    /// Create a not-found error
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a method-not-allowed error; the allowed list is sorted here so
    /// diagnostics and `Allow`-style headers come out stable
    pub fn method_not_allowed(
        path: impl Into<String>,
        method: Method,
        mut allowed: Vec<Method>,
    ) -> Self {
        allowed.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Self::MethodNotAllowed {
            path: path.into(),
            method,
            allowed,
        }
    }

    /// Whether this is the not-found kind
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether this is the method-not-allowed kind
    pub fn is_method_not_allowed(&self) -> bool {
        matches!(self, Self::MethodNotAllowed { .. })
    }

    /// Methods the matched leaf accepts, empty for the not-found kind.
    ///
    /// Suitable as the value list of an `Allow`-style response header.
    pub fn allowed_methods(&self) -> &[Method] {
        match self {
            Self::NotFound { .. } => &[],
            Self::MethodNotAllowed { allowed, .. } => allowed,
        }
    }
}

fn format_allow(allowed: &[Method]) -> String {
    allowed
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for resolution
pub type RouteResult<T> = Result<T, ResolveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflicting_parameters_display() {
        let error = ConfigError::conflicting_parameters("/a/{y}");
        assert_eq!(
            error.to_string(),
            "Routes with conflicting path parameters at '/a/{y}'"
        );
    }

    #[test]
    fn test_conflicting_dispatch_display() {
        let error = ConfigError::ConflictingDispatch {
            path: "/chat".to_string(),
            existing: DispatchKey::Http(Method::Get),
            incoming: DispatchKey::WebSocket,
        };
        assert_eq!(
            error.to_string(),
            "Cannot register WEBSOCKET at '/chat': leaf already holds GET entries"
        );
    }

    #[test]
    fn test_duplicate_handler_display() {
        let error = ConfigError::duplicate_handler("/items", DispatchKey::Http(Method::Get));
        assert_eq!(
            error.to_string(),
            "A GET handler is already registered at '/items'"
        );
    }

    #[test]
    fn test_unknown_param_kind_display() {
        let error = ConfigError::UnknownParamKind {
            token: "id:decimal".to_string(),
            path: "/items/{id:decimal}".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Unknown parameter kind in token '{id:decimal}' at '/items/{id:decimal}'"
        );
    }

    #[test]
    fn test_invalid_template_display() {
        let error = ConfigError::invalid_template("/a{b}", "token embedded in a wider segment");
        assert_eq!(
            error.to_string(),
            "Invalid path template '/a{b}': token embedded in a wider segment"
        );
    }

    #[test]
    fn test_mount_with_parameters_display() {
        let error = ConfigError::MountWithParameters {
            path: "/files/{dir}".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Mount path '/files/{dir}' cannot declare path parameters"
        );
    }

    #[test]
    fn test_not_found_display() {
        let error = ResolveError::not_found("/missing");
        assert_eq!(error.to_string(), "No route found for path '/missing'");
        assert!(error.is_not_found());
        assert!(!error.is_method_not_allowed());
    }

    #[test]
    fn test_method_not_allowed_display_sorts_allow_list() {
        let error = ResolveError::method_not_allowed(
            "/items",
            Method::Delete,
            vec![Method::Post, Method::Get],
        );
        assert_eq!(
            error.to_string(),
            "Method DELETE not allowed for '/items' (allow: GET, POST)"
        );
        assert!(error.is_method_not_allowed());
        assert_eq!(error.allowed_methods(), &[Method::Get, Method::Post]);
    }

    #[test]
    fn test_not_found_has_no_allowed_methods() {
        let error = ResolveError::not_found("/missing");
        assert!(error.allowed_methods().is_empty());
    }

    #[test]
    fn test_errors_are_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<ConfigError>();
        assert_sync::<ConfigError>();
        assert_send::<ResolveError>();
        assert_sync::<ResolveError>();
    }

    #[test]
    fn test_route_result_err() {
        fn returns_err() -> RouteResult<i32> {
            Err(ResolveError::not_found("/x"))
        }
        let result = returns_err();
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ResolveError::NotFound { .. }));
    }

    #[test]
    fn test_config_error_debug_format() {
        let error = ConfigError::conflicting_parameters("/a/{y}");
        let debug_str = format!("{:?}", error);
        assert!(debug_str.contains("ConflictingParameters"));
        assert!(debug_str.contains("/a/{y}"));
    }
}
