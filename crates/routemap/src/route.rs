//! Route descriptors
//!
//! A [`RouteDescriptor`] is the registration-side unit: a validated path
//! template, its ordered parameter definitions, and the handlers to expose,
//! tagged by kind. Handler chains are built by the framework layer before
//! registration; this crate treats them as opaque `H` values and never
//! invokes them.

use std::fmt;

use crate::error::ConfigError;
use crate::params::{self, ParamDef};
use crate::scope::Method;

/// Discriminator selecting which handler a leaf exposes for a given scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DispatchKey {
    /// An HTTP method entry
    Http(Method),
    /// The WebSocket entry
    WebSocket,
    /// The sub-application entry (exact sub-apps and absorbing mounts)
    Mount,
}

impl fmt::Display for DispatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(method) => f.write_str(method.as_str()),
            Self::WebSocket => f.write_str("WEBSOCKET"),
            Self::Mount => f.write_str("MOUNT"),
        }
    }
}

/// What a route dispatches to, tagged by kind.
///
/// The registry's handling differs only in which [`DispatchKey`]s it writes
/// and which leaf flags it sets; an unrecognized kind is unrepresentable.
#[derive(Debug, Clone)]
pub enum RouteKind<H> {
    /// Per-method HTTP handlers
    Http(Vec<(Method, H)>),
    /// A WebSocket connection handler
    WebSocket(H),
    /// A sub-application at exactly this path, intercepting every scope kind
    /// without absorbing deeper paths
    App(H),
    /// A mounted sub-application absorbing every deeper path; the outward
    /// path is rewritten relative to the mount prefix
    Mount(H),
}

/// A validated route, ready for registration.
///
/// Construction parses and validates the path template once, so every
/// malformed template fails at build time rather than registering a route
/// that can never match.
///
/// # Example
///
/// ```rust,ignore
/// let route = RouteDescriptor::http(
///     "/items/{id:int}",
///     [(Method::Get, get_item), (Method::Delete, delete_item)],
/// )?;
/// map.add_routes([route])?;
/// ```
#[derive(Debug, Clone)]
pub struct RouteDescriptor<H> {
    path: String,
    path_parameters: Vec<ParamDef>,
    kind: RouteKind<H>,
}

impl<H> RouteDescriptor<H> {
    /// Create an HTTP route exposing one handler per method.
    ///
    /// Methods are normalized upper-case here, so two spellings of one verb
    /// cannot produce two leaf entries.
    pub fn http(
        path: &str,
        handlers: impl IntoIterator<Item = (Method, H)>,
    ) -> Result<Self, ConfigError> {
        let (path, path_parameters) = params::parse_template(path)?;
        let handlers = handlers
            .into_iter()
            .map(|(method, handler)| (Method::parse(method.as_str()), handler))
            .collect();
        Ok(Self {
            path,
            path_parameters,
            kind: RouteKind::Http(handlers),
        })
    }

    /// Create a WebSocket route
    pub fn websocket(path: &str, handler: H) -> Result<Self, ConfigError> {
        let (path, path_parameters) = params::parse_template(path)?;
        Ok(Self {
            path,
            path_parameters,
            kind: RouteKind::WebSocket(handler),
        })
    }

    /// Create an exact sub-application route.
    ///
    /// The handler intercepts every scope kind at exactly this path; deeper
    /// paths are not affected.
    pub fn app(path: &str, handler: H) -> Result<Self, ConfigError> {
        let (path, path_parameters) = params::parse_template(path)?;
        Ok(Self {
            path,
            path_parameters,
            kind: RouteKind::App(handler),
        })
    }

    /// Create a mounted sub-application absorbing the whole subtree under
    /// `path`.
    ///
    /// Mount prefixes must be literal: they are stripped from the outward
    /// path by string replacement, which a parameterized prefix would break.
    pub fn mount(path: &str, handler: H) -> Result<Self, ConfigError> {
        let (path, path_parameters) = params::parse_template(path)?;
        if !path_parameters.is_empty() {
            return Err(ConfigError::MountWithParameters { path });
        }
        Ok(Self {
            path,
            path_parameters,
            kind: RouteKind::Mount(handler),
        })
    }

    /// Normalized path template
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Ordered parameter definitions parsed from the template
    pub fn path_parameters(&self) -> &[ParamDef] {
        &self.path_parameters
    }

    /// The route's kind and handlers
    pub fn kind(&self) -> &RouteKind<H> {
        &self.kind
    }

    pub(crate) fn into_parts(self) -> (String, Vec<ParamDef>, RouteKind<H>) {
        (self.path, self.path_parameters, self.kind)
    }
}
