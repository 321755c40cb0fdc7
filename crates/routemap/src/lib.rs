#![warn(missing_docs)]
//! # routemap
//!
//! Segment-tree URL route resolution for HTTP, WebSocket, and mounted
//! sub-applications.
//!
//! ## Overview
//!
//! This crate maps request paths to opaque handler values:
//! - **Static fast path** for literal routes, one hash lookup per request
//! - **Segment tree** with typed `{name:kind}` wildcards for everything else
//! - **Mounted sub-applications** that absorb a path prefix and hand the
//!   remainder to the mounted handler
//! - **Method-aware dispatch** with structured not-found / not-allowed errors
//! - **Build once, resolve concurrently**: resolution never takes a lock
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                       Scope                          │
//! │             (kind + path + path_params)              │
//! └──────────────────────────┬───────────────────────────┘
//!                            ▼
//! ┌──────────────────────────────────────────────────────┐
//! │                     Dispatcher                       │
//! │    request ids · typed params · lifecycle hooks      │
//! └──────────────────────────┬───────────────────────────┘
//!                            ▼
//! ┌──────────────────────────────────────────────────────┐
//! │                      RouteMap                        │
//! │  ┌───────────────────┐   ┌───────────────────────┐   │
//! │  │ static route map  │   │ segment tree          │   │
//! │  │ (literal paths)   │   │ wildcards and mounts  │   │
//! │  └───────────────────┘   └───────────────────────┘   │
//! └──────────────────────────┬───────────────────────────┘
//!                            ▼
//!                  matched handler (&H)
//! ```
//!
//! ## Quick Start
//!
//! ### 1. Describe Your Routes
//!
//! ```rust,ignore
//! use routemap::{Method, RouteDescriptor};
//!
//! let routes = vec![
//!     RouteDescriptor::http("/health", [(Method::Get, handlers::health)])?,
//!     RouteDescriptor::http("/users/{id:int}", [
//!         (Method::Get, handlers::get_user),
//!         (Method::Delete, handlers::delete_user),
//!     ])?,
//!     RouteDescriptor::websocket("/feed", handlers::feed)?,
//!     RouteDescriptor::mount("/static", handlers::files)?,
//! ];
//! ```
//!
//! ### 2. Build the Map
//!
//! ```rust,ignore
//! use routemap::RouteMap;
//!
//! let mut map = RouteMap::new();
//! map.add_routes(routes)?;
//! ```
//!
//! ### 3. Resolve Scopes
//!
//! ```rust,ignore
//! use routemap::{Method, Scope};
//!
//! let mut scope = Scope::http(Method::Get, "/users/42");
//! let matched = map.resolve(&mut scope)?;
//! assert_eq!(scope.path_params["id"], "42");
//! ```
//!
//! ### 4. Or Dispatch with Typed Parameters
//!
//! ```rust,ignore
//! use routemap::Dispatcher;
//!
//! let dispatcher = Dispatcher::new(map)
//!     .on_startup(|| async { warm_caches().await });
//!
//! dispatcher.startup().await?;
//! let dispatch = dispatcher.dispatch(&mut scope)?;
//! assert_eq!(dispatch.path_params["id"].as_int(), Some(42));
//! ```
//!
//! ## Route Templates
//!
//! A template segment is either a literal or a whole `{name}` /
//! `{name:kind}` token. Supported kinds are `str` (the default), `int`,
//! `float`, and `uuid`:
//!
//! ```text
//! /users/{id:int}/posts/{slug}
//! ```
//!
//! Wildcard segments match any single path component and capture its raw
//! text; typed coercion happens at dispatch time.
//!
//! ## Module Structure
//!
//! - [`RouteMap`] - Registration and resolution
//! - [`RouteDescriptor`] - One route: path template plus handlers
//! - [`Dispatcher`] - Typed dispatch facade with lifecycle hooks
//! - [`Scope`] - A single incoming request to resolve
//! - [`ConfigError`] / [`ResolveError`] - Registration and lookup failures
//! - [`RouteMapConfig`] - Map construction knobs
//!
//! ## Prelude
//!
//! Import everything you need with a single statement:
//!
//! ```rust,ignore
//! use routemap::prelude::*;
//! ```

mod config;
mod dispatch;
mod error;
mod map;
mod params;
mod route;
mod scope;

// Public API
pub use config::{DuplicatePolicy, RouteMapConfig};
pub use dispatch::{BoxError, Dispatch, DispatchError, Dispatcher, LifecycleHook};
pub use error::{ConfigError, ResolveError, RouteResult};
pub use map::{RouteMap, RouteMatch};
pub use params::{ParamDef, ParamError, ParamKind, ParamValue, normalize_path, parse_path_params};
pub use route::{DispatchKey, RouteDescriptor, RouteKind};
pub use scope::{Method, Scope, ScopeKind};

/// Prelude for convenient imports
///
/// Import everything you need with a single use statement:
///
/// ```rust,ignore
/// use routemap::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Errors
        ConfigError,
        // Dispatch facade
        Dispatch,
        DispatchError,
        Dispatcher,
        // Routes
        DispatchKey,
        // Configuration
        DuplicatePolicy,
        // Scopes
        Method,
        // Parameters
        ParamDef,
        ParamError,
        ParamKind,
        ParamValue,
        ResolveError,
        RouteDescriptor,
        RouteKind,
        // Core map
        RouteMap,
        RouteMapConfig,
        RouteMatch,
        RouteResult,
        Scope,
        ScopeKind,
    };
}
