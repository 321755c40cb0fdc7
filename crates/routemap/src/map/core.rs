//! Core route map implementation
//!
//! This module contains the [`RouteMap`] type: registration on one side,
//! resolution on the other, with the segment tree and the static fast-path
//! map in between.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use super::node::{LeafData, Node};
use crate::config::{DuplicatePolicy, RouteMapConfig};
use crate::error::{ConfigError, ResolveError};
use crate::params::ParamDef;
use crate::route::{DispatchKey, RouteDescriptor, RouteKind};
use crate::scope::{Scope, ScopeKind};

// =============================================================================
// Route Map
// =============================================================================

/// A segment-keyed route table with a static fast path.
///
/// Built once at startup via [`add_routes`](Self::add_routes), then read
/// concurrently: resolution never mutates the tree, so a finished map is
/// shared by reference (`RouteMap<H>` is `Send + Sync` whenever `H` is) with
/// no locking. Handlers are opaque `H` values; the map returns references to
/// them and never invokes one.
///
/// # Example
/// ```rust,ignore
/// let mut map = RouteMap::new();
/// map.add_routes([
///     RouteDescriptor::http("/items/{id:int}", [(Method::Get, get_item)])?,
///     RouteDescriptor::mount("/static", serve_files)?,
/// ])?;
///
/// let mut scope = Scope::http(Method::Get, "/items/42");
/// let matched = map.resolve(&mut scope)?;
/// assert_eq!(scope.path_params["id"], "42");
/// ```
#[derive(Debug)]
pub struct RouteMap<H> {
    config: RouteMapConfig,
    /// Parameter-free, non-absorbing routes, keyed by full literal path
    static_routes: HashMap<String, LeafData<H>>,
    /// Everything else: one tree level per path segment
    root: Node<H>,
    /// Paths of registered absorbing mounts. A later route at exactly one of
    /// these paths belongs to the mount's tree leaf, not the static map.
    mount_prefixes: HashSet<String>,
}

/// A successful resolution: the matched handler plus the leaf's declared
/// parameter definitions, for downstream typed coercion.
#[derive(Debug)]
pub struct RouteMatch<'a, H> {
    /// The handler registered for the requested dispatch key
    pub handler: &'a H,
    /// Parameter definitions of the matched route, in declaration order
    pub parameters: &'a [ParamDef],
}

// Both fields are references, so copying never touches `H` itself.
impl<H> Clone for RouteMatch<'_, H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H> Copy for RouteMatch<'_, H> {}

impl<H> RouteMap<H> {
    /// Create an empty route map with the default configuration
    pub fn new() -> Self {
        Self::with_config(RouteMapConfig::default())
    }

    /// Create an empty route map with the given configuration
    pub fn with_config(config: RouteMapConfig) -> Self {
        Self {
            config,
            static_routes: HashMap::new(),
            root: Node::default(),
            mount_prefixes: HashSet::new(),
        }
    }

    /// The active configuration
    pub fn config(&self) -> &RouteMapConfig {
        &self.config
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a batch of routes.
    ///
    /// Fails fast on the first conflicting registration; routes added before
    /// the failure stay registered, so a failed batch means the application
    /// must not start serving.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`]: conflicting parameter shapes at one tree
    /// position, mixed dispatch kinds in one leaf, or a duplicate handler
    /// under [`DuplicatePolicy::Reject`].
    pub fn add_routes(
        &mut self,
        routes: impl IntoIterator<Item = RouteDescriptor<H>>,
    ) -> Result<(), ConfigError> {
        let mut added = 0usize;
        for route in routes {
            self.add_route(route)?;
            added += 1;
        }
        tracing::debug!(
            added = added,
            total = self.route_count(),
            "Route registration complete"
        );
        Ok(())
    }

    /// Register a single route.
    ///
    /// # Errors
    ///
    /// Same failure kinds as [`add_routes`](Self::add_routes).
    pub fn add_route(&mut self, route: RouteDescriptor<H>) -> Result<(), ConfigError> {
        let policy = self.config.duplicate_handlers;
        let (path, parameters, kind) = route.into_parts();
        let kind_label = match &kind {
            RouteKind::Http(_) => "http",
            RouteKind::WebSocket(_) => "websocket",
            RouteKind::App(_) => "app",
            RouteKind::Mount(_) => "mount",
        };
        let is_absorbing = matches!(kind, RouteKind::Mount(_));

        // A route registered at this path before the mount sits in the
        // static map; it is subject to the same kind check as a leaf entry.
        if is_absorbing {
            if let Some(existing) = self
                .static_routes
                .get(path.as_str())
                .and_then(|leaf| leaf.conflicting_kind(&DispatchKey::Mount))
            {
                return Err(ConfigError::ConflictingDispatch {
                    path,
                    existing,
                    incoming: DispatchKey::Mount,
                });
            }
        }

        // Absorbing mounts go to the tree even without parameters: the
        // static map can only answer exact-path lookups. A route at exactly
        // a registered mount's path joins the mount's leaf, where the
        // dispatch-kind check applies.
        let in_tree = !parameters.is_empty()
            || is_absorbing
            || self.mount_prefixes.contains(path.as_str());
        let leaf = if in_tree {
            self.tree_leaf_or_insert(&path)
        } else {
            self.static_routes.entry(path.clone()).or_default()
        };

        if !leaf.path_parameters.is_empty() && leaf.path_parameters != parameters {
            return Err(ConfigError::conflicting_parameters(path));
        }
        leaf.path_parameters = parameters;

        match kind {
            RouteKind::Http(entries) => {
                for (method, handler) in entries {
                    insert_handler(leaf, &path, DispatchKey::Http(method), handler, policy)?;
                }
            }
            RouteKind::WebSocket(handler) => {
                insert_handler(leaf, &path, DispatchKey::WebSocket, handler, policy)?;
            }
            RouteKind::App(handler) => {
                insert_handler(leaf, &path, DispatchKey::Mount, handler, policy)?;
                leaf.is_mount = true;
            }
            RouteKind::Mount(handler) => {
                insert_handler(leaf, &path, DispatchKey::Mount, handler, policy)?;
                leaf.is_mount = true;
                leaf.mount_prefix = Some(path.clone());
            }
        }

        tracing::trace!(path = %path, kind = kind_label, "Registered route");
        if is_absorbing {
            self.mount_prefixes.insert(path);
        }
        Ok(())
    }

    /// Descend the tree along `path`, creating nodes on demand, and return
    /// the terminal leaf. Brace-leading segments are parameter tokens (the
    /// template parser guarantees this) and take the wildcard slot.
    fn tree_leaf_or_insert(&mut self, path: &str) -> &mut LeafData<H> {
        let mut node = &mut self.root;
        for segment in components(path) {
            node = if segment.starts_with('{') {
                node.placeholder_or_insert()
            } else {
                node.child_or_insert(segment)
            };
        }
        node.leaf_or_insert()
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Resolve a scope to its handler.
    ///
    /// Writes the raw path-parameter values into `scope.path_params` on
    /// every match, and rewrites `scope.path` when an absorbing mount
    /// matched. Never mutates the route table itself, so any number of
    /// scopes can resolve concurrently against a shared map.
    ///
    /// # Errors
    ///
    /// [`ResolveError::NotFound`] when nothing matches the path,
    /// [`ResolveError::MethodNotAllowed`] when the path matched but the leaf
    /// has no entry for the requested HTTP method.
    pub fn resolve(&self, scope: &mut Scope) -> Result<RouteMatch<'_, H>, ResolveError> {
        let path = normalize_request_path(&scope.path).to_string();

        let (leaf, values) = if let Some(leaf) = self.static_routes.get(path.as_str()) {
            tracing::trace!(path = %path, "Static route matched");
            (leaf, Vec::new())
        } else {
            match self.traverse(&path, scope) {
                Ok(matched) => matched,
                Err(err) => {
                    tracing::debug!(path = %path, "No route matched");
                    return Err(err);
                }
            }
        };

        debug_assert_eq!(leaf.path_parameters.len(), values.len());
        scope.path_params = leaf
            .path_parameters
            .iter()
            .zip(&values)
            .map(|(def, value)| (def.name.clone(), (*value).to_string()))
            .collect();

        let handler = select_handler(leaf, scope, &path)?;
        Ok(RouteMatch {
            handler,
            parameters: &leaf.path_parameters,
        })
    }

    /// Walk the tree segment by segment. Strictly forward: exact child, else
    /// wildcard child (capturing the segment), else the current leaf's mount
    /// fallback; a taken branch is never reconsidered.
    fn traverse<'s, 'p>(
        &'s self,
        path: &'p str,
        scope: &mut Scope,
    ) -> Result<(&'s LeafData<H>, Vec<&'p str>), ResolveError> {
        let mut node = &self.root;
        let mut values = Vec::new();

        for segment in components(path) {
            if let Some(child) = node.children.get(segment) {
                node = child;
                continue;
            }
            if let Some(placeholder) = node.placeholder.as_deref() {
                values.push(segment);
                node = placeholder;
                continue;
            }
            match node.leaf.as_ref().and_then(|leaf| leaf.mount_prefix.as_deref()) {
                Some(prefix) => {
                    // The mount absorbs this segment; the node stays put so
                    // every deeper segment lands here too. The outward path
                    // loses the prefix, except for a bare root mount.
                    if prefix != "/" {
                        scope.path = scope.path.replace(prefix, "");
                    }
                    continue;
                }
                None => return Err(ResolveError::not_found(path)),
            }
        }

        match &node.leaf {
            Some(leaf) => Ok((leaf, values)),
            None => Err(ResolveError::not_found(path)),
        }
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// Number of registered route positions (static and tree leaves)
    pub fn route_count(&self) -> usize {
        let mut count = self.static_routes.len();
        let mut stack: Vec<&Node<H>> = vec![&self.root];
        while let Some(node) = stack.pop() {
            if node.leaf.is_some() {
                count += 1;
            }
            stack.extend(node.children.values());
            if let Some(placeholder) = node.placeholder.as_deref() {
                stack.push(placeholder);
            }
        }
        count
    }

    /// List all registered paths, sorted, with parameter tokens rendered
    /// back into their wildcard positions
    pub fn paths(&self) -> Vec<String> {
        let mut out: Vec<String> = self.static_routes.keys().cloned().collect();

        // Wildcard hops are out-of-band (None), so a literal "*" segment
        // cannot be confused with one.
        let mut stack: Vec<(&Node<H>, Vec<Option<&str>>)> = vec![(&self.root, Vec::new())];
        while let Some((node, trail)) = stack.pop() {
            if let Some(leaf) = &node.leaf {
                out.push(render_path(&trail, leaf));
            }
            for (segment, child) in &node.children {
                let mut next = trail.clone();
                next.push(Some(segment.as_str()));
                stack.push((child, next));
            }
            if let Some(placeholder) = node.placeholder.as_deref() {
                let mut next = trail.clone();
                next.push(None);
                stack.push((placeholder, next));
            }
        }

        out.sort();
        out
    }
}

impl<H> Default for RouteMap<H> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Teardown
// =============================================================================

impl<H> Drop for RouteMap<H> {
    fn drop(&mut self) {
        // Flatten the tree first so teardown never recurses segment-deep.
        let mut stack: Vec<Node<H>> = self
            .root
            .children
            .drain()
            .map(|(_, child)| child)
            .collect();
        if let Some(placeholder) = self.root.placeholder.take() {
            stack.push(*placeholder);
        }
        while let Some(mut node) = stack.pop() {
            stack.extend(node.children.drain().map(|(_, child)| child));
            if let Some(placeholder) = node.placeholder.take() {
                stack.push(*placeholder);
            }
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Split a path into its descent segments: the synthetic root `/` first,
/// then every non-empty `/`-delimited component. Skipping empty components
/// here keeps insertion and lookup symmetric for paths with doubled slashes.
fn components(path: &str) -> impl Iterator<Item = &str> {
    std::iter::once("/").chain(path.split('/').filter(|s| !s.is_empty()))
}

/// Strip a single trailing `/` unless the path is exactly `/`; an empty path
/// is the root.
fn normalize_request_path(path: &str) -> &str {
    let path = if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    };
    if path.is_empty() { "/" } else { path }
}

fn insert_handler<H>(
    leaf: &mut LeafData<H>,
    path: &str,
    key: DispatchKey,
    handler: H,
    policy: DuplicatePolicy,
) -> Result<(), ConfigError> {
    if let Some(existing) = leaf.conflicting_kind(&key) {
        return Err(ConfigError::ConflictingDispatch {
            path: path.to_string(),
            existing,
            incoming: key,
        });
    }
    match leaf.handlers.entry(key) {
        Entry::Occupied(mut occupied) => match policy {
            DuplicatePolicy::Reject => {
                return Err(ConfigError::duplicate_handler(path, occupied.key().clone()));
            }
            DuplicatePolicy::LastWriteWins => {
                occupied.insert(handler);
            }
        },
        Entry::Vacant(vacant) => {
            vacant.insert(handler);
        }
    }
    Ok(())
}

fn select_handler<'a, H>(
    leaf: &'a LeafData<H>,
    scope: &Scope,
    path: &str,
) -> Result<&'a H, ResolveError> {
    // Sub-application leaves intercept every scope kind.
    if leaf.is_mount {
        return leaf
            .handlers
            .get(&DispatchKey::Mount)
            .ok_or_else(|| ResolveError::not_found(path));
    }
    match &scope.kind {
        ScopeKind::Http(method) => leaf
            .handlers
            .get(&DispatchKey::Http(method.clone()))
            .ok_or_else(|| {
                tracing::debug!(path = %path, method = %method, "Method not allowed");
                ResolveError::method_not_allowed(path, method.clone(), leaf.allowed_methods())
            }),
        ScopeKind::WebSocket => leaf
            .handlers
            .get(&DispatchKey::WebSocket)
            .ok_or_else(|| ResolveError::not_found(path)),
    }
}

fn render_path<H>(trail: &[Option<&str>], leaf: &LeafData<H>) -> String {
    let mut params = leaf.path_parameters.iter();
    let mut rendered = String::new();
    for segment in trail.iter().skip(1) {
        rendered.push('/');
        match segment {
            Some(literal) => rendered.push_str(literal),
            None => {
                let full = params.next().map(|def| def.full.as_str()).unwrap_or("");
                rendered.push('{');
                rendered.push_str(full);
                rendered.push('}');
            }
        }
    }
    if rendered.is_empty() {
        "/".to_string()
    } else {
        rendered
    }
}
