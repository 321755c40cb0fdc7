//! Tree node and leaf payload (internal)

use std::collections::HashMap;

use crate::params::ParamDef;
use crate::route::DispatchKey;
use crate::scope::Method;

/// One level of the segment tree.
///
/// Literal segments live in `children`; the wildcard child is a dedicated
/// slot so a literal segment can never collide with the wildcard token.
#[derive(Debug)]
pub(crate) struct Node<H> {
    pub(crate) children: HashMap<String, Node<H>>,
    pub(crate) placeholder: Option<Box<Node<H>>>,
    pub(crate) leaf: Option<LeafData<H>>,
}

impl<H> Default for Node<H> {
    fn default() -> Self {
        Self {
            children: HashMap::new(),
            placeholder: None,
            leaf: None,
        }
    }
}

impl<H> Node<H> {
    /// Get or insert the literal child for `segment`
    pub(crate) fn child_or_insert(&mut self, segment: &str) -> &mut Node<H> {
        self.children.entry(segment.to_string()).or_default()
    }

    /// Get or insert the wildcard child
    pub(crate) fn placeholder_or_insert(&mut self) -> &mut Node<H> {
        self.placeholder.get_or_insert_with(Default::default)
    }

    /// Get or insert the leaf payload
    pub(crate) fn leaf_or_insert(&mut self) -> &mut LeafData<H> {
        self.leaf.get_or_insert_with(Default::default)
    }
}

/// Route data carried by a matched tree position or static-map entry.
#[derive(Debug)]
pub(crate) struct LeafData<H> {
    /// Declared parameters, in left-to-right path order. Identical for every
    /// route registered at this position.
    pub(crate) path_parameters: Vec<ParamDef>,
    pub(crate) handlers: HashMap<DispatchKey, H>,
    /// Sub-application leaf: dispatch returns the Mount entry for every
    /// scope kind.
    pub(crate) is_mount: bool,
    /// Set only for absorbing mounts; stripped from the outward path when
    /// the descent falls back to this leaf.
    pub(crate) mount_prefix: Option<String>,
}

impl<H> Default for LeafData<H> {
    fn default() -> Self {
        Self {
            path_parameters: Vec::new(),
            handlers: HashMap::new(),
            is_mount: false,
            mount_prefix: None,
        }
    }
}

impl<H> LeafData<H> {
    /// HTTP methods this leaf handles, unsorted
    pub(crate) fn allowed_methods(&self) -> Vec<Method> {
        self.handlers
            .keys()
            .filter_map(|key| match key {
                DispatchKey::Http(method) => Some(method.clone()),
                _ => None,
            })
            .collect()
    }

    /// A key already present whose dispatch kind conflicts with `incoming`.
    ///
    /// HTTP entries, the WebSocket entry, and the Mount entry are mutually
    /// exclusive within one leaf; duplicates of the same kind are a policy
    /// question, not a kind conflict.
    pub(crate) fn conflicting_kind(&self, incoming: &DispatchKey) -> Option<DispatchKey> {
        self.handlers
            .keys()
            .find(|existing| !same_kind(existing, incoming))
            .cloned()
    }
}

fn same_kind(a: &DispatchKey, b: &DispatchKey) -> bool {
    matches!(
        (a, b),
        (DispatchKey::Http(_), DispatchKey::Http(_))
            | (DispatchKey::WebSocket, DispatchKey::WebSocket)
            | (DispatchKey::Mount, DispatchKey::Mount)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_or_insert_is_idempotent() {
        let mut node: Node<&str> = Node::default();
        node.child_or_insert("items").leaf_or_insert();
        node.child_or_insert("items");
        assert_eq!(node.children.len(), 1);
        assert!(node.children["items"].leaf.is_some());
    }

    #[test]
    fn test_placeholder_is_separate_from_literal_star() {
        let mut node: Node<&str> = Node::default();
        node.child_or_insert("*");
        node.placeholder_or_insert();
        assert_eq!(node.children.len(), 1);
        assert!(node.placeholder.is_some());
    }

    #[test]
    fn test_conflicting_kind_detects_cross_kind_entries() {
        let mut leaf: LeafData<&str> = LeafData::default();
        leaf.handlers.insert(DispatchKey::Http(Method::Get), "h");
        assert_eq!(
            leaf.conflicting_kind(&DispatchKey::WebSocket),
            Some(DispatchKey::Http(Method::Get))
        );
        assert_eq!(leaf.conflicting_kind(&DispatchKey::Http(Method::Post)), None);
    }

    #[test]
    fn test_allowed_methods_skips_non_http_keys() {
        let mut leaf: LeafData<&str> = LeafData::default();
        leaf.handlers.insert(DispatchKey::Http(Method::Get), "a");
        leaf.handlers.insert(DispatchKey::Http(Method::Post), "b");
        let mut methods = leaf.allowed_methods();
        methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        assert_eq!(methods, vec![Method::Get, Method::Post]);
    }
}
