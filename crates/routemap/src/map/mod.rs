//! Route table construction and resolution
//!
//! The map splits registered routes across two structures. Parameter-free,
//! non-absorbing routes land in a flat hash map keyed by their full path and
//! resolve in a single lookup. Everything else goes into a segment tree with
//! one level per `/`-delimited component, where wildcard children capture
//! parameter values and mount leaves absorb the remainder of the path.

// Module declarations
mod core;
mod node;

// Public re-exports
pub use self::core::{RouteMap, RouteMatch};

#[cfg(test)]
mod tests;
