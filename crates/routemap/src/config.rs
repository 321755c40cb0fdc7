//! Configuration for route registration.
//!
//! One policy knob lives here: what happens when two registrations claim the
//! same `(path shape, dispatch key)` slot. Everything else about the route
//! table is fixed by construction.
//!
//! # Example
//! ```rust,ignore
//! use routemap::{RouteMap, RouteMapConfig, DuplicatePolicy};
//!
//! let map: RouteMap<Handler> = RouteMap::with_config(
//!     RouteMapConfig::new().with_duplicate_policy(DuplicatePolicy::LastWriteWins),
//! );
//! ```

use serde::{Deserialize, Serialize};

/// Policy for a second registration at an already-taken dispatch slot.
///
/// # Variants
///
/// * `Reject` - Fail registration with a configuration error. Consistent
///   with the parameter-conflict check: a wrong route table should stop the
///   application from starting.
///
/// * `LastWriteWins` - Silently replace the earlier handler. This mirrors
///   the merge behavior of older dispatch layers that grew their route table
///   incrementally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum DuplicatePolicy {
    /// Fail registration with a configuration error.
    #[default]
    Reject,
    /// Silently replace the earlier handler.
    LastWriteWins,
}

/// Configuration for a route map.
///
/// The default configuration rejects duplicate handler registrations; see
/// [`DuplicatePolicy`].
///
/// # Example
/// ```rust,ignore
/// use routemap::{RouteMapConfig, DuplicatePolicy};
///
/// // Use defaults
/// let config = RouteMapConfig::default();
///
/// // Or opt into overrides
/// let config = RouteMapConfig::new()
///     .with_duplicate_policy(DuplicatePolicy::LastWriteWins);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RouteMapConfig {
    /// Policy for duplicate `(path shape, dispatch key)` registrations
    /// (default: `Reject`)
    pub duplicate_handlers: DuplicatePolicy,
}

impl RouteMapConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duplicate-handler policy.
    ///
    /// # Example
    /// ```rust,ignore
    /// let config = RouteMapConfig::new()
    ///     .with_duplicate_policy(DuplicatePolicy::LastWriteWins);
    /// ```
    #[must_use = "This method returns a new RouteMapConfig and does not modify self"]
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_handlers = policy;
        self
    }
}
