//! Dispatch facade over the route map
//!
//! [`Dispatcher`] owns a finished [`RouteMap`] and layers the pieces an
//! application shell needs around raw resolution: typed path-parameter
//! coercion, per-request trace identifiers, and startup/shutdown hooks that
//! run before the first and after the last dispatched scope.
//!
//! # Lifecycle
//!
//! ```text
//! build map → startup hooks → dispatch loop → shutdown hooks
//! ```
//!
//! Hooks run sequentially in registration order and fail fast: a failed
//! startup hook means the application must not begin dispatching.
//!
//! # Example
//!
//! ```rust,ignore
//! let dispatcher = Dispatcher::new(map)
//!     .on_startup(|| async { open_pool().await })
//!     .on_shutdown(|| async { close_pool().await });
//!
//! dispatcher.startup().await?;
//! let dispatch = dispatcher.dispatch(&mut scope)?;
//! let id = dispatch.path_params["id"].as_int();
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::ResolveError;
use crate::map::{RouteMap, RouteMatch};
use crate::params::{ParamError, ParamValue, parse_path_params};
use crate::scope::Scope;

/// Boxed error type carried by lifecycle hooks
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Startup or shutdown hook
pub type LifecycleHook =
    Arc<dyn Fn() -> BoxFuture<'static, Result<(), BoxError>> + Send + Sync>;

/// Failure modes of a single dispatch
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// No handler matched the scope
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    /// The path matched but a parameter value failed type coercion
    #[error(transparent)]
    Params(#[from] ParamError),
}

/// A resolved scope, ready to hand to the application shell
#[derive(Debug)]
pub struct Dispatch<'a, H> {
    /// The matched handler
    pub handler: &'a H,
    /// Path parameters coerced to their declared kinds
    pub path_params: HashMap<String, ParamValue>,
}

/// Resolution plus lifecycle management for one application.
///
/// The dispatcher never invokes handlers; it returns them together with the
/// coerced parameters and leaves execution to the caller.
pub struct Dispatcher<H> {
    map: RouteMap<H>,
    on_startup: Vec<LifecycleHook>,
    on_shutdown: Vec<LifecycleHook>,
}

impl<H> Dispatcher<H> {
    /// Wrap a finished route map
    pub fn new(map: RouteMap<H>) -> Self {
        Self {
            map,
            on_startup: Vec::new(),
            on_shutdown: Vec::new(),
        }
    }

    /// Register a startup hook; hooks run in registration order
    #[must_use = "This method returns a new Dispatcher and does not modify self"]
    pub fn on_startup<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        self.on_startup.push(Arc::new(move || Box::pin(hook())));
        self
    }

    /// Register a shutdown hook; hooks run in registration order
    #[must_use = "This method returns a new Dispatcher and does not modify self"]
    pub fn on_shutdown<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        self.on_shutdown.push(Arc::new(move || Box::pin(hook())));
        self
    }

    /// The wrapped route map
    pub fn map(&self) -> &RouteMap<H> {
        &self.map
    }

    /// Run all startup hooks, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Propagates the first hook error unchanged.
    pub async fn startup(&self) -> Result<(), BoxError> {
        for hook in &self.on_startup {
            hook().await?;
        }
        debug!(hooks = self.on_startup.len(), "Startup complete");
        Ok(())
    }

    /// Run all shutdown hooks, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Propagates the first hook error unchanged.
    pub async fn shutdown(&self) -> Result<(), BoxError> {
        for hook in &self.on_shutdown {
            hook().await?;
        }
        debug!(hooks = self.on_shutdown.len(), "Shutdown complete");
        Ok(())
    }

    /// Resolve a scope and coerce its path parameters.
    ///
    /// # Errors
    ///
    /// [`DispatchError::Resolve`] when no handler matches,
    /// [`DispatchError::Params`] when a bound value does not parse as its
    /// declared kind.
    pub fn dispatch(&self, scope: &mut Scope) -> Result<Dispatch<'_, H>, DispatchError> {
        let request_id = Uuid::now_v7();
        debug!(request_id = %request_id, path = %scope.path, "Dispatching scope");

        let matched: RouteMatch<'_, H> = self.map.resolve(scope)?;
        let path_params = match parse_path_params(matched.parameters, &scope.path_params) {
            Ok(values) => values,
            Err(err) => {
                warn!(
                    request_id = %request_id,
                    path = %scope.path,
                    error = %err,
                    "Path parameter coercion failed"
                );
                return Err(err.into());
            }
        };

        Ok(Dispatch {
            handler: matched.handler,
            path_params,
        })
    }
}

impl<H> From<RouteMap<H>> for Dispatcher<H> {
    fn from(map: RouteMap<H>) -> Self {
        Self::new(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Method, ParamValue, RouteDescriptor, RouteMap};
    use std::sync::Mutex;

    fn sample_dispatcher() -> Dispatcher<&'static str> {
        let mut map = RouteMap::new();
        map.add_routes([
            RouteDescriptor::http("/items/{id:int}", [(Method::Get, "item")]).unwrap(),
            RouteDescriptor::http("/health", [(Method::Get, "health")]).unwrap(),
        ])
        .unwrap();
        Dispatcher::new(map)
    }

    #[tokio::test]
    async fn test_startup_hooks_run_in_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let first = Arc::clone(&order);
        let second = Arc::clone(&order);

        let dispatcher = Dispatcher::new(RouteMap::<&'static str>::new())
            .on_startup(move || {
                let order = Arc::clone(&first);
                async move {
                    order.lock().unwrap().push("first");
                    Ok(())
                }
            })
            .on_startup(move || {
                let order = Arc::clone(&second);
                async move {
                    order.lock().unwrap().push("second");
                    Ok(())
                }
            });

        dispatcher.startup().await.unwrap();
        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_startup_stops_at_first_failure() {
        let ran_last = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&ran_last);

        let dispatcher = Dispatcher::new(RouteMap::<&'static str>::new())
            .on_startup(|| async { Err::<(), BoxError>("boom".into()) })
            .on_startup(move || {
                let flag = Arc::clone(&flag);
                async move {
                    *flag.lock().unwrap() = true;
                    Ok(())
                }
            });

        let err = dispatcher.startup().await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert!(!*ran_last.lock().unwrap());
    }

    #[tokio::test]
    async fn test_shutdown_hooks_run() {
        let closed = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&closed);

        let dispatcher = Dispatcher::new(RouteMap::<&'static str>::new()).on_shutdown(move || {
            let flag = Arc::clone(&flag);
            async move {
                *flag.lock().unwrap() = true;
                Ok(())
            }
        });

        dispatcher.shutdown().await.unwrap();
        assert!(*closed.lock().unwrap());
    }

    #[test]
    fn test_dispatch_coerces_declared_parameter_kinds() {
        let dispatcher = sample_dispatcher();
        let mut scope = Scope::http(Method::Get, "/items/42");

        let dispatch = dispatcher.dispatch(&mut scope).unwrap();
        assert_eq!(*dispatch.handler, "item");
        assert_eq!(dispatch.path_params["id"], ParamValue::Int(42));
    }

    #[test]
    fn test_dispatch_rejects_uncoercible_values() {
        let dispatcher = sample_dispatcher();
        let mut scope = Scope::http(Method::Get, "/items/not-a-number");

        let err = dispatcher.dispatch(&mut scope).unwrap_err();
        assert!(matches!(err, DispatchError::Params(_)));
    }

    #[test]
    fn test_dispatch_propagates_resolution_failures() {
        let dispatcher = sample_dispatcher();
        let mut scope = Scope::http(Method::Get, "/missing");

        match dispatcher.dispatch(&mut scope).unwrap_err() {
            DispatchError::Resolve(err) => assert!(err.is_not_found()),
            other => panic!("expected resolve error, got {other:?}"),
        }
    }

    #[test]
    fn test_dispatcher_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Dispatcher<usize>>();
    }
}
