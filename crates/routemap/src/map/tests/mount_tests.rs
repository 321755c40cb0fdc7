// Unit tests for mounted sub-applications and path absorption

use crate::{Method, RouteDescriptor, RouteMap, Scope};

fn mounted(prefix: &str) -> RouteMap<&'static str> {
    let mut map = RouteMap::new();
    map.add_route(RouteDescriptor::mount(prefix, "files").unwrap()).unwrap();
    map
}

#[test]
fn test_mount_absorbs_deeper_segments_and_rewrites_path() {
    let map = mounted("/static");
    let mut scope = Scope::http(Method::Get, "/static/css/app.css");

    let matched = map.resolve(&mut scope).unwrap();
    assert_eq!(*matched.handler, "files");
    assert_eq!(scope.path, "/css/app.css");
    assert!(scope.path_params.is_empty());
}

#[test]
fn test_mount_exact_path_does_not_rewrite() {
    let map = mounted("/static");
    let mut scope = Scope::http(Method::Get, "/static");

    assert_eq!(*map.resolve(&mut scope).unwrap().handler, "files");
    assert_eq!(scope.path, "/static");
}

#[test]
fn test_root_mount_absorbs_without_rewriting() {
    let map = mounted("/");
    let mut scope = Scope::http(Method::Get, "/anything/goes/here");

    assert_eq!(*map.resolve(&mut scope).unwrap().handler, "files");
    assert_eq!(scope.path, "/anything/goes/here");
}

#[test]
fn test_mount_intercepts_websocket_scopes() {
    let map = mounted("/static");
    let mut scope = Scope::websocket("/static/live");

    assert_eq!(*map.resolve(&mut scope).unwrap().handler, "files");
    assert_eq!(scope.path, "/live");
}

#[test]
fn test_mount_intercepts_any_method() {
    let map = mounted("/static");
    let mut scope = Scope::http(Method::Delete, "/static/css/app.css");

    assert_eq!(*map.resolve(&mut scope).unwrap().handler, "files");
}

#[test]
fn test_literal_route_under_mount_wins() {
    let mut map = RouteMap::new();
    map.add_routes([
        RouteDescriptor::mount("/static", "files").unwrap(),
        RouteDescriptor::http("/static/health", [(Method::Get, "health")]).unwrap(),
    ])
    .unwrap();

    let mut scope = Scope::http(Method::Get, "/static/health");
    assert_eq!(*map.resolve(&mut scope).unwrap().handler, "health");
    assert_eq!(scope.path, "/static/health");
}

#[test]
fn test_parameterized_route_under_mount_wins() {
    let mut map = RouteMap::new();
    map.add_routes([
        RouteDescriptor::mount("/static", "files").unwrap(),
        RouteDescriptor::http("/static/tags/{tag}", [(Method::Get, "tag")]).unwrap(),
    ])
    .unwrap();

    let mut scope = Scope::http(Method::Get, "/static/tags/rust");
    assert_eq!(*map.resolve(&mut scope).unwrap().handler, "tag");
    assert_eq!(scope.path_params["tag"], "rust");
}

#[test]
fn test_prefix_is_replaced_everywhere_in_the_path() {
    // Absorption rewrites with a plain substring replacement, so a repeated
    // prefix disappears from the rewritten path as well.
    let map = mounted("/static");
    let mut scope = Scope::http(Method::Get, "/static/a/static/b");

    assert_eq!(*map.resolve(&mut scope).unwrap().handler, "files");
    assert_eq!(scope.path, "/a/b");
}

#[test]
fn test_rewrite_persists_when_a_deeper_branch_misses() {
    // Absorption at the mount node rewrites the scope before a later literal
    // descent can still fail; the rewrite is not rolled back.
    let mut map = RouteMap::new();
    map.add_routes([
        RouteDescriptor::mount("/static", "files").unwrap(),
        RouteDescriptor::http("/static/css/{name}", [(Method::Get, "css")]).unwrap(),
    ])
    .unwrap();

    let mut scope = Scope::http(Method::Get, "/static/misc/css/deep/miss");
    assert!(map.resolve(&mut scope).unwrap_err().is_not_found());
    assert_eq!(scope.path, "/misc/css/deep/miss");
}

#[test]
fn test_app_route_intercepts_both_scope_kinds_at_exact_path() {
    let mut map = RouteMap::new();
    map.add_route(RouteDescriptor::app("/admin", "admin").unwrap()).unwrap();

    let mut scope = Scope::http(Method::Post, "/admin");
    assert_eq!(*map.resolve(&mut scope).unwrap().handler, "admin");

    let mut scope = Scope::websocket("/admin");
    assert_eq!(*map.resolve(&mut scope).unwrap().handler, "admin");
}

#[test]
fn test_app_route_does_not_absorb_deeper_paths() {
    let mut map = RouteMap::new();
    map.add_route(RouteDescriptor::app("/admin", "admin").unwrap()).unwrap();

    let mut scope = Scope::http(Method::Get, "/admin/deeper");
    assert!(map.resolve(&mut scope).unwrap_err().is_not_found());
    assert_eq!(scope.path, "/admin/deeper");
}

#[test]
fn test_app_route_with_parameters_matches_exactly() {
    let mut map = RouteMap::new();
    map.add_route(RouteDescriptor::app("/apps/{name}", "sub").unwrap()).unwrap();

    let mut scope = Scope::websocket("/apps/wiki");
    assert_eq!(*map.resolve(&mut scope).unwrap().handler, "sub");
    assert_eq!(scope.path_params["name"], "wiki");

    let mut scope = Scope::http(Method::Get, "/apps/wiki/page");
    assert!(map.resolve(&mut scope).unwrap_err().is_not_found());
}