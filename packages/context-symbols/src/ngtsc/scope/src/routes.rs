// Routes
//
// Route configurations passed as `ANALYZE_FOR_ENTRY_COMPONENTS` values:
// `loadChildren` strings found in route objects and their `children`.

use crate::ngtsc::partial_evaluator::MetadataValue;

/// A lazily loaded route as written in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTarget {
    pub path: Option<String>,
    pub load_children: String,
}

/// Every `loadChildren` string in a route tree, depth first in source order.
pub fn collect_route_targets(value: &MetadataValue) -> Vec<RouteTarget> {
    let mut out = Vec::new();
    collect_into(value, &mut out);
    out
}

fn collect_into(value: &MetadataValue, out: &mut Vec<RouteTarget>) {
    match value {
        MetadataValue::Array(routes) => routes.iter().for_each(|route| collect_into(route, out)),
        MetadataValue::Object(route) => {
            if let Some(MetadataValue::String(load_children)) = route.get("loadChildren") {
                out.push(RouteTarget {
                    path: route
                        .get("path")
                        .and_then(MetadataValue::as_str)
                        .map(str::to_string),
                    load_children: load_children.clone(),
                });
            }
            if let Some(children) = route.get("children") {
                collect_into(children, out);
            }
        }
        _ => {}
    }
}

/// Split `"./lazy/lazy.module#LazyModule"` into module path and export name.
/// Without `#` the default export is meant.
pub fn parse_load_children(load_children: &str) -> (&str, &str) {
    match load_children.split_once('#') {
        Some((path, name)) if !name.is_empty() => (path, name),
        Some((path, _)) => (path, "default"),
        None => (load_children, "default"),
    }
}
