//! Route table with path-template normalization and matching.
//!
//! Path templates may be written with either `{name}` or `:name`
//! placeholders; both normalize to the `{name}` form at registration time,
//! so matching never parses templates per request.

use std::collections::HashMap;

use aquila_core::Route;
use http::Method;

/// One segment of a parsed path template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// A literal segment (e.g. `ratings`).
    Literal(String),
    /// A parameter segment (e.g. `{id}`).
    Param(String),
}

/// Parses a template into segments, accepting both placeholder syntaxes.
fn parse_segments(template: &str) -> Vec<Segment> {
    template
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            if let Some(name) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Segment::Param(name.to_string())
            } else if let Some(name) = segment.strip_prefix(':') {
                Segment::Param(name.to_string())
            } else {
                Segment::Literal(segment.to_string())
            }
        })
        .collect()
}

/// Rewrites a template into the canonical `{name}` placeholder form.
#[must_use]
pub fn normalize_template(template: &str) -> String {
    let segments: Vec<String> = parse_segments(template)
        .into_iter()
        .map(|segment| match segment {
            Segment::Literal(literal) => literal,
            Segment::Param(name) => format!("{{{name}}}"),
        })
        .collect();

    format!("/{}", segments.join("/"))
}

/// A registered route with its parsed template.
#[derive(Debug)]
struct Entry {
    route: Route,
    segments: Vec<Segment>,
}

impl Entry {
    fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let actual: Vec<&str> = path.split('/').filter(|segment| !segment.is_empty()).collect();

        if actual.len() != self.segments.len() {
            return None;
        }

        let mut params = HashMap::new();

        for (expected, segment) in self.segments.iter().zip(actual.iter()) {
            match expected {
                Segment::Literal(literal) => {
                    if literal != segment {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    params.insert(name.clone(), (*segment).to_string());
                }
            }
        }

        Some(params)
    }
}

/// Ordered route table; first match wins.
#[derive(Debug, Default)]
pub struct RouteTable {
    entries: Vec<Entry>,
}

impl RouteTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a route, parsing its template once.
    pub fn add(&mut self, route: Route) {
        let segments = parse_segments(route.path());
        self.entries.push(Entry { route, segments });
    }

    /// Returns the number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Matches a request, returning the route and its extracted parameters.
    #[must_use]
    pub fn find(&self, method: &Method, path: &str) -> Option<(&Route, HashMap<String, String>)> {
        self.entries
            .iter()
            .filter(|entry| entry.route.method() == method)
            .find_map(|entry| entry.matches(path).map(|params| (&entry.route, params)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(method: Method, path: &str) -> Route {
        Route::new(method, path, |_ctx| async { Ok(None) })
    }

    #[test]
    fn normalization_accepts_both_placeholder_forms() {
        assert_eq!(normalize_template("/ratings/{id}"), "/ratings/{id}");
        assert_eq!(normalize_template("/ratings/:id"), "/ratings/{id}");
        assert_eq!(normalize_template("/a/:x/b/{y}"), "/a/{x}/b/{y}");
        assert_eq!(normalize_template("/ratings"), "/ratings");
    }

    #[test]
    fn colon_and_brace_templates_match_identically() {
        let mut with_brace = RouteTable::new();
        with_brace.add(route(Method::GET, "/ratings/{id}"));

        let mut with_colon = RouteTable::new();
        with_colon.add(route(Method::GET, "/ratings/:id"));

        for table in [&with_brace, &with_colon] {
            let (_, params) = table.find(&Method::GET, "/ratings/42").unwrap();
            assert_eq!(params["id"], "42");
        }
    }

    #[test]
    fn static_match_without_params() {
        let mut table = RouteTable::new();
        table.add(route(Method::GET, "/api/v1/ratings"));

        let (matched, params) = table.find(&Method::GET, "/api/v1/ratings").unwrap();
        assert_eq!(matched.path(), "/api/v1/ratings");
        assert!(params.is_empty());
    }

    #[test]
    fn method_mismatch_does_not_match() {
        let mut table = RouteTable::new();
        table.add(route(Method::GET, "/ratings"));
        assert!(table.find(&Method::POST, "/ratings").is_none());
    }

    #[test]
    fn segment_count_mismatch_does_not_match() {
        let mut table = RouteTable::new();
        table.add(route(Method::GET, "/ratings/{id}"));
        assert!(table.find(&Method::GET, "/ratings").is_none());
        assert!(table.find(&Method::GET, "/ratings/1/extra").is_none());
    }

    #[test]
    fn same_path_different_methods_coexist() {
        let mut table = RouteTable::new();
        table.add(route(Method::GET, "/ratings"));
        table.add(route(Method::POST, "/ratings"));

        assert!(table.find(&Method::GET, "/ratings").is_some());
        assert!(table.find(&Method::POST, "/ratings").is_some());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn trailing_slash_is_tolerated() {
        let mut table = RouteTable::new();
        table.add(route(Method::GET, "/ratings"));
        assert!(table.find(&Method::GET, "/ratings/").is_some());
    }
}
