//! Route resolution.
//!
//! A route string is normalized and then tried against three tiers, first
//! hit wins:
//!
//! 1. exact lookup of the normalized string in the route table
//! 2. anchored regex of every parameterized pattern, in registration order
//! 3. depth-first walk of the route tree with backtracking
//!
//! A route that matches nothing resolves to `Ok(None)`. Only structurally
//! invalid input is an error.

use {
    super::builder::RouteSnapshot,
    crate::{Error, Result},
    std::collections::HashMap,
};

/// Where a route resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub handler: String,
    pub action: String,
    pub params: HashMap<String, String>,
}

impl Resolution {
    pub fn new(handler: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            handler: handler.into(),
            action: action.into(),
            params: HashMap::new(),
        }
    }

    pub fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    /// Value of a bound parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Drops the query component and a single trailing `/`.
///
/// The empty route and `/` both normalize to `/`.
///
/// # Errors
///
/// [`ErrorKind::InvalidRoute`](crate::ErrorKind::InvalidRoute) when the path
/// contains control characters or does not start with `/`.
///
/// ```rust
/// use route_conf::normalize_route;
///
/// assert_eq!(normalize_route("/items/42/?page=2").unwrap(), "/items/42");
/// assert_eq!(normalize_route("").unwrap(), "/");
/// assert!(normalize_route("items").is_err());
/// ```
pub fn normalize_route(route: &str) -> Result<&str> {
    normalize_path(strip_query(route))
}

fn normalize_path(path: &str) -> Result<&str> {
    reject_control_chars(path)?;

    if path.is_empty() || path == "/" {
        return Ok("/");
    }
    if !path.starts_with('/') {
        return Err(Error::invalid_route(format!(
            "Route `{path}` must start with `/`"
        )));
    }

    let trimmed = path.strip_suffix('/').unwrap_or(path);
    Ok(if trimmed.is_empty() { "/" } else { trimmed })
}

fn strip_query(route: &str) -> &str {
    route.split_once('?').map_or(route, |(path, _)| path)
}

fn reject_control_chars(path: &str) -> Result<()> {
    if path.chars().any(char::is_control) {
        return Err(Error::invalid_route(format!(
            "Route {path:?} contains control characters"
        )));
    }
    Ok(())
}

impl RouteSnapshot {
    /// Resolves a path route against this snapshot.
    pub fn resolve(&self, route: &str) -> Result<Option<Resolution>> {
        self.resolve_path(strip_query(route))
    }

    /// Like [`Self::resolve`] for a path that carries no query component,
    /// such as an already decoded request path. `?` is an ordinary character.
    pub fn resolve_path(&self, path: &str) -> Result<Option<Resolution>> {
        let path = normalize_path(path)?;

        if let Some(entry) = self.table.get(path) {
            tracing::debug!(
                route = path,
                handler = %entry.handler,
                action = %entry.action,
                "Exact route match"
            );
            return Ok(Some(Resolution::new(&entry.handler, &entry.action)));
        }

        if let Some((entry, params)) = self.table.match_regex(path) {
            tracing::debug!(route = path, pattern = %entry.pattern, "Pattern route match");
            return Ok(Some(
                Resolution::new(&entry.handler, &entry.action).with_params(params),
            ));
        }

        let segments: Vec<&str> = match path {
            "/" => Vec::new(),
            _ => path[1..].split('/').collect(),
        };
        if let Some((entry, params)) = self.tree.find(&segments) {
            tracing::debug!(route = path, pattern = %entry.pattern, "Tree route match");
            return Ok(Some(
                Resolution::new(&entry.handler, &entry.action).with_params(params),
            ));
        }

        tracing::debug!(route = path, "No route matched");
        Ok(None)
    }

    /// Resolves a chain of `Handler:action` segments such as
    /// `Home:index/TestList:index`.
    ///
    /// Every qualified segment must name a discovered handler action; the
    /// last one is the result. Segments without `:` are ignored.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::InvalidRoute`](crate::ErrorKind::InvalidRoute) for a
    /// qualified segment that does not split into exactly two non-empty names.
    pub fn resolve_qualified(&self, route: &str) -> Result<Option<Resolution>> {
        self.resolve_qualified_path(strip_query(route))
    }

    fn resolve_qualified_path(&self, path: &str) -> Result<Option<Resolution>> {
        reject_control_chars(path)?;

        let mut last = None;
        for part in path.trim_matches('/').split('/') {
            let Some((handler, action)) = part.split_once(':') else {
                continue;
            };
            if handler.is_empty() || action.is_empty() || action.contains(':') {
                return Err(Error::invalid_route(format!(
                    "Qualified route segment `{part}` must look like `Handler:action`"
                )));
            }
            if !self.has_action(handler, action) {
                tracing::debug!(
                    route = path,
                    handler,
                    action,
                    "Qualified route names an unknown action"
                );
                return Ok(None);
            }
            last = Some((handler, action));
        }

        Ok(last.map(|(handler, action)| Resolution::new(handler, action)))
    }

    /// Resolves either form.
    ///
    /// A route without `:` is a path route. Otherwise the qualified form is
    /// tried first and the path tiers second, so a parameter value such as
    /// `12:30` still reaches `/events/<at>`. A malformed qualified segment is
    /// only reported when the path tiers miss as well.
    pub fn resolve_any(&self, route: &str) -> Result<Option<Resolution>> {
        self.resolve_any_path(strip_query(route))
    }

    /// [`Self::resolve_any`] for a path that carries no query component.
    pub fn resolve_any_path(&self, path: &str) -> Result<Option<Resolution>> {
        if !path.contains(':') {
            return self.resolve_path(path);
        }

        match self.resolve_qualified_path(path) {
            Ok(Some(resolution)) => Ok(Some(resolution)),
            // `Home:index` is a well-formed qualified route even though it is
            // not a valid path, so a path-side error means "not found" here.
            Ok(None) => Ok(self.resolve_path(path).unwrap_or(None)),
            Err(err) => match self.resolve_path(path) {
                Ok(Some(resolution)) => Ok(Some(resolution)),
                _ => Err(err),
            },
        }
    }
}
