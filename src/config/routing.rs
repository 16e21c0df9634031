use {
    super::OrderedTable,
    crate::{Error, Result, routing::compile},
    serde::Deserialize,
};

///
/// Target of a configured route: the handler to invoke and one of its actions.
///
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RouteTarget {
    pub handler: String,

    /// Action on the handler. Defaults to "index".
    #[serde(default = "RoutingConfig::default_action")]
    pub action: String,
}

impl RouteTarget {
    pub fn new(handler: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            handler: handler.into(),
            action: action.into(),
        }
    }

    fn validate(&self, pattern: &str) -> Result<()> {
        if self.handler.trim().is_empty() {
            return Err(Error::config(format!(
                "Route `{pattern}` has an empty handler. Set handler = \"Name\" in [routing.routes]."
            )));
        }
        if self.action.trim().is_empty() {
            return Err(Error::config(format!(
                "Route `{pattern}` has an empty action. Omit action to use \"index\"."
            )));
        }
        Ok(())
    }
}

///
/// Configuration of the route table.
///
/// Auto-discovered routes come from the handler registry. This section adds
/// explicit overrides, which win over discovered routes for the same pattern
/// string, and the target of the root route, which only applies when nothing
/// else claims `/`.
///
#[derive(Debug, Clone, Deserialize)]
pub struct RoutingConfig {
    /// Handler of the fallback root route.
    /// The default `default_handler` is "Home".
    #[serde(default = "RoutingConfig::default_handler")]
    pub default_handler: String,

    /// Action of the fallback root route.
    /// The default `default_action` is "index".
    #[serde(default = "RoutingConfig::default_action")]
    pub default_action: String,

    /// Extra action names that must never become routes, on top of the
    /// names the handler registry reserves.
    #[serde(default)]
    pub reserved_actions: Vec<String>,

    /// Explicit pattern overrides, in declaration order.
    #[serde(default)]
    pub routes: OrderedTable<RouteTarget>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            default_handler: Self::default_handler(),
            default_action: Self::default_action(),
            reserved_actions: Vec::new(),
            routes: OrderedTable::new(),
        }
    }
}

impl RoutingConfig {
    fn default_handler() -> String {
        "Home".into()
    }

    fn default_action() -> String {
        "index".into()
    }

    /// Routes applied only when no other entry claims their pattern.
    pub fn default_routes(&self) -> OrderedTable<RouteTarget> {
        [(
            "/",
            RouteTarget::new(&self.default_handler, &self.default_action),
        )]
        .into_iter()
        .collect()
    }

    pub fn validate(&self) -> Result<()> {
        RouteTarget::new(&self.default_handler, &self.default_action)
            .validate("/")
            .map_err(|_| {
                Error::config(
                    "[routing] default_handler and default_action must not be empty.",
                )
            })?;

        for (pattern, target) in self.routes.iter() {
            compile(pattern).map_err(|err| {
                Error::config(format!("Invalid route in [routing.routes]: {err}"))
            })?;
            target.validate(pattern)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RoutingConfig::default();
        assert_eq!(config.default_handler, "Home");
        assert_eq!(config.default_action, "index");
        assert!(config.routes.is_empty());

        let defaults = config.default_routes();
        assert_eq!(defaults.get("/"), Some(&RouteTarget::new("Home", "index")));
    }

    #[test]
    fn test_route_target_action_defaults_to_index() {
        let target: RouteTarget = toml::from_str(r#"handler = "Items""#).unwrap();
        assert_eq!(target, RouteTarget::new("Items", "index"));
    }

    #[test]
    fn test_validate_rejects_malformed_override() {
        let mut config = RoutingConfig::default();
        config
            .routes
            .insert("/items/<>", RouteTarget::new("Items", "show"));
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Configuration);
        assert!(err.to_string().contains("/items/<>"));
    }

    #[test]
    fn test_validate_rejects_empty_handler() {
        let mut config = RoutingConfig::default();
        config.routes.insert("/x", RouteTarget::new(" ", "index"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_default() {
        let config = RoutingConfig {
            default_handler: String::new(),
            ..RoutingConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
