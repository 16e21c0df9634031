//! Handler registry interface.
//!
//! The route builder never discovers handlers on its own. It asks an injected
//! [`HandlerRegistry`] which handlers exist and which actions each exposes.

use {
    crate::{Error, OrderedTable, Result},
    std::sync::Arc,
};

/// Action names that are part of the handler lifecycle and never routable.
pub const RESERVED_ACTIONS: &[&str] = &[
    "initialize",
    "set",
    "get_view_vars",
    "set_layout",
    "get_layout",
    "load_model",
    "load_component",
];

/// Source of handler identifiers and their exposed action names.
///
/// Implementations must be cheap to query repeatedly: the builder enumerates
/// the registry on every rebuild.
pub trait HandlerRegistry: Send + Sync {
    /// All handler identifiers, in the order their routes should be registered.
    fn handlers(&self) -> Vec<String>;

    /// Action names exposed by `handler`.
    ///
    /// Errors are contained by the builder: a failing handler is logged and
    /// skipped while the rest of the table still builds.
    fn actions(&self, handler: &str) -> Result<Vec<String>>;

    /// Names that must never be treated as routable actions.
    fn reserved_actions(&self) -> Vec<String> {
        RESERVED_ACTIONS.iter().map(ToString::to_string).collect()
    }
}

impl<T: HandlerRegistry + ?Sized> HandlerRegistry for Arc<T> {
    fn handlers(&self) -> Vec<String> {
        (**self).handlers()
    }

    fn actions(&self, handler: &str) -> Result<Vec<String>> {
        (**self).actions(handler)
    }

    fn reserved_actions(&self) -> Vec<String> {
        (**self).reserved_actions()
    }
}

/// True for names starting with `_` or listed in `reserved`.
pub fn is_reserved_action(name: &str, reserved: &[String]) -> bool {
    name.starts_with('_') || reserved.iter().any(|r| r == name)
}

/// Strips a trailing `Controller` from a handler identifier.
///
/// ```rust
/// use route_conf::handler_base_name;
///
/// assert_eq!(handler_base_name("TestListController"), "TestList");
/// assert_eq!(handler_base_name("Home"), "Home");
/// assert_eq!(handler_base_name("Controller"), "Controller");
/// ```
pub fn handler_base_name(handler: &str) -> &str {
    handler
        .strip_suffix("Controller")
        .filter(|base| !base.is_empty())
        .unwrap_or(handler)
}

/// In-memory registry, filled programmatically or from the `[handlers]`
/// configuration table.
///
/// ```rust
/// use route_conf::{HandlerRegistry, StaticRegistry};
///
/// let registry = StaticRegistry::new()
///     .with_handler("Home", ["index", "about"])
///     .with_handler("Items", ["index", "show"]);
///
/// assert_eq!(registry.handlers(), ["Home", "Items"]);
/// assert_eq!(registry.actions("Home").unwrap(), ["index", "about"]);
/// assert!(registry.actions("Missing").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    handlers: OrderedTable<Vec<String>>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a handler, replacing its actions if it was already registered.
    pub fn with_handler<I, S>(mut self, handler: impl Into<String>, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.handlers
            .insert(handler.into(), actions.into_iter().map(Into::into).collect());
        self
    }
}

impl From<&OrderedTable<Vec<String>>> for StaticRegistry {
    fn from(handlers: &OrderedTable<Vec<String>>) -> Self {
        Self {
            handlers: handlers.clone(),
        }
    }
}

impl HandlerRegistry for StaticRegistry {
    fn handlers(&self) -> Vec<String> {
        self.handlers.keys().map(ToString::to_string).collect()
    }

    fn actions(&self, handler: &str) -> Result<Vec<String>> {
        self.handlers
            .get(handler)
            .cloned()
            .ok_or_else(|| Error::registry(format!("Unknown handler `{handler}`")))
    }
}
