//! The route engine: owner of the active route snapshot.

use {
    super::{
        builder::{RouteBuilder, RouteSnapshot},
        pattern::compile,
        registry::{HandlerRegistry, StaticRegistry},
        resolver::Resolution,
        table::RouteEntry,
    },
    crate::{Config, Result, RoutingConfig},
    arc_swap::ArcSwapOption,
    std::sync::{Arc, Mutex, PoisonError},
};

/// Resolves routes against a lazily built, atomically swappable snapshot.
///
/// Readers load the current snapshot without locking. Builds happen under a
/// single writer lock and publish the finished snapshot with one atomic
/// store, so in-flight resolutions never observe a partially built tree.
///
/// ```rust
/// use route_conf::{RouteEngine, RoutingConfig, StaticRegistry};
///
/// let registry = StaticRegistry::new().with_handler("Items", ["index", "show"]);
/// let engine = RouteEngine::new(registry, RoutingConfig::default())
///     .with_route("/items/<id>", "Items", "show")
///     .unwrap();
///
/// let resolution = engine.resolve("/items/42?tab=1").unwrap().unwrap();
/// assert_eq!(resolution.action, "show");
/// assert_eq!(resolution.param("id"), Some("42"));
///
/// assert!(engine.resolve("/nowhere").unwrap().is_none());
/// ```
pub struct RouteEngine {
    registry: Arc<dyn HandlerRegistry>,
    config: RoutingConfig,
    manual: Vec<RouteEntry>,
    snapshot: ArcSwapOption<RouteSnapshot>,
    writer: Mutex<()>,
}

impl RouteEngine {
    pub fn new(registry: impl HandlerRegistry + 'static, config: RoutingConfig) -> Self {
        Self::with_registry(Arc::new(registry), config)
    }

    /// Creates an engine around a shared registry.
    pub fn with_registry(registry: Arc<dyn HandlerRegistry>, config: RoutingConfig) -> Self {
        Self {
            registry,
            config,
            manual: Vec::new(),
            snapshot: ArcSwapOption::empty(),
            writer: Mutex::new(()),
        }
    }

    /// Creates an engine whose registry is the `[handlers]` table.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            StaticRegistry::from(&config.handlers),
            config.routing.clone(),
        )
    }

    /// Registers a route programmatically.
    ///
    /// Manual routes replace auto-discovered ones for the same pattern and
    /// are replaced by `[routing.routes]` overrides. Call [`Self::rebuild`]
    /// if the engine has already been used.
    ///
    /// # Errors
    ///
    /// Returns a malformed pattern error when `pattern` does not compile.
    pub fn with_route(mut self, pattern: &str, handler: &str, action: &str) -> Result<Self> {
        let pattern = compile(pattern)?;
        self.manual.push(RouteEntry::new(pattern, handler, action));
        Ok(self)
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// True once a snapshot has been published.
    pub fn is_built(&self) -> bool {
        self.snapshot.load().is_some()
    }

    /// The active snapshot, building it on first use.
    pub fn snapshot(&self) -> Arc<RouteSnapshot> {
        if let Some(snapshot) = self.snapshot.load_full() {
            return snapshot;
        }

        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have built while we waited for the lock.
        if let Some(snapshot) = self.snapshot.load_full() {
            return snapshot;
        }
        self.publish()
    }

    /// Builds a fresh snapshot and swaps it in.
    ///
    /// Resolutions already holding the previous snapshot finish against it.
    pub fn rebuild(&self) -> Arc<RouteSnapshot> {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        self.publish()
    }

    fn publish(&self) -> Arc<RouteSnapshot> {
        let snapshot = Arc::new(
            RouteBuilder::new(self.registry.as_ref(), &self.config)
                .with_manual_routes(&self.manual)
                .build(),
        );
        self.snapshot.store(Some(Arc::clone(&snapshot)));
        snapshot
    }

    /// Resolves a path route. `Ok(None)` means no route matched.
    pub fn resolve(&self, route: &str) -> Result<Option<Resolution>> {
        self.snapshot().resolve(route)
    }

    /// Resolves a path that carries no query component.
    pub fn resolve_path(&self, path: &str) -> Result<Option<Resolution>> {
        self.snapshot().resolve_path(path)
    }

    /// Resolves a `Handler:action` chain.
    pub fn resolve_qualified(&self, route: &str) -> Result<Option<Resolution>> {
        self.snapshot().resolve_qualified(route)
    }

    /// Resolves either form, see [`RouteSnapshot::resolve_any`].
    pub fn resolve_any(&self, route: &str) -> Result<Option<Resolution>> {
        self.snapshot().resolve_any(route)
    }

    /// Resolves either form for a path without query, such as a decoded
    /// request path.
    pub fn resolve_any_path(&self, path: &str) -> Result<Option<Resolution>> {
        self.snapshot().resolve_any_path(path)
    }
}

impl std::fmt::Debug for RouteEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteEngine")
            .field("config", &self.config)
            .field("manual", &self.manual)
            .field("built", &self.is_built())
            .finish()
    }
}
