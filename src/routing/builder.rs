//! Route table and tree construction.
//!
//! Entries are registered in four passes, each able to replace what an
//! earlier pass registered for the same literal pattern string:
//!
//! 1. auto-discovered `(handler, action)` pairs from the [`HandlerRegistry`]
//! 2. routes registered programmatically on the engine
//! 3. explicit overrides from `[routing.routes]`
//! 4. default routes (the root route), only where nothing claims the pattern
//!
//! Every resulting entry is then inserted into the [`RouteTree`].

use {
    super::{
        pattern::compile,
        registry::{HandlerRegistry, handler_base_name, is_reserved_action},
        table::{RouteEntry, RouteTable},
        tree::RouteTree,
    },
    crate::{RouteTarget, RoutingConfig},
    std::collections::BTreeSet,
};

/// Immutable result of a build: the route table, the route tree and the set
/// of discovered `(handler, action)` pairs.
///
/// Snapshots compare structurally, so two builds from the same inputs are
/// equal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteSnapshot {
    pub(crate) table: RouteTable,
    pub(crate) tree: RouteTree,
    pub(crate) actions: BTreeSet<(String, String)>,
}

impl RouteSnapshot {
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn tree(&self) -> &RouteTree {
        &self.tree
    }

    /// True when the registry exposed `action` on `handler` (by base name).
    pub fn has_action(&self, handler: &str, action: &str) -> bool {
        self.actions.contains(&(handler.to_string(), action.to_string()))
    }
}

/// The path a discovered action is reachable under.
///
/// `index` maps to `/` + the lowercased handler name, any other action to
/// `/` + lowercased handler name + `/` + action.
///
/// ```rust
/// use route_conf::default_pattern;
///
/// assert_eq!(default_pattern("TestList", "index"), "/testlist");
/// assert_eq!(default_pattern("TestList", "show"), "/testlist/show");
/// ```
pub fn default_pattern(handler: &str, action: &str) -> String {
    let base = handler.to_lowercase();
    if action == "index" {
        format!("/{base}")
    } else {
        format!("/{base}/{action}")
    }
}

/// Builds [`RouteSnapshot`]s from a registry and routing configuration.
pub struct RouteBuilder<'a> {
    registry: &'a dyn HandlerRegistry,
    config: &'a RoutingConfig,
    manual: &'a [RouteEntry],
}

impl<'a> RouteBuilder<'a> {
    pub fn new(registry: &'a dyn HandlerRegistry, config: &'a RoutingConfig) -> Self {
        Self {
            registry,
            config,
            manual: &[],
        }
    }

    /// Entries registered programmatically, applied after discovery.
    pub fn with_manual_routes(mut self, manual: &'a [RouteEntry]) -> Self {
        self.manual = manual;
        self
    }

    /// Runs all registration passes and returns the finished snapshot.
    ///
    /// Never fails as a whole: a handler whose actions cannot be listed, or
    /// a pattern that does not compile, is logged and skipped.
    pub fn build(&self) -> RouteSnapshot {
        let mut snapshot = RouteSnapshot::default();

        self.discover(&mut snapshot);

        for entry in self.manual {
            insert_entry(&mut snapshot.table, entry.clone(), "manual");
        }

        for (pattern, target) in self.config.routes.iter() {
            register(&mut snapshot.table, pattern, target, "override");
        }

        for (pattern, target) in self.config.default_routes().iter() {
            let Some(entry) = compile_entry(pattern, target, "default") else {
                continue;
            };
            match snapshot.table.insert_if_absent(entry) {
                Ok(true) => {}
                Ok(false) => {
                    tracing::debug!(
                        pattern,
                        "Default route already claimed, keeping existing entry"
                    );
                }
                Err(err) => {
                    tracing::warn!(
                        pattern,
                        error = %err,
                        "Skipping default route that failed to compile"
                    );
                }
            }
        }

        for entry in snapshot.table.iter() {
            if let Err(err) = snapshot.tree.insert(entry.clone()) {
                tracing::warn!(
                    pattern = %entry.pattern,
                    error = %err,
                    "Route left out of the route tree, still reachable by pattern"
                );
            }
        }

        tracing::info!(
            routes = snapshot.table.len(),
            terminals = snapshot.tree.len(),
            actions = snapshot.actions.len(),
            "Route table built"
        );
        snapshot
    }

    fn discover(&self, snapshot: &mut RouteSnapshot) {
        let mut reserved = self.registry.reserved_actions();
        reserved.extend(self.config.reserved_actions.iter().cloned());

        for handler_id in self.registry.handlers() {
            let actions = match self.registry.actions(&handler_id) {
                Ok(actions) => actions,
                Err(err) => {
                    tracing::warn!(
                        handler = %handler_id,
                        error = %err,
                        "Skipping handler whose actions could not be listed"
                    );
                    continue;
                }
            };

            let handler = handler_base_name(&handler_id);
            for action in actions {
                if is_reserved_action(&action, &reserved) {
                    continue;
                }
                let pattern = default_pattern(handler, &action);
                let target = RouteTarget::new(handler, action.as_str());
                if register(&mut snapshot.table, &pattern, &target, "discovered") {
                    snapshot.actions.insert((handler.to_string(), action));
                }
            }
        }
    }
}

fn register(table: &mut RouteTable, pattern: &str, target: &RouteTarget, source: &str) -> bool {
    compile_entry(pattern, target, source).is_some_and(|entry| insert_entry(table, entry, source))
}

fn compile_entry(pattern: &str, target: &RouteTarget, source: &str) -> Option<RouteEntry> {
    match compile(pattern) {
        Ok(compiled) => Some(RouteEntry::new(compiled, &target.handler, &target.action)),
        Err(err) => {
            tracing::warn!(
                pattern,
                handler = %target.handler,
                action = %target.action,
                source,
                error = %err,
                "Skipping route with malformed pattern"
            );
            None
        }
    }
}

fn insert_entry(table: &mut RouteTable, entry: RouteEntry, source: &str) -> bool {
    let pattern = entry.pattern.to_string();
    match table.insert(entry) {
        Ok(Some(previous)) => {
            tracing::debug!(
                pattern = %pattern,
                source,
                replaced_handler = %previous.handler,
                replaced_action = %previous.action,
                "Route replaced"
            );
            true
        }
        Ok(None) => true,
        Err(err) => {
            tracing::warn!(
                pattern = %pattern,
                source,
                error = %err,
                "Skipping route that failed to compile"
            );
            false
        }
    }
}
