//! # route-conf
//!
//! A route table and resolver for handler/action style web applications,
//! configured through TOML.
//!
//! Route patterns are literal paths whose segments may be `<name>`
//! placeholders, for example `/users/<user>/posts/<post>`. Patterns come from
//! three places, later ones replacing earlier ones for the same pattern:
//!
//! 1. auto-discovery: every routable action of every handler in a
//!    [`HandlerRegistry`] gets `/handler` (for `index`) or `/handler/action`
//! 2. routes registered on the engine with [`RouteEngine::with_route`]
//! 3. overrides from the `[routing.routes]` table
//!
//! The root route `/` falls back to the configured default handler and
//! action when nothing else claims it.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use axum::response::{IntoResponse, Response};
//! use route_conf::{Config, Resolution, Result, RouteEngine, route_service};
//! use std::sync::Arc;
//!
//! async fn render(resolution: Resolution) -> Response {
//!     format!("{}::{} {:?}", resolution.handler, resolution.action, resolution.params)
//!         .into_response()
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::default(); // Loads from config/{RUST_ENV}.toml
//!     config.validate()?;
//!     config.setup_tracing();
//!
//!     let engine = Arc::new(RouteEngine::from_config(&config));
//!     let app = route_service(engine, render);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! With `config/dev.toml`:
//! ```toml
//! [routing]
//! default_handler = "Home"
//!
//! [routing.routes]
//! "/items/<id>" = { handler = "Items", action = "show" }
//!
//! [handlers]
//! HomeController = ["index", "about"]
//! ItemsController = ["index", "show"]
//! ```
//!
//! # Resolution
//!
//! A route is resolved by exact lookup first, then by the anchored regex of
//! each parameterized pattern in registration order, then by a backtracking
//! walk of the route tree. A route that matches nothing resolves to
//! `Ok(None)`:
//!
//! ```rust
//! use route_conf::{Resolution, RouteEngine, RoutingConfig, StaticRegistry};
//!
//! let registry = StaticRegistry::new().with_handler("HomeController", ["index", "about"]);
//! let engine = RouteEngine::new(registry, RoutingConfig::default());
//!
//! assert_eq!(
//!     engine.resolve("/home/about/?ref=nav").unwrap(),
//!     Some(Resolution::new("Home", "about"))
//! );
//! assert_eq!(engine.resolve("/").unwrap(), Some(Resolution::new("Home", "index")));
//! assert_eq!(engine.resolve("/nowhere").unwrap(), None);
//! ```
//!
//! # Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Configuration loading and validation ([`Config`]) |
//! | [`routing`] | Patterns, route table and tree, resolution ([`RouteEngine`]) |
//! | [`dispatch`] | Serving resolutions through axum ([`route_service`]) |
//! | [`error`] | Error types and handling ([`Error`]) |
mod config;
mod dispatch;
mod error;
mod routing;
mod utils;

pub use config::*;
pub use dispatch::*;
pub use error::*;
pub use routing::*;
pub use utils::*;

pub type Result<T> = std::result::Result<T, Error>;
