//! Serving resolved routes over HTTP.
//!
//! [`route_service`] turns a [`RouteEngine`] into an axum [`Router`] whose
//! fallback resolves every request URI and hands the [`Resolution`] to a
//! [`Dispatcher`]. The dispatcher decides what a `(handler, action)` pair
//! means for the application.
//!
//! Each path segment is percent-decoded before resolution, the same way
//! axum's `Path` extractor decodes parameters, so `/items/caf%C3%A9` binds
//! `id = "café"`. A segment that decodes to invalid UTF-8 or that contains
//! an encoded `/` (`%2F`) is rejected as an invalid route, since the
//! decoded path could no longer be split back into the segments the client
//! sent. The query string never takes part in resolution.
//!
//! ```rust
//! use axum::response::{IntoResponse, Response};
//! use route_conf::{Resolution, RouteEngine, RoutingConfig, StaticRegistry, route_service};
//! use std::sync::Arc;
//!
//! async fn render(resolution: Resolution) -> Response {
//!     format!("{}::{}", resolution.handler, resolution.action).into_response()
//! }
//!
//! let registry = StaticRegistry::new().with_handler("HomeController", ["index", "about"]);
//! let engine = Arc::new(RouteEngine::new(registry, RoutingConfig::default()));
//! let app: axum::Router = route_service(engine, render);
//! ```

use {
    crate::{Error, ErrorResponse, Resolution, Result, RouteEngine},
    axum::{
        Json, Router,
        extract::State,
        response::{IntoResponse, Response},
    },
    http::{StatusCode, Uri},
    percent_encoding::percent_decode_str,
    std::{future::Future, sync::Arc},
};

/// Turns resolved routes into responses.
pub trait Dispatcher: Send + Sync + 'static {
    /// Produces the response for a route that resolved.
    fn dispatch(&self, resolution: Resolution) -> impl Future<Output = Response> + Send;

    /// Produces the response for a route that matched nothing.
    fn not_found(&self, route: &str) -> Response {
        let body =
            ErrorResponse::new("NOT_FOUND", "No route matches the request").with_details(route);
        (StatusCode::NOT_FOUND, Json(body)).into_response()
    }
}

impl<F, Fut> Dispatcher for F
where
    F: Fn(Resolution) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send,
{
    fn dispatch(&self, resolution: Resolution) -> impl Future<Output = Response> + Send {
        self(resolution)
    }
}

struct DispatchState<D> {
    engine: Arc<RouteEngine>,
    dispatcher: Arc<D>,
}

// Derived Clone would require `D: Clone`.
impl<D> Clone for DispatchState<D> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            dispatcher: Arc::clone(&self.dispatcher),
        }
    }
}

/// Creates a router that resolves every request through `engine`.
///
/// Hits go to [`Dispatcher::dispatch`], misses to [`Dispatcher::not_found`]
/// and invalid routes are answered with the error's own response (400).
/// The returned router can be merged or nested like any other axum router;
/// routes registered on it directly take precedence over the fallback.
pub fn route_service<D: Dispatcher>(engine: Arc<RouteEngine>, dispatcher: D) -> Router {
    let state = DispatchState {
        engine,
        dispatcher: Arc::new(dispatcher),
    };
    Router::new().fallback(resolve_request::<D>).with_state(state)
}

async fn resolve_request<D: Dispatcher>(
    State(state): State<DispatchState<D>>,
    uri: Uri,
) -> Response {
    let path = match decode_path(uri.path()) {
        Ok(path) => path,
        Err(err) => return err.into_response(),
    };

    match state.engine.resolve_any_path(&path) {
        Ok(Some(resolution)) => {
            tracing::debug!(
                route = %path,
                handler = %resolution.handler,
                action = %resolution.action,
                "Dispatching request"
            );
            state.dispatcher.dispatch(resolution).await
        }
        Ok(None) => state.dispatcher.not_found(&path),
        Err(err) => err.into_response(),
    }
}

/// Percent-decodes every segment of a request path.
fn decode_path(path: &str) -> Result<String> {
    let segments = path
        .split('/')
        .map(|segment| -> Result<_> {
            let decoded = percent_decode_str(segment).decode_utf8().map_err(|_| {
                Error::invalid_route(format!(
                    "segment `{segment}` is not valid UTF-8 once decoded"
                ))
            })?;
            if decoded.contains('/') {
                return Err(Error::invalid_route(format!("segment `{segment}` encodes a `/`")));
            }
            Ok(decoded)
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RoutingConfig, StaticRegistry};
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    struct Teapot;

    impl Dispatcher for Teapot {
        async fn dispatch(&self, _resolution: Resolution) -> Response {
            StatusCode::OK.into_response()
        }

        fn not_found(&self, _route: &str) -> Response {
            StatusCode::IM_A_TEAPOT.into_response()
        }
    }

    fn engine() -> Arc<RouteEngine> {
        Arc::new(RouteEngine::new(
            StaticRegistry::new().with_handler("Home", ["index"]),
            RoutingConfig::default(),
        ))
    }

    #[tokio::test]
    async fn test_custom_not_found() {
        let app = route_service(engine(), Teapot);
        let response = app
            .oneshot(Request::get("/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test]
    async fn test_custom_dispatch() {
        let app = route_service(engine(), Teapot);
        let response = app
            .oneshot(Request::get("/home?x=1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_decode_path() {
        assert_eq!(decode_path("/items/caf%C3%A9").unwrap(), "/items/café");
        assert_eq!(decode_path("/items/a%20b").unwrap(), "/items/a b");
        assert_eq!(decode_path("/items/a%3Fb").unwrap(), "/items/a?b");
        assert_eq!(decode_path("/plain/path").unwrap(), "/plain/path");
        assert_eq!(decode_path("/").unwrap(), "/");
    }

    #[test]
    fn test_decode_path_rejects_bad_segments() {
        let err = decode_path("/items/a%2Fb").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InvalidRoute);
        let err = decode_path("/items/%FF").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InvalidRoute);
    }
}
