//! Server assembly: binds a zarr source to a method-gated route pair,
//! optionally mounted under a name and wrapped in a CORS policy.
//!
//! Assembly ends at a fully configured [`Router`]; socket binding and
//! connection handling belong to the caller.

use anyhow::Context;
use axum::{
    http::HeaderValue,
    routing::{get, MethodRouter},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{get_handler, put_handler};
use crate::routes;
use crate::source::ZarrSource;
use crate::state::AppState;

/// Which HTTP methods a route registers. Derived once from the source's
/// mutability at construction and frozen for the lifetime of the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    ReadOnly,
    ReadWrite,
}

impl AccessPolicy {
    pub fn for_source(source: &ZarrSource) -> Self {
        if source.read_only() {
            Self::ReadOnly
        } else {
            Self::ReadWrite
        }
    }

    /// Permission is enforced by registration alone: an unregistered method
    /// is answered 405 by the router and never dispatched. GET registration
    /// also serves HEAD.
    fn method_router(self) -> MethodRouter<AppState> {
        match self {
            Self::ReadOnly => get(get_handler),
            Self::ReadWrite => get(get_handler).put(put_handler),
        }
    }
}

/// Build the route pair serving one zarr source: the root path plus a
/// wildcard for everything below it, both bound to the method set the
/// source's access policy dictates.
pub fn create_zarr_router(source: &ZarrSource) -> Router {
    let policy = AccessPolicy::for_source(source);
    let state = AppState::new(source.store(), source.key_prefix());
    let methods = policy.method_router();

    Router::new()
        .route(routes::ROOT, methods.clone())
        .route(routes::BLOB, methods)
        .with_state(state)
}

/// Cross-origin policy over the listed origins. The `"*"` wildcard reflects
/// the request origin, since a literal `*` cannot be combined with
/// credentials. Methods and headers are echoed back on preflight.
fn cors_layer(allowed_origins: &[String]) -> anyhow::Result<CorsLayer> {
    let allow_origin = if allowed_origins.iter().any(|origin| origin == "*") {
        AllowOrigin::mirror_request()
    } else {
        let origins = allowed_origins
            .iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("invalid CORS origin: {origin}"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

/// Assemble the complete application for one source.
///
/// A mount name prefixes the outward URL space with `/<name>`; the prefix is
/// stripped before the handlers see the path remainder and never becomes part
/// of a store key. A non-empty origin list installs the CORS policy on every
/// response.
pub fn build_app(
    source: &ZarrSource,
    mount_name: Option<&str>,
    allowed_origins: &[String],
) -> anyhow::Result<Router> {
    let router = create_zarr_router(source);
    let mut app = match mount_name {
        Some(name) => Router::new().nest(&format!("/{name}"), router),
        None => router,
    };
    if !allowed_origins.is_empty() {
        app = app.layer(cors_layer(allowed_origins)?);
    }
    Ok(app.layer(TraceLayer::new_for_http()))
}
