//! Router builder for the posters HTTP server

use std::{sync::Arc, time::Duration};

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware,
    routing::{get, MethodRouter},
    Router,
};
use posters_auth::JwtVerifier;
use posters_kernel::ModuleRegistry;
use tower_http::{
    cors::{Any, CorsLayer},
    normalize_path::NormalizePath,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use uuid::{Timestamp, Uuid};

use crate::auth::require_bearer;

/// Builder for constructing the main HTTP router.
///
/// Module routers are collected under `/api`; middleware is recorded and
/// applied in [`RouterBuilder::build`] so it wraps every route regardless of
/// call order.
pub struct RouterBuilder {
    router: Router,
    api: Option<Router>,
    verifier: Option<Arc<JwtVerifier>>,
    tracing: bool,
    cors: bool,
    request_id: bool,
    timeout: Option<Duration>,
}

impl RouterBuilder {
    /// Create a new router builder
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            api: None,
            verifier: None,
            tracing: false,
            cors: false,
            request_id: false,
            timeout: None,
        }
    }

    /// Add a top-level route outside `/api`
    pub fn route(mut self, path: &str, route: MethodRouter) -> Self {
        self.router = self.router.route(path, route);
        self
    }

    /// Mount a module's router under `/api/{module_name}`
    pub fn mount_module(mut self, module_name: &str, module_router: Router) -> Self {
        let api = self.api.take().unwrap_or_default();
        self.api = Some(api.nest(&format!("/{}", module_name), module_router));
        self
    }

    /// Require a valid bearer token on every `/api` route
    pub fn with_bearer_auth(mut self, verifier: JwtVerifier) -> Self {
        self.verifier = Some(Arc::new(verifier));
        self
    }

    /// Add tracing middleware
    pub fn with_tracing(mut self) -> Self {
        self.tracing = true;
        self
    }

    /// Add CORS middleware
    pub fn with_cors(mut self) -> Self {
        self.cors = true;
        self
    }

    /// Add request ID middleware
    pub fn with_request_id(mut self) -> Self {
        self.request_id = true;
        self
    }

    /// Add timeout middleware
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout = Some(Duration::from_millis(timeout_ms));
        self
    }

    /// Serve the merged OpenAPI document and Swagger UI
    pub fn with_openapi(mut self, registry: &ModuleRegistry) -> Self {
        let openapi_spec = crate::openapi::merged_spec(registry);

        // Deserialize our JSON spec into a proper utoipa OpenApi object
        let openapi_obj: utoipa::openapi::OpenApi = serde_json::from_value(openapi_spec.clone())
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "falling back to an empty OpenAPI document");
                utoipa::openapi::OpenApiBuilder::new()
                    .info(
                        utoipa::openapi::InfoBuilder::new()
                            .title("Posters API")
                            .version("1.0.0")
                            .build(),
                    )
                    .build()
            });

        self.router = self.router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", openapi_obj),
        );

        // Raw JSON spec for external consumers
        self.router = self.router.route(
            "/docs/openapi.json",
            get(move || async move { axum::Json(openapi_spec.clone()) }),
        );

        self
    }

    /// Build the final router
    pub fn build(self) -> Router {
        let mut router = self.router;
        if let Some(mut api) = self.api {
            if let Some(verifier) = self.verifier {
                api = api.layer(middleware::from_fn_with_state(verifier, require_bearer));
            }
            // `/api/posters/` is routed as `/api/posters`.
            router = router.nest_service("/api", NormalizePath::trim_trailing_slash(api));
        }

        if let Some(timeout) = self.timeout {
            router = router.layer(TimeoutLayer::new(timeout));
        }
        if self.request_id {
            router = router
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7));
        }
        if self.cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }
        if self.tracing {
            router = router.layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().include_headers(true))
                    .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                    .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
            );
        }

        router
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Time-ordered request ids
#[derive(Clone, Copy)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let timestamp = Timestamp::now(uuid::NoContext);
        let request_id = Uuid::new_v7(timestamp)
            .to_string()
            .parse::<HeaderValue>()
            .ok()?;
        Some(RequestId::new(request_id))
    }
}
