//! The axum application.
//!
//! # Examples
//!
//! Create and fetch a product.
//!
//! ```rust
//! # use product_catalog::feature::product::product_model::{NewProduct, Product};
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! # let url = product_catalog::app::spawn_app().await;
//! let client = reqwest::Client::new();
//! let new_product = NewProduct::new("Robot", "ACME", 100, "https://example.com/robot.png");
//! let response = client.post(format!("{url}/products")).json(&new_product).send().await.unwrap();
//! assert_eq!(201, response.status());
//! let product = response.json::<Product>().await.unwrap();
//! assert_eq!(Product::new(1, new_product), product);
//! # });
//! ```

use std::iter;

use crate::feature::product::product_store::ProductStore;
use crate::infra::config::Config;
use crate::infra::error::{InternalError, PanicHandler};
use crate::infra::middleware::MakeRequestIdSpan;
use crate::infra::openapi::ApiDoc;
use crate::infra::state::AppState;
use axum::error_handling::HandleErrorLayer;
use axum::response::IntoResponse;
use axum::Router;
use http::header::AUTHORIZATION;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

/// Constructs the full axum application.
pub fn app(state: AppState) -> Router {
    let server = &state.config().server;

    // Fallible middleware from tower, mapped to infallible response with [`HandleErrorLayer`].
    let tower_middleware = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(|e| async move {
            InternalError::Other(format!("Tower middleware failed: {e}")).into_response()
        }))
        .concurrency_limit(server.concurrency_limit);

    Router::new()
        .merge(SwaggerUi::new("/api/swagger-ui").url("/api/openapi.json", ApiDoc::openapi()))
        .merge(Redoc::with_url("/api/redoc", ApiDoc::openapi()))
        .merge(RapiDoc::new("/api/openapi.json").path("/api/rapidoc"))
        .nest("/api", crate::feature::api(state.clone()))
        // Layers
        .layer(TimeoutLayer::new(server.request_timeout))
        .layer(axum::middleware::from_fn(
            crate::infra::middleware::log_request_response,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(MakeRequestIdSpan)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO))
                .on_failure(()),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(SetSensitiveRequestHeadersLayer::new(iter::once(
            AUTHORIZATION,
        )))
        .layer(tower_middleware)
        .layer(CatchPanicLayer::custom(PanicHandler))
}

/// Starts the axum server.
pub async fn run_app(
    listener: TcpListener,
    store: ProductStore,
    config: Config,
) -> std::io::Result<()> {
    let state = AppState::new(store, config);
    let app = app(state).into_make_service();

    tracing::info!("Starting axum on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(crate::infra::shutdown::shutdown_signal())
        .await?;
    tracing::info!("Successfully shut down");

    Ok(())
}

/// Spawn a server with an in-memory store on a random port.
pub async fn spawn_app() -> String {
    spawn_app_with_store(ProductStore::memory()).await
}

/// Spawn a server on a random port with a custom store.
pub async fn spawn_app_with_store(store: ProductStore) -> String {
    let address = "127.0.0.1";
    let listener = TcpListener::bind(format!("{address}:0")).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let config = crate::infra::config::load_config().unwrap();
    tokio::spawn(run_app(listener, store, config));
    format!("http://{address}:{port}/api")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::product::product_model::{NewProduct, Product};
    use axum::body::Body;
    use http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_app() -> Router {
        let config = crate::infra::config::load_config().unwrap();
        app(AppState::new(ProductStore::memory(), config))
    }

    #[tokio::test]
    async fn products_over_http() {
        let url = spawn_app().await;
        let client = reqwest::Client::new();

        let new_product = NewProduct::new("A", "M", 100, "u");
        let created: Product = client
            .post(format!("{url}/products"))
            .json(&new_product)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(Product::new(1, new_product), created);

        let products: Vec<Product> = client
            .get(format!("{url}/products"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(vec![created], products);
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let req = Request::get("/api/info").body(Body::empty()).unwrap();
        let res = test_app().oneshot(req).await.unwrap();
        assert_eq!(StatusCode::OK, res.status());
        assert!(res.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn swagger_ui_oneshot() {
        let req = Request::get("/api/swagger-ui/index.html")
            .body(Body::empty())
            .unwrap();
        let res = test_app().oneshot(req).await.unwrap();
        assert_eq!(StatusCode::OK, res.status())
    }

    #[tokio::test]
    async fn redoc_oneshot() {
        let req = Request::get("/api/redoc").body(Body::empty()).unwrap();
        let res = test_app().oneshot(req).await.unwrap();
        assert_eq!(StatusCode::OK, res.status())
    }

    #[tokio::test]
    async fn rapidoc_oneshot() {
        let req = Request::get("/api/rapidoc").body(Body::empty()).unwrap();
        let res = test_app().oneshot(req).await.unwrap();
        assert_eq!(StatusCode::OK, res.status())
    }

    #[tokio::test]
    async fn openapi_json_oneshot() {
        let req = Request::get("/api/openapi.json").body(Body::empty()).unwrap();
        let res = test_app().oneshot(req).await.unwrap();
        assert_eq!(StatusCode::OK, res.status())
    }
}
