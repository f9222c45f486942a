//! Application features, one module per resource.

use crate::infra::state::AppState;
use axum::Router;

pub mod info;
pub mod product;

/// Constructs the REST API.
pub fn api(state: AppState) -> Router {
    Router::new()
        .merge(info::info_api::routes())
        .merge(product::product_api::routes())
        .with_state(state)
}
