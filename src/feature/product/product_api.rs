//! The product API implementation.

use super::{
    product_model::{NewProduct, Product, ProductId},
    product_service,
    product_store::ProductStore,
};
use crate::infra::{
    error::{ApiResult, ClientError},
    extract::Json,
    state::AppState,
    validation::Valid,
};
use axum::{extract::State, Router};
use axum_extra::routing::{RouterExt, TypedPath};
use http::StatusCode;
use serde::Deserialize;
use tracing::instrument;

/// The product API endpoints.
pub fn routes() -> Router<AppState> {
    Router::new()
        .typed_get(list_products)
        .typed_get(get_product)
        .typed_post(create_product)
        .typed_put(update_product)
        .typed_patch(patch_product)
        .typed_delete(delete_product)
}

#[derive(Deserialize, TypedPath)]
#[typed_path("/products", rejection(ClientError))]
pub(crate) struct Products;

#[derive(Deserialize, TypedPath)]
#[typed_path("/products/:id", rejection(ClientError))]
pub(crate) struct ProductsId(ProductId);

/// Lists all products.
#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "Success", body = [Product]),
        (status = 500, description = "Internal error", body = crate::infra::error::ErrorBody),
    )
)]
#[instrument(skip_all)]
pub(crate) async fn list_products(
    _: Products,
    State(store): State<ProductStore>,
) -> ApiResult<Json<Vec<Product>>> {
    let mut tx = store.begin().await?;
    let products = product_service::list_products(&mut tx).await?;
    tx.commit().await?;
    Ok(Json(products))
}

/// Gets a product.
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = i64, Path, description = "The product's id")),
    responses(
        (status = 200, description = "Ok", body = Product),
        (status = 404, description = "Not Found", body = crate::infra::error::ErrorBody),
        (status = 500, description = "Internal Server Error", body = crate::infra::error::ErrorBody),
    )
)]
#[instrument(skip_all, fields(id = tracing::field::Empty))]
pub(crate) async fn get_product(
    ProductsId(id): ProductsId,
    State(store): State<ProductStore>,
) -> ApiResult<Json<Product>> {
    tracing::Span::current().record("id", id);
    let mut tx = store.begin().await?;
    let product = product_service::get_product(&mut tx, id).await?;
    tx.commit().await?;
    Ok(Json(product))
}

/// Creates a new product.
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = NewProduct,
    responses(
        (status = 201, description = "Created", body = Product),
        (status = 422, description = "Unprocessable Entity", body = crate::infra::error::ErrorBody),
        (status = 500, description = "Internal Server Error", body = crate::infra::error::ErrorBody),
    )
)]
#[instrument(skip_all)]
pub(crate) async fn create_product(
    _: Products,
    State(store): State<ProductStore>,
    Json(new_product): Json<NewProduct>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let new_product = Valid::new(new_product)?;
    let mut tx = store.begin().await?;
    let product = product_service::create_product(&mut tx, new_product.into_inner()).await?;
    tx.commit().await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Replaces a product.
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = i64, Path, description = "The product's id")),
    request_body = NewProduct,
    responses(
        (status = 200, description = "Ok", body = Product),
        (status = 404, description = "Not Found", body = crate::infra::error::ErrorBody),
        (status = 422, description = "Unprocessable Entity", body = crate::infra::error::ErrorBody),
        (status = 500, description = "Internal Server Error", body = crate::infra::error::ErrorBody),
    )
)]
#[instrument(skip_all, fields(id = tracing::field::Empty))]
pub(crate) async fn update_product(
    ProductsId(id): ProductsId,
    State(store): State<ProductStore>,
    Json(changes): Json<NewProduct>,
) -> ApiResult<Json<Product>> {
    tracing::Span::current().record("id", id);
    replace(&store, id, changes).await.map(Json)
}

/// Replaces a product. Behaves exactly like `PUT`.
#[utoipa::path(
    patch,
    path = "/api/products/{id}",
    params(("id" = i64, Path, description = "The product's id")),
    request_body = NewProduct,
    responses(
        (status = 200, description = "Ok", body = Product),
        (status = 404, description = "Not Found", body = crate::infra::error::ErrorBody),
        (status = 422, description = "Unprocessable Entity", body = crate::infra::error::ErrorBody),
        (status = 500, description = "Internal Server Error", body = crate::infra::error::ErrorBody),
    )
)]
#[instrument(skip_all, fields(id = tracing::field::Empty))]
pub(crate) async fn patch_product(
    ProductsId(id): ProductsId,
    State(store): State<ProductStore>,
    Json(changes): Json<NewProduct>,
) -> ApiResult<Json<Product>> {
    tracing::Span::current().record("id", id);
    replace(&store, id, changes).await.map(Json)
}

async fn replace(store: &ProductStore, id: ProductId, changes: NewProduct) -> ApiResult<Product> {
    let changes = Valid::new(changes)?;
    let mut tx = store.begin().await?;
    let product = product_service::update_product(&mut tx, id, changes.into_inner()).await?;
    tx.commit().await?;
    Ok(product)
}

/// Deletes a product.
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = i64, Path, description = "The product's id")),
    responses(
        (status = 204, description = "No Content"),
        (status = 404, description = "Not Found", body = crate::infra::error::ErrorBody),
        (status = 500, description = "Internal Server Error", body = crate::infra::error::ErrorBody),
    )
)]
#[instrument(skip_all, fields(id = tracing::field::Empty))]
pub(crate) async fn delete_product(
    ProductsId(id): ProductsId,
    State(store): State<ProductStore>,
) -> ApiResult<StatusCode> {
    tracing::Span::current().record("id", id);
    let mut tx = store.begin().await?;
    product_service::delete_product(&mut tx, id).await?;
    tx.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}
