//! OpenAPI configuration.

use crate::feature::{
    info::info_api,
    product::{product_api, product_model},
};
use utoipa::OpenApi;

/// OpenApi configuration.
#[derive(OpenApi)]
#[openapi(
    paths(
        info_api::info,
        product_api::list_products,
        product_api::get_product,
        product_api::create_product,
        product_api::update_product,
        product_api::patch_product,
        product_api::delete_product,
    ),
    components(
        schemas(
            info_api::AppInfo,
            product_model::NewProduct,
            product_model::Product,
            crate::infra::error::ErrorBody
        )
    )
)]
#[derive(Clone, Copy, Debug)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::ApiDoc;
    use utoipa::OpenApi;

    #[test]
    fn documents_product_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/products"));
        assert!(doc.paths.paths.contains_key("/api/products/{id}"));
    }

    #[test]
    fn error_responses_use_error_body() {
        let json = ApiDoc::openapi().to_json().unwrap();
        assert!(json.contains("#/components/schemas/ErrorBody"));
    }
}
