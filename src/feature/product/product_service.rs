//! A service for interacting with products.
//!
//! Each function makes one pass over a [`ProductRepository`] and keeps no
//! state between calls. `update_product` and `delete_product` look the
//! product up first, so a missing id always fails with
//! [`ClientError::NotFound`] before anything is written.

use super::{
    product_model::{NewProduct, Product, ProductId},
    product_repository::{ProductRepository, SaveProduct},
};
use crate::infra::error::{ApiResult, ClientError};
use tracing::instrument;

/// Lists all products.
#[instrument(skip(repository))]
pub async fn list_products<R>(repository: &mut R) -> ApiResult<Vec<Product>>
where
    R: ProductRepository + ?Sized,
{
    repository.find_all().await
}

/// Reads a product.
#[instrument(skip(repository))]
pub async fn get_product<R>(repository: &mut R, id: ProductId) -> ApiResult<Product>
where
    R: ProductRepository + ?Sized,
{
    let product = repository
        .find_by_id(id)
        .await?
        .ok_or(ClientError::NotFound)?;
    Ok(product)
}

/// Creates a new product.
#[instrument(skip(repository))]
pub async fn create_product<R>(repository: &mut R, new_product: NewProduct) -> ApiResult<Product>
where
    R: ProductRepository + ?Sized,
{
    repository.save(SaveProduct::Insert(new_product)).await
}

/// Replaces every field of a product.
#[instrument(skip(repository))]
pub async fn update_product<R>(
    repository: &mut R,
    id: ProductId,
    changes: NewProduct,
) -> ApiResult<Product>
where
    R: ProductRepository + ?Sized,
{
    let product = get_product(repository, id).await?;
    repository
        .save(SaveProduct::Update(product.update(changes)))
        .await
}

/// Deletes a product.
#[instrument(skip(repository))]
pub async fn delete_product<R>(repository: &mut R, id: ProductId) -> ApiResult<()>
where
    R: ProductRepository + ?Sized,
{
    get_product(repository, id).await?;
    repository.delete_by_id(id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::product::{
        memory_repository::InMemoryProductRepository, product_repository::MockProductRepository,
    };
    use mockall::predicate::eq;

    const EXISTENT_ID: ProductId = 1;
    const NON_EXISTENT_ID: ProductId = 100;

    fn fixture() -> Product {
        Product::new(
            EXISTENT_ID,
            NewProduct::new("Cat tower", "Meow Inc.", 12345, "https://example.com/a.png"),
        )
    }

    fn changes() -> NewProduct {
        NewProduct::new("Cat tower 2", "Purr Ltd.", 123450, "https://example.com/b.png")
    }

    /// A mock that knows only [`fixture`].
    fn repository() -> MockProductRepository {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id()
            .with(eq(EXISTENT_ID))
            .returning(|_| Ok(Some(fixture())));
        repo.expect_find_by_id()
            .with(eq(NON_EXISTENT_ID))
            .returning(|_| Ok(None));
        repo
    }

    #[tokio::test]
    async fn list_returns_everything_found() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_all()
            .times(1)
            .returning(|| Ok(vec![fixture()]));

        let products = list_products(&mut repo).await.unwrap();

        assert_eq!(1, products.len());
    }

    #[tokio::test]
    async fn get_with_existent_id_returns_product() {
        let mut repo = repository();

        let product = get_product(&mut repo, EXISTENT_ID).await.unwrap();

        assert_eq!(EXISTENT_ID, product.id);
    }

    #[tokio::test]
    async fn get_with_non_existent_id_is_not_found() {
        let mut repo = repository();

        let result = get_product(&mut repo, NON_EXISTENT_ID).await;

        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn create_saves_payload_once() {
        let mut repo = MockProductRepository::new();
        repo.expect_save()
            .withf(|product| *product == SaveProduct::Insert(fixture().into_parts().1))
            .times(1)
            .returning(|_| Ok(fixture()));

        let (_, payload) = fixture().into_parts();
        let product = create_product(&mut repo, payload.clone()).await.unwrap();

        assert_eq!(payload, product.into_parts().1);
    }

    #[tokio::test]
    async fn update_with_existent_id_overwrites_fields() {
        let mut repo = repository();
        repo.expect_save()
            .withf(|product| *product == SaveProduct::Update(Product::new(EXISTENT_ID, changes())))
            .times(1)
            .returning(|product| match product {
                SaveProduct::Update(product) => Ok(product),
                SaveProduct::Insert(_) => panic!("update must not insert"),
            });

        let product = update_product(&mut repo, EXISTENT_ID, changes())
            .await
            .unwrap();

        assert_eq!(Product::new(EXISTENT_ID, changes()), product);
    }

    #[tokio::test]
    async fn update_with_non_existent_id_does_not_save() {
        let mut repo = repository();
        repo.expect_save().never();

        let result = update_product(&mut repo, NON_EXISTENT_ID, changes()).await;

        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn delete_with_existent_id_deletes_once() {
        let mut repo = repository();
        repo.expect_delete_by_id()
            .with(eq(EXISTENT_ID))
            .times(1)
            .returning(|_| Ok(()));

        delete_product(&mut repo, EXISTENT_ID).await.unwrap();
    }

    #[tokio::test]
    async fn delete_with_non_existent_id_does_not_delete() {
        let mut repo = repository();
        repo.expect_delete_by_id().never();

        let result = delete_product(&mut repo, NON_EXISTENT_ID).await;

        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn update_get_and_delete_against_a_store() {
        let mut repo = InMemoryProductRepository::new();
        let created = create_product(&mut repo, NewProduct::new("A", "M", 100, "u"))
            .await
            .unwrap();
        assert_eq!(1, created.id);

        let updated = update_product(&mut repo, 1, NewProduct::new("B", "M2", 200, "u2"))
            .await
            .unwrap();
        assert_eq!(Product::new(1, NewProduct::new("B", "M2", 200, "u2")), updated);

        assert!(get_product(&mut repo, 999).await.unwrap_err().is_not_found());

        delete_product(&mut repo, 1).await.unwrap();
        assert!(get_product(&mut repo, 1).await.unwrap_err().is_not_found());
        assert!(list_products(&mut repo).await.unwrap().is_empty());
    }
}
