//! Types and functions for storing and loading products.

use super::product_model::{NewProduct, Product, ProductId};
use crate::infra::{database::Tx, error::ApiResult};
use tracing::{instrument, Instrument};

/// What to hand to [`ProductRepository::save`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveProduct {
    /// Store a new product and assign it an id.
    Insert(NewProduct),
    /// Overwrite the stored product with the same id.
    Update(Product),
}

impl From<NewProduct> for SaveProduct {
    fn from(value: NewProduct) -> Self {
        SaveProduct::Insert(value)
    }
}

impl From<Product> for SaveProduct {
    fn from(value: Product) -> Self {
        SaveProduct::Update(value)
    }
}

/// Anything that can store products.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ProductRepository: Send {
    /// Lists all products, in whatever order the store returns them.
    async fn find_all(&mut self) -> ApiResult<Vec<Product>>;

    /// Fetches a product.
    async fn find_by_id(&mut self, id: ProductId) -> ApiResult<Option<Product>>;

    /// Inserts or overwrites a product, returning what was stored.
    async fn save(&mut self, product: SaveProduct) -> ApiResult<Product>;

    /// Deletes a product. Deleting a missing product is not an error.
    async fn delete_by_id(&mut self, id: ProductId) -> ApiResult<()>;
}

/// A product repository backed by a Postgres transaction.
#[derive(Debug)]
pub struct PgProductRepository<E> {
    executor: E,
}

impl<E> PgProductRepository<E> {
    /// Creates a new repository.
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Returns the executor, for example to commit it.
    pub fn into_inner(self) -> E {
        self.executor
    }
}

#[async_trait::async_trait]
impl ProductRepository for PgProductRepository<Tx> {
    #[instrument(skip(self))]
    async fn find_all(&mut self) -> ApiResult<Vec<Product>> {
        tracing::info!("Listing products");
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, maker, price, image_url FROM products
            "#,
        )
        .fetch_all(&mut *self.executor)
        .instrument(tracing::info_span!("fetch_all"))
        .await?;
        tracing::info!("Listed {} products", products.len());
        Ok(products)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&mut self, id: ProductId) -> ApiResult<Option<Product>> {
        tracing::info!("Reading product");
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, maker, price, image_url FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.executor)
        .instrument(tracing::info_span!("fetch_optional"))
        .await?;
        tracing::info!("Found product: {:?}", product);
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn save(&mut self, product: SaveProduct) -> ApiResult<Product> {
        let query = match product {
            SaveProduct::Insert(new_product) => {
                tracing::info!("Creating product {:?}", new_product);
                sqlx::query_as::<_, Product>(
                    r#"
                    INSERT INTO products (name, maker, price, image_url)
                    VALUES ($1, $2, $3, $4)
                    RETURNING id, name, maker, price, image_url
                    "#,
                )
                .bind(new_product.name)
                .bind(new_product.maker)
                .bind(new_product.price)
                .bind(new_product.image_url)
            }
            SaveProduct::Update(product) => {
                tracing::info!("Updating product {:?}", product);
                sqlx::query_as::<_, Product>(
                    r#"
                    UPDATE products
                    SET name = $1, maker = $2, price = $3, image_url = $4
                    WHERE id = $5
                    RETURNING id, name, maker, price, image_url
                    "#,
                )
                .bind(product.name)
                .bind(product.maker)
                .bind(product.price)
                .bind(product.image_url)
                .bind(product.id)
            }
        };
        let product = query.fetch_one(&mut *self.executor).await?;
        tracing::info!("Saved product {:?}", product);
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&mut self, id: ProductId) -> ApiResult<()> {
        tracing::info!("Deleting product {:?}", id);
        let rows = sqlx::query(
            r#"
            DELETE FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&mut *self.executor)
        .await?;
        tracing::info!("Deleted {} product(s)", rows.rows_affected());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    fn robot() -> NewProduct {
        NewProduct::new("Robot", "ACME", 12345, "https://example.com/robot.png")
    }

    #[sqlx::test]
    #[ignore = "needs a Postgres database in DATABASE_URL"]
    async fn create_then_list_returns_product(db: PgPool) {
        let mut repo = PgProductRepository::new(db.begin().await.unwrap());
        let product = repo.save(robot().into()).await.unwrap();

        assert_eq!(Product::new(product.id, robot()), product);

        let products = repo.find_all().await.unwrap();
        assert_eq!(vec![product], products);
    }

    #[sqlx::test]
    #[ignore = "needs a Postgres database in DATABASE_URL"]
    async fn update_overwrites_row(db: PgPool) {
        let mut repo = PgProductRepository::new(db.begin().await.unwrap());
        let product = repo.save(robot().into()).await.unwrap();

        let changes = NewProduct::new("Robot 2", "ACME", 99, "https://example.com/robot2.png");
        let updated = repo
            .save(product.clone().update(changes.clone()).into())
            .await
            .unwrap();

        assert_eq!(Product::new(product.id, changes), updated);
        assert_eq!(Some(updated), repo.find_by_id(product.id).await.unwrap());
    }

    #[sqlx::test]
    #[ignore = "needs a Postgres database in DATABASE_URL"]
    async fn delete_removes_row(db: PgPool) {
        let mut repo = PgProductRepository::new(db.begin().await.unwrap());
        let product = repo.save(robot().into()).await.unwrap();

        repo.delete_by_id(product.id).await.unwrap();

        assert_eq!(None, repo.find_by_id(product.id).await.unwrap());
    }
}
