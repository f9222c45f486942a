//! The product entity.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// The identifier of a stored product.
pub type ProductId = i64;

/// A product that has not been stored yet.
///
/// Doubles as the payload of an update, which is why it carries no id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    /// The product's name.
    #[schema(example = "Cat tower")]
    #[validate(length(min = 1))]
    pub name: String,
    /// Who makes the product.
    #[schema(example = "Meow Inc.")]
    #[validate(length(min = 1))]
    pub maker: String,
    /// The price, without currency.
    #[schema(example = 12000)]
    #[validate(range(min = 0))]
    pub price: i32,
    /// Where to find a picture of the product.
    #[schema(example = "https://example.com/cat-tower.png")]
    #[validate(length(min = 1))]
    pub image_url: String,
}

impl NewProduct {
    /// Constructs a new product draft.
    pub fn new(
        name: impl Into<String>,
        maker: impl Into<String>,
        price: i32,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            maker: maker.into(),
            price,
            image_url: image_url.into(),
        }
    }
}

/// A stored product.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// The product's id.
    #[schema(example = 1)]
    pub id: ProductId,
    /// The product's name.
    #[schema(example = "Cat tower")]
    pub name: String,
    /// Who makes the product.
    #[schema(example = "Meow Inc.")]
    pub maker: String,
    /// The price, without currency.
    #[schema(example = 12000)]
    pub price: i32,
    /// Where to find a picture of the product.
    #[schema(example = "https://example.com/cat-tower.png")]
    pub image_url: String,
}

impl Product {
    /// Gives a draft the identity of a stored product.
    pub fn new(id: ProductId, product: NewProduct) -> Self {
        Self {
            id,
            name: product.name,
            maker: product.maker,
            price: product.price,
            image_url: product.image_url,
        }
    }

    /// Replaces every field except the id with the ones in `changes`.
    pub fn update(self, changes: NewProduct) -> Self {
        Self::new(self.id, changes)
    }

    /// Splits the product into its id and its fields.
    pub fn into_parts(self) -> (ProductId, NewProduct) {
        let fields = NewProduct {
            name: self.name,
            maker: self.maker,
            price: self.price,
            image_url: self.image_url,
        };
        (self.id, fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat_tower() -> Product {
        Product::new(1, NewProduct::new("Cat tower", "Meow Inc.", 12000, "a.png"))
    }

    #[test]
    fn update_overwrites_all_fields() {
        let changes = NewProduct::new("Scratcher", "Purr Ltd.", 3000, "b.png");
        let updated = cat_tower().update(changes.clone());
        assert_eq!(Product::new(1, changes), updated);
    }

    #[test]
    fn update_keeps_the_id() {
        let updated = cat_tower().update(NewProduct::new("", "", 0, ""));
        assert_eq!(1, updated.id);
    }

    #[test]
    fn entity_accepts_invalid_values() {
        let product = Product::new(7, NewProduct::new("", "", -100, "not a url"));
        assert_eq!(-100, product.price);
        assert!(product.name.is_empty());
    }

    #[test]
    fn into_parts_undoes_new() {
        let (id, fields) = cat_tower().into_parts();
        assert_eq!(1, id);
        assert_eq!(NewProduct::new("Cat tower", "Meow Inc.", 12000, "a.png"), fields);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(cat_tower()).unwrap();
        assert_eq!("a.png", json["imageUrl"]);
        assert_eq!(12000, json["price"]);
    }
}
