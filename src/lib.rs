//! A small product catalog served over REST.
//!
//! Products are listed, fetched, created, replaced and deleted through
//! [`feature::product::product_service`], which works against any
//! [`feature::product::product_repository::ProductRepository`].

pub mod app;
pub mod feature;
pub mod infra;
