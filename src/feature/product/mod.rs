//! The product catalog: entity, storage, service and REST API.

pub mod memory_repository;
pub mod product_api;
pub mod product_model;
pub mod product_repository;
pub mod product_service;
pub mod product_store;
