//! # Bike Shop
//!
//! A REST API for a catalog of bicycles backed by MongoDB.
//!
//! Requests flow router → controller → service → repository, one storage
//! call per request. Products are never physically removed: deleting one
//! flips its `isDeleted` flag and hides it from every other endpoint.
//!
//! | Route | Operation |
//! |---|---|
//! | `POST /api/products` | create a product |
//! | `GET /api/products?name=&brand=&category=` | list products, filtered on at most one field |
//! | `GET /api/products/{productId}` | fetch one product |
//! | `PATCH /api/products/{productId}` | update the supplied fields |
//! | `DELETE /api/products/{productId}` | soft-delete |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bike_shop::app::build_router;
//! use bike_shop::modules::product::InMemoryProductRepository;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let router = build_router(Arc::new(InMemoryProductRepository::new()));
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod app;
pub mod common;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod interceptor;
pub mod lifecycle;
pub mod modules;
pub mod pipe;

pub use common::ApiResponse;
pub use error::{AppError, Result};
