pub mod controller;
pub mod model;
pub mod repository;
pub mod service;

pub use controller::ProductController;
pub use model::{Category, NewProduct, Product, ProductFilter, ProductPatch};
pub use repository::{InMemoryProductRepository, MongoProductRepository, ProductRepository};
pub use service::ProductService;
