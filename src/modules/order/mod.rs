//! Orders are a data definition only: no route exposes them.

pub mod model;

pub use model::{NewOrder, Order};
