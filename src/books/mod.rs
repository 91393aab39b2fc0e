//! Book catalog: records, stores, ownership-checked service, handlers

pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod store;

pub use models::{Book, BookRequest};
pub use service::BookService;
