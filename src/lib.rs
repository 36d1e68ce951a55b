//! In-memory item service.
//!
//! Stores `Item` records under integer ids and serves them over HTTP:
//! `PUT /items/{item_id}` writes, `GET /items/{item_id}` reads.

pub mod config;
pub mod http;
pub mod items;
pub mod lifecycle;
pub mod observability;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use items::{Item, ItemStore, MemoryStore};
pub use lifecycle::Shutdown;
