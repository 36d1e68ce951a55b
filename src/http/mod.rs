//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum Router, middleware stack)
//!     → request.rs (request ID assigned, propagated to response)
//!     → middleware/ (metrics per matched route)
//!     → handlers.rs (extract path/query/body, call the ItemStore)
//!     → error.rs (rejections mapped to 4xx JSON)
//!     → Send to client
//! ```

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod request;
pub mod server;

pub use error::ApiError;
pub use request::{MakeRequestUuid, RequestIdExt, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
