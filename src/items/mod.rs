//! Item resource subsystem.
//!
//! # Data Flow
//! ```text
//! handler
//!     → model.rs (Item decoded from JSON)
//!     → store.rs (ItemStore::put / ItemStore::get)
//!     → model.rs (Item or ItemReceipt encoded to JSON)
//! ```
//!
//! # Design Decisions
//! - The store is an owned object built once in `main` and injected
//!   into handlers as `Arc<dyn ItemStore>`; there is no global state
//! - Items carry no identity of their own; the id is the map key

pub mod model;
pub mod store;

pub use model::{Item, ItemId, ItemReceipt};
pub use store::{ItemStore, MemoryStore};
