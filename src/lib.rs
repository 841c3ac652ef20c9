//! # Tarantool API
//!
//! A thin async facade over a Tarantool client. It binds named spaces to a
//! connection and forwards tuple CRUD, range reads and Lua evaluation to the
//! driver, reporting every outcome as a structured [`Result`].
//!
//! ## Features
//!
//! - **Loosely typed tuples**: [`TupleValue`] maps onto MessagePack and JSON shapes
//! - **Driver seam**: any client implementing [`Driver`] and [`Connector`] can back the facade
//! - **Thread Safety**: the session slot is guarded by `parking_lot`, facades are shared via `Arc`
//! - **Async Support**: async/await on Tokio
//! - **Structured logging**: `tracing` events for every forwarded request
//!
//! ## Backends
//!
//! | Backend | Feature | Notes |
//! |---------|---------|-------|
//! | `MockDriver` | always | Records requests, simulates failures |
//! | `TarantoolDriver` | `tarantool` | Live server via `rusty_tarantool` |
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! tarantool_api = { version = "0.1", features = ["tarantool"] }
//! tokio = { version = "1", features = ["full"] }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tarantool_api::prelude::*;
//! use tarantool_api::backends::TarantoolConnector;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let db = Arc::new(Tarantool::new(TarantoolConnector::new()));
//!     db.connect("127.0.0.1:3301", ConnectOptions::default()).await?;
//!
//!     let mut users = Space::new();
//!     users
//!         .initialize_space_with(Arc::clone(&db), "users", "{name = 'id', type = 'string'}")
//!         .await?;
//!     let primary = users.new_index("primary", "parts = {'id'}").await;
//!
//!     users.add(tuple!["alice"]).await?;
//!     let rows = users.get_element_by_id("alice", &primary).await?;
//!     println!("{:?}", rows);
//!     Ok(())
//! }
//! ```
//!
//! ## Project Structure
//!
//! ```text
//! tarantool_api/
//! ├── src/
//! │   ├── core/               # Facades, seam traits and value types
//! │   │   ├── connection.rs   # Tarantool connection facade
//! │   │   ├── space.rs        # Space facade
//! │   │   ├── driver.rs       # Driver / Connector traits
//! │   │   ├── iterator.rs     # Iterator modes
//! │   │   ├── options.rs      # Connect options
//! │   │   ├── error.rs        # Error types
//! │   │   └── value.rs        # Tuple values
//! │   ├── backends/           # Driver implementations
//! │   │   ├── mock.rs         # Recording test double
//! │   │   └── tarantool.rs    # rusty_tarantool client
//! │   └── lib.rs
//! ├── demos/                  # Example programs
//! ├── tests/                  # Integration tests
//! └── Cargo.toml
//! ```

/// Core facade types and traits
pub mod core;

/// Driver backend implementations
pub mod backends;

/// Prelude for convenient imports
///
/// ```rust
/// use tarantool_api::prelude::*;
///
/// let options = ConnectOptions::builder().user("app").build().unwrap();
/// assert_eq!(options.user_or_guest(), "app");
/// ```
pub mod prelude {
    pub use crate::core::{
        ConnectOptions, Connector, DatabaseError, Driver, IndexName, IteratorType, Result,
        ResultSet, Space, Tarantool, Tuple, TupleId, TupleValue,
    };
    pub use crate::tuple;
}

// Re-export at root level for convenience
pub use crate::core::{
    ConnectOptions, Connector, DatabaseError, Driver, IndexName, IteratorType, Result, ResultSet,
    Space, Tarantool, Tuple, TupleId, TupleValue,
};
