//! Core facade types and traits
//!
//! This module provides the fundamental building blocks of the facade:
//! error types, the driver seam, tuple values, options, and the connection
//! and space facades themselves.

pub mod connection;
pub mod driver;
pub mod error;
pub mod iterator;
pub mod options;
pub mod space;
pub mod value;

// Re-export commonly used types
pub use connection::Tarantool;
pub use driver::{Connector, Driver};
pub use error::{DatabaseError, Result};
pub use iterator::IteratorType;
pub use options::{validate_address, ConnectOptions, ConnectOptionsBuilder};
pub use space::{Space, GET_ALL_LIMIT, GET_ALL_OFFSET};
pub use value::{IndexName, ResultSet, Tuple, TupleId, TupleValue};
