//! Driver backend implementations
//!
//! This module contains concrete implementations of the Driver and
//! Connector traits.

pub mod mock;

#[cfg(feature = "tarantool")]
pub mod tarantool;

pub use mock::{Call, MockConnector, MockDriver};

#[cfg(feature = "tarantool")]
pub use tarantool::{TarantoolConnector, TarantoolDriver};
