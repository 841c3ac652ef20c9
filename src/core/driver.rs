//! Driver seam
//!
//! This module defines the traits every client backend implements. The
//! facade forwards each operation to exactly one driver call and never
//! retries.

use super::error::Result;
use super::iterator::IteratorType;
use super::options::ConnectOptions;
use super::value::{ResultSet, TupleValue};
use async_trait::async_trait;
use std::sync::Arc;

/// An open session with the database
///
/// Implementations must be safe to share between tasks; whatever ordering
/// or isolation they provide is passed through unchanged.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Evaluate a Lua chunk with positional arguments, returning its results
    async fn eval(&self, code: &str, args: &[TupleValue]) -> Result<ResultSet>;

    /// Insert a tuple into a space
    async fn insert(&self, space: &str, tuple: &[TupleValue]) -> Result<ResultSet>;

    /// Read tuples from an index
    async fn select(
        &self,
        space: &str,
        index: &str,
        offset: u32,
        limit: u32,
        iterator: IteratorType,
        key: &[TupleValue],
    ) -> Result<ResultSet>;

    /// Delete the tuple matching `key` in an index
    async fn delete(&self, space: &str, index: &str, key: &[TupleValue]) -> Result<ResultSet>;

    /// Insert or overwrite a tuple by its primary key
    async fn replace(&self, space: &str, tuple: &[TupleValue]) -> Result<ResultSet>;

    /// Round-trip a no-op request
    async fn ping(&self) -> Result<()>;
}

/// Opens driver sessions
#[async_trait]
pub trait Connector: Send + Sync {
    /// Connect to `address` using `options`
    async fn connect(&self, address: &str, options: &ConnectOptions) -> Result<Arc<dyn Driver>>;
}
