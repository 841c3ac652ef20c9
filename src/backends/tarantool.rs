//! Tarantool driver backend
//!
//! This module implements the driver seam on top of the `rusty_tarantool`
//! client. Every request is a parameterized Lua chunk sent through `eval`,
//! so spaces and indexes are addressed by name and never spliced into code.

use crate::core::{
    driver::{Connector, Driver},
    error::{DatabaseError, Result},
    iterator::IteratorType,
    options::ConnectOptions,
    value::{ResultSet, TupleValue},
};
use async_trait::async_trait;
use rusty_tarantool::tarantool::{Client, ClientConfig};
use std::sync::Arc;

const INSERT_LUA: &str = "local space, tuple = ...\nreturn box.space[space]:insert(tuple)";

const REPLACE_LUA: &str = "local space, tuple = ...\nreturn box.space[space]:replace(tuple)";

const SELECT_LUA: &str = "local space, index, offset, limit, iterator, key = ...\n\
    return box.space[space].index[index]:select(key, {offset = offset, limit = limit, iterator = iterator})";

const DELETE_LUA: &str =
    "local space, index, key = ...\nreturn box.space[space].index[index]:delete(key)";

/// Opens sessions with a live Tarantool server
#[derive(Debug, Clone, Copy, Default)]
pub struct TarantoolConnector;

impl TarantoolConnector {
    /// Create a new connector
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Connector for TarantoolConnector {
    async fn connect(&self, address: &str, options: &ConnectOptions) -> Result<Arc<dyn Driver>> {
        let mut config = ClientConfig::new(
            address.to_string(),
            options.user_or_guest().to_string(),
            options.password.clone().unwrap_or_default(),
        )
        .set_timeout_time_ms(options.timeout);
        if options.reconnect > 0 {
            config = config.set_reconnect_time_ms(options.reconnect);
        }
        if options.max_reconnects > 0 {
            tracing::debug!(
                max_reconnects = options.max_reconnects,
                "reconnect limit is not supported by this driver, ignoring"
            );
        }

        // The client dispatcher retries unreachable addresses forever, so it is
        // only started once the address accepts TCP connections.
        let timeout = options.timeout_duration();
        tokio::time::timeout(timeout, tokio::net::TcpStream::connect(address))
            .await
            .map_err(|_| DatabaseError::connection_timeout(options.timeout))?
            .map_err(|e| DatabaseError::connection(format!("{}: {}", address, e)))?;

        let driver = TarantoolDriver {
            client: config.build(),
        };
        tokio::time::timeout(timeout, driver.ping())
            .await
            .map_err(|_| DatabaseError::connection_timeout(options.timeout))?
            .map_err(|e| DatabaseError::connection(format!("{}: {}", address, e)))?;

        Ok(Arc::new(driver))
    }
}

/// Session with a live Tarantool server
pub struct TarantoolDriver {
    client: Client,
}

impl TarantoolDriver {
    async fn call(&self, request: &str, code: &str, args: Vec<TupleValue>) -> Result<ResultSet> {
        let response = self
            .client
            .eval(code.to_string(), &args)
            .await
            .map_err(|e| DatabaseError::request(request, e.to_string()))?;
        response
            .decode::<ResultSet>()
            .map_err(|e| DatabaseError::decode(e.to_string()))
    }
}

/// Unwrap a chunk's single table result into its elements
fn single_table(data: ResultSet) -> ResultSet {
    match <[TupleValue; 1]>::try_from(data) {
        Ok([TupleValue::Array(items)]) => items,
        Ok([other]) => vec![other],
        Err(data) => data,
    }
}

/// Arguments for `INSERT_LUA` and `REPLACE_LUA`
fn tuple_args(space: &str, tuple: &[TupleValue]) -> Vec<TupleValue> {
    vec![space.into(), TupleValue::Array(tuple.to_vec())]
}

/// Arguments for `SELECT_LUA`, in unpack order
fn select_args(
    space: &str,
    index: &str,
    offset: u32,
    limit: u32,
    iterator: IteratorType,
    key: &[TupleValue],
) -> Vec<TupleValue> {
    vec![
        space.into(),
        index.into(),
        offset.into(),
        limit.into(),
        iterator.to_str().into(),
        TupleValue::Array(key.to_vec()),
    ]
}

/// Arguments for `DELETE_LUA`
fn delete_args(space: &str, index: &str, key: &[TupleValue]) -> Vec<TupleValue> {
    vec![space.into(), index.into(), TupleValue::Array(key.to_vec())]
}

#[async_trait]
impl Driver for TarantoolDriver {
    async fn eval(&self, code: &str, args: &[TupleValue]) -> Result<ResultSet> {
        self.call("eval", code, args.to_vec()).await
    }

    async fn insert(&self, space: &str, tuple: &[TupleValue]) -> Result<ResultSet> {
        self.call("insert", INSERT_LUA, tuple_args(space, tuple))
            .await
    }

    async fn select(
        &self,
        space: &str,
        index: &str,
        offset: u32,
        limit: u32,
        iterator: IteratorType,
        key: &[TupleValue],
    ) -> Result<ResultSet> {
        let args = select_args(space, index, offset, limit, iterator, key);
        self.call("select", SELECT_LUA, args).await.map(single_table)
    }

    async fn delete(&self, space: &str, index: &str, key: &[TupleValue]) -> Result<ResultSet> {
        self.call("delete", DELETE_LUA, delete_args(space, index, key))
            .await
    }

    async fn replace(&self, space: &str, tuple: &[TupleValue]) -> Result<ResultSet> {
        self.call("replace", REPLACE_LUA, tuple_args(space, tuple))
            .await
    }

    async fn ping(&self) -> Result<()> {
        self.client
            .ping()
            .await
            .map(drop)
            .map_err(|e| DatabaseError::request("ping", e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{connection::Tarantool, space::Space};

    fn get_tarantool_addr() -> Option<String> {
        std::env::var("TARANTOOL_ADDR").ok()
    }

    #[test]
    fn test_single_table_unwraps_select_result() {
        let rows = vec![TupleValue::Array(crate::tuple!["a"])];
        let data = vec![TupleValue::Array(rows.clone())];
        assert_eq!(single_table(data), rows);
        assert!(single_table(vec![]).is_empty());
    }

    #[test]
    fn test_select_args_follow_unpack_order() {
        let args = select_args(
            "users",
            "primary",
            crate::core::GET_ALL_OFFSET,
            crate::core::GET_ALL_LIMIT,
            IteratorType::Gt,
            &crate::tuple![""],
        );
        assert!(SELECT_LUA.starts_with("local space, index, offset, limit, iterator, key = ..."));
        assert_eq!(
            args,
            vec![
                TupleValue::from("users"),
                TupleValue::from("primary"),
                TupleValue::Int(1),
                TupleValue::Int(4294967295),
                TupleValue::from("GT"),
                TupleValue::Array(crate::tuple![""]),
            ]
        );
    }

    #[test]
    fn test_tuple_and_key_are_wrapped() {
        assert!(INSERT_LUA.starts_with("local space, tuple = ..."));
        assert!(REPLACE_LUA.starts_with("local space, tuple = ..."));
        assert_eq!(
            tuple_args("users", &crate::tuple!["a", 1]),
            vec![
                TupleValue::from("users"),
                TupleValue::Array(crate::tuple!["a", 1]),
            ]
        );

        assert!(DELETE_LUA.starts_with("local space, index, key = ..."));
        assert_eq!(
            delete_args("users", "primary", &crate::tuple!["a"]),
            vec![
                TupleValue::from("users"),
                TupleValue::from("primary"),
                TupleValue::Array(crate::tuple!["a"]),
            ]
        );
    }

    #[tokio::test]
    async fn test_unreachable_address_fails_before_client_starts() {
        let options = ConnectOptions::builder()
            .timeout(std::time::Duration::from_millis(500))
            .build()
            .unwrap();
        let before = tokio::runtime::Handle::current().metrics().num_alive_tasks();

        let result = TarantoolConnector::new()
            .connect("127.0.0.1:1", &options)
            .await;
        assert!(matches!(
            result,
            Err(DatabaseError::ConnectionError(_)) | Err(DatabaseError::ConnectionTimeout { .. })
        ));
        drop(result);

        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        let after = tokio::runtime::Handle::current().metrics().num_alive_tasks();
        assert_eq!(before, after);
    }

    #[tokio::test]
    #[ignore] // Run with: cargo test --features tarantool -- --ignored
    async fn test_tarantool_crud() -> Result<()> {
        let addr = match get_tarantool_addr() {
            Some(addr) => addr,
            None => {
                eprintln!("Skipping test: TARANTOOL_ADDR not set");
                return Ok(());
            }
        };

        let t = Arc::new(Tarantool::new(TarantoolConnector::new()));
        t.connect(&addr, ConnectOptions::default()).await?;

        let _ = t.execute_lua("if box.space.rs_crud then box.space.rs_crud:drop() end").await;
        let mut space = Space::new();
        space
            .initialize_space_with(
                Arc::clone(&t),
                "rs_crud",
                "{name = 'id', type = 'string'}, {name = 'n', type = 'unsigned'}",
            )
            .await?;
        let primary = space.new_index("primary", "parts = {'id'}").await;

        space.add(crate::tuple!["a", 1]).await?;
        space.add(crate::tuple!["b", 2]).await?;
        assert!(space.add(crate::tuple!["a", 3]).await.is_err());

        let rows = space.get_element_by_id("a", &primary).await?;
        assert_eq!(rows.len(), 1);

        space.replace(crate::tuple!["a", 5]).await?;
        space.delete("b", &primary).await?;

        t.execute_lua("box.space.rs_crud:drop()").await?;
        Ok(())
    }
}
