//! Space facade
//!
//! A [`Space`] is a named, schema-described container bound to a
//! [`Tarantool`] connection. Every method is one forwarded driver call,
//! except [`Space::initialize_space`] which issues two.

use super::connection::Tarantool;
use super::driver::Driver;
use super::error::{DatabaseError, Result};
use super::iterator::IteratorType;
use super::value::{IndexName, ResultSet, Tuple, TupleValue};
use std::sync::Arc;

/// Offset used by [`Space::get_all`]
pub const GET_ALL_OFFSET: u32 = 1;

/// Limit used by [`Space::get_all`]
pub const GET_ALL_LIMIT: u32 = u32::MAX;

const CREATE_SPACE_LUA: &str = "box.schema.create_space(...)";

fn format_lua(schema: &str) -> String {
    format!("local name = ...\nbox.space[name]:format({{{}}})", schema)
}

fn create_index_lua(structure: &str) -> String {
    format!(
        "local space, index = ...\nbox.space[space]:create_index(index, {{{}}})",
        structure
    )
}

/// Table-like container in the database
#[derive(Debug, Default, Clone)]
pub struct Space {
    name: String,
    schema: String,
    server: Option<Arc<Tarantool>>,
}

impl Space {
    /// Create an unbound space
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind this space to a connection
    pub fn connect_tarantool(&mut self, tarantool: Arc<Tarantool>) {
        self.server = Some(tarantool);
    }

    /// Space name, empty until initialized
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Format body the space was initialized with
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Check if the space is bound to a connection
    pub fn is_bound(&self) -> bool {
        self.server.is_some()
    }

    fn driver(&self) -> Result<Arc<dyn Driver>> {
        self.server
            .as_ref()
            .ok_or(DatabaseError::NotConnected)?
            .session()
    }

    /// Create the space and set its format
    ///
    /// `schema` is the body of a Lua format table, for example
    /// `{name = 'id', type = 'string'}, {name = 'score', type = 'unsigned'}`.
    /// Both requests are always issued; the result is `Ok` only if both
    /// succeeded, otherwise the first error.
    pub async fn initialize_space(&mut self, space_name: &str, schema: &str) -> Result<()> {
        self.name = space_name.to_string();
        self.schema = schema.to_string();

        let driver = self.driver()?;
        let args = [TupleValue::from(space_name)];
        let created = driver.eval(CREATE_SPACE_LUA, &args).await;
        let formatted = driver.eval(&format_lua(schema), &args).await;

        match (created, formatted) {
            (Ok(_), Ok(_)) => {
                tracing::debug!(space = space_name, "space initialized");
                Ok(())
            }
            (Err(e), _) => {
                tracing::warn!(space = space_name, error = %e, "create_space failed");
                Err(e)
            }
            (Ok(_), Err(e)) => {
                tracing::warn!(space = space_name, error = %e, "format failed");
                Err(e)
            }
        }
    }

    /// Bind to `tarantool`, then initialize
    pub async fn initialize_space_with(
        &mut self,
        tarantool: Arc<Tarantool>,
        space_name: &str,
        schema: &str,
    ) -> Result<()> {
        self.connect_tarantool(tarantool);
        self.initialize_space(space_name, schema).await
    }

    /// Create an index and return its name
    ///
    /// `structure` is the body of the Lua options table, for example
    /// `type = 'hash', parts = {'id'}`. The name is returned whether or not
    /// the request succeeded; a failure is only logged.
    pub async fn new_index(&self, index_name: &str, structure: &str) -> IndexName {
        let args = [
            TupleValue::from(self.name.as_str()),
            TupleValue::from(index_name),
        ];
        let created = match self.driver() {
            Ok(driver) => driver.eval(&create_index_lua(structure), &args).await,
            Err(e) => Err(e),
        };
        if let Err(e) = created {
            tracing::warn!(space = %self.name, index = index_name, error = %e, "create_index failed");
        }
        index_name.to_string()
    }

    /// Insert a tuple
    pub async fn add(&self, line: Tuple) -> Result<()> {
        tracing::debug!(space = %self.name, fields = line.len(), "insert");
        self.driver()?.insert(&self.name, &line).await.map(drop)
    }

    /// Read tuples from `index`
    pub async fn get(
        &self,
        offset: u32,
        limit: u32,
        iterator: IteratorType,
        index: &str,
        key: Tuple,
    ) -> Result<ResultSet> {
        tracing::debug!(space = %self.name, index, offset, limit, %iterator, "select");
        self.driver()?
            .select(&self.name, index, offset, limit, iterator, &key)
            .await
    }

    /// Read every tuple with a key greater than the empty string
    pub async fn get_all(&self, index: &str) -> Result<ResultSet> {
        self.get(
            GET_ALL_OFFSET,
            GET_ALL_LIMIT,
            IteratorType::Gt,
            index,
            crate::tuple![""],
        )
        .await
    }

    /// Read the single tuple whose key equals `id`
    pub async fn get_element_by_id(&self, id: &str, index: &str) -> Result<ResultSet> {
        self.get(0, 1, IteratorType::Eq, index, crate::tuple![id])
            .await
    }

    /// Delete the tuple whose key equals `id`
    pub async fn delete(&self, id: &str, index: &str) -> Result<()> {
        tracing::debug!(space = %self.name, index, "delete");
        self.driver()?
            .delete(&self.name, index, &crate::tuple![id])
            .await
            .map(drop)
    }

    /// Insert or overwrite a tuple
    pub async fn replace(&self, line: Tuple) -> Result<()> {
        tracing::debug!(space = %self.name, fields = line.len(), "replace");
        self.driver()?.replace(&self.name, &line).await.map(drop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::mock::{Call, MockConnector, MockDriver};
    use crate::core::options::ConnectOptions;

    async fn bound_space(driver: &MockDriver) -> Space {
        let t = Arc::new(Tarantool::new(MockConnector::new(driver.clone())));
        t.connect("127.0.0.1:3301", ConnectOptions::default())
            .await
            .unwrap();
        let mut space = Space::new();
        space.connect_tarantool(t);
        space
    }

    #[test]
    fn test_lua_chunks_splice_bodies() {
        assert_eq!(
            format_lua("{name = 'id', type = 'string'}"),
            "local name = ...\nbox.space[name]:format({{name = 'id', type = 'string'}})"
        );
        assert_eq!(
            create_index_lua("parts = {'id'}"),
            "local space, index = ...\nbox.space[space]:create_index(index, {parts = {'id'}})"
        );
    }

    #[tokio::test]
    async fn test_unbound_space_is_not_connected() {
        let space = Space::new();
        assert!(!space.is_bound());
        let err = space.add(crate::tuple!["x"]).await.unwrap_err();
        assert!(err.is_not_connected());
    }

    #[tokio::test]
    async fn test_initialize_stores_name_and_schema() {
        let driver = MockDriver::new();
        let mut space = bound_space(&driver).await;
        space
            .initialize_space("users", "{name = 'id', type = 'string'}")
            .await
            .unwrap();

        assert_eq!(space.name(), "users");
        assert_eq!(space.schema(), "{name = 'id', type = 'string'}");
        let calls = driver.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[0],
            Call::Eval {
                code: CREATE_SPACE_LUA.to_string(),
                args: crate::tuple!["users"],
            }
        );
    }

    #[tokio::test]
    async fn test_new_index_passes_names_as_args() {
        let driver = MockDriver::new();
        let mut space = bound_space(&driver).await;
        space.initialize_space("users", "").await.unwrap();

        let name = space.new_index("primary", "parts = {'id'}").await;
        assert_eq!(name, "primary");
        match driver.last_call() {
            Some(Call::Eval { args, .. }) => assert_eq!(args, crate::tuple!["users", "primary"]),
            other => panic!("unexpected call: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_replace_forwards_tuple() {
        let driver = MockDriver::new();
        let mut space = bound_space(&driver).await;
        space.initialize_space("users", "").await.unwrap();

        space.replace(crate::tuple!["id-1", 7]).await.unwrap();
        assert_eq!(
            driver.last_call(),
            Some(Call::Replace {
                space: "users".to_string(),
                tuple: crate::tuple!["id-1", 7],
            })
        );
    }
}
