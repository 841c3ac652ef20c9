//! Connection facade
//!
//! [`Tarantool`] owns at most one driver session. It is shared with the
//! spaces bound to it through an `Arc`, so a session opened after a space
//! was bound is still visible to that space.

use super::driver::{Connector, Driver};
use super::error::{DatabaseError, Result};
use super::options::{validate_address, ConnectOptions};
use super::value::{ResultSet, TupleValue};
use parking_lot::RwLock;
use std::sync::Arc;

/// Lists user space names, skipping system spaces
const LIST_SPACES_LUA: &str = r#"
local names = {}
for _, space in box.space._space:pairs() do
    if string.sub(space[3], 1, 1) ~= '_' then
        table.insert(names, space[3])
    end
end
return names
"#;

/// Connection facade over a driver session
pub struct Tarantool {
    connector: Box<dyn Connector>,
    options: RwLock<ConnectOptions>,
    session: RwLock<Option<Arc<dyn Driver>>>,
}

impl Tarantool {
    /// Create a facade that opens sessions through `connector`
    pub fn new(connector: impl Connector + 'static) -> Self {
        Self {
            connector: Box::new(connector),
            options: RwLock::new(ConnectOptions::default()),
            session: RwLock::new(None),
        }
    }

    /// Open a session with the database at `address`
    ///
    /// Any previous session is dropped first. On failure the session handle
    /// stays unset and the error is returned; later operations fail with
    /// [`DatabaseError::NotConnected`].
    pub async fn connect(&self, address: &str, options: ConnectOptions) -> Result<()> {
        *self.options.write() = options.clone();
        self.session.write().take();

        let opened = match validate_address(address) {
            Ok(()) => self.connector.connect(address, &options).await,
            Err(e) => Err(e),
        };

        match opened {
            Ok(driver) => {
                *self.session.write() = Some(driver);
                tracing::info!(address, user = options.user_or_guest(), "connected");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(address, error = %e, "connect failed");
                Err(e)
            }
        }
    }

    /// Check if a session is open
    pub fn is_connected(&self) -> bool {
        self.session.read().is_some()
    }

    /// Drop the session
    pub fn disconnect(&self) {
        if self.session.write().take().is_some() {
            tracing::info!("disconnected");
        }
    }

    /// Options passed to the last `connect`
    pub fn options(&self) -> ConnectOptions {
        self.options.read().clone()
    }

    /// The open session
    pub fn session(&self) -> Result<Arc<dyn Driver>> {
        self.session.read().clone().ok_or(DatabaseError::NotConnected)
    }

    /// Evaluate a Lua chunk with positional arguments
    pub async fn eval(&self, code: &str, args: &[TupleValue]) -> Result<ResultSet> {
        let session = self.session()?;
        tracing::debug!(args = args.len(), "eval");
        session.eval(code, args).await
    }

    /// Evaluate plain Lua code without arguments
    pub async fn execute_lua(&self, code: &str) -> Result<ResultSet> {
        self.eval(code, &[]).await
    }

    /// Names of all user spaces
    pub async fn spaces_list(&self) -> Result<Vec<String>> {
        let data = self.execute_lua(LIST_SPACES_LUA).await?;
        let names = match data.first() {
            None | Some(TupleValue::Nil) => return Ok(Vec::new()),
            Some(TupleValue::Array(names)) => names,
            Some(other) => {
                return Err(DatabaseError::decode(format!(
                    "expected array of space names, got {}",
                    other.type_name()
                )))
            }
        };

        names
            .iter()
            .map(|name| {
                name.as_str().map(str::to_string).ok_or_else(|| {
                    DatabaseError::decode(format!("space name is {}", name.type_name()))
                })
            })
            .collect()
    }

    /// Log every user space at debug level when the `debug` option is set
    pub async fn print_spaces_list(&self) {
        if !self.options.read().debug {
            return;
        }
        match self.spaces_list().await {
            Ok(names) => {
                for name in names {
                    tracing::debug!(space = %name, "space");
                }
            }
            Err(e) => tracing::warn!(error = %e, "could not list spaces"),
        }
    }
}

impl std::fmt::Debug for Tarantool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tarantool")
            .field("options", &*self.options.read())
            .field("connected", &self.is_connected())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::mock::{Call, MockConnector, MockDriver};
    use crate::tuple;

    #[tokio::test]
    async fn test_connect_sets_session() {
        let t = Tarantool::new(MockConnector::new(MockDriver::new()));
        assert!(!t.is_connected());

        t.connect("127.0.0.1:3301", ConnectOptions::default())
            .await
            .unwrap();
        assert!(t.is_connected());

        t.disconnect();
        assert!(!t.is_connected());
    }

    #[tokio::test]
    async fn test_invalid_address_never_reaches_connector() {
        let connector = MockConnector::new(MockDriver::new());
        let t = Tarantool::new(connector.clone());

        let err = t
            .connect("no-port", ConnectOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidAddress(_)));
        assert!(connector.addresses().is_empty());
        assert!(!t.is_connected());
    }

    #[tokio::test]
    async fn test_eval_without_session() {
        let t = Tarantool::new(MockConnector::new(MockDriver::new()));
        let err = t.execute_lua("return 1").await.unwrap_err();
        assert!(err.is_not_connected());
    }

    #[tokio::test]
    async fn test_execute_lua_forwards_without_args() {
        let driver = MockDriver::new();
        driver.respond_with(tuple![1]);
        let t = Tarantool::new(MockConnector::new(driver.clone()));
        t.connect("localhost:3301", ConnectOptions::default())
            .await
            .unwrap();

        let data = t.execute_lua("return 1").await.unwrap();
        assert_eq!(data, tuple![1]);
        assert_eq!(
            driver.last_call(),
            Some(Call::Eval {
                code: "return 1".to_string(),
                args: vec![]
            })
        );
    }

    #[tokio::test]
    async fn test_spaces_list_decodes_names() {
        let driver = MockDriver::new();
        driver.respond_with(vec![TupleValue::Array(tuple!["users", "orders"])]);
        let t = Tarantool::new(MockConnector::new(driver));
        t.connect("localhost:3301", ConnectOptions::default())
            .await
            .unwrap();

        assert_eq!(t.spaces_list().await.unwrap(), vec!["users", "orders"]);
    }

    #[tokio::test]
    async fn test_print_spaces_list_is_silent_without_debug() {
        let driver = MockDriver::new();
        let t = Tarantool::new(MockConnector::new(driver.clone()));
        t.connect("localhost:3301", ConnectOptions::default())
            .await
            .unwrap();

        t.print_spaces_list().await;
        assert!(driver.calls().is_empty());

        let debug = ConnectOptions::builder().debug(true).build().unwrap();
        t.connect("localhost:3301", debug).await.unwrap();
        t.print_spaces_list().await;
        assert_eq!(driver.calls().len(), 1);
    }
}
