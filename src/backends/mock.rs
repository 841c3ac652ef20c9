//! Recording driver backend
//!
//! [`MockDriver`] records every request it receives and answers with queued
//! responses or simulated failures. It stands in for a live server in tests
//! and benchmarks.

use crate::core::{
    driver::{Connector, Driver},
    error::{DatabaseError, Result},
    iterator::IteratorType,
    options::ConnectOptions,
    value::{ResultSet, Tuple, TupleValue},
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// A request seen by [`MockDriver`]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Eval {
        code: String,
        args: Tuple,
    },
    Insert {
        space: String,
        tuple: Tuple,
    },
    Select {
        space: String,
        index: String,
        offset: u32,
        limit: u32,
        iterator: IteratorType,
        key: Tuple,
    },
    Delete {
        space: String,
        index: String,
        key: Tuple,
    },
    Replace {
        space: String,
        tuple: Tuple,
    },
    Ping,
}

impl Call {
    /// Request name, as used in [`DatabaseError::RequestError`]
    pub fn request(&self) -> &'static str {
        match self {
            Call::Eval { .. } => "eval",
            Call::Insert { .. } => "insert",
            Call::Select { .. } => "select",
            Call::Delete { .. } => "delete",
            Call::Replace { .. } => "replace",
            Call::Ping => "ping",
        }
    }
}

type FailRule = Box<dyn Fn(&Call) -> bool + Send + Sync>;

#[derive(Default)]
struct MockState {
    calls: Vec<Call>,
    fail_rules: Vec<FailRule>,
    responses: VecDeque<ResultSet>,
}

/// Driver that records requests instead of sending them
///
/// Clones share the same state, so a test can keep one handle while the
/// facade owns another.
#[derive(Clone, Default)]
pub struct MockDriver {
    state: Arc<Mutex<MockState>>,
}

impl MockDriver {
    /// Create a driver where every request succeeds with an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every request matching `rule`
    pub fn fail_when<F>(&self, rule: F)
    where
        F: Fn(&Call) -> bool + Send + Sync + 'static,
    {
        self.state.lock().fail_rules.push(Box::new(rule));
    }

    /// Fail every request
    pub fn fail_all(&self) {
        self.fail_when(|_| true);
    }

    /// Queue the data returned by the next successful request
    pub fn respond_with(&self, data: ResultSet) {
        self.state.lock().responses.push_back(data);
    }

    /// All requests seen so far, oldest first
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    /// The most recent request
    pub fn last_call(&self) -> Option<Call> {
        self.state.lock().calls.last().cloned()
    }

    /// Forget recorded requests, failure rules and queued responses
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.calls.clear();
        state.fail_rules.clear();
        state.responses.clear();
    }

    fn record(&self, call: Call) -> Result<ResultSet> {
        let mut state = self.state.lock();
        let failing = state.fail_rules.iter().any(|rule| rule(&call));
        let request = call.request();
        state.calls.push(call);

        if failing {
            return Err(DatabaseError::request(request, "simulated failure"));
        }
        Ok(state.responses.pop_front().unwrap_or_default())
    }
}

impl std::fmt::Debug for MockDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MockDriver")
            .field("calls", &state.calls.len())
            .field("fail_rules", &state.fail_rules.len())
            .field("responses", &state.responses.len())
            .finish()
    }
}

#[async_trait]
impl Driver for MockDriver {
    async fn eval(&self, code: &str, args: &[TupleValue]) -> Result<ResultSet> {
        self.record(Call::Eval {
            code: code.to_string(),
            args: args.to_vec(),
        })
    }

    async fn insert(&self, space: &str, tuple: &[TupleValue]) -> Result<ResultSet> {
        self.record(Call::Insert {
            space: space.to_string(),
            tuple: tuple.to_vec(),
        })
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
        self.record(Call::Select {
            space: space.to_string(),
            index: index.to_string(),
            offset,
            limit,
            iterator,
            key: key.to_vec(),
        })
    }

    async fn delete(&self, space: &str, index: &str, key: &[TupleValue]) -> Result<ResultSet> {
        self.record(Call::Delete {
            space: space.to_string(),
            index: index.to_string(),
            key: key.to_vec(),
        })
    }

    async fn replace(&self, space: &str, tuple: &[TupleValue]) -> Result<ResultSet> {
        self.record(Call::Replace {
            space: space.to_string(),
            tuple: tuple.to_vec(),
        })
    }

    async fn ping(&self) -> Result<()> {
        self.record(Call::Ping).map(drop)
    }
}

/// Connector handing out clones of one [`MockDriver`]
#[derive(Debug, Clone)]
pub struct MockConnector {
    driver: MockDriver,
    refuse: bool,
    addresses: Arc<Mutex<Vec<String>>>,
}

impl MockConnector {
    /// Connector whose sessions all share `driver`
    pub fn new(driver: MockDriver) -> Self {
        Self {
            driver,
            refuse: false,
            addresses: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Connector whose every connect attempt is refused
    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::new(MockDriver::new())
        }
    }

    /// Addresses passed to `connect`, oldest first
    pub fn addresses(&self) -> Vec<String> {
        self.addresses.lock().clone()
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self, address: &str, _options: &ConnectOptions) -> Result<Arc<dyn Driver>> {
        self.addresses.lock().push(address.to_string());
        if self.refuse {
            return Err(DatabaseError::connection(format!(
                "{}: connection refused",
                address
            )));
        }
        Ok(Arc::new(self.driver.clone()))
    }
}
