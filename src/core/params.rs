//! Key/value parameters threaded through one transition execution.

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::effects::BoxError;

/// Mutable key/value context handed to actions and to `Stateful::set_state`.
///
/// The engine passes the same instance through matching, action execution
/// and state commit of a single call. It provides no isolation between
/// concurrent calls that share one instance.
pub trait Params: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;

    fn set(&self, key: &str, value: Value) -> Result<(), BoxError>;
}

/// Parameters shared between the caller and the spawned transition task.
pub type SharedParams = Arc<dyn Params>;

/// Map-backed parameter bag.
///
/// # Example
///
/// ```rust
/// use statewright::core::{DefaultParams, Params};
/// use serde_json::json;
///
/// let params = DefaultParams::new().with("amount", json!(2));
/// params.set("approved", json!(true)).unwrap();
///
/// assert_eq!(params.get("amount"), Some(json!(2)));
/// assert_eq!(params.get("approved"), Some(json!(true)));
/// assert_eq!(params.get("missing"), None);
/// ```
#[derive(Debug, Default)]
pub struct DefaultParams {
    values: RwLock<HashMap<String, Value>>,
}

impl DefaultParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value while building the bag.
    pub fn with(self, key: impl Into<String>, value: Value) -> Self {
        self.values.write().insert(key.into(), value);
        self
    }

    /// Wrap into the shared handle expected by the state machine.
    pub fn shared(self) -> SharedParams {
        Arc::new(self)
    }

    /// Copy out the current contents.
    pub fn snapshot(&self) -> HashMap<String, Value> {
        self.values.read().clone()
    }
}

impl Params for DefaultParams {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<(), BoxError> {
        self.values.write().insert(key.to_string(), value);
        Ok(())
    }
}

impl From<HashMap<String, Value>> for DefaultParams {
    fn from(values: HashMap<String, Value>) -> Self {
        Self {
            values: RwLock::new(values),
        }
    }
}
