//! Shared fixtures for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::RwLock;
use statewright::core::{Context, DefaultState, SharedParams, Stateful, StatefulRef};
use statewright::effects::BoxError;
use std::sync::Arc;

pub const STATE1: DefaultState = DefaultState::from_static("State1");
pub const STATE2: DefaultState = DefaultState::from_static("State2");
pub const STATE3: DefaultState = DefaultState::from_static("State3");
pub const STATE4: DefaultState = DefaultState::from_static("State4");
pub const STATE5: DefaultState = DefaultState::from_static("State5");

/// In-memory entity whose commit can be made to fail.
pub struct TestObject {
    id: String,
    state: RwLock<DefaultState>,
    reject_commits: bool,
}

impl TestObject {
    pub fn new(id: &str, state: DefaultState) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            state: RwLock::new(state),
            reject_commits: false,
        })
    }

    pub fn rejecting_commits(id: &str, state: DefaultState) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            state: RwLock::new(state),
            reject_commits: true,
        })
    }

    pub fn force_state(&self, state: DefaultState) {
        *self.state.write() = state;
    }
}

#[async_trait]
impl Stateful<DefaultState> for TestObject {
    fn id(&self) -> &str {
        &self.id
    }

    fn state(&self) -> DefaultState {
        self.state.read().clone()
    }

    async fn set_state(
        &self,
        _ctx: &Context,
        state: DefaultState,
        _params: &SharedParams,
    ) -> Result<(), BoxError> {
        if self.reject_commits {
            return Err(format!("storage rejected {} for {}", state, self.id).into());
        }
        *self.state.write() = state;
        Ok(())
    }
}

pub fn batch(objects: &[&Arc<TestObject>]) -> Vec<StatefulRef<DefaultState>> {
    objects
        .iter()
        .map(|object| Arc::clone(object) as StatefulRef<DefaultState>)
        .collect()
}
