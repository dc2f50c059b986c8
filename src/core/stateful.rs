//! Capability interface for entities driven by the state machine.

use async_trait::async_trait;
use std::sync::Arc;

use super::context::Context;
use super::params::SharedParams;
use super::state::State;
use crate::effects::BoxError;

/// An entity whose state the machine reads and replaces.
///
/// The engine never creates or stores these. It reads `state()` and calls
/// `set_state` during a call, and performs no locking around either, so
/// implementations choose their own interior mutability.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use parking_lot::RwLock;
/// use statewright::core::{Context, DefaultState, SharedParams, Stateful};
/// use statewright::effects::BoxError;
///
/// struct Order {
///     id: String,
///     state: RwLock<DefaultState>,
/// }
///
/// #[async_trait]
/// impl Stateful<DefaultState> for Order {
///     fn id(&self) -> &str {
///         &self.id
///     }
///
///     fn state(&self) -> DefaultState {
///         self.state.read().clone()
///     }
///
///     async fn set_state(
///         &self,
///         _ctx: &Context,
///         state: DefaultState,
///         _params: &SharedParams,
///     ) -> Result<(), BoxError> {
///         *self.state.write() = state;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Stateful<S: State>: Send + Sync {
    /// Stable identity, used in errors and traces.
    fn id(&self) -> &str;

    /// Current state.
    fn state(&self) -> S;

    /// Replace the current state.
    ///
    /// Receives the same params as the transition's action, so the new state
    /// can be persisted with request-scoped data.
    async fn set_state(
        &self,
        ctx: &Context,
        state: S,
        params: &SharedParams,
    ) -> Result<(), BoxError>;
}

/// Shared handle to a caller-owned entity.
pub type StatefulRef<S> = Arc<dyn Stateful<S>>;
