//! Builder for constructing transitions.

use crate::builder::error::BuildError;
use crate::core::{Context, SharedParams, State, StatefulRef, States};
use crate::effects::transition::{box_action, box_batch_action};
use crate::effects::{Action, ActionResult, BatchAction, Transition};
use std::future::Future;

/// Builder for constructing transitions with a fluent API.
pub struct TransitionBuilder<S: State> {
    id: String,
    sources: States<S>,
    to: Option<S>,
    action: Option<Action<S>>,
    batch_action: Option<BatchAction<S>>,
}

impl<S: State> TransitionBuilder<S> {
    /// Create a new transition builder with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sources: States::new(),
            to: None,
            action: None,
            batch_action: None,
        }
    }

    /// Add a source state. May be called several times.
    pub fn from(mut self, state: S) -> Self {
        self.sources.push(state);
        self
    }

    /// Add several source states.
    pub fn sources(mut self, states: impl IntoIterator<Item = S>) -> Self {
        for state in states {
            self.sources.push(state);
        }
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: S) -> Self {
        self.to = Some(state);
        self
    }

    /// Set the single-entity action.
    pub fn action<F, Fut>(mut self, action: F) -> Self
    where
        F: Fn(Context, StatefulRef<S>, SharedParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ActionResult> + Send + 'static,
    {
        self.action = Some(box_action(action));
        self
    }

    /// Set the batch action.
    pub fn batch_action<F, Fut>(mut self, action: F) -> Self
    where
        F: Fn(Context, Vec<StatefulRef<S>>, SharedParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ActionResult> + Send + 'static,
    {
        self.batch_action = Some(box_batch_action(action));
        self
    }

    /// Set an action that does nothing, for pure bookkeeping transitions.
    pub fn succeeds(self) -> Self {
        self.action(|_ctx, _object, _params| async { ActionResult::Ok(()) })
    }

    /// Build the transition.
    pub fn build(self) -> Result<Transition<S>, BuildError> {
        if self.sources.is_empty() {
            return Err(BuildError::MissingSourceStates);
        }
        let to = self.to.ok_or(BuildError::MissingToState)?;
        if to.is_wildcard() {
            return Err(BuildError::WildcardDestination { id: self.id });
        }

        Ok(Transition::from_parts(
            self.id,
            self.sources,
            to,
            self.action,
            self.batch_action,
        ))
    }
}
