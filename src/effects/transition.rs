//! Transition rules and the actions bound to them.

use crate::core::{Context, ContextError, SharedParams, State, StatefulRef, States};
use crate::graph::RenderError;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Error type returned by caller-supplied actions and collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result of a transition action.
pub type ActionResult = Result<(), BoxError>;

/// Action applied to a single entity.
pub type Action<S> =
    Arc<dyn Fn(Context, StatefulRef<S>, SharedParams) -> BoxFuture<'static, ActionResult> + Send + Sync>;

/// Action applied to a homogeneous batch of entities.
pub type BatchAction<S> = Arc<
    dyn Fn(Context, Vec<StatefulRef<S>>, SharedParams) -> BoxFuture<'static, ActionResult>
        + Send
        + Sync,
>;

/// Which action shape a call needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionShape {
    Single,
    Batch,
}

impl fmt::Display for ActionShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => f.write_str("transfer"),
            Self::Batch => f.write_str("batch transfer"),
        }
    }
}

/// Errors that can occur while matching, executing or committing a transition.
#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    #[error("no transition found source {from} destination {to}")]
    TransitionNotFound { from: String, to: String },

    #[error("not found {shape} function")]
    ActionNotDefined { shape: ActionShape },

    #[error("the stateful object state is not the same. want {expected} got {found} (object '{id}')")]
    InconsistentBatchState {
        expected: String,
        found: String,
        id: String,
    },

    /// Error returned by a transition action, passed through untouched.
    #[error(transparent)]
    Action(BoxError),

    #[error("transition action panicked: {message}")]
    Panicked { message: String, backtrace: String },

    #[error("failed to commit state '{state}' on '{id}': {source}")]
    Commit {
        id: String,
        state: String,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error("transition task was aborted before completing")]
    Aborted,

    #[error("transition task result was already taken")]
    ResultTaken,

    #[error("can't find any transition")]
    NoTransitions,

    #[error("failed to render state graph: {0}")]
    Render(#[from] RenderError),
}

impl TransitionError {
    pub(crate) fn not_found<S: State>(from: &S, to: &S) -> Self {
        Self::TransitionNotFound {
            from: from.name().to_string(),
            to: to.name().to_string(),
        }
    }
}

pub(crate) fn box_action<S, F, Fut>(action: F) -> Action<S>
where
    S: State,
    F: Fn(Context, StatefulRef<S>, SharedParams) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ActionResult> + Send + 'static,
{
    Arc::new(move |ctx, object, params| action(ctx, object, params).boxed())
}

pub(crate) fn box_batch_action<S, F, Fut>(action: F) -> BatchAction<S>
where
    S: State,
    F: Fn(Context, Vec<StatefulRef<S>>, SharedParams) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ActionResult> + Send + 'static,
{
    Arc::new(move |ctx, objects, params| action(ctx, objects, params).boxed())
}

/// A rule allowing entities in any of `sources` to move to `destination`.
///
/// A transition may carry a single-entity action, a batch action, or both.
/// Either shape stands in for the other when it is missing.
///
/// # Example
///
/// ```rust
/// use statewright::core::DefaultState;
/// use statewright::effects::{ActionResult, Transition};
///
/// let pay = Transition::new("pay", [DefaultState::from("Created")], DefaultState::from("Paid"))
///     .with_action(|_ctx, _order, _params| async move { ActionResult::Ok(()) });
///
/// assert!(pay.is_allowed_to_run(&DefaultState::from("Created")));
/// assert!(pay.is_allowed_to_transfer(&DefaultState::from("Paid")));
/// ```
#[derive(Clone)]
pub struct Transition<S: State> {
    id: String,
    sources: States<S>,
    destination: S,
    action: Option<Action<S>>,
    batch_action: Option<BatchAction<S>>,
}

impl<S: State> Transition<S> {
    /// Create a transition without actions. Attach one with `with_action`
    /// or `with_batch_action`.
    pub fn new(id: impl Into<String>, sources: impl Into<States<S>>, destination: S) -> Self {
        Self {
            id: id.into(),
            sources: sources.into(),
            destination,
            action: None,
            batch_action: None,
        }
    }

    pub(crate) fn from_parts(
        id: String,
        sources: States<S>,
        destination: S,
        action: Option<Action<S>>,
        batch_action: Option<BatchAction<S>>,
    ) -> Self {
        Self {
            id,
            sources,
            destination,
            action,
            batch_action,
        }
    }

    /// Attach the single-entity action.
    pub fn with_action<F, Fut>(mut self, action: F) -> Self
    where
        F: Fn(Context, StatefulRef<S>, SharedParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ActionResult> + Send + 'static,
    {
        self.action = Some(box_action(action));
        self
    }

    /// Attach the batch action.
    pub fn with_batch_action<F, Fut>(mut self, action: F) -> Self
    where
        F: Fn(Context, Vec<StatefulRef<S>>, SharedParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ActionResult> + Send + 'static,
    {
        self.batch_action = Some(box_batch_action(action));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn sources(&self) -> &States<S> {
        &self.sources
    }

    pub fn destination(&self) -> &S {
        &self.destination
    }

    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }

    pub fn has_batch_action(&self) -> bool {
        self.batch_action.is_some()
    }

    /// Whether an entity in `state` may take this transition.
    pub fn is_allowed_to_run(&self, state: &S) -> bool {
        self.sources.contains(state) || self.sources.has_wildcard()
    }

    /// Whether this transition leads to `state`. Destinations never match
    /// as wildcards.
    pub fn is_allowed_to_transfer(&self, state: &S) -> bool {
        self.destination == *state
    }

    /// Run the action for one entity, falling back to the batch action
    /// with a one-element batch.
    pub async fn transfer(
        &self,
        ctx: &Context,
        object: StatefulRef<S>,
        params: &SharedParams,
    ) -> Result<(), TransitionError> {
        if let Some(action) = &self.action {
            return action(ctx.clone(), object, Arc::clone(params))
                .await
                .map_err(TransitionError::Action);
        }
        if let Some(batch_action) = &self.batch_action {
            return batch_action(ctx.clone(), vec![object], Arc::clone(params))
                .await
                .map_err(TransitionError::Action);
        }
        Err(TransitionError::ActionNotDefined {
            shape: ActionShape::Single,
        })
    }

    /// Run the batch action, falling back to the single-entity action
    /// applied to each entity in order.
    ///
    /// The fallback stops at the first failure. Entities before it have
    /// already had their action run.
    pub async fn batch_transfer(
        &self,
        ctx: &Context,
        objects: Vec<StatefulRef<S>>,
        params: &SharedParams,
    ) -> Result<(), TransitionError> {
        if let Some(batch_action) = &self.batch_action {
            return batch_action(ctx.clone(), objects, Arc::clone(params))
                .await
                .map_err(TransitionError::Action);
        }
        if let Some(action) = &self.action {
            for object in objects {
                action(ctx.clone(), object, Arc::clone(params))
                    .await
                    .map_err(TransitionError::Action)?;
            }
            return Ok(());
        }
        Err(TransitionError::ActionNotDefined {
            shape: ActionShape::Batch,
        })
    }
}

impl<S: State> fmt::Debug for Transition<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("id", &self.id)
            .field("sources", &self.sources)
            .field("destination", &self.destination)
            .field("action", &self.action.is_some())
            .field("batch_action", &self.batch_action.is_some())
            .finish()
    }
}

/// Ordered transition list, searched in insertion order.
#[derive(Clone, Debug)]
pub struct Transitions<S: State>(Vec<Arc<Transition<S>>>);

impl<S: State> Transitions<S> {
    pub fn new() -> Self {
        Transitions(Vec::new())
    }

    pub fn push(&mut self, transition: Transition<S>) {
        self.0.push(Arc::new(transition));
    }

    /// First transition that runs from `current` and leads to `target`.
    ///
    /// Registration order is the priority: an earlier wildcard transition
    /// wins over a later, more specific one.
    pub fn find(&self, current: &S, target: &S) -> Option<Arc<Transition<S>>> {
        self.0
            .iter()
            .find(|t| t.is_allowed_to_run(current) && t.is_allowed_to_transfer(target))
            .cloned()
    }

    /// Every transition that may run from `current`, in registration order.
    pub fn available(&self, current: &S) -> Transitions<S> {
        Transitions(
            self.0
                .iter()
                .filter(|t| t.is_allowed_to_run(current))
                .cloned()
                .collect(),
        )
    }

    /// Every source and destination state in first-seen order, without
    /// duplicates or the wildcard.
    pub fn all_states(&self) -> States<S> {
        let mut states = States::new();
        for transition in &self.0 {
            let candidates = transition
                .sources
                .iter()
                .chain(std::iter::once(&transition.destination));
            for state in candidates {
                if !state.is_wildcard() && !states.contains(state) {
                    states.push(state.clone());
                }
            }
        }
        states
    }

    /// Whether a transition with this id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transition<S>> {
        self.0.iter().map(Arc::as_ref)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.iter().map(Transition::id).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: State> Default for Transitions<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> FromIterator<Transition<S>> for Transitions<S> {
    fn from_iter<I: IntoIterator<Item = Transition<S>>>(iter: I) -> Self {
        Transitions(iter.into_iter().map(Arc::new).collect())
    }
}
