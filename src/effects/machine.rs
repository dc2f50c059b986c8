//! State machine that matches and executes transitions.

use crate::core::{Context, SharedParams, State, Stateful, StatefulRef, States};
use crate::effects::future::FutureTask;
use crate::effects::transition::{Transition, TransitionError, Transitions};
use crate::graph::{self, GraphConfig, GraphvizRenderer, Renderer};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Drives caller-owned entities through registered transitions.
///
/// Every `run` and `batch_run` call executes on its own Tokio task through
/// [`FutureTask`]: the transition is matched, its action executed and the new
/// state committed there, while the caller waits on the result or on its
/// `Context`.
pub struct StateMachine<S: State> {
    transitions: Transitions<S>,
    renderer: Arc<dyn Renderer>,
    graph_config: GraphConfig,
}

impl<S: State> StateMachine<S> {
    /// Create an empty state machine rendering graphs with Graphviz.
    pub fn new() -> Self {
        Self::from_parts(Transitions::new(), Arc::new(GraphvizRenderer), GraphConfig::default())
    }

    /// Create a state machine with an initial transition list.
    pub fn with_transitions(transitions: impl IntoIterator<Item = Transition<S>>) -> Self {
        let mut machine = Self::new();
        for transition in transitions {
            machine.add_transition(transition);
        }
        machine
    }

    pub(crate) fn from_parts(
        transitions: Transitions<S>,
        renderer: Arc<dyn Renderer>,
        graph_config: GraphConfig,
    ) -> Self {
        Self {
            transitions,
            renderer,
            graph_config,
        }
    }

    /// Append a transition. Ids are not checked for duplicates.
    pub fn add_transition(&mut self, transition: Transition<S>) {
        self.transitions.push(transition);
    }

    pub fn transitions(&self) -> &Transitions<S> {
        &self.transitions
    }

    /// Every state the machine knows of, wildcard excluded.
    pub fn all_states(&self) -> States<S> {
        self.transitions.all_states()
    }

    /// Transitions the entity may take from its current state.
    pub fn available_transitions(&self, object: &(impl Stateful<S> + ?Sized)) -> Transitions<S> {
        self.transitions.available(&object.state())
    }

    /// First registered transition from `current` to `target`.
    pub fn find_transition(&self, current: &S, target: &S) -> Option<Arc<Transition<S>>> {
        self.transitions.find(current, target)
    }

    /// Move one entity to `target`.
    ///
    /// Fails with `TransitionNotFound` when no rule leads from the entity's
    /// current state to `target`. The state is only committed after the
    /// action succeeds.
    pub async fn run(
        &self,
        ctx: &Context,
        object: StatefulRef<S>,
        target: S,
        params: SharedParams,
    ) -> Result<(), TransitionError> {
        let span = info_span!(
            "transition_run",
            execution_id = %Uuid::new_v4(),
            object_id = %object.id(),
            to = %target.name()
        );
        let transitions = self.transitions.clone();
        let task_ctx = ctx.clone();

        let mut task = FutureTask::spawn(
            async move {
                let current = object.state();
                let Some(transition) = transitions.find(&current, &target) else {
                    warn!(from = %current.name(), "no transition found");
                    return Err(TransitionError::not_found(&current, &target));
                };
                debug!(transition_id = %transition.id(), from = %current.name(), "transition selected");

                transition
                    .transfer(&task_ctx, Arc::clone(&object), &params)
                    .await?;
                commit(&task_ctx, object.as_ref(), &target, &params).await?;

                info!(transition_id = %transition.id(), from = %current.name(), "state committed");
                Ok(())
            }
            .instrument(span),
        );
        task.get(ctx).await
    }

    /// Move a batch of entities sharing one current state to `target`.
    ///
    /// States are committed one entity at a time, in order. A failed commit
    /// stops the batch without rolling back the entities already committed.
    pub async fn batch_run(
        &self,
        ctx: &Context,
        objects: Vec<StatefulRef<S>>,
        target: S,
        params: SharedParams,
    ) -> Result<(), TransitionError> {
        let span = info_span!(
            "transition_batch_run",
            execution_id = %Uuid::new_v4(),
            batch_size = objects.len(),
            to = %target.name()
        );
        let transitions = self.transitions.clone();
        let task_ctx = ctx.clone();

        let mut task = FutureTask::spawn(
            async move {
                let Some(first) = objects.first() else {
                    return Ok(());
                };
                let current = first.state();
                for object in &objects {
                    let state = object.state();
                    if state != current {
                        warn!(
                            object_id = %object.id(),
                            expected = %current.name(),
                            found = %state.name(),
                            "batch objects are not in the same state"
                        );
                        return Err(TransitionError::InconsistentBatchState {
                            expected: current.name().to_string(),
                            found: state.name().to_string(),
                            id: object.id().to_string(),
                        });
                    }
                }

                let Some(transition) = transitions.find(&current, &target) else {
                    warn!(from = %current.name(), "no transition found");
                    return Err(TransitionError::not_found(&current, &target));
                };
                debug!(transition_id = %transition.id(), from = %current.name(), "transition selected");

                transition
                    .batch_transfer(&task_ctx, objects.clone(), &params)
                    .await?;

                for (committed, object) in objects.iter().enumerate() {
                    if let Err(err) = commit(&task_ctx, object.as_ref(), &target, &params).await {
                        if committed > 0 {
                            warn!(
                                committed,
                                total = objects.len(),
                                "batch partially committed"
                            );
                        }
                        return Err(err);
                    }
                }

                info!(
                    transition_id = %transition.id(),
                    from = %current.name(),
                    committed = objects.len(),
                    "batch state committed"
                );
                Ok(())
            }
            .instrument(span),
        );
        task.get(ctx).await
    }

    /// Export the transition graph to `outfile` through the configured renderer.
    pub fn graph(&self, outfile: impl AsRef<Path>) -> Result<(), TransitionError> {
        if self.transitions.is_empty() {
            return Err(TransitionError::NoTransitions);
        }
        let dot = graph::to_dot(&self.transitions);
        self.renderer
            .render(&dot, outfile.as_ref(), &self.graph_config)?;
        Ok(())
    }
}

async fn commit<S: State>(
    ctx: &Context,
    object: &dyn Stateful<S>,
    state: &S,
    params: &SharedParams,
) -> Result<(), TransitionError> {
    object
        .set_state(ctx, state.clone(), params)
        .await
        .map_err(|source| TransitionError::Commit {
            id: object.id().to_string(),
            state: state.name().to_string(),
            source,
        })
}

impl<S: State> Default for StateMachine<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> fmt::Debug for StateMachine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("transitions", &self.transitions)
            .field("graph_config", &self.graph_config)
            .finish_non_exhaustive()
    }
}
