//! Transition execution: the effectful shell around the core types.
//!
//! # Key Concepts
//!
//! - **Transitions**: rules from a set of source states to one destination,
//!   carrying single-entity and/or batch actions
//! - **State Machine**: first-match lookup, action execution and state commit
//! - **FutureTask**: each call runs on its own Tokio task, with panics turned
//!   into errors and waiting bounded by a `Context`

mod future;
mod machine;
pub(crate) mod transition;

pub use future::FutureTask;
pub use machine::StateMachine;
pub use transition::{
    Action, ActionResult, ActionShape, BatchAction, BoxError, Transition, TransitionError,
    Transitions,
};
