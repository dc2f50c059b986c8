//! Builder API for ergonomic state machine construction.
//!
//! This module provides fluent builders and macros for creating state machines
//! with minimal boilerplate while maintaining type safety.

pub mod error;
pub mod machine;
pub mod macros;
pub mod transition;

pub use error::BuildError;
pub use machine::StateMachineBuilder;
pub use transition::TransitionBuilder;

use crate::core::{State, States};
use crate::effects::{ActionResult, Transition};

/// Create a transition whose action does nothing.
///
/// # Example
///
/// ```
/// use statewright::builder::simple_transition;
/// use statewright::state_enum;
///
/// state_enum! {
///     enum MyState {
///         Start,
///         End,
///     }
/// }
///
/// let transition = simple_transition("finish", [MyState::Start], MyState::End);
/// assert!(transition.is_allowed_to_run(&MyState::Start));
/// ```
pub fn simple_transition<S: State>(
    id: impl Into<String>,
    sources: impl Into<States<S>>,
    to: S,
) -> Transition<S> {
    Transition::new(id, sources, to).with_action(|_ctx, _object, _params| async { ActionResult::Ok(()) })
}

/// Create a transition reachable from every state.
///
/// # Example
///
/// ```
/// use statewright::builder::wildcard_transition;
/// use statewright::core::DefaultState;
///
/// let reset = wildcard_transition("reset", DefaultState::ANY, DefaultState::from("Idle"));
/// assert!(reset.is_allowed_to_run(&DefaultState::from("Busy")));
/// ```
pub fn wildcard_transition<S: State>(id: impl Into<String>, wildcard: S, to: S) -> Transition<S> {
    simple_transition(id, [wildcard], to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DefaultState;

    #[test]
    fn simple_transition_builds() {
        let transition = simple_transition(
            "1",
            [DefaultState::from("Start")],
            DefaultState::from("Middle"),
        );

        assert_eq!(transition.destination(), &DefaultState::from("Middle"));
        assert!(transition.has_action());
        assert!(transition.is_allowed_to_run(&DefaultState::from("Start")));
        assert!(!transition.is_allowed_to_run(&DefaultState::from("Middle")));
    }

    #[test]
    fn wildcard_transition_runs_from_anywhere() {
        let transition =
            wildcard_transition("reset", DefaultState::ANY, DefaultState::from("Start"));

        assert!(transition.sources().has_wildcard());
        assert!(transition.is_allowed_to_run(&DefaultState::from("Middle")));
    }
}
