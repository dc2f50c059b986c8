//! Build errors for state machine and transition builders.

use thiserror::Error;

/// Errors that can occur when building transitions.
#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    #[error("Transition source states not specified. Call .from(state) or .sources(states)")]
    MissingSourceStates,

    #[error("Transition target state not specified. Call .to(state)")]
    MissingToState,

    #[error("Transition '{id}' targets the wildcard state, which only matches as a source")]
    WildcardDestination { id: String },
}
