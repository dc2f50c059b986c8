//! Core value types and collaborator interfaces.
//!
//! This module contains the leaves of the engine:
//! - State identifiers via the `State` trait, with `DefaultState` and `States`
//! - The `Stateful` capability implemented by caller-owned entities
//! - The `Params` bag threaded through one execution
//! - The `Context` carrying cancellation and deadlines
//!
//! Nothing here spawns tasks or runs actions.

mod context;
mod params;
mod state;
mod stateful;

pub use context::{Context, ContextError};
pub use params::{DefaultParams, Params, SharedParams};
pub use state::{DefaultState, State, States};
pub use stateful::{Stateful, StatefulRef};
