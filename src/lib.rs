//! Statewright: a finite state transition engine
//!
//! Callers register transitions, each a rule from a set of source states to
//! one destination state with an action attached, and then drive their own
//! entities through legal state changes. Illegal changes are rejected, and a
//! misbehaving action can fail a call but never crash the caller.
//!
//! # Core Concepts
//!
//! - **State**: comparable identifier via the `State` trait, with an optional
//!   wildcard value meaning "any state"
//! - **Stateful**: caller-owned entity whose state the machine reads and writes
//! - **Transition**: source states, destination, single and/or batch action
//! - **StateMachine**: first-match lookup, isolated execution, state commit
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use parking_lot::RwLock;
//! use statewright::builder::{StateMachineBuilder, TransitionBuilder};
//! use statewright::core::{Context, DefaultParams, SharedParams, Stateful};
//! use statewright::effects::BoxError;
//! use statewright::state_enum;
//! use std::sync::Arc;
//!
//! state_enum! {
//!     enum Door {
//!         Open,
//!         Closed,
//!     }
//! }
//!
//! struct FrontDoor(RwLock<Door>);
//!
//! #[async_trait]
//! impl Stateful<Door> for FrontDoor {
//!     fn id(&self) -> &str {
//!         "front-door"
//!     }
//!
//!     fn state(&self) -> Door {
//!         *self.0.read()
//!     }
//!
//!     async fn set_state(&self, _: &Context, state: Door, _: &SharedParams) -> Result<(), BoxError> {
//!         *self.0.write() = state;
//!         Ok(())
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let machine = StateMachineBuilder::new()
//!     .transition(TransitionBuilder::new("close").from(Door::Open).to(Door::Closed).succeeds())?
//!     .build();
//!
//! let door = Arc::new(FrontDoor(RwLock::new(Door::Open)));
//! machine
//!     .run(&Context::new(), door.clone(), Door::Closed, DefaultParams::new().shared())
//!     .await?;
//! assert_eq!(door.state(), Door::Closed);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod core;
pub mod effects;
pub mod graph;

// Re-export commonly used types
pub use builder::{StateMachineBuilder, TransitionBuilder};
pub use core::{Context, DefaultParams, DefaultState, Params, SharedParams, State, Stateful, States};
pub use effects::{StateMachine, Transition, TransitionError};
