//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::builder::transition::TransitionBuilder;
use crate::core::State;
use crate::effects::{StateMachine, Transition, Transitions};
use crate::graph::{GraphConfig, GraphvizRenderer, Renderer};
use std::sync::Arc;

/// Builder for constructing state machines with a fluent API.
pub struct StateMachineBuilder<S: State> {
    transitions: Transitions<S>,
    renderer: Option<Arc<dyn Renderer>>,
    graph_config: GraphConfig,
}

impl<S: State> StateMachineBuilder<S> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            transitions: Transitions::new(),
            renderer: None,
            graph_config: GraphConfig::default(),
        }
    }

    /// Add a transition using a builder.
    /// Returns an error if the builder fails validation.
    pub fn transition(mut self, builder: TransitionBuilder<S>) -> Result<Self, BuildError> {
        let transition = builder.build()?;
        self.transitions.push(transition);
        Ok(self)
    }

    /// Add a pre-built transition.
    pub fn add_transition(mut self, transition: Transition<S>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transitions at once, keeping their order.
    pub fn transitions(mut self, transitions: impl IntoIterator<Item = Transition<S>>) -> Self {
        for transition in transitions {
            self.transitions.push(transition);
        }
        self
    }

    /// Replace the Graphviz renderer used by `StateMachine::graph`.
    pub fn renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    pub fn graph_config(mut self, config: GraphConfig) -> Self {
        self.graph_config = config;
        self
    }

    /// Build the state machine.
    pub fn build(self) -> StateMachine<S> {
        let renderer = self
            .renderer
            .unwrap_or_else(|| Arc::new(GraphvizRenderer));
        StateMachine::from_parts(self.transitions, renderer, self.graph_config)
    }
}

impl<S: State> Default for StateMachineBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RenderError;
    use crate::state_enum;
    use parking_lot::Mutex;
    use std::path::{Path, PathBuf};

    state_enum! {
        enum TestState {
            Any,
            Initial,
            Processing,
            Complete,
        }
        wildcard: Any
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<(PathBuf, GraphConfig)>>>);

    impl Renderer for Captured {
        fn render(&self, _dot: &str, output: &Path, config: &GraphConfig) -> Result<(), RenderError> {
            self.0.lock().push((output.to_path_buf(), config.clone()));
            Ok(())
        }
    }

    #[test]
    fn builder_propagates_transition_errors() {
        let result = StateMachineBuilder::<TestState>::new()
            .transition(TransitionBuilder::new("start").from(TestState::Initial));

        assert!(matches!(result, Err(BuildError::MissingToState)));
    }

    #[test]
    fn fluent_api_builds_machine() {
        let machine = StateMachineBuilder::new()
            .transition(
                TransitionBuilder::new("start")
                    .from(TestState::Initial)
                    .to(TestState::Processing)
                    .succeeds(),
            )
            .unwrap()
            .add_transition(Transition::new("finish", [TestState::Processing], TestState::Complete))
            .build();

        assert_eq!(machine.transitions().ids(), vec!["start", "finish"]);
        assert_eq!(machine.all_states().len(), 3);
    }

    #[test]
    fn add_multiple_transitions() {
        let machine = StateMachineBuilder::new()
            .transitions(vec![
                Transition::new("start", [TestState::Initial], TestState::Processing),
                Transition::new("reset", [TestState::Any], TestState::Initial),
            ])
            .build();

        assert_eq!(machine.transitions().len(), 2);
        assert!(machine.all_states().iter().all(|s| !s.is_wildcard()));
    }

    #[test]
    fn renderer_and_config_reach_the_machine() {
        let captured = Captured::default();
        let config = GraphConfig {
            format: "svg".to_string(),
            ..GraphConfig::default()
        };
        let machine = StateMachineBuilder::new()
            .add_transition(Transition::new("start", [TestState::Initial], TestState::Processing))
            .renderer(captured.clone())
            .graph_config(config.clone())
            .build();

        machine.graph("out.svg").unwrap();

        let calls = captured.0.lock();
        assert_eq!(calls.as_slice(), &[(PathBuf::from("out.svg"), config)]);
    }
}
