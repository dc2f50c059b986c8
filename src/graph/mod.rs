//! Directed-graph export of a transition set.
//!
//! The engine only produces DOT text. Turning it into an image is the job of
//! a [`Renderer`], injected into the state machine so that export can be
//! exercised without Graphviz installed.

mod renderer;

pub use renderer::{GraphvizRenderer, RenderError, Renderer};

use crate::core::State;
use crate::effects::Transitions;
use serde::{Deserialize, Serialize};

/// Rendering settings handed to the [`Renderer`].
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```rust
/// use statewright::graph::GraphConfig;
///
/// let config = GraphConfig::from_json(r#"{ "format": "svg" }"#).unwrap();
/// assert_eq!(config.format, "svg");
/// assert_eq!(config.layout, "dot");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Renderer executable.
    pub program: String,
    /// Output image format, e.g. `png` or `svg`.
    pub format: String,
    /// Layout engine name.
    pub layout: String,
    /// Output resolution.
    pub dpi: u32,
    /// Input scale in points per inch.
    pub scale: u32,
    /// Maximum drawing size in inches, `"width,height"`.
    pub size: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            program: "dot".to_string(),
            format: "png".to_string(),
            layout: "dot".to_string(),
            dpi: 200,
            scale: 72,
            size: "10,5".to_string(),
        }
    }
}

impl GraphConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Build the DOT description of `transitions`.
///
/// Nodes are the known states. Each concrete source gets one edge to the
/// destination, labelled with the transition id. A wildcard source fans out
/// from every known state.
pub fn to_dot<S: State>(transitions: &Transitions<S>) -> String {
    let all_states = transitions.all_states();

    let mut dot = String::from(
        "digraph StateMachine {\n\trankdir=LR\n\tnode[width=1 fixedsize=true shape=circle style=filled]\n\n",
    );
    for state in &all_states {
        dot.push_str(&format!("\t{}\n", quote(state.name())));
    }
    dot.push('\n');

    for transition in transitions.iter() {
        let destination = quote(transition.destination().name());
        let label = quote(transition.id());
        for source in transition.sources() {
            if source.is_wildcard() {
                for state in &all_states {
                    dot.push_str(&format!(
                        "\t{} -> {} [label={}]\n",
                        quote(state.name()),
                        destination,
                        label
                    ));
                }
            } else {
                dot.push_str(&format!(
                    "\t{} -> {} [label={}]\n",
                    quote(source.name()),
                    destination,
                    label
                ));
            }
        }
    }
    dot.push_str("}\n");
    dot
}

fn quote(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}
