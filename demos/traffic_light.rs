//! Traffic Light State Machine
//!
//! This example demonstrates a simple cyclic state machine.
//!
//! Key concepts:
//! - Enum states generated with `state_enum!`
//! - Cyclic transitions with no-op actions
//! - Exporting the transition graph through a custom renderer
//!
//! Run with: cargo run --example traffic_light

use async_trait::async_trait;
use parking_lot::RwLock;
use statewright::builder::{simple_transition, StateMachineBuilder};
use statewright::core::{Context, DefaultParams, SharedParams, Stateful};
use statewright::effects::BoxError;
use statewright::graph::{GraphConfig, RenderError, Renderer};
use statewright::state_enum;
use std::path::Path;
use std::sync::Arc;

state_enum! {
    enum TrafficLight {
        Red,
        Yellow,
        Green,
    }
}

struct Light(RwLock<TrafficLight>);

#[async_trait]
impl Stateful<TrafficLight> for Light {
    fn id(&self) -> &str {
        "main-street"
    }

    fn state(&self) -> TrafficLight {
        *self.0.read()
    }

    async fn set_state(
        &self,
        _ctx: &Context,
        state: TrafficLight,
        _params: &SharedParams,
    ) -> Result<(), BoxError> {
        *self.0.write() = state;
        Ok(())
    }
}

/// Prints the DOT text instead of invoking Graphviz.
struct PrintRenderer;

impl Renderer for PrintRenderer {
    fn render(&self, dot: &str, output: &Path, config: &GraphConfig) -> Result<(), RenderError> {
        println!("would write {} as {}:\n{dot}", output.display(), config.format);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Traffic Light State Machine ===\n");

    let machine = StateMachineBuilder::new()
        .transitions(vec![
            simple_transition("go", [TrafficLight::Red], TrafficLight::Green),
            simple_transition("caution", [TrafficLight::Green], TrafficLight::Yellow),
            simple_transition("stop", [TrafficLight::Yellow], TrafficLight::Red),
        ])
        .renderer(PrintRenderer)
        .build();

    let light = Arc::new(Light(RwLock::new(TrafficLight::Red)));
    let ctx = Context::new();
    let sequence = [
        TrafficLight::Green,
        TrafficLight::Yellow,
        TrafficLight::Red,
        TrafficLight::Green,
    ];

    for next in sequence {
        machine
            .run(&ctx, light.clone(), next, DefaultParams::new().shared())
            .await?;
        println!("Light is now {:?}", light.state());
    }

    if let Err(err) = machine
        .run(&ctx, light.clone(), TrafficLight::Red, DefaultParams::new().shared())
        .await
    {
        println!("Green cannot jump to Red: {err}");
    }

    machine.graph("traffic_light.png")?;

    println!("\n=== Example Complete ===");
    Ok(())
}
