//! Order Workflow
//!
//! This example drives orders through a small fulfilment workflow.
//!
//! Key concepts:
//! - String-backed states with a wildcard "cancel from anywhere" rule
//! - Actions reading and writing request-scoped params
//! - Batch transitions over orders sharing one state
//! - Rejected transitions leave orders untouched
//!
//! Run with: cargo run --example order_workflow

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::json;
use statewright::builder::{StateMachineBuilder, TransitionBuilder};
use statewright::core::{
    Context, DefaultParams, DefaultState, Params, SharedParams, Stateful, StatefulRef,
};
use statewright::effects::BoxError;
use std::sync::Arc;
use std::time::Duration;

const CREATED: DefaultState = DefaultState::from_static("Created");
const PAID: DefaultState = DefaultState::from_static("Paid");
const SHIPPED: DefaultState = DefaultState::from_static("Shipped");
const CANCELLED: DefaultState = DefaultState::from_static("Cancelled");

struct Order {
    id: String,
    state: RwLock<DefaultState>,
}

impl Order {
    fn new(id: &str) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            state: RwLock::new(CREATED),
        })
    }
}

#[async_trait]
impl Stateful<DefaultState> for Order {
    fn id(&self) -> &str {
        &self.id
    }

    fn state(&self) -> DefaultState {
        self.state.read().clone()
    }

    async fn set_state(
        &self,
        _ctx: &Context,
        state: DefaultState,
        params: &SharedParams,
    ) -> Result<(), BoxError> {
        params.set(&format!("{}.state", self.id), json!(state.as_str()))?;
        *self.state.write() = state;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "statewright=debug".into()),
        )
        .init();

    println!("=== Order Workflow Example ===\n");

    let machine = StateMachineBuilder::new()
        .transition(TransitionBuilder::new("pay").from(CREATED).to(PAID).action(
            |_ctx, order: StatefulRef<DefaultState>, params: SharedParams| async move {
                let amount = params.get("amount").and_then(|v| v.as_u64()).unwrap_or(0);
                if amount == 0 {
                    return Err(format!("order {} has nothing to pay", order.id()).into());
                }
                params.set("charged", json!(amount))?;
                Ok(())
            },
        ))?
        .transition(TransitionBuilder::new("ship").from(PAID).to(SHIPPED).batch_action(
            |_ctx, orders: Vec<StatefulRef<DefaultState>>, params: SharedParams| async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                params.set("shipped", json!(orders.len()))?;
                Ok(())
            },
        ))?
        .transition(
            TransitionBuilder::new("cancel")
                .from(DefaultState::ANY)
                .to(CANCELLED)
                .succeeds(),
        )?
        .build();

    println!("Known states: {:?}", machine.all_states());

    let ctx = Context::new().with_timeout(Duration::from_secs(5));
    let first = Order::new("order-1");
    let second = Order::new("order-2");

    let params = DefaultParams::new().with("amount", json!(42)).shared();
    machine.run(&ctx, first.clone(), PAID, params.clone()).await?;
    machine.run(&ctx, second.clone(), PAID, params.clone()).await?;
    println!("Charged: {:?}", params.get("charged"));

    let batch = vec![
        first.clone() as StatefulRef<DefaultState>,
        second.clone() as StatefulRef<DefaultState>,
    ];
    machine.batch_run(&ctx, batch, SHIPPED, params.clone()).await?;
    println!("Shipped {:?} orders", params.get("shipped"));

    let third = Order::new("order-3");
    match machine
        .run(&ctx, third.clone(), SHIPPED, DefaultParams::new().shared())
        .await
    {
        Ok(()) => println!("unexpected: unpaid order shipped"),
        Err(err) => println!("Rejected: {err}"),
    }

    machine
        .run(&ctx, third.clone(), CANCELLED, DefaultParams::new().shared())
        .await?;
    println!("order-3 is now {}", third.state());

    for order in [&first, &second] {
        let available = machine.available_transitions(&**order);
        println!("{} ({}) can still take: {:?}", order.id(), order.state(), available.ids());
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
