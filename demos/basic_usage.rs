//! Basic facade usage example
//!
//! This example demonstrates the facade against a live server:
//! - Connecting with options
//! - Creating a space and an index
//! - Inserting, reading, replacing and deleting tuples
//!
//! Run with: TARANTOOL_ADDR=127.0.0.1:3301 cargo run --example basic_usage --features tarantool

use std::sync::Arc;
use std::time::Duration;
use tarantool_api::backends::TarantoolConnector;
use tarantool_api::prelude::*;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let addr = std::env::var("TARANTOOL_ADDR").unwrap_or_else(|_| "127.0.0.1:3301".to_string());

    println!("1. Connecting to {}...", addr);
    let db = Arc::new(Tarantool::new(TarantoolConnector::new()));
    let options = ConnectOptions::builder()
        .timeout(Duration::from_secs(2))
        .debug(true)
        .build()?;
    db.connect(&addr, options).await?;
    db.print_spaces_list().await;

    println!("2. Creating space and index...");
    let _ = db
        .execute_lua("if box.space.demo_users then box.space.demo_users:drop() end")
        .await;
    let mut users = Space::new();
    users
        .initialize_space_with(
            Arc::clone(&db),
            "demo_users",
            "{name = 'id', type = 'string'}, {name = 'email', type = 'string'}, {name = 'age', type = 'unsigned'}",
        )
        .await?;
    let primary = users.new_index("primary", "type = 'tree', parts = {'id'}").await;

    println!("3. Inserting data...");
    for (id, email, age) in [
        ("alice", "alice@example.com", 30u32),
        ("bob", "bob@example.com", 25),
        ("charlie", "charlie@example.com", 35),
    ] {
        users.add(tuple![id, email, age]).await?;
    }

    println!("4. Reading data...");
    for row in users.get_all(&primary).await? {
        println!("   {}", row);
    }
    let alice = users.get_element_by_id("alice", &primary).await?;
    println!("   alice: {:?}", alice);

    println!("5. Replacing and deleting...");
    users.replace(tuple!["alice", "alice@example.org", 31u32]).await?;
    users.delete("bob", &primary).await?;

    let remaining = users.get(0, 10, IteratorType::All, &primary, tuple![]).await?;
    println!("   {} tuples remain", remaining.len());

    db.execute_lua("box.space.demo_users:drop()").await?;
    db.disconnect();
    Ok(())
}
