use std::process::exit;

use serde_json::{json, Value};
use wunderlist_client::{Client, ClientConfig, Credentials, Result};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Expect the account email and password as arguments; the base URL
    // may be overridden through WUNDERLIST_BASE_URL.
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <email> <password>", args[0]);
        exit(1);
    }

    let mut client = Client::from_config(ClientConfig::from_env())?;

    let login = client
        .login(&Credentials::new(args[1].as_str(), args[2].as_str()))
        .await?;
    println!("Logged in as {}", login["email"]);

    let me = client.get_me().await?;
    println!("User: {}", me["name"]);

    // Create a list and a task inside it
    let list = client
        .create_me_list(Some(json!({ "title": "Groceries" })))
        .await?;
    let list_id = id_of(&list);
    println!("Created list {}", list_id);

    let task = client
        .create_me_task(Some(json!({ "list_id": &list_id, "title": "Buy milk" })))
        .await?;
    let task_id = id_of(&task);
    println!("Created task {}", task_id);

    let tasks = client.get_me_tasks_in_list(&list_id).await?;
    println!("Tasks in list: {}", tasks);

    client
        .update_me_task(&task_id, Some(json!({ "completed_at": "2013-01-01T00:00:00Z" })))
        .await?;
    println!("Task completed");

    client
        .update_me_list(&list_id, Some(json!({ "title": "Weekend groceries" })))
        .await?;

    client.delete_me_task(&task_id).await?;
    client.delete_me_list(&list_id).await?;
    println!("Cleaned up");

    Ok(())
}

/// Resource ids come back as JSON strings; numbers are accepted too.
fn id_of(payload: &Value) -> String {
    match &payload["id"] {
        Value::String(id) => id.clone(),
        other => other.to_string(),
    }
}
