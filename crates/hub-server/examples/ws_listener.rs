//! Connect to a running hub-server and print every update it pushes.
//!
//! ```text
//! HUB_CLIENT_URL=ws://127.0.0.1:8080/ws?user_id=alice cargo run -p hub-server --example ws_listener
//! ```
//!
//! Then publish something:
//!
//! ```text
//! curl -X POST localhost:8080/publish -d '{"target_user_id":"alice","type":"hello","payload":{"n":1}}'
//! ```

use std::env;
use std::error::Error;

use futures_util::StreamExt;
use tokio_tungstenite::{connect_async, tungstenite::Message};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let url = env::var("HUB_CLIENT_URL").unwrap_or_else(|_| "ws://127.0.0.1:8080/ws".to_string());

    println!("Connecting to {}...", url);
    let (mut ws, _) = connect_async(url.as_str()).await?;
    println!("Connected. Waiting for updates (Ctrl-C to quit).\n");

    while let Some(frame) = ws.next().await {
        match frame? {
            Message::Text(text) => println!("<< {}", text.as_str()),
            Message::Binary(data) => println!("<< {} binary bytes", data.len()),
            Message::Close(_) => {
                println!("Server closed the connection.");
                break;
            }
            _ => {}
        }
    }

    Ok(())
}
