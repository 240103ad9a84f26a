//! Demo: move a live feed between monitored nodes.
//!
//! Expects a discovery resource like
//! `{"node-1":"ws://localhost:9001/feed","node-2":"ws://localhost:9002/feed"}`
//! and connects to the first discovered endpoint for 30 seconds.
//!
//! Run with: cargo run --example node_picker -- http://localhost:8080/endpoints.json

use std::time::Duration;
use tracing::{info, Level};
use ws_endpoint_picker::{MarkupPage, Message, Picker, PickerConfig, PickerHandler};

/// Prints every inbound message
struct PrintHandler;

impl PickerHandler for PrintHandler {
    async fn on_message(&self, message: Message) {
        match message {
            Message::Text(text) => {
                let text = text.as_str();
                info!("received: {}", &text[..text.len().min(100)]);
            }
            Message::Binary(data) => {
                info!("received binary: {} bytes", data.len());
            }
            _ => {}
        }
    }

    async fn on_reset(&self) {
        info!("selection changed, clearing state");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    let resource_url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://127.0.0.1:8080/endpoints.json".to_string());

    let picker = Picker::new(PickerConfig::default(), PrintHandler)?;

    let mut page = MarkupPage::new();
    picker.initialize(&resource_url, "picker", &mut page).await;
    println!("{}", page.to_html("picker"));

    let items = picker.selector_items();
    if let Some(first) = items.first() {
        info!("selecting '{}'", first.name);
        picker.select(&first.name).await;
        tokio::time::sleep(Duration::from_secs(30)).await;

        let snapshot = picker.metrics().snapshot();
        info!(
            "done: {} message(s) forwarded from '{}'",
            snapshot.messages_forwarded_total,
            picker.current_endpoint().unwrap_or_default()
        );
    } else {
        info!("no endpoints discovered, nothing to select");
    }

    picker.shutdown();
    Ok(())
}
