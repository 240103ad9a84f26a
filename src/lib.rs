//! # ws-endpoint-picker
//!
//! Endpoint discovery and single-connection switching for live WebSocket
//! data sources.
//!
//! Given a URL to a small JSON discovery resource, the picker learns the
//! set of named message-stream endpoints, renders them as a
//! mutually-exclusive selector, and manages exactly one live WebSocket
//! connection at a time, rebinding it whenever the selection changes.
//! It exists so a visualization page can move between multiple live data
//! sources (e.g. different monitored nodes) without a reload.
//!
//! ## Features
//!
//! - **Discovery classification** - a missing resource renders a
//!   persistent warning panel; every other failure degrades to an
//!   empty-but-functional selector
//! - **Close-then-open switching** - the close request for the previous
//!   connection is issued strictly before the new open request
//! - **Generation guard** - late messages from a superseded connection
//!   are detected and dropped
//! - **Metrics** for observability
//!
//! ## Example
//!
//! ```ignore
//! use ws_endpoint_picker::{MarkupPage, Message, Picker, PickerConfig, PickerHandler};
//!
//! struct ChartHandler;
//!
//! impl PickerHandler for ChartHandler {
//!     async fn on_message(&self, message: Message) {
//!         // feed the visualization
//!     }
//!
//!     async fn on_reset(&self) {
//!         // clear per-endpoint state
//!     }
//! }
//!
//! let picker = Picker::new(PickerConfig::default(), ChartHandler)?;
//! let mut page = MarkupPage::new();
//! picker.initialize("http://monitor/endpoints.json", "picker", &mut page).await;
//! picker.select("node-1").await;
//! ```

mod config;
mod connection;
mod discovery;
mod error;
mod handler;
mod metrics;
mod picker;
mod registry;
mod render;

pub use config::{ConfigError, PickerConfig, PickerConfigBuilder};
pub use connection::ConnectionManager;
pub use discovery::{DiscoveryClient, LoadOutcome};
pub use error::Error;
pub use handler::PickerHandler;
pub use metrics::{Metrics, MetricsSnapshot};
pub use picker::Picker;
pub use registry::EndpointRegistry;
pub use render::{render_error, render_options, MarkupPage, RenderTarget, SelectorItem, DOCS_URL};

// Re-export the message type handlers receive
pub use tokio_tungstenite::tungstenite::Message;

/// Result type for ws-endpoint-picker operations
pub type Result<T> = std::result::Result<T, Error>;
