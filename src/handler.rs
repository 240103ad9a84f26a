use std::future::Future;
use tokio_tungstenite::tungstenite::Message;

/// Trait that consumers implement to receive picker events.
///
/// The picker handles discovery, selector rendering, and the connection
/// lifecycle; the handler processes messages from whichever endpoint is
/// currently selected and clears its own state when the selection changes.
///
/// # Example
///
/// ```ignore
/// use ws_endpoint_picker::{Message, PickerHandler};
///
/// struct ChartHandler;
///
/// impl PickerHandler for ChartHandler {
///     async fn on_message(&self, message: Message) {
///         // decode the payload and feed the visualization
///     }
///
///     async fn on_reset(&self) {
///         // clear accumulated per-endpoint state before the next
///         // connection opens
///     }
/// }
/// ```
pub trait PickerHandler: Send + Sync + 'static {
    /// Called once per inbound message on the active connection.
    ///
    /// The payload is forwarded verbatim; its framing and content are
    /// defined by the upstream event producer.
    fn on_message(&self, message: Message) -> impl Future<Output = ()> + Send;

    /// Called exactly once per switch, before the new connection's open
    /// request is issued.
    ///
    /// Clear any per-endpoint state accumulated from the previous
    /// connection here. The default implementation does nothing.
    fn on_reset(&self) -> impl Future<Output = ()> + Send {
        async {}
    }
}
