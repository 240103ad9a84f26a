use crate::config::PickerConfig;
use crate::error::Error;
use crate::handler::PickerHandler;
use crate::metrics::Metrics;
use futures_util::{SinkExt, StreamExt};
use parking_lot::{Mutex, RwLock};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::net::TcpSocket;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{timeout, Duration};
use tokio_tungstenite::{
    client_async_tls_with_config, tungstenite::client::IntoClientRequest, tungstenite::Message,
    Connector, MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, info, warn};
use url::Url;

/// Commands that can be sent to a connection task
#[derive(Debug)]
enum ConnectionCommand {
    /// Gracefully close the connection
    Close,
}

/// The single live connection slot
struct ActiveConnection {
    generation: u64,
    command_tx: mpsc::Sender<ConnectionCommand>,
    task: JoinHandle<()>,
}

/// Owns the single active WebSocket connection and executes
/// close-then-open switch semantics.
///
/// At most one [`ActiveConnection`] exists per manager. A switch issues
/// the close request for the previous connection strictly before the new
/// open request; close completion is best-effort and never awaited.
/// There is no automatic reconnection: a dropped connection simply stops
/// delivering messages until the next switch.
pub struct ConnectionManager<H: PickerHandler> {
    handler: Arc<H>,
    config: PickerConfig,
    metrics: Arc<Metrics>,
    /// Monotonically increasing counter; the slot's generation. A reader
    /// task whose generation has been superseded drops messages instead
    /// of forwarding them.
    current_generation: Arc<AtomicU64>,
    slot: Mutex<Option<ActiveConnection>>,
    /// The selected endpoint name. Updated only by explicit switches,
    /// never inferred from connection state.
    selected: RwLock<Option<String>>,
}

impl<H: PickerHandler> ConnectionManager<H> {
    /// Create a new connection manager
    pub fn new(config: PickerConfig, handler: Arc<H>, metrics: Arc<Metrics>) -> Self {
        Self {
            handler,
            config,
            metrics,
            current_generation: Arc::new(AtomicU64::new(0)),
            slot: Mutex::new(None),
            selected: RwLock::new(None),
        }
    }

    /// Switch the active connection to `url`.
    ///
    /// Issues a fire-and-forget close for any prior connection, invokes
    /// the handler's reset callback exactly once, then spawns the new
    /// connection task and installs it as the active slot. Returns once
    /// the requests are issued; the open completes asynchronously. Open
    /// failures are logged and absorbed.
    pub async fn switch(&self, name: &str, url: &Url) {
        if let Some(prior) = self.slot.lock().take() {
            debug!(
                "[CONN-{}] issuing close for superseded connection",
                prior.generation
            );
            // Best effort: if the channel is full or the reader already
            // exited, dropping the handle is all that is left to do.
            let _ = prior.command_tx.try_send(ConnectionCommand::Close);
        }

        self.handler.on_reset().await;

        let generation = self.current_generation.fetch_add(1, Ordering::SeqCst) + 1;
        info!("[CONN-{}] switching to '{}' at {}", generation, name, url);

        let (command_tx, command_rx) = mpsc::channel(4);
        let connection = Connection {
            generation,
            current_generation: self.current_generation.clone(),
            handler: self.handler.clone(),
            config: self.config.clone(),
            metrics: self.metrics.clone(),
            command_rx,
            url: url.clone(),
        };
        let task = tokio::spawn(async move {
            if let Err(e) = connection.run().await {
                debug!("[CONN-{}] connection task ended with error: {}", generation, e);
            }
        });

        *self.slot.lock() = Some(ActiveConnection {
            generation,
            command_tx,
            task,
        });
        *self.selected.write() = Some(name.to_string());
        self.metrics.record_switch();
    }

    /// The currently selected endpoint name, or `None` before any
    /// selection. Pure read of selection state.
    pub fn current_endpoint(&self) -> Option<String> {
        self.selected.read().clone()
    }

    /// Request close of the active connection for page teardown.
    ///
    /// Fire-and-forget like a switch's close; the selection is kept.
    pub fn shutdown(&self) {
        if let Some(active) = self.slot.lock().take() {
            debug!("[CONN-{}] shutdown close requested", active.generation);
            let _ = active.command_tx.try_send(ConnectionCommand::Close);
        }
    }
}

impl<H: PickerHandler> Drop for ConnectionManager<H> {
    fn drop(&mut self) {
        // Abort the connection task to prevent it outliving the manager
        if let Some(active) = self.slot.lock().take() {
            active.task.abort();
        }
    }
}

/// A single connection's task state
struct Connection<H: PickerHandler> {
    generation: u64,
    current_generation: Arc<AtomicU64>,
    handler: Arc<H>,
    config: PickerConfig,
    metrics: Arc<Metrics>,
    command_rx: mpsc::Receiver<ConnectionCommand>,
    url: Url,
}

impl<H: PickerHandler> Connection<H> {
    /// Open the connection and run until close or disconnect
    async fn run(mut self) -> Result<(), Error> {
        let ws_stream = match timeout(
            self.config.connect_timeout,
            connect(&self.url, self.config.nodelay),
        )
        .await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                self.metrics.record_connect_failure();
                warn!("[CONN-{}] open failed for {}: {}", self.generation, self.url, e);
                return Err(e);
            }
            Err(_) => {
                self.metrics.record_connect_failure();
                warn!("[CONN-{}] open timed out for {}", self.generation, self.url);
                return Err(Error::Connect("connection timeout".to_string()));
            }
        };

        self.metrics.record_connection();
        info!("[CONN-{}] connected to {}", self.generation, self.url);

        let (mut write, mut read) = ws_stream.split();

        loop {
            tokio::select! {
                msg = read.next() => {
                    match msg {
                        Some(Ok(message)) => {
                            match &message {
                                Message::Ping(data) => {
                                    debug!("[CONN-{}] received ping, sending pong", self.generation);
                                    write.send(Message::Pong(data.clone())).await?;
                                }
                                Message::Pong(_) => {}
                                Message::Close(_) => {
                                    info!("[CONN-{}] received close frame", self.generation);
                                    break;
                                }
                                _ => {
                                    self.metrics.record_message_received();
                                    if self.current_generation.load(Ordering::SeqCst) != self.generation {
                                        self.metrics.record_late_message_dropped();
                                        debug!(
                                            "[CONN-{}] dropping message from superseded connection",
                                            self.generation
                                        );
                                        continue;
                                    }
                                    self.metrics.record_message_forwarded();
                                    self.handler.on_message(message).await;
                                }
                            }
                        }
                        Some(Err(e)) => {
                            warn!("[CONN-{}] WebSocket error: {}", self.generation, e);
                            return Err(Error::WebSocket(e));
                        }
                        None => {
                            info!("[CONN-{}] stream ended", self.generation);
                            break;
                        }
                    }
                }

                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(ConnectionCommand::Close) => {
                            debug!("[CONN-{}] close requested", self.generation);
                        }
                        None => {
                            debug!("[CONN-{}] command channel closed", self.generation);
                        }
                    }
                    let _ = write.send(Message::Close(None)).await;
                    break;
                }
            }
        }

        debug!("[CONN-{}] connection task finished", self.generation);
        Ok(())
    }
}

/// Type alias for WebSocket stream
type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Connect to a `ws://`/`wss://` URL with TCP tuning.
async fn connect(url: &Url, nodelay: bool) -> Result<WsStream, Error> {
    let host = url
        .host_str()
        .ok_or_else(|| Error::Connect(format!("no host in {}", url)))?;

    let is_tls = url.scheme() == "wss";
    let port = url.port().unwrap_or(if is_tls { 443 } else { 80 });

    // DNS lookup
    let dest = format!("{}:{}", host, port);
    let dest_addr: SocketAddr = tokio::net::lookup_host(&dest)
        .await
        .map_err(|e| Error::Connect(format!("DNS lookup failed for {}: {}", dest, e)))?
        .next()
        .ok_or_else(|| Error::Connect(format!("no addresses found for {}", host)))?;

    let socket = if dest_addr.is_ipv4() {
        TcpSocket::new_v4()
    } else {
        TcpSocket::new_v6()
    }
    .map_err(|e| Error::Connect(format!("failed to create socket: {}", e)))?;

    let tcp_stream = socket
        .connect(dest_addr)
        .await
        .map_err(|e| Error::Connect(format!("TCP connect to {} failed: {}", dest_addr, e)))?;

    set_tcp_options(&tcp_stream, nodelay);

    // TLS connector (if needed)
    let connector = if is_tls {
        let tls = native_tls::TlsConnector::new()
            .map_err(|e| Error::Connect(format!("TLS error: {}", e)))?;
        Some(Connector::NativeTls(tls))
    } else {
        None
    };

    let request = url.as_str().into_client_request()?;

    // WebSocket handshake
    let (ws_stream, _response) =
        client_async_tls_with_config(request, tcp_stream, None, connector)
            .await
            .map_err(Error::WebSocket)?;

    Ok(ws_stream)
}

/// Set TCP options for low latency
fn set_tcp_options(stream: &tokio::net::TcpStream, nodelay: bool) {
    let sock2 = socket2::SockRef::from(stream);

    if nodelay {
        let _ = sock2.set_nodelay(true);
    }

    // Keepalive to detect dead connections
    let keepalive = socket2::TcpKeepalive::new()
        .with_time(Duration::from_secs(30))
        .with_interval(Duration::from_secs(10));
    let _ = sock2.set_tcp_keepalive(&keepalive);
}
