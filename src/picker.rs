use crate::config::PickerConfig;
use crate::connection::ConnectionManager;
use crate::discovery::{DiscoveryClient, LoadOutcome};
use crate::handler::PickerHandler;
use crate::metrics::Metrics;
use crate::registry::EndpointRegistry;
use crate::render::{self, RenderTarget, SelectorItem};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{info, warn};

/// Composition root: discovery, selector rendering, and the single
/// active connection for one visualization page.
///
/// The consumer's handler is fixed at construction (instance-scoped, so
/// multiple pickers can coexist on one page without cross-talk). Each
/// `initialize` call fetches the discovery resource and appends a
/// selector into the given container; selections then rebind the one
/// live connection.
///
/// Repeated `initialize` calls keep append semantics: another selector
/// is appended to the container and the newest render's bindings win.
pub struct Picker<H: PickerHandler> {
    discovery: DiscoveryClient,
    manager: ConnectionManager<H>,
    metrics: Arc<Metrics>,
    /// Selector bindings captured at render time
    items: RwLock<Vec<SelectorItem>>,
}

impl<H: PickerHandler> Picker<H> {
    /// Create a new picker with the consumer's handler
    pub fn new(config: PickerConfig, handler: H) -> crate::Result<Self> {
        let metrics = Arc::new(Metrics::new());
        let handler = Arc::new(handler);
        let discovery = DiscoveryClient::new(&config, metrics.clone())?;
        let manager = ConnectionManager::new(config, handler, metrics.clone());
        Ok(Self {
            discovery,
            manager,
            metrics,
            items: RwLock::new(Vec::new()),
        })
    }

    /// Get the metrics for this picker
    pub fn metrics(&self) -> Arc<Metrics> {
        self.metrics.clone()
    }

    /// Fetch the discovery resource and render the selector into
    /// `container_id`.
    ///
    /// All outcomes are terminal, successful completions from the
    /// caller's perspective:
    /// - loaded: one selector item per discovered endpoint;
    /// - not found: a persistent warning panel, no selector;
    /// - anything else: the selector heading with zero items.
    pub async fn initialize(
        &self,
        resource_url: &str,
        container_id: &str,
        target: &mut dyn RenderTarget,
    ) {
        match self.discovery.load(resource_url).await {
            LoadOutcome::Loaded(registry) => {
                let items = render::render_options(target, container_id, &registry);
                *self.items.write() = items;
            }
            LoadOutcome::NotFound => {
                render::render_error(target, container_id);
            }
            LoadOutcome::Degraded => {
                info!("discovery degraded; proceeding with zero known endpoints");
                let items =
                    render::render_options(target, container_id, &EndpointRegistry::empty());
                *self.items.write() = items;
            }
        }
    }

    /// Select an endpoint by display name.
    ///
    /// Resolves the name against the bindings captured at render time
    /// and switches the active connection. Unknown names are logged and
    /// ignored.
    pub async fn select(&self, name: &str) {
        let item = self.items.read().iter().find(|i| i.name == name).cloned();
        match item {
            Some(item) => self.manager.switch(&item.name, &item.url).await,
            None => warn!("ignoring selection of unknown endpoint '{}'", name),
        }
    }

    /// The selector bindings from the most recent render
    pub fn selector_items(&self) -> Vec<SelectorItem> {
        self.items.read().clone()
    }

    /// The currently selected endpoint name, or `None` before any
    /// selection
    pub fn current_endpoint(&self) -> Option<String> {
        self.manager.current_endpoint()
    }

    /// Close the active connection for page teardown (fire-and-forget)
    pub fn shutdown(&self) {
        self.manager.shutdown();
    }
}
