use crate::registry::EndpointRegistry;
use std::collections::HashMap;
use tracing::{debug, warn};
use url::Url;

/// Documentation link shown in the discovery-missing warning panel
pub const DOCS_URL: &str = "https://docs.rs/ws-endpoint-picker";

/// A surface the picker appends selector markup into.
///
/// The caller supplies an opaque container identifier and is responsible
/// for providing a clean container per initialization; the picker only
/// ever appends, it never clears or owns the container.
pub trait RenderTarget {
    /// Append one child markup fragment to the identified container
    fn append(&mut self, container_id: &str, markup: &str);
}

/// In-memory append-only render target.
///
/// Collects markup fragments per container so the host page can flush
/// them into its own document. Also what the tests inspect.
#[derive(Debug, Default)]
pub struct MarkupPage {
    containers: HashMap<String, Vec<String>>,
}

impl MarkupPage {
    /// Create an empty page
    pub fn new() -> Self {
        Self::default()
    }

    /// The markup fragments appended to a container, in append order
    pub fn children(&self, container_id: &str) -> &[String] {
        self.containers
            .get(container_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All fragments of a container concatenated into one HTML string
    pub fn to_html(&self, container_id: &str) -> String {
        self.children(container_id).concat()
    }
}

impl RenderTarget for MarkupPage {
    fn append(&mut self, container_id: &str, markup: &str) {
        self.containers
            .entry(container_id.to_string())
            .or_default()
            .push(markup.to_string());
    }
}

/// One rendered selector entry with its URL captured at render time.
///
/// Selection resolves against this binding, not against a re-fetched
/// registry.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorItem {
    /// Display name from the discovery document
    pub name: String,
    /// Resolved WebSocket URL
    pub url: Url,
}

/// Append the persistent discovery-missing warning panel.
///
/// Rendered instead of the selector when the discovery resource is
/// confirmed missing; visually distinct from normal operation.
pub fn render_error(target: &mut dyn RenderTarget, container_id: &str) {
    let panel = format!(
        "<div class=\"picker-warning\">\
         <b>Endpoint list not found</b>\
         <p>The endpoint discovery resource could not be retrieved, so no \
         data sources can be offered.</p>\
         <p>See <a href=\"{DOCS_URL}\">the documentation</a> for how to \
         publish one.</p>\
         </div>"
    );
    target.append(container_id, &panel);
    warn!(
        "discovery resource missing; rendered warning panel into '{}'",
        container_id
    );
}

/// Append the selector heading and one radio item per registry entry,
/// in registry order.
///
/// Returns the selector bindings: each item's URL is the registry value
/// at render time. Valid for an empty registry (heading only, zero
/// items).
pub fn render_options(
    target: &mut dyn RenderTarget,
    container_id: &str,
    registry: &EndpointRegistry,
) -> Vec<SelectorItem> {
    target.append(
        container_id,
        "<h3 class=\"picker-heading\">Data source</h3>",
    );

    let mut items = Vec::with_capacity(registry.len());
    for (name, url) in registry.iter() {
        let label = escape(name);
        target.append(
            container_id,
            &format!(
                "<label class=\"picker-option\">\
                 <input type=\"radio\" name=\"picker-endpoint\" value=\"{label}\"> \
                 {label}</label>"
            ),
        );
        items.push(SelectorItem {
            name: name.to_string(),
            url: url.clone(),
        });
    }

    debug!(
        "rendered {} endpoint option(s) into '{}'",
        items.len(),
        container_id
    );
    items
}

/// Minimal HTML escaping for display names used in markup
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
