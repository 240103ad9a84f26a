use crate::error::Error;
use indexmap::IndexMap;
use tracing::warn;
use url::Url;

/// An immutable, ordered mapping from endpoint display name to resolved
/// WebSocket URL.
///
/// Iteration order is the order of the discovery document, which determines
/// render order. A registry is replaced wholesale on re-load, never merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EndpointRegistry {
    entries: IndexMap<String, Url>,
}

impl EndpointRegistry {
    /// Create a registry with no endpoints.
    ///
    /// This is a valid state: the selector renders its heading with zero
    /// items.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a registry from a parsed discovery document.
    ///
    /// `base` is the URL the discovery resource was fetched from; relative
    /// endpoint values are resolved against it, with `http`/`https` mapped
    /// to `ws`/`wss`. Entries that cannot be resolved to a WebSocket URL
    /// are rejected individually and logged; the valid remainder is kept.
    pub fn from_document(doc: IndexMap<String, String>, base: &Url) -> Self {
        let mut entries = IndexMap::with_capacity(doc.len());
        for (name, value) in doc {
            match resolve_endpoint(&name, &value, base) {
                Ok(url) => {
                    entries.insert(name, url);
                }
                Err(e) => warn!("rejecting discovery entry: {}", e),
            }
        }
        Self { entries }
    }

    /// Number of endpoints in the registry
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no endpoints
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an endpoint URL by display name
    pub fn get(&self, name: &str) -> Option<&Url> {
        self.entries.get(name)
    }

    /// Iterate over (name, url) pairs in document order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Url)> {
        self.entries.iter().map(|(name, url)| (name.as_str(), url))
    }

    /// Iterate over display names in document order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Resolve a single discovery value to a WebSocket URL.
///
/// Accepts absolute `ws://`/`wss://` URLs as-is. Anything relative is
/// joined onto the discovery resource URL and its scheme mapped to the
/// WebSocket equivalent. Every other shape is an error.
fn resolve_endpoint(name: &str, value: &str, base: &Url) -> Result<Url, Error> {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "ws" | "wss") => Ok(url),
        Ok(url) => Err(Error::InvalidEndpoint {
            name: name.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let mut resolved = base.join(value).map_err(|e| Error::InvalidEndpoint {
                name: name.to_string(),
                reason: format!("cannot resolve '{}' against {}: {}", value, base, e),
            })?;
            let scheme = match resolved.scheme() {
                "http" => "ws",
                "https" => "wss",
                "ws" | "wss" => return Ok(resolved),
                other => {
                    return Err(Error::InvalidEndpoint {
                        name: name.to_string(),
                        reason: format!("unsupported scheme '{}'", other),
                    })
                }
            };
            resolved
                .set_scheme(scheme)
                .map_err(|_| Error::InvalidEndpoint {
                    name: name.to_string(),
                    reason: format!("cannot map scheme to '{}'", scheme),
                })?;
            Ok(resolved)
        }
        Err(e) => Err(Error::InvalidEndpoint {
            name: name.to_string(),
            reason: format!("malformed URL '{}': {}", value, e),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://monitor.example:8080/endpoints.json").expect("valid base")
    }

    fn doc(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_absolute_ws_urls_kept() {
        let registry = EndpointRegistry::from_document(
            doc(&[("alice", "ws://h:1/a"), ("bob", "wss://h:1/b")]),
            &base(),
        );

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("alice").map(Url::as_str), Some("ws://h:1/a"));
        assert_eq!(registry.get("bob").map(Url::as_str), Some("wss://h:1/b"));
    }

    #[test]
    fn test_document_order_preserved() {
        let registry = EndpointRegistry::from_document(
            doc(&[
                ("zeta", "ws://h:1/z"),
                ("alpha", "ws://h:1/a"),
                ("mid", "ws://h:1/m"),
            ]),
            &base(),
        );

        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_relative_path_resolved_against_base() {
        let registry =
            EndpointRegistry::from_document(doc(&[("node-1", "/feeds/node-1")]), &base());

        assert_eq!(
            registry.get("node-1").map(Url::as_str),
            Some("ws://monitor.example:8080/feeds/node-1")
        );
    }

    #[test]
    fn test_https_base_maps_to_wss() {
        let base = Url::parse("https://monitor.example/endpoints.json").expect("valid base");
        let registry = EndpointRegistry::from_document(doc(&[("node-1", "feed")]), &base);

        assert_eq!(
            registry.get("node-1").map(Url::as_str),
            Some("wss://monitor.example/feed")
        );
    }

    #[test]
    fn test_non_ws_absolute_url_rejected() {
        let registry = EndpointRegistry::from_document(
            doc(&[("good", "ws://h:1/a"), ("bad", "ftp://h:1/b")]),
            &base(),
        );

        assert_eq!(registry.len(), 1);
        assert!(registry.get("bad").is_none());
    }

    #[test]
    fn test_rejected_entry_keeps_valid_remainder() {
        let registry = EndpointRegistry::from_document(
            doc(&[
                ("first", "ws://h:1/a"),
                ("broken", "http://[::invalid"),
                ("last", "ws://h:1/c"),
            ]),
            &base(),
        );

        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["first", "last"]);
    }

    #[test]
    fn test_empty_registry() {
        let registry = EndpointRegistry::empty();
        assert!(registry.is_empty());
        assert_eq!(registry.iter().count(), 0);
    }
}
