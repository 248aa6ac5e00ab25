/// Connection settings for a remote store node.
#[derive(Debug, Clone)]
pub struct HttpStoreConfig {
    /// Base URL of the store node, e.g. `http://localhost:8080`.
    pub base_url: String,
}

impl HttpStoreConfig {
    /// Build a configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}
