use crate::client::ApiClient;
use crate::config::SuggestConfig;

/// Prefix matcher over the bulk species-name list, preloaded once per
/// session. Hyphenated entries are dropped up front: suggestions cover base
/// species names only.
pub struct Suggester {
    names: Vec<String>,
    max_results: usize,
}

impl Suggester {
    pub fn new(names: Vec<String>, max_results: usize) -> Self {
        let names: Vec<String> = names.into_iter().filter(|n| !n.contains('-')).collect();
        Self { names, max_results }
    }

    /// Preload the name pool. A failed preload degrades to an empty pool:
    /// search still works, autocomplete just stays silent.
    pub async fn preload(client: &ApiClient, config: &SuggestConfig) -> Self {
        match client.species_names(config.name_list_limit).await {
            Ok(names) => {
                let suggester = Self::new(names, config.max_results);
                tracing::info!("Preloaded {} species names for suggestions", suggester.names.len());
                suggester
            }
            Err(e) => {
                tracing::warn!("Failed to preload species names: {}", e);
                Self::new(Vec::new(), config.max_results)
            }
        }
    }

    pub fn suggest(&self, prefix: &str) -> Vec<String> {
        let prefix = prefix.trim().to_lowercase();
        if prefix.is_empty() {
            return Vec::new();
        }
        self.names
            .iter()
            .filter(|name| name.starts_with(&prefix))
            .take(self.max_results)
            .cloned()
            .collect()
    }
}
