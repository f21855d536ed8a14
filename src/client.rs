use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::cache::LookupCache;
use crate::config::ApiConfig;
use crate::error::LookupError;
use crate::pokemon::{NameList, Pokemon, Species, TypeRecord};

/// Cache-backed client for the upstream REST API.
///
/// Lookups check the matching cache namespace first and store every
/// successful fetch under the exact key that was used, so a name key and a
/// URL key for the same entity never alias each other.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    cache: Arc<LookupCache>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, cache: Arc<LookupCache>) -> Result<Self, LookupError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout as u64))
            .build()
            .map_err(LookupError::from)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cache,
        })
    }

    // A lookup key is either a canonical name or a full resource URL.
    fn request_url(&self, endpoint: &str, key: &str) -> String {
        if key.starts_with("http://") || key.starts_with("https://") {
            key.to_string()
        } else {
            format!("{}/{}/{}", self.base_url, endpoint, key)
        }
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, LookupError> {
        tracing::debug!("Fetching from URL: {}", url);

        let response = self.http.get(url).send().await.map_err(|e| {
            tracing::error!("Failed to make HTTP request to {}: {}", url, e);
            LookupError::from(e)
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            let error_msg = format!("API request failed with status: {}", status);
            tracing::error!("{}", error_msg);
            return Err(LookupError::Network(error_msg));
        }

        response.json::<T>().await.map_err(|e| {
            tracing::error!("Failed to parse JSON response from {}: {}", url, e);
            LookupError::Parse(format!("JSON parsing failed: {}", e))
        })
    }

    pub async fn species(&self, key: &str) -> Result<Species, LookupError> {
        if let Some(species) = self.cache.species.get(key) {
            return Ok(species);
        }

        let url = self.request_url("pokemon-species", key);
        let species = self.fetch_json::<Species>(&url).await?;
        tracing::debug!("Fetched species: {} (ID: {})", species.name, species.id);

        if let Err(e) = self.cache.species.insert(key.to_string(), species.clone()) {
            tracing::warn!("Failed to cache species {}: {}", key, e);
        }
        Ok(species)
    }

    pub async fn variant(&self, key: &str) -> Result<Pokemon, LookupError> {
        if let Some(variant) = self.cache.variants.get(key) {
            return Ok(variant);
        }

        let url = self.request_url("pokemon", key);
        let variant = self.fetch_json::<Pokemon>(&url).await?;
        tracing::debug!("Fetched variant: {} (ID: {})", variant.name, variant.id);

        if let Err(e) = self.cache.variants.insert(key.to_string(), variant.clone()) {
            tracing::warn!("Failed to cache variant {}: {}", key, e);
        }
        Ok(variant)
    }

    pub async fn type_record(&self, name: &str) -> Result<TypeRecord, LookupError> {
        if let Some(record) = self.cache.types.get(name) {
            return Ok(record);
        }

        let url = self.request_url("type", name);
        let record = self.fetch_json::<TypeRecord>(&url).await?;

        if let Err(e) = self.cache.types.insert(name.to_string(), record.clone()) {
            tracing::warn!("Failed to cache type {}: {}", name, e);
        }
        Ok(record)
    }

    pub async fn species_names(&self, limit: u32) -> Result<Vec<String>, LookupError> {
        let url = format!("{}/pokemon-species?limit={}", self.base_url, limit);
        let list = self.fetch_json::<NameList>(&url).await?;
        Ok(list.results.into_iter().map(|r| r.name).collect())
    }

    /// Fetch every variety of a species concurrently, preserving variety
    /// order. The whole join fails if any single fetch fails; the resolvers
    /// need every variant present before they can run.
    pub async fn variants_for(&self, species: &Species) -> Result<Vec<Pokemon>, LookupError> {
        let mut handles = Vec::with_capacity(species.varieties.len());
        for variety in &species.varieties {
            let client = self.clone();
            let key = variety.pokemon.url.clone();
            handles.push(tokio::spawn(async move { client.variant(&key).await }));
        }

        let mut variants = Vec::with_capacity(handles.len());
        for handle in handles {
            let fetched = handle
                .await
                .map_err(|e| LookupError::Network(format!("Variant fetch task failed: {}", e)))?;
            variants.push(fetched?);
        }
        Ok(variants)
    }
}
