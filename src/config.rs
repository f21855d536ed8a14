use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::LookupError;

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub suggest: SuggestConfig,
    pub theme: ThemeConfig,
    pub resolver: ResolverConfig,
    pub abilities: AbilityRules,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: u32,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SuggestConfig {
    pub name_list_limit: u32,
    pub max_results: usize,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ThemeConfig {
    pub store_path: String,
}

// The keyword tables are best-effort vocabulary against an external data
// source that drifts over time; they live in config.toml so an update is a
// data edit, not a code change.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ResolverConfig {
    pub excluded_keywords: Vec<String>,
    pub battle_keywords: Vec<String>,
    pub form_suffixes: Vec<String>,
    pub aliases: HashMap<String, String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AbilityRules {
    pub form_locked: Vec<String>,
    pub overrides: HashMap<String, Vec<String>>,
    pub immunities: HashMap<String, String>,
}

pub fn load_config() -> Result<Config, LookupError> {
    let config_str = include_str!("../config/config.toml");
    toml::from_str(config_str).map_err(|e| {
        tracing::error!("Failed to parse config.toml: {}", e);
        LookupError::from(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_config_parses() {
        let config = load_config().expect("bundled config.toml must parse");
        assert!(config.api.base_url.starts_with("https://"));
        assert_eq!(config.resolver.aliases.get("giratina").unwrap(), "giratina-altered");
        assert!(config.abilities.immunities.contains_key("levitate"));
    }

    #[test]
    fn test_keyword_tables_nonempty() {
        let config = load_config().unwrap();
        assert!(!config.resolver.excluded_keywords.is_empty());
        assert!(!config.resolver.battle_keywords.is_empty());
        assert!(!config.resolver.form_suffixes.is_empty());
    }
}
