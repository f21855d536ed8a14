use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::abilities::resolve_abilities;
use crate::card::PokemonCard;
use crate::client::ApiClient;
use crate::config::{AbilityRules, Config, ResolverConfig};
use crate::error::LookupError;
use crate::forms::resolve_forms;
use crate::matchup::{EffectivenessTable, matchup_tables};
use crate::pokemon::{Species, TypeRecord};

// Monotonically increasing search tokens. Overlapping searches race to
// commit; only the newest completed token may win, so a slow stale response
// can never overwrite a newer card.
pub struct Sequencer {
    next: AtomicU64,
    committed: AtomicU64,
}

impl Sequencer {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
            committed: AtomicU64::new(0),
        }
    }

    pub fn begin(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn commit(&self, token: u64) -> bool {
        self.committed.fetch_max(token, Ordering::SeqCst) < token
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub enum SearchOutcome {
    /// The newest resolution; it has been committed as the current card.
    Fresh(PokemonCard),
    /// Resolved correctly, but a newer search finished first.
    Superseded(PokemonCard),
}

impl SearchOutcome {
    pub fn card(&self) -> &PokemonCard {
        match self {
            SearchOutcome::Fresh(card) | SearchOutcome::Superseded(card) => card,
        }
    }
}

/// One lookup session: the resolution chain plus the shared "current card"
/// the presentation layer shows.
pub struct Session {
    client: ApiClient,
    resolver: ResolverConfig,
    ability_rules: AbilityRules,
    sequencer: Sequencer,
    current: Mutex<Option<PokemonCard>>,
}

impl Session {
    pub fn new(client: ApiClient, config: &Config) -> Self {
        Self {
            client,
            resolver: config.resolver.clone(),
            ability_rules: config.abilities.clone(),
            sequencer: Sequencer::new(),
            current: Mutex::new(None),
        }
    }

    /// Resolve a user search end to end. Every failure inside the chain is
    /// logged with its cause and collapsed to a single not-found outcome; no
    /// partially resolved card is ever produced.
    pub async fn search(&self, term: &str) -> Result<SearchOutcome, LookupError> {
        let name = term.trim().to_lowercase();
        if name.is_empty() {
            return Err(LookupError::NotFound(term.to_string()));
        }

        let token = self.sequencer.begin();
        let card = match self.resolve(&name).await {
            Ok(card) => card,
            Err(e) => {
                tracing::error!("Search for {:?} failed: {}", name, e);
                return Err(LookupError::NotFound(name));
            }
        };

        if self.commit_card(token, &card) {
            Ok(SearchOutcome::Fresh(card))
        } else {
            tracing::debug!("Search for {:?} superseded by a newer search", name);
            Ok(SearchOutcome::Superseded(card))
        }
    }

    /// The last committed card, if any search has completed yet.
    pub fn current(&self) -> Option<PokemonCard> {
        match self.current.lock() {
            Ok(current) => current.clone(),
            Err(e) => {
                tracing::error!("Failed to acquire current-card lock: {}", e);
                None
            }
        }
    }

    fn commit_card(&self, token: u64, card: &PokemonCard) -> bool {
        if !self.sequencer.commit(token) {
            return false;
        }
        match self.current.lock() {
            Ok(mut current) => {
                *current = Some(card.clone());
                true
            }
            Err(e) => {
                tracing::error!("Failed to acquire current-card lock: {}", e);
                false
            }
        }
    }

    async fn resolve(&self, name: &str) -> Result<PokemonCard, LookupError> {
        // A search term is usually a species name; a form switch passes a
        // variant name instead, which the species endpoint does not know.
        let (species, direct_target) = match self.client.species(name).await {
            Ok(species) => (species, None),
            Err(LookupError::NotFound(_)) => {
                let direct = self.client.variant(name).await?;
                let species_ref = direct.species.clone().ok_or_else(|| {
                    LookupError::DataShape(format!(
                        "Variant {} carries no species reference",
                        direct.name
                    ))
                })?;
                let species = self.client.species(&species_ref.url).await?;
                (species, Some(direct.name))
            }
            Err(e) => return Err(e),
        };

        let variants = self.client.variants_for(&species).await?;
        if variants.is_empty() {
            return Err(LookupError::DataShape(format!(
                "Species {} has no varieties",
                species.name
            )));
        }

        let target = direct_target
            .or_else(|| target_variant_name(&species, &self.resolver.aliases))
            .unwrap_or_else(|| variants[0].name.clone());
        let variant = variants
            .iter()
            .find(|v| v.name == target)
            .unwrap_or(&variants[0]);

        let forms = resolve_forms(&species, &variants, &self.resolver);
        let abilities = resolve_abilities(
            &variants,
            &variant.name,
            &self.ability_rules,
            &self.resolver.form_suffixes,
        );

        let mut records: Vec<TypeRecord> = Vec::with_capacity(variant.types.len());
        for slot in &variant.types {
            records.push(self.client.type_record(&slot.r#type.name).await?);
        }
        let record_refs: Vec<&TypeRecord> = records.iter().collect();
        let base_table = EffectivenessTable::compute(&record_refs)?;
        let matchups = matchup_tables(&base_table, &abilities, &self.ability_rules.immunities);

        PokemonCard::assemble(variant, forms, abilities, matchups)
    }
}

// The species' displayed default: an alias entry when one exists, otherwise
// the variety flagged as default, otherwise the first variety.
fn target_variant_name(species: &Species, aliases: &HashMap<String, String>) -> Option<String> {
    aliases.get(&species.name).cloned().or_else(|| {
        species
            .varieties
            .iter()
            .find(|v| v.is_default)
            .or_else(|| species.varieties.first())
            .map(|v| v.pokemon.name.clone())
    })
}
