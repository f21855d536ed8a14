use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::ResolverConfig;
use crate::pokemon::{Pokemon, Species};

/// One user-facing, display-worthy form of a species.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDescriptor {
    pub label: String,
    pub variant_name: String,
    pub battle_only: bool,
}

/// Collapse a species' varieties into the canonical ordered form list.
///
/// Variety order is display-priority order, so every filter and the label
/// dedup are first-seen-wins. The base variant is never filtered: the
/// exclusion and clone filters only ever judge non-base variants against it,
/// which guarantees a non-empty result.
pub fn resolve_forms(
    species: &Species,
    variants: &[Pokemon],
    rules: &ResolverConfig,
) -> Vec<FormDescriptor> {
    let Some(base) = base_variant(species, variants) else {
        return Vec::new();
    };

    let mut seen_labels: HashSet<String> = HashSet::new();
    let mut forms = Vec::new();

    for variant in variants {
        let is_base = variant.id == base.id;

        if !is_base {
            if rules
                .excluded_keywords
                .iter()
                .any(|keyword| variant.name.contains(keyword.as_str()))
            {
                tracing::debug!("Excluding cosmetic variant: {}", variant.name);
                continue;
            }
            // Re-skins with no gameplay difference collapse into the base form.
            if gameplay_identical(variant, base) {
                tracing::debug!("Excluding clone variant: {}", variant.name);
                continue;
            }
        }

        let label = normalize_label(&variant.name, &species.name, &rules.form_suffixes);
        if !seen_labels.insert(label.clone()) {
            continue;
        }

        forms.push(FormDescriptor {
            label,
            variant_name: variant.name.clone(),
            battle_only: is_battle_only(variant, &rules.battle_keywords),
        });
    }

    forms
}

fn base_variant<'a>(species: &Species, variants: &'a [Pokemon]) -> Option<&'a Pokemon> {
    let default_name = species
        .varieties
        .iter()
        .find(|v| v.is_default)
        .or_else(|| species.varieties.first())
        .map(|v| v.pokemon.name.as_str());

    match default_name {
        Some(name) => variants
            .iter()
            .find(|v| v.name == name)
            .or_else(|| variants.first()),
        None => variants.first(),
    }
}

fn gameplay_identical(a: &Pokemon, b: &Pokemon) -> bool {
    let stats_match = a.stats.len() == b.stats.len()
        && a.stats
            .iter()
            .zip(&b.stats)
            .all(|(x, y)| x.base_stat == y.base_stat);
    let types_match = a.types.len() == b.types.len()
        && a.types
            .iter()
            .zip(&b.types)
            .all(|(x, y)| x.r#type.name == y.r#type.name);
    let abilities_match = a.abilities.len() == b.abilities.len()
        && a.abilities.iter().zip(&b.abilities).all(|(x, y)| {
            x.ability.name == y.ability.name && x.is_hidden == y.is_hidden
        });

    stats_match && types_match && abilities_match
}

/// Derive a form label from a variant name: strip known battle-state
/// suffixes, then the species' own name. An empty remainder is the base form.
pub fn normalize_label(variant_name: &str, species_name: &str, suffixes: &[String]) -> String {
    let mut label = variant_name;
    for suffix in suffixes {
        if let Some(stripped) = label.strip_suffix(suffix.as_str()) {
            label = stripped;
        }
    }

    if label == species_name {
        return "base".to_string();
    }
    if let Some(rest) = label
        .strip_prefix(species_name)
        .and_then(|rest| rest.strip_prefix('-'))
    {
        label = rest;
    }

    if label.is_empty() {
        "base".to_string()
    } else {
        label.to_string()
    }
}

fn is_battle_only(variant: &Pokemon, battle_keywords: &[String]) -> bool {
    if variant.forms.iter().any(|form| form.is_battle_only) {
        return true;
    }
    // Heuristic backstop: the upstream flag misses several battle states.
    battle_keywords
        .iter()
        .any(|keyword| variant.name.contains(keyword.as_str()))
}
