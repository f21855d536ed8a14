use serde::{Deserialize, Serialize};

use crate::config::AbilityRules;
use crate::pokemon::Pokemon;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityEntry {
    pub name: String,
    pub is_hidden: bool,
}

/// Collect the displayable ability list for one target variant.
///
/// Varieties contribute their slots when their name matches the target
/// directly, or is the target plus a known ability-only suffix (forms that
/// share a battle-state body but carry a distinct ability set). Entries are
/// deduplicated by ability name in first-encountered order; on a hidden-flag
/// conflict the last-seen value wins.
pub fn resolve_abilities(
    variants: &[Pokemon],
    target: &str,
    rules: &AbilityRules,
    suffixes: &[String],
) -> Vec<AbilityEntry> {
    let matching: Vec<&Pokemon> = variants
        .iter()
        .filter(|v| matches_target(&v.name, target, suffixes))
        .collect();

    // Odd species data can leave the target unmatched; fall back to the
    // merged slots of every variety rather than an empty list.
    let pool: Vec<&Pokemon> = if matching.is_empty() {
        tracing::debug!("No variety matches target {}; merging all varieties", target);
        variants.iter().collect()
    } else {
        matching
    };

    let mut entries: Vec<AbilityEntry> = Vec::new();
    for variant in pool {
        for slot in &variant.abilities {
            match entries.iter_mut().find(|e| e.name == slot.ability.name) {
                Some(existing) => existing.is_hidden = slot.is_hidden,
                None => entries.push(AbilityEntry {
                    name: slot.ability.name.clone(),
                    is_hidden: slot.is_hidden,
                }),
            }
        }
    }

    // Always-active signature abilities never wear the hidden badge.
    for entry in &mut entries {
        if rules.form_locked.iter().any(|name| name == &entry.name) {
            entry.is_hidden = false;
        }
    }

    // Some variants still list a dormant base ability upstream; the override
    // table narrows those kits to what the form actually has.
    if let Some(allowed) = rules.overrides.get(target) {
        entries.retain(|entry| allowed.iter().any(|name| name == &entry.name));
    }

    entries
}

fn matches_target(variety_name: &str, target: &str, suffixes: &[String]) -> bool {
    if variety_name == target {
        return true;
    }
    suffixes
        .iter()
        .any(|suffix| variety_name.strip_suffix(suffix.as_str()) == Some(target))
}
