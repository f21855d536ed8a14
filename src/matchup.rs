use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::abilities::AbilityEntry;
use crate::error::LookupError;
use crate::pokemon::TypeRecord;

/// The fixed universe of attacking types, in display order.
pub const KNOWN_TYPES: [&str; 18] = [
    "normal", "fire", "water", "electric", "grass", "ice", "fighting", "poison", "ground",
    "flying", "psychic", "bug", "rock", "ghost", "dragon", "dark", "steel", "fairy",
];

/// A damage multiplier from the closed set {0, ¼, ½, 1, 2, 4}.
///
/// Tracked in quarter units internally so the closed set holds by
/// construction: a defender contributes at most one ×2, ×½, or ×0 step per
/// attacking type, and there are at most two defending types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Multiplier {
    Immune,
    Quarter,
    Half,
    Neutral,
    Double,
    Quadruple,
}

impl Multiplier {
    fn from_quarters(quarters: u32) -> Result<Self, LookupError> {
        match quarters {
            0 => Ok(Multiplier::Immune),
            1 => Ok(Multiplier::Quarter),
            2 => Ok(Multiplier::Half),
            4 => Ok(Multiplier::Neutral),
            8 => Ok(Multiplier::Double),
            16 => Ok(Multiplier::Quadruple),
            other => Err(LookupError::DataShape(format!(
                "Computed multiplier {}/4 is outside the known set",
                other
            ))),
        }
    }

    pub fn factor(self) -> f32 {
        match self {
            Multiplier::Immune => 0.0,
            Multiplier::Quarter => 0.25,
            Multiplier::Half => 0.5,
            Multiplier::Neutral => 1.0,
            Multiplier::Double => 2.0,
            Multiplier::Quadruple => 4.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Multiplier::Immune => "0",
            Multiplier::Quarter => "¼",
            Multiplier::Half => "½",
            Multiplier::Neutral => "1",
            Multiplier::Double => "2",
            Multiplier::Quadruple => "4",
        }
    }
}

/// Per-attacking-type damage multipliers for one defending type pair.
/// Every known type is always present.
#[derive(Debug, Clone)]
pub struct EffectivenessTable {
    entries: HashMap<&'static str, Multiplier>,
}

impl EffectivenessTable {
    /// Fold each defending type's damage relations into one table. Dual-type
    /// adjustments multiply, so application order does not matter.
    pub fn compute(defender_types: &[&TypeRecord]) -> Result<Self, LookupError> {
        let mut quarters: HashMap<&'static str, u32> =
            KNOWN_TYPES.iter().map(|name| (*name, 4u32)).collect();

        for record in defender_types {
            let relations = &record.damage_relations;
            for attacker in &relations.double_damage_from {
                if let Some(q) = lookup_mut(&mut quarters, &attacker.name) {
                    *q *= 2;
                }
            }
            for attacker in &relations.half_damage_from {
                if let Some(q) = lookup_mut(&mut quarters, &attacker.name) {
                    *q /= 2;
                }
            }
            for attacker in &relations.no_damage_from {
                if let Some(q) = lookup_mut(&mut quarters, &attacker.name) {
                    *q = 0;
                }
            }
        }

        let mut entries = HashMap::with_capacity(KNOWN_TYPES.len());
        for (name, q) in quarters {
            entries.insert(name, Multiplier::from_quarters(q)?);
        }
        Ok(Self { entries })
    }

    pub fn get(&self, attacking_type: &str) -> Option<Multiplier> {
        self.entries.get(attacking_type).copied()
    }

    /// Entries in the canonical display order.
    pub fn rows(&self) -> impl Iterator<Item = (&'static str, Multiplier)> + '_ {
        KNOWN_TYPES
            .iter()
            .map(|name| (*name, self.entries.get(name).copied().unwrap_or(Multiplier::Neutral)))
    }

    /// A copy of this table with one attacking type forced to immune.
    /// Immunity wins over any computed value, including ×4.
    pub fn with_immunity(&self, attacking_type: &str) -> Self {
        let mut entries = self.entries.clone();
        if let Some(name) = KNOWN_TYPES.iter().find(|name| **name == attacking_type) {
            entries.insert(name, Multiplier::Immune);
        } else {
            tracing::warn!("Immunity table names unknown type: {}", attacking_type);
        }
        Self { entries }
    }
}

fn lookup_mut<'a>(
    quarters: &'a mut HashMap<&'static str, u32>,
    name: &str,
) -> Option<&'a mut u32> {
    // Types outside the known universe are ignored.
    let key = KNOWN_TYPES.iter().find(|known| **known == name)?;
    quarters.get_mut(key)
}

/// One rendered matchup table: the base table, or a "what if this ability is
/// active" variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchupTable {
    pub ability: Option<String>,
    pub rows: Vec<MatchupRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchupRow {
    pub attacker: String,
    pub multiplier: String,
    pub factor: f32,
}

impl MatchupTable {
    fn from_table(ability: Option<String>, table: &EffectivenessTable) -> Self {
        Self {
            ability,
            rows: table
                .rows()
                .map(|(attacker, multiplier)| MatchupRow {
                    attacker: attacker.to_string(),
                    multiplier: multiplier.label().to_string(),
                    factor: multiplier.factor(),
                })
                .collect(),
        }
    }
}

/// Build the set of tables offered to the viewer: one per immunity-granting
/// ability the variant has, preceded by the unmodified table unless every
/// ability grants an immunity.
pub fn matchup_tables(
    base: &EffectivenessTable,
    abilities: &[AbilityEntry],
    immunities: &HashMap<String, String>,
) -> Vec<MatchupTable> {
    let immunity_abilities: Vec<(&AbilityEntry, &String)> = abilities
        .iter()
        .filter_map(|entry| immunities.get(&entry.name).map(|t| (entry, t)))
        .collect();

    let mut tables = Vec::new();
    let has_plain_ability = abilities
        .iter()
        .any(|entry| !immunities.contains_key(&entry.name));

    if immunity_abilities.is_empty() || has_plain_ability {
        tables.push(MatchupTable::from_table(None, base));
    }
    for (entry, immune_to) in immunity_abilities {
        tables.push(MatchupTable::from_table(
            Some(entry.name.clone()),
            &base.with_immunity(immune_to),
        ));
    }
    tables
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pokemon::{DamageRelations, NamedApiResource};

    fn named(names: &[&str]) -> Vec<NamedApiResource> {
        names
            .iter()
            .map(|n| NamedApiResource { name: n.to_string() })
            .collect()
    }

    fn type_record(double: &[&str], half: &[&str], none: &[&str]) -> TypeRecord {
        TypeRecord {
            damage_relations: DamageRelations {
                double_damage_from: named(double),
                half_damage_from: named(half),
                no_damage_from: named(none),
            },
        }
    }

    fn fire() -> TypeRecord {
        type_record(
            &["water", "ground", "rock"],
            &["fire", "grass", "ice", "bug", "steel", "fairy"],
            &[],
        )
    }

    fn flying() -> TypeRecord {
        type_record(
            &["electric", "ice", "rock"],
            &["grass", "fighting", "bug"],
            &["ground"],
        )
    }

    fn ghost() -> TypeRecord {
        type_record(&["ghost", "dark"], &["poison", "bug"], &["normal", "fighting"])
    }

    fn dragon() -> TypeRecord {
        type_record(
            &["ice", "dragon", "fairy"],
            &["fire", "water", "grass", "electric"],
            &[],
        )
    }

    #[test]
    fn test_table_is_fully_populated() {
        let table = EffectivenessTable::compute(&[&fire()]).unwrap();
        assert_eq!(table.rows().count(), 18);
        for name in KNOWN_TYPES {
            assert!(table.get(name).is_some());
        }
    }

    #[test]
    fn test_single_type_relations() {
        let table = EffectivenessTable::compute(&[&fire()]).unwrap();
        assert_eq!(table.get("water"), Some(Multiplier::Double));
        assert_eq!(table.get("grass"), Some(Multiplier::Half));
        assert_eq!(table.get("normal"), Some(Multiplier::Neutral));
    }

    #[test]
    fn test_dual_type_multiplies() {
        // Fire/Flying: Rock doubles from both sides, Ground cancels against
        // Flying's immunity, Grass halves twice.
        let table = EffectivenessTable::compute(&[&fire(), &flying()]).unwrap();
        assert_eq!(table.get("rock"), Some(Multiplier::Quadruple));
        assert_eq!(table.get("ground"), Some(Multiplier::Immune));
        assert_eq!(table.get("grass"), Some(Multiplier::Quarter));
        assert_eq!(table.get("water"), Some(Multiplier::Double));
        // ×2 from one type and ×½ from the other nets out.
        assert_eq!(table.get("ice"), Some(Multiplier::Neutral));
    }

    #[test]
    fn test_order_independence() {
        let ab = EffectivenessTable::compute(&[&fire(), &flying()]).unwrap();
        let ba = EffectivenessTable::compute(&[&flying(), &fire()]).unwrap();
        for name in KNOWN_TYPES {
            assert_eq!(ab.get(name), ba.get(name));
        }
    }

    #[test]
    fn test_ghost_dragon_ice_scenario() {
        let table = EffectivenessTable::compute(&[&ghost(), &dragon()]).unwrap();
        assert_eq!(table.get("ice"), Some(Multiplier::Double));
        assert_eq!(table.get("normal"), Some(Multiplier::Immune));
        assert_eq!(table.get("ghost"), Some(Multiplier::Double));
    }

    #[test]
    fn test_immunity_overrides_any_multiplier() {
        // Electric/Flying is ×4 weak to nothing relevant; use Fire/Flying's
        // quad rock weakness to show immunity beating a ×4.
        let table = EffectivenessTable::compute(&[&fire(), &flying()]).unwrap();
        assert_eq!(table.get("rock"), Some(Multiplier::Quadruple));

        let adjusted = table.with_immunity("rock");
        assert_eq!(adjusted.get("rock"), Some(Multiplier::Immune));

        // Idempotent on an already-immune entry.
        let again = adjusted.with_immunity("rock");
        assert_eq!(again.get("rock"), Some(Multiplier::Immune));
    }

    #[test]
    fn test_label_formatting_covers_closed_set() {
        let cases = [
            (Multiplier::Immune, "0", 0.0),
            (Multiplier::Quarter, "¼", 0.25),
            (Multiplier::Half, "½", 0.5),
            (Multiplier::Neutral, "1", 1.0),
            (Multiplier::Double, "2", 2.0),
            (Multiplier::Quadruple, "4", 4.0),
        ];
        for (multiplier, label, factor) in cases {
            assert_eq!(multiplier.label(), label);
            assert_eq!(multiplier.factor(), factor);
        }
    }

    #[test]
    fn test_out_of_set_quarters_is_a_defect() {
        assert!(Multiplier::from_quarters(3).is_err());
        assert!(Multiplier::from_quarters(32).is_err());
    }

    #[test]
    fn test_matchup_tables_without_immunity_ability() {
        let config = crate::config::load_config().unwrap();
        let base = EffectivenessTable::compute(&[&fire()]).unwrap();
        let abilities = vec![AbilityEntry { name: "blaze".to_string(), is_hidden: false }];

        let tables = matchup_tables(&base, &abilities, &config.abilities.immunities);
        assert_eq!(tables.len(), 1);
        assert!(tables[0].ability.is_none());
    }

    #[test]
    fn test_matchup_tables_offer_per_ability_variants() {
        let config = crate::config::load_config().unwrap();
        // A pure Ground-weak defender: Electric takes 2x from nothing here,
        // but Ground hits neutral; Levitate must still force it to 0.
        let electric = type_record(&["ground"], &["electric", "flying", "steel"], &[]);
        let base = EffectivenessTable::compute(&[&electric]).unwrap();
        assert_eq!(base.get("ground"), Some(Multiplier::Double));

        let abilities = vec![
            AbilityEntry { name: "static".to_string(), is_hidden: false },
            AbilityEntry { name: "levitate".to_string(), is_hidden: false },
        ];
        let tables = matchup_tables(&base, &abilities, &config.abilities.immunities);

        assert_eq!(tables.len(), 2);
        assert!(tables[0].ability.is_none());
        assert_eq!(tables[1].ability.as_deref(), Some("levitate"));
        let ground_row = tables[1]
            .rows
            .iter()
            .find(|row| row.attacker == "ground")
            .unwrap();
        assert_eq!(ground_row.multiplier, "0");
        assert_eq!(ground_row.factor, 0.0);
    }

    #[test]
    fn test_all_immunity_abilities_drop_base_table() {
        let config = crate::config::load_config().unwrap();
        let base = EffectivenessTable::compute(&[&fire()]).unwrap();
        let abilities = vec![AbilityEntry { name: "levitate".to_string(), is_hidden: false }];

        let tables = matchup_tables(&base, &abilities, &config.abilities.immunities);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].ability.as_deref(), Some("levitate"));
    }
}
