use serde::{Deserialize, Serialize};

use crate::abilities::AbilityEntry;
use crate::error::LookupError;
use crate::forms::FormDescriptor;
use crate::matchup::MatchupTable;
use crate::pokemon::Pokemon;

const STAT_LABELS: [&str; 6] = ["HP", "Attack", "Defense", "Sp. Atk", "Sp. Def", "Speed"];

/// The assembled lookup result: plain structured values, no markup, so any
/// rendering technology can consume it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonCard {
    pub id: i32,
    pub name: String,
    pub display_name: String,
    pub height: HeightFigures,
    pub weight: WeightFigures,
    pub sprites: SpriteSet,
    pub types: Vec<String>,
    pub stats: Vec<StatLine>,
    pub stat_total: i32,
    pub forms: Vec<FormDescriptor>,
    pub abilities: Vec<AbilityEntry>,
    pub matchups: Vec<MatchupTable>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeightFigures {
    pub decimetres: i32,
    pub metres: f64,
    pub feet: i32,
    pub inches: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightFigures {
    pub hectograms: i32,
    pub kilograms: f64,
    pub pounds: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteSet {
    pub official: SpritePair,
    pub home: SpritePair,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpritePair {
    pub default: Option<String>,
    pub shiny: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatLine {
    pub label: String,
    pub value: i32,
}

impl PokemonCard {
    pub fn assemble(
        variant: &Pokemon,
        forms: Vec<FormDescriptor>,
        abilities: Vec<AbilityEntry>,
        matchups: Vec<MatchupTable>,
    ) -> Result<Self, LookupError> {
        if variant.stats.len() != STAT_LABELS.len() {
            return Err(LookupError::DataShape(format!(
                "Variant {} has {} stat entries, expected {}",
                variant.name,
                variant.stats.len(),
                STAT_LABELS.len()
            )));
        }

        let stats: Vec<StatLine> = STAT_LABELS
            .iter()
            .zip(&variant.stats)
            .map(|(label, slot)| StatLine {
                label: label.to_string(),
                value: slot.base_stat,
            })
            .collect();
        let stat_total = stats.iter().map(|line| line.value).sum();

        Ok(Self {
            id: variant.id,
            name: variant.name.clone(),
            display_name: display_name(&variant.name),
            height: height_figures(variant.height),
            weight: weight_figures(variant.weight),
            sprites: SpriteSet {
                official: SpritePair {
                    default: variant.sprites.other.official_artwork.front_default.clone(),
                    shiny: variant.sprites.other.official_artwork.front_shiny.clone(),
                },
                home: SpritePair {
                    default: variant.sprites.other.home.front_default.clone(),
                    shiny: variant.sprites.other.home.front_shiny.clone(),
                },
            },
            types: variant
                .types
                .iter()
                .map(|slot| slot.r#type.name.clone())
                .collect(),
            stats,
            stat_total,
            forms,
            abilities,
            matchups,
        })
    }
}

/// "giratina-altered" -> "Giratina Altered"
pub fn display_name(name: &str) -> String {
    name.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn height_figures(decimetres: i32) -> HeightFigures {
    let metres = decimetres as f64 / 10.0;
    let total_feet = metres * 3.28084;
    let feet = total_feet.floor() as i32;
    let inches = ((total_feet - total_feet.floor()) * 12.0).round() as i32;
    HeightFigures {
        decimetres,
        metres: (metres * 10.0).round() / 10.0,
        feet,
        inches,
    }
}

fn weight_figures(hectograms: i32) -> WeightFigures {
    let kilograms = hectograms as f64 / 10.0;
    let pounds = (kilograms * 2.20462 * 10.0).round() / 10.0;
    WeightFigures {
        hectograms,
        kilograms: (kilograms * 10.0).round() / 10.0,
        pounds,
    }
}
