// pokemon.rs
// Wire-format data structures for the upstream PokeAPI endpoints.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NamedApiResource {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApiResourceRef {
    pub name: String,
    pub url: String,
}

// GET /pokemon-species/{name}
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Species {
    pub id: i32,
    pub name: String,
    pub varieties: Vec<Variety>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Variety {
    pub is_default: bool,
    pub pokemon: ApiResourceRef,
}

// GET /pokemon/{name|url}
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Pokemon {
    pub id: i32,
    pub name: String,
    pub height: i32,
    pub weight: i32,
    pub types: Vec<TypeSlot>,
    pub abilities: Vec<AbilitySlot>,
    pub stats: Vec<StatSlot>,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub forms: Vec<FormRef>,
    #[serde(default)]
    pub species: Option<ApiResourceRef>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TypeSlot {
    pub slot: i32,
    pub r#type: NamedApiResource,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AbilitySlot {
    pub is_hidden: bool,
    pub slot: i32,
    pub ability: NamedApiResource,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StatSlot {
    pub base_stat: i32,
    pub effort: i32,
    pub stat: NamedApiResource,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FormRef {
    pub name: String,
    #[serde(default)]
    pub is_battle_only: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Sprites {
    #[serde(default)]
    pub other: OtherSprites,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: SpriteImages,
    #[serde(default)]
    pub home: SpriteImages,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SpriteImages {
    pub front_default: Option<String>,
    pub front_shiny: Option<String>,
}

// GET /type/{name}
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TypeRecord {
    pub damage_relations: DamageRelations,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct DamageRelations {
    pub double_damage_from: Vec<NamedApiResource>,
    pub half_damage_from: Vec<NamedApiResource>,
    pub no_damage_from: Vec<NamedApiResource>,
}

// GET /pokemon-species?limit=N
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NameList {
    pub results: Vec<NamedApiResource>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_species_deserializes() {
        let body = r#"{
            "id": 487,
            "name": "giratina",
            "varieties": [
                { "is_default": true,
                  "pokemon": { "name": "giratina-altered", "url": "https://pokeapi.co/api/v2/pokemon/487/" } },
                { "is_default": false,
                  "pokemon": { "name": "giratina-origin", "url": "https://pokeapi.co/api/v2/pokemon/10007/" } }
            ]
        }"#;
        let species: Species = serde_json::from_str(body).unwrap();
        assert_eq!(species.id, 487);
        assert_eq!(species.varieties.len(), 2);
        assert!(species.varieties[0].is_default);
    }

    #[test]
    fn test_pokemon_deserializes_without_sprites() {
        let body = r#"{
            "id": 25,
            "name": "pikachu",
            "height": 4,
            "weight": 60,
            "types": [{ "slot": 1, "type": { "name": "electric" } }],
            "abilities": [
                { "is_hidden": false, "slot": 1, "ability": { "name": "static" } },
                { "is_hidden": true, "slot": 3, "ability": { "name": "lightning-rod" } }
            ],
            "stats": [
                { "base_stat": 35, "effort": 0, "stat": { "name": "hp" } },
                { "base_stat": 55, "effort": 0, "stat": { "name": "attack" } },
                { "base_stat": 40, "effort": 0, "stat": { "name": "defense" } },
                { "base_stat": 50, "effort": 0, "stat": { "name": "special-attack" } },
                { "base_stat": 50, "effort": 0, "stat": { "name": "special-defense" } },
                { "base_stat": 90, "effort": 2, "stat": { "name": "speed" } }
            ]
        }"#;
        let pokemon: Pokemon = serde_json::from_str(body).unwrap();
        assert_eq!(pokemon.name, "pikachu");
        assert!(pokemon.sprites.other.home.front_default.is_none());
        assert!(pokemon.forms.is_empty());
    }

    #[test]
    fn test_type_record_deserializes() {
        let body = r#"{
            "damage_relations": {
                "double_damage_from": [{ "name": "ice" }, { "name": "dragon" }],
                "half_damage_from": [{ "name": "fire" }],
                "no_damage_from": [{ "name": "normal" }]
            }
        }"#;
        let record: TypeRecord = serde_json::from_str(body).unwrap();
        assert_eq!(record.damage_relations.double_damage_from.len(), 2);
        assert_eq!(record.damage_relations.no_damage_from[0].name, "normal");
    }
}
