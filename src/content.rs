//! Read-only content lookups consumed by the battle engine.

use crate::errors::{ContentError, ContentResult};
use schema::{AbilityData, ItemData, MoveData, MoveId, PokemonType, SpeciesData, SpeciesId, TypeChart};
use serde::Deserialize;
use std::collections::HashMap;

/// Content pack shipped with the crate.
pub const BUNDLED_CONTENT: &str = include_str!("../data/content.ron");

/// Pure, synchronous lookups into pre-loaded species/move/ability/item
/// definitions and the type chart.
pub trait ContentRepository {
    fn get_move(&self, id: MoveId) -> ContentResult<MoveData>;
    fn get_species(&self, id: SpeciesId) -> ContentResult<SpeciesData>;
    fn get_species_types(&self, id: SpeciesId) -> ContentResult<Vec<PokemonType>> {
        Ok(self.get_species(id)?.types)
    }
    fn get_type_chart(&self) -> TypeChart;
    fn get_ability(&self, id: u16) -> ContentResult<AbilityData>;
    fn get_item(&self, id: u16) -> ContentResult<ItemData>;
}

#[derive(Debug, Deserialize)]
struct ContentFile {
    moves: Vec<MoveData>,
    species: Vec<SpeciesData>,
    #[serde(default)]
    abilities: Vec<AbilityData>,
    #[serde(default)]
    items: Vec<ItemData>,
    /// Replaces the standard chart when present.
    #[serde(default)]
    type_chart: Option<Vec<(PokemonType, PokemonType, f64)>>,
}

/// In-memory repository deserialized from RON text.
#[derive(Debug, Clone, Default)]
pub struct StaticContent {
    moves: HashMap<MoveId, MoveData>,
    species: HashMap<SpeciesId, SpeciesData>,
    abilities: HashMap<u16, AbilityData>,
    items: HashMap<u16, ItemData>,
    type_chart: TypeChart,
}

impl StaticContent {
    pub fn bundled() -> ContentResult<Self> {
        Self::from_ron_str(BUNDLED_CONTENT)
    }

    pub fn from_ron_str(text: &str) -> ContentResult<Self> {
        let file: ContentFile =
            ron::from_str(text).map_err(|err| ContentError::MalformedData(err.to_string()))?;

        let mut content = StaticContent {
            type_chart: match file.type_chart {
                Some(entries) => TypeChart::from_entries(entries),
                None => TypeChart::standard(),
            },
            ..Default::default()
        };

        for move_data in file.moves {
            content.insert_move(move_data)?;
        }
        for species in file.species {
            if species.types.is_empty() || species.types.len() > 2 {
                return Err(ContentError::MalformedData(format!(
                    "{} must have one or two types",
                    species.name
                )));
            }
            let id = species.id;
            if content.species.insert(id, species).is_some() {
                return Err(ContentError::MalformedData(format!("duplicate species id {}", id)));
            }
        }
        for ability in file.abilities {
            let id = ability.id;
            if content.abilities.insert(id, ability).is_some() {
                return Err(ContentError::MalformedData(format!("duplicate ability id {}", id)));
            }
        }
        for item in file.items {
            let id = item.id;
            if content.items.insert(id, item).is_some() {
                return Err(ContentError::MalformedData(format!("duplicate item id {}", id)));
            }
        }

        Ok(content)
    }

    fn insert_move(&mut self, move_data: MoveData) -> ContentResult<()> {
        let id = move_data.id;
        if let (Some(min), Some(max)) = (move_data.meta.min_hits, move_data.meta.max_hits) {
            if min == 0 || min > max {
                return Err(ContentError::MalformedData(format!(
                    "{} has an invalid hit range {}-{}",
                    move_data.name, min, max
                )));
            }
        }
        if self.moves.insert(id, move_data).is_some() {
            return Err(ContentError::MalformedData(format!("duplicate move id {}", id)));
        }
        Ok(())
    }

    /// Adds or replaces a move definition.
    pub fn with_move(mut self, move_data: MoveData) -> Self {
        self.moves.insert(move_data.id, move_data);
        self
    }

    pub fn with_type_chart(mut self, type_chart: TypeChart) -> Self {
        self.type_chart = type_chart;
        self
    }

    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    pub fn species_count(&self) -> usize {
        self.species.len()
    }
}

impl ContentRepository for StaticContent {
    fn get_move(&self, id: MoveId) -> ContentResult<MoveData> {
        self.moves
            .get(&id)
            .cloned()
            .ok_or(ContentError::MoveNotFound(id))
    }

    fn get_species(&self, id: SpeciesId) -> ContentResult<SpeciesData> {
        self.species
            .get(&id)
            .cloned()
            .ok_or(ContentError::SpeciesNotFound(id))
    }

    fn get_type_chart(&self) -> TypeChart {
        self.type_chart.clone()
    }

    fn get_ability(&self, id: u16) -> ContentResult<AbilityData> {
        self.abilities
            .get(&id)
            .cloned()
            .ok_or(ContentError::AbilityNotFound(id))
    }

    fn get_item(&self, id: u16) -> ContentResult<ItemData> {
        self.items
            .get(&id)
            .cloned()
            .ok_or(ContentError::ItemNotFound(id))
    }
}
