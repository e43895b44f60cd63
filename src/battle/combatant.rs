use crate::battle::effects::abilities::Ability;
use crate::battle::effects::items::{HeldItem, HeldItemKind};
use crate::battle::effects::status::StatusCondition;
use crate::battle::effects::volatile::{VolatileCondition, VolatileKind};
use crate::battle::hooks::HookRegistry;
use crate::battle::state::Side;
use crate::battle::stats::{self, MAX_STAGE, MIN_STAGE};
use crate::content::ContentRepository;
use crate::errors::{BattleResult, BattleStateError, ContentResult};
use schema::{MoveData, MoveId, PokemonType, ProtectionKind, SpeciesId, StatType, Stats};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::ops::Deref;
use std::sync::Arc;

/// Immutable per-battle snapshot of one usable move.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveInfo {
    data: Arc<MoveData>,
}

impl MoveInfo {
    pub fn new(data: MoveData) -> Self {
        Self {
            data: Arc::new(data),
        }
    }

    pub fn struggle() -> Self {
        Self::new(MoveData::struggle())
    }

    pub fn max_pp(&self) -> u8 {
        self.data.pp
    }

    pub fn is_struggle(&self) -> bool {
        self.data.id == MoveId::STRUGGLE
    }
}

impl Deref for MoveInfo {
    type Target = MoveData;

    fn deref(&self) -> &MoveData {
        &self.data
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveSlot {
    pub move_id: MoveId,
    pub pp: u8,
}

/// The persisted record a combatant is built from and written back to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantSnapshot {
    pub species: SpeciesId,
    #[serde(default)]
    pub nickname: Option<String>,
    pub level: u8,
    pub stats: Stats,
    pub current_hp: u16,
    pub moves: Vec<MoveSlot>,
    #[serde(default)]
    pub held_item: Option<u16>,
    #[serde(default)]
    pub ability: Option<u16>,
    #[serde(default)]
    pub status: Option<StatusCondition>,
}

impl CombatantSnapshot {
    /// A full-health snapshot with level-derived stats and full PP.
    pub fn from_species(
        content: &dyn ContentRepository,
        species: SpeciesId,
        level: u8,
        moves: &[MoveId],
    ) -> ContentResult<Self> {
        let species_data = content.get_species(species)?;
        let stats = stats::calculate_stats(&species_data.base_stats, level);
        let moves = moves
            .iter()
            .map(|id| {
                content.get_move(*id).map(|data| MoveSlot {
                    move_id: *id,
                    pp: data.pp,
                })
            })
            .collect::<ContentResult<Vec<_>>>()?;

        Ok(Self {
            species,
            nickname: None,
            level,
            stats,
            current_hp: stats.hp,
            moves,
            held_item: None,
            ability: None,
            status: None,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CombatantState {
    pub side: Side,
    pub species: SpeciesId,
    pub name: String,
    nickname: Option<String>,
    pub level: u8,
    pub types: Vec<PokemonType>,
    /// `stats.hp` is the maximum HP.
    pub stats: Stats,
    current_hp: u16,
    pub moves: Vec<MoveInfo>,
    /// Parallel to `moves`.
    pub pp: Vec<u8>,
    /// Sparse; absent entries are stage 0.
    pub stat_stages: HashMap<StatType, i8>,
    pub status: Option<StatusCondition>,
    pub volatiles: BTreeMap<VolatileKind, VolatileCondition>,
    pub ability: Option<Ability>,
    ability_id: Option<u16>,
    pub held_item: Option<HeldItem>,
    pub charging_move: Option<MoveId>,
    pub protection: Option<ProtectionKind>,
    pub last_move: Option<MoveId>,
    pub hooks: HookRegistry,
}

impl CombatantState {
    pub fn from_snapshot(
        content: &dyn ContentRepository,
        side: Side,
        snapshot: CombatantSnapshot,
    ) -> BattleResult<Self> {
        let species = content.get_species(snapshot.species)?;
        let types = content.get_species_types(snapshot.species)?;
        let name = snapshot
            .nickname
            .clone()
            .unwrap_or_else(|| species.name.clone());

        if snapshot.stats.hp == 0 {
            return Err(BattleStateError::InvalidCombatant(format!("{} has a max HP of 0", name)).into());
        }
        if snapshot.current_hp == 0 {
            return Err(BattleStateError::InvalidCombatant(format!("{} has already fainted", name)).into());
        }

        let mut moves = Vec::with_capacity(snapshot.moves.len());
        let mut pp = Vec::with_capacity(snapshot.moves.len());
        for slot in &snapshot.moves {
            let info = MoveInfo::new(content.get_move(slot.move_id)?);
            pp.push(slot.pp.min(info.max_pp()));
            moves.push(info);
        }

        if let Some(id) = snapshot.ability {
            content.get_ability(id)?;
        }
        if let Some(id) = snapshot.held_item {
            content.get_item(id)?;
        }

        Ok(Self {
            side,
            species: snapshot.species,
            name,
            nickname: snapshot.nickname,
            level: snapshot.level,
            types,
            stats: snapshot.stats,
            current_hp: snapshot.current_hp.min(snapshot.stats.hp),
            moves,
            pp,
            stat_stages: HashMap::new(),
            status: snapshot.status,
            volatiles: BTreeMap::new(),
            ability: snapshot.ability.and_then(Ability::from_id),
            ability_id: snapshot.ability,
            held_item: snapshot.held_item.map(|id| HeldItem {
                id,
                kind: HeldItemKind::from_id(id),
                choice_lock: None,
            }),
            charging_move: None,
            protection: None,
            last_move: None,
            hooks: HookRegistry::new(),
        })
    }

    /// The authoritative post-battle record.
    pub fn to_snapshot(&self) -> CombatantSnapshot {
        CombatantSnapshot {
            species: self.species,
            nickname: self.nickname.clone(),
            level: self.level,
            stats: self.stats,
            current_hp: self.current_hp,
            moves: self
                .moves
                .iter()
                .zip(&self.pp)
                .map(|(info, pp)| MoveSlot {
                    move_id: info.id,
                    pp: *pp,
                })
                .collect(),
            held_item: self.held_item.as_ref().map(|item| item.id),
            ability: self.ability_id,
            status: self.status,
        }
    }

    pub fn current_hp(&self) -> u16 {
        self.current_hp
    }

    pub fn max_hp(&self) -> u16 {
        self.stats.hp
    }

    pub fn hp_fraction(&self) -> f64 {
        self.current_hp as f64 / self.stats.hp.max(1) as f64
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    /// Sets HP, clamped to [0, max].
    pub fn set_hp(&mut self, hp: u16) {
        self.current_hp = hp.min(self.stats.hp);
    }

    /// Returns the HP actually lost.
    pub fn take_damage(&mut self, amount: u16) -> u16 {
        let dealt = amount.min(self.current_hp);
        self.current_hp -= dealt;
        dealt
    }

    /// Returns the HP actually restored. Fainted combatants cannot be healed.
    pub fn heal(&mut self, amount: u16) -> u16 {
        if self.is_fainted() {
            return 0;
        }
        let restored = amount.min(self.stats.hp - self.current_hp);
        self.current_hp += restored;
        restored
    }

    /// `max(1, max_hp / divisor)`, the shape of every fractional residual.
    pub fn fraction_of_max(&self, divisor: u16) -> u16 {
        (self.stats.hp / divisor.max(1)).max(1)
    }

    pub fn has_type(&self, pokemon_type: PokemonType) -> bool {
        self.types.contains(&pokemon_type)
    }

    pub fn has_volatile(&self, kind: VolatileKind) -> bool {
        self.volatiles.contains_key(&kind)
    }

    pub fn has_ability(&self, ability: Ability) -> bool {
        self.ability == Some(ability)
    }

    pub fn stage(&self, stat: StatType) -> i8 {
        self.stat_stages.get(&stat).copied().unwrap_or(0)
    }

    /// Applies a stage delta clamped to [-6, 6] and returns the new stage.
    pub fn change_stage(&mut self, stat: StatType, delta: i8) -> i8 {
        let new_stage = self.stage(stat).saturating_add(delta).clamp(MIN_STAGE, MAX_STAGE);
        if new_stage == 0 {
            self.stat_stages.remove(&stat);
        } else {
            self.stat_stages.insert(stat, new_stage);
        }
        new_stage
    }

    pub fn move_index_of(&self, id: MoveId) -> Option<usize> {
        self.moves.iter().position(|info| info.id == id)
    }

    /// Indices of moves with PP remaining.
    pub fn usable_move_indices(&self) -> Vec<usize> {
        self.pp
            .iter()
            .enumerate()
            .filter(|(_, pp)| **pp > 0)
            .map(|(index, _)| index)
            .collect()
    }

    pub fn deduct_pp(&mut self, move_index: usize) {
        if let Some(pp) = self.pp.get_mut(move_index) {
            *pp = pp.saturating_sub(1);
        }
    }
}
