use crate::{PokemonType, StatType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric move id as assigned by the content repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MoveId(pub u16);

impl MoveId {
    /// The fallback move used when nothing else is legal.
    pub const STRUGGLE: MoveId = MoveId(165);
}

impl fmt::Display for MoveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageClass {
    Physical,
    Special,
    Status,
}

/// Move-effect classification used to pick the secondary-effect strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MoveMetaCategory {
    #[default]
    Damage,
    Ailment,
    NetGoodStats,
    Heal,
    DamageAilment,
    Swagger,
    DamageLower,
    DamageRaise,
    DamageHeal,
    Ohko,
    WholeFieldEffect,
    FieldEffect,
    ForceSwitch,
    Unique,
}

impl MoveMetaCategory {
    pub fn id(self) -> u8 {
        match self {
            MoveMetaCategory::Damage => 0,
            MoveMetaCategory::Ailment => 1,
            MoveMetaCategory::NetGoodStats => 2,
            MoveMetaCategory::Heal => 3,
            MoveMetaCategory::DamageAilment => 4,
            MoveMetaCategory::Swagger => 5,
            MoveMetaCategory::DamageLower => 6,
            MoveMetaCategory::DamageRaise => 7,
            MoveMetaCategory::DamageHeal => 8,
            MoveMetaCategory::Ohko => 9,
            MoveMetaCategory::WholeFieldEffect => 10,
            MoveMetaCategory::FieldEffect => 11,
            MoveMetaCategory::ForceSwitch => 12,
            MoveMetaCategory::Unique => 13,
        }
    }

    /// Categories whose formula damage is applied to the target.
    pub fn is_damaging(self) -> bool {
        matches!(
            self,
            MoveMetaCategory::Damage
                | MoveMetaCategory::DamageAilment
                | MoveMetaCategory::DamageLower
                | MoveMetaCategory::DamageRaise
                | MoveMetaCategory::DamageHeal
        )
    }
}

/// Ailments a move can inflict. Ids 1-5 are the non-volatile statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AilmentId {
    Paralysis,
    Sleep,
    Freeze,
    Burn,
    Poison,
    Confusion,
    Infatuation,
    Trap,
    LeechSeed,
}

impl AilmentId {
    pub fn id(self) -> u8 {
        match self {
            AilmentId::Paralysis => 1,
            AilmentId::Sleep => 2,
            AilmentId::Freeze => 3,
            AilmentId::Burn => 4,
            AilmentId::Poison => 5,
            AilmentId::Confusion => 6,
            AilmentId::Infatuation => 7,
            AilmentId::Trap => 8,
            AilmentId::LeechSeed => 18,
        }
    }

    pub fn is_volatile(self) -> bool {
        self.id() >= 6
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MoveTarget {
    #[default]
    Selected,
    User,
    Field,
}

/// Invulnerability or protection tag held during a charge turn or after Protect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtectionKind {
    InAir,
    Underground,
    Underwater,
    Protected,
}

/// Two-turn move behavior on the charge turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChargeKind {
    Charge,
    InAir,
    Underground,
    Underwater,
}

impl ChargeKind {
    /// Protection held while charging, if any.
    pub fn protection(self) -> Option<ProtectionKind> {
        match self {
            ChargeKind::Charge => None,
            ChargeKind::InAir => Some(ProtectionKind::InAir),
            ChargeKind::Underground => Some(ProtectionKind::Underground),
            ChargeKind::Underwater => Some(ProtectionKind::Underwater),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherKind {
    Rain,
    Sun,
    Sandstorm,
    Hail,
}

impl fmt::Display for WeatherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            WeatherKind::Rain => "rain",
            WeatherKind::Sun => "harsh sunlight",
            WeatherKind::Sandstorm => "sandstorm",
            WeatherKind::Hail => "hail",
        };
        write!(f, "{}", display_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatChange {
    pub stat: StatType,
    pub change: i8,
}

/// Secondary-effect metadata. Chances of 0 mean "always" for pure status
/// categories.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveMeta {
    pub category: MoveMetaCategory,
    pub ailment: Option<AilmentId>,
    pub ailment_chance: u8,
    pub badly_poisons: bool,
    pub min_hits: Option<u8>,
    pub max_hits: Option<u8>,
    /// Percent of damage dealt returned to the user; negative is recoil.
    pub drain: i8,
    /// Percent of the user's max HP restored.
    pub healing: i8,
    pub crit_rate: u8,
    pub flinch_chance: u8,
    pub stat_chance: u8,
    pub stat_changes: Vec<StatChange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveData {
    pub id: MoveId,
    pub name: String,
    pub move_type: PokemonType,
    pub damage_class: DamageClass,
    #[serde(default)]
    pub power: Option<u16>,
    /// `None` never misses.
    #[serde(default)]
    pub accuracy: Option<u8>,
    pub pp: u8,
    #[serde(default)]
    pub priority: i8,
    #[serde(default)]
    pub target: MoveTarget,
    #[serde(default)]
    pub meta: MoveMeta,
    #[serde(default)]
    pub contact: bool,
    #[serde(default)]
    pub charge: Option<ChargeKind>,
    #[serde(default)]
    pub charge_boost: Option<StatChange>,
    /// Protection kinds this move still connects through.
    #[serde(default)]
    pub penetrates: Vec<ProtectionKind>,
    #[serde(default)]
    pub protects: bool,
    #[serde(default)]
    pub weather: Option<WeatherKind>,
}

impl MoveData {
    /// The unconditional fallback move.
    pub fn struggle() -> Self {
        Self {
            id: MoveId::STRUGGLE,
            name: "Struggle".to_string(),
            move_type: PokemonType::Typeless,
            damage_class: DamageClass::Physical,
            power: Some(50),
            accuracy: None,
            pp: 1,
            priority: 0,
            target: MoveTarget::Selected,
            meta: MoveMeta::default(),
            contact: true,
            charge: None,
            charge_boost: None,
            penetrates: Vec::new(),
            protects: false,
            weather: None,
        }
    }

    pub fn category(&self) -> MoveMetaCategory {
        self.meta.category
    }

    pub fn is_damaging(&self) -> bool {
        self.meta.category.is_damaging()
    }

    /// Whether the move is aimed at the opposing combatant.
    pub fn targets_opponent(&self) -> bool {
        self.target == MoveTarget::Selected
    }

    pub fn is_multi_hit(&self) -> bool {
        self.meta.max_hits.unwrap_or(1) > 1
    }
}
