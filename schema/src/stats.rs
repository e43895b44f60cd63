use serde::{Deserialize, Serialize};
use std::fmt;

/// Stats that carry a battle stage level in [-6, 6].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatType {
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
    Accuracy,
    Evasion,
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            StatType::Attack => "Attack",
            StatType::Defense => "Defense",
            StatType::SpecialAttack => "Sp. Atk",
            StatType::SpecialDefense => "Sp. Def",
            StatType::Speed => "Speed",
            StatType::Accuracy => "accuracy",
            StatType::Evasion => "evasiveness",
        };
        write!(f, "{}", display_name)
    }
}

/// A six-value stat line: HP, Attack, Defense, Sp. Atk, Sp. Def, Speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub special_attack: u16,
    pub special_defense: u16,
    pub speed: u16,
}

impl Stats {
    pub const fn new(
        hp: u16,
        attack: u16,
        defense: u16,
        special_attack: u16,
        special_defense: u16,
        speed: u16,
    ) -> Self {
        Self {
            hp,
            attack,
            defense,
            special_attack,
            special_defense,
            speed,
        }
    }

    /// Value of a stage-able stat. Accuracy and evasion have no stat value.
    pub fn get(&self, stat: StatType) -> Option<u16> {
        match stat {
            StatType::Attack => Some(self.attack),
            StatType::Defense => Some(self.defense),
            StatType::SpecialAttack => Some(self.special_attack),
            StatType::SpecialDefense => Some(self.special_defense),
            StatType::Speed => Some(self.speed),
            StatType::Accuracy | StatType::Evasion => None,
        }
    }

    pub fn get_mut(&mut self, stat: StatType) -> Option<&mut u16> {
        match stat {
            StatType::Attack => Some(&mut self.attack),
            StatType::Defense => Some(&mut self.defense),
            StatType::SpecialAttack => Some(&mut self.special_attack),
            StatType::SpecialDefense => Some(&mut self.special_defense),
            StatType::Speed => Some(&mut self.speed),
            StatType::Accuracy | StatType::Evasion => None,
        }
    }
}
