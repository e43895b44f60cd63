use schema::{StatType, Stats};
use std::collections::HashMap;

pub const MIN_STAGE: i8 = -6;
pub const MAX_STAGE: i8 = 6;

/// Stage multiplier as an exact fraction (numerator, denominator).
pub fn stage_fraction(stage: i8) -> (u32, u32) {
    match stage.clamp(MIN_STAGE, MAX_STAGE) {
        -6 => (1, 3),
        -5 => (3, 7),
        -4 => (1, 2),
        -3 => (3, 5),
        -2 => (2, 3),
        -1 => (4, 5),
        0 => (1, 1),
        1 => (3, 2),
        2 => (2, 1),
        3 => (5, 2),
        4 => (3, 1),
        5 => (7, 2),
        _ => (4, 1),
    }
}

/// `floor(base * multiplier(stage))`, computed in integers.
pub fn apply_stage(base: u16, stage: i8) -> u16 {
    let (numerator, denominator) = stage_fraction(stage);
    let scaled = base as u32 * numerator / denominator;
    scaled.min(u16::MAX as u32) as u16
}

/// Applies stage levels to every non-HP stat. Absent stages read as 0.
pub fn effective_stats(base: &Stats, stages: &HashMap<StatType, i8>) -> Stats {
    let stage = |stat: StatType| stages.get(&stat).copied().unwrap_or(0);
    Stats {
        hp: base.hp,
        attack: apply_stage(base.attack, stage(StatType::Attack)),
        defense: apply_stage(base.defense, stage(StatType::Defense)),
        special_attack: apply_stage(base.special_attack, stage(StatType::SpecialAttack)),
        special_defense: apply_stage(base.special_defense, stage(StatType::SpecialDefense)),
        speed: apply_stage(base.speed, stage(StatType::Speed)),
    }
}

/// Accuracy/evasion stages use their own table.
pub fn accuracy_stage_multiplier(stage: i8) -> f64 {
    match stage.clamp(MIN_STAGE, MAX_STAGE) {
        -6 => 3.0 / 9.0,
        -5 => 3.0 / 8.0,
        -4 => 3.0 / 7.0,
        -3 => 3.0 / 6.0,
        -2 => 3.0 / 5.0,
        -1 => 3.0 / 4.0,
        0 => 1.0,
        1 => 4.0 / 3.0,
        2 => 5.0 / 3.0,
        3 => 6.0 / 3.0,
        4 => 7.0 / 3.0,
        5 => 8.0 / 3.0,
        _ => 9.0 / 3.0,
    }
}

/// Scales a stat by a float factor, flooring the result.
pub fn scale_stat(value: u16, factor: f64) -> u16 {
    (value as f64 * factor).floor().clamp(0.0, u16::MAX as f64) as u16
}

/// Stat derived from a base stat and level, as used when no persisted stat
/// line is available.
pub fn calculate_stat(base: u16, level: u8, is_hp: bool) -> u16 {
    let level = level as u32;
    let core = 2 * base as u32 * level / 100;
    let value = if is_hp { core + level + 10 } else { core + 5 };
    value.min(u16::MAX as u32) as u16
}

pub fn calculate_stats(base: &Stats, level: u8) -> Stats {
    Stats {
        hp: calculate_stat(base.hp, level, true),
        attack: calculate_stat(base.attack, level, false),
        defense: calculate_stat(base.defense, level, false),
        special_attack: calculate_stat(base.special_attack, level, false),
        special_defense: calculate_stat(base.special_defense, level, false),
        speed: calculate_stat(base.speed, level, false),
    }
}
