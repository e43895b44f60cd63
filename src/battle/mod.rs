pub mod ai;
pub mod combatant;
pub mod damage;
pub mod effects;
pub mod engine;
pub mod hooks;
pub mod logger;
pub mod move_effects;
pub mod state;
pub mod stats;
pub mod weather;

#[cfg(test)]
mod tests;
