use serde::{Deserialize, Serialize};

/// Display record for an ability. Behavior is keyed by `id` in the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityData {
    pub id: u16,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Display record for a held item. Behavior is keyed by `id` in the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemData {
    pub id: u16,
    pub name: String,
    #[serde(default)]
    pub description: String,
}
