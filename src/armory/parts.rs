use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Slots the prince can equip armor into
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    Display,
    EnumString,
)]
pub enum PartType {
    #[default]
    Weapon,
    Head,
    Torso,
    Bottom,
}

impl PartType {
    /// The option after this one, wrapping back to the first
    pub fn next(self) -> PartType {
        PartType::iter()
            .cycle()
            .skip_while(|part| *part != self)
            .nth(1)
            .unwrap_or(PartType::Weapon)
    }
}
