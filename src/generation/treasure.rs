//! # Treasure
//!
//! Rewards collected from the encounters attached to a room.

use super::Encounter;
use serde::{Deserialize, Serialize};

/// The loot a room yields once its encounters are resolved.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TreasureHoard {
    /// Reward entries in encounter order
    pub items: Vec<String>,
}

impl TreasureHoard {
    /// Gathers the rewards of every encounter, keeping duplicates.
    ///
    /// # Examples
    ///
    /// ```
    /// use delver::{Encounter, TreasureHoard};
    ///
    /// let encounters = vec![
    ///     Encounter::new("a", 1).with_reward("10 gp"),
    ///     Encounter::new("b", 1).with_reward("potion of healing").with_reward("10 gp"),
    /// ];
    /// let hoard = TreasureHoard::from_encounters(&encounters);
    /// assert_eq!(hoard.total_items(), 3);
    /// ```
    pub fn from_encounters(encounters: &[Encounter]) -> Self {
        Self {
            items: encounters
                .iter()
                .flat_map(|encounter| encounter.rewards.iter().cloned())
                .collect(),
        }
    }

    pub fn total_items(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
