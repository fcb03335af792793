//! Pepper encyclopedia
//!
//! A fixed catalog of peppers, each unlocked once by spending encyclopedia
//! points. The first entry is free and always unlocked. The balance never
//! goes negative.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::Tier;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodexError {
    #[error("unknown codex entry {0:?}")]
    UnknownEntry(String),
    #[error("codex entry {0:?} is already unlocked")]
    AlreadyUnlocked(String),
    #[error("not enough encyclopedia points: need {cost}, have {balance}")]
    InsufficientPoints { cost: u64, balance: u64 },
}

/// One catalog page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodexEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub scientific_name: &'static str,
    pub tier: Tier,
    pub scoville: u32,
    pub origin: &'static str,
    pub unlock_cost: u64,
    pub fun_fact: &'static str,
}

/// Every entry, cheapest first
pub static CATALOG: [CodexEntry; 8] = [
    CodexEntry {
        id: "bell_pepper",
        name: "Bell Pepper",
        scientific_name: "Capsicum annuum",
        tier: Tier::Mild,
        scoville: 0,
        origin: "South America",
        unlock_cost: 0,
        fun_fact: "Green bell peppers are just unripe red peppers",
    },
    CodexEntry {
        id: "poblano",
        name: "Poblano",
        scientific_name: "Capsicum annuum",
        tier: Tier::Mild,
        scoville: 2_000,
        origin: "Mexico",
        unlock_cost: 50,
        fun_fact: "Dried poblanos are sold as ancho chilies",
    },
    CodexEntry {
        id: "jalapeno",
        name: "Jalapeño",
        scientific_name: "Capsicum annuum",
        tier: Tier::Medium,
        scoville: 5_000,
        origin: "Mexico",
        unlock_cost: 100,
        fun_fact: "Chipotles are smoked, dried jalapeños",
    },
    CodexEntry {
        id: "serrano",
        name: "Serrano",
        scientific_name: "Capsicum annuum",
        tier: Tier::Hot,
        scoville: 23_000,
        origin: "Mexico",
        unlock_cost: 200,
        fun_fact: "Serrano means 'from the mountains' in Spanish",
    },
    CodexEntry {
        id: "cayenne",
        name: "Cayenne Pepper",
        scientific_name: "Capsicum annuum",
        tier: Tier::Hot,
        scoville: 50_000,
        origin: "French Guiana",
        unlock_cost: 300,
        fun_fact: "Named after the city of Cayenne in French Guiana",
    },
    CodexEntry {
        id: "habanero",
        name: "Habanero",
        scientific_name: "Capsicum chinense",
        tier: Tier::VeryHot,
        scoville: 350_000,
        origin: "Amazonia",
        unlock_cost: 500,
        fun_fact: "Habanero means 'from Havana' in Spanish",
    },
    CodexEntry {
        id: "ghost_pepper",
        name: "Ghost Pepper",
        scientific_name: "Capsicum chinense",
        tier: Tier::Extreme,
        scoville: 1_041_427,
        origin: "India",
        unlock_cost: 1000,
        fun_fact: "Held the hottest pepper record from 2007 to 2010",
    },
    CodexEntry {
        id: "carolina_reaper",
        name: "Carolina Reaper",
        scientific_name: "Capsicum chinense",
        tier: Tier::Extreme,
        scoville: 2_200_000,
        origin: "USA",
        unlock_cost: 2000,
        fun_fact: "Bred in South Carolina, it has a distinctive stinger tail",
    },
];

/// Look up a catalog entry by id
pub fn entry(id: &str) -> Option<&'static CodexEntry> {
    CATALOG.iter().find(|e| e.id == id)
}

/// Unlocked encyclopedia entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Codex {
    pub unlocked: BTreeSet<String>,
}

impl Default for Codex {
    fn default() -> Self {
        Self::new(std::iter::empty())
    }
}

impl Codex {
    /// Build from stored ids; unknown ids are dropped and the free entry added
    pub fn new(unlocked: impl IntoIterator<Item = String>) -> Self {
        let mut unlocked: BTreeSet<String> = unlocked
            .into_iter()
            .filter(|id| entry(id).is_some())
            .collect();
        unlocked.insert(CATALOG[0].id.to_string());
        Self { unlocked }
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(id)
    }

    /// Spend the entry's cost from `balance` to unlock it
    ///
    /// On error neither the codex nor the balance changes. Returns the cost
    /// paid.
    pub fn unlock(&mut self, id: &str, balance: &mut u64) -> Result<u64, CodexError> {
        let entry = entry(id).ok_or_else(|| CodexError::UnknownEntry(id.to_string()))?;
        if self.is_unlocked(id) {
            return Err(CodexError::AlreadyUnlocked(id.to_string()));
        }
        if entry.unlock_cost > *balance {
            return Err(CodexError::InsufficientPoints {
                cost: entry.unlock_cost,
                balance: *balance,
            });
        }
        *balance -= entry.unlock_cost;
        self.unlocked.insert(entry.id.to_string());
        Ok(entry.unlock_cost)
    }

    /// Entries the player can read, in catalog order
    pub fn unlocked_entries(&self) -> impl Iterator<Item = &'static CodexEntry> + '_ {
        CATALOG.iter().filter(|e| self.is_unlocked(e.id))
    }

    pub fn has_unlocked_tier(&self, tier: Tier) -> bool {
        self.unlocked_entries().any(|e| e.tier == tier)
    }

    /// Percentage of the catalog unlocked, rounded down
    pub fn completion_percentage(&self) -> u32 {
        (self.unlocked.len() * 100 / CATALOG.len()) as u32
    }

    pub fn len(&self) -> usize {
        self.unlocked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unlocked.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_entry_always_unlocked() {
        let codex = Codex::default();
        assert!(codex.is_unlocked("bell_pepper"));
        assert_eq!(codex.len(), 1);
        assert_eq!(codex.completion_percentage(), 12);
    }

    #[test]
    fn test_catalog_costs() {
        let costs: Vec<u64> = CATALOG.iter().map(|e| e.unlock_cost).collect();
        assert_eq!(costs, vec![0, 50, 100, 200, 300, 500, 1000, 2000]);
        assert_eq!(entry("habanero").map(|e| e.tier), Some(Tier::VeryHot));
    }

    #[test]
    fn test_unlock_spends_catalog_cost() {
        let mut codex = Codex::default();
        let mut balance = 150;
        assert_eq!(codex.unlock("jalapeno", &mut balance), Ok(100));
        assert_eq!(balance, 50);
        assert!(codex.is_unlocked("jalapeno"));
        assert!(codex.has_unlocked_tier(Tier::Medium));
    }

    #[test]
    fn test_exact_balance_is_enough() {
        let mut codex = Codex::default();
        let mut balance = 50;
        assert!(codex.unlock("poblano", &mut balance).is_ok());
        assert_eq!(balance, 0);
    }

    #[test]
    fn test_insufficient_points() {
        let mut codex = Codex::default();
        let mut balance = 40;
        assert_eq!(
            codex.unlock("poblano", &mut balance),
            Err(CodexError::InsufficientPoints { cost: 50, balance: 40 })
        );
        assert_eq!(balance, 40);
        assert_eq!(codex.len(), 1);
    }

    #[test]
    fn test_unknown_entry_rejected() {
        let mut codex = Codex::default();
        let mut balance = 5000;
        assert_eq!(
            codex.unlock("x", &mut balance),
            Err(CodexError::UnknownEntry("x".to_string()))
        );
        assert_eq!(balance, 5000);
        assert!(!codex.is_unlocked("x"));
    }

    #[test]
    fn test_unlock_once() {
        let mut codex = Codex::new(["serrano".to_string(), "retired".to_string()]);
        assert!(!codex.is_unlocked("retired"));
        let mut balance = 500;
        assert_eq!(
            codex.unlock("serrano", &mut balance),
            Err(CodexError::AlreadyUnlocked("serrano".to_string()))
        );
        assert_eq!(
            codex.unlock("bell_pepper", &mut balance),
            Err(CodexError::AlreadyUnlocked("bell_pepper".to_string()))
        );
        assert_eq!(balance, 500);
        assert_eq!(codex.len(), 2);
    }
}
