//! # Encounter Selection
//!
//! Level-appropriate encounter content for generated dungeons.
//!
//! Encounters are authored elsewhere and treated as read-only reference data.
//! The selector only samples them: it never fabricates an encounter, never
//! returns one twice, and answers an empty pool with an empty selection.

use crate::config;
use crate::DelverResult;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;

/// Character level or challenge rating used to bucket encounters.
pub type Level = u32;

/// How dangerous an encounter is for a party of its level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Deadly,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Deadly => "deadly",
        };
        f.write_str(label)
    }
}

/// One entry of an encounter's enemy roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub name: String,
    #[serde(default = "default_enemy_count")]
    pub count: u32,
}

fn default_enemy_count() -> u32 {
    1
}

/// Where an encounter is meant to take place.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterLocation {
    /// Dungeon identifier the encounter belongs to, if any
    pub dungeon: Option<String>,
    /// Area within the dungeon or region
    pub area: Option<String>,
    /// Environment tag such as "underground" or "forest"
    pub environment: Option<String>,
}

/// A pre-authored encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encounter {
    pub id: String,
    /// Character level or challenge rating this encounter is balanced for
    pub level: Level,
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Free-form encounter type, e.g. "combat", "trap", "social"
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub enemies: Vec<Enemy>,
    #[serde(default)]
    pub rewards: Vec<String>,
    #[serde(default)]
    pub location: EncounterLocation,
}

impl Encounter {
    /// Creates a bare combat encounter.
    ///
    /// # Examples
    ///
    /// ```
    /// use delver::Encounter;
    ///
    /// let encounter = Encounter::new("goblin-ambush", 2);
    /// assert_eq!(encounter.level, 2);
    /// assert!(encounter.rewards.is_empty());
    /// ```
    pub fn new(id: impl Into<String>, level: Level) -> Self {
        Self {
            id: id.into(),
            level,
            difficulty: Difficulty::Medium,
            kind: "combat".to_string(),
            enemies: Vec::new(),
            rewards: Vec::new(),
            location: EncounterLocation::default(),
        }
    }

    pub fn with_enemy(mut self, name: impl Into<String>, count: u32) -> Self {
        self.enemies.push(Enemy {
            name: name.into(),
            count,
        });
        self
    }

    pub fn with_reward(mut self, reward: impl Into<String>) -> Self {
        self.rewards.push(reward.into());
        self
    }

    pub fn in_dungeon(mut self, dungeon_id: impl Into<String>) -> Self {
        self.location.dungeon = Some(dungeon_id.into());
        self
    }

    /// Total number of enemies across the roster.
    pub fn enemy_count(&self) -> u32 {
        self.enemies.iter().map(|enemy| enemy.count).sum()
    }
}

/// Read-only lookup of encounter pools.
///
/// Implementations hand out snapshots; the selector never writes back.
pub trait EncounterSource {
    /// Gets every encounter authored for a level.
    fn pool_for_level(&self, level: Level) -> Vec<Encounter>;

    /// Gets every encounter authored for a dungeon.
    fn pool_for_dungeon(&self, dungeon_id: &str) -> Vec<Encounter>;
}

/// In-memory encounter store bucketed by level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncounterCatalog {
    pools: BTreeMap<Level, Vec<Encounter>>,
}

impl EncounterCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from a flat list of encounters.
    pub fn from_encounters(encounters: impl IntoIterator<Item = Encounter>) -> Self {
        let mut catalog = Self::new();
        for encounter in encounters {
            catalog.insert(encounter);
        }
        catalog
    }

    /// Parses a catalog from a JSON array of encounters.
    pub fn from_json_str(json: &str) -> DelverResult<Self> {
        let encounters: Vec<Encounter> = serde_json::from_str(json)?;
        Ok(Self::from_encounters(encounters))
    }

    /// Loads a catalog from a JSON file holding an array of encounters.
    pub fn from_json_file(path: impl AsRef<Path>) -> DelverResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&text)?;
        log::info!(
            "Loaded {} encounters across {} levels from {}",
            catalog.len(),
            catalog.pools.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn insert(&mut self, encounter: Encounter) {
        self.pools.entry(encounter.level).or_default().push(encounter);
    }

    /// Total number of encounters in the catalog.
    pub fn len(&self) -> usize {
        self.pools.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.values().all(Vec::is_empty)
    }

    /// Gets the level-keyed pools.
    pub fn level_pools(&self) -> &BTreeMap<Level, Vec<Encounter>> {
        &self.pools
    }
}

impl EncounterSource for EncounterCatalog {
    fn pool_for_level(&self, level: Level) -> Vec<Encounter> {
        self.pools.get(&level).cloned().unwrap_or_default()
    }

    fn pool_for_dungeon(&self, dungeon_id: &str) -> Vec<Encounter> {
        self.pools
            .values()
            .flatten()
            .filter(|encounter| encounter.location.dungeon.as_deref() == Some(dungeon_id))
            .cloned()
            .collect()
    }
}

/// Which pool a dungeon's content is drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncounterQuery {
    Level(Level),
    Dungeon(String),
}

impl EncounterQuery {
    /// Fetches the matching pool from a source.
    pub fn fetch(&self, source: &impl EncounterSource) -> Vec<Encounter> {
        match self {
            EncounterQuery::Level(level) => source.pool_for_level(*level),
            EncounterQuery::Dungeon(id) => source.pool_for_dungeon(id),
        }
    }
}

/// Drops encounters whose id already appeared earlier in the pool.
fn unique_by_id(pool: &[Encounter]) -> Vec<&Encounter> {
    let mut seen = HashSet::new();
    pool.iter()
        .filter(|encounter| seen.insert(encounter.id.as_str()))
        .collect()
}

/// Selects exactly `count` distinct encounters, or all of them if the pool
/// is smaller.
///
/// The pool is shuffled uniformly and its first `count` entries are kept.
pub fn select_exact<R: Rng + ?Sized>(
    pool: &[Encounter],
    count: usize,
    rng: &mut R,
) -> Vec<Encounter> {
    let mut candidates = unique_by_id(pool);
    candidates.shuffle(rng);
    candidates.truncate(count);
    candidates.into_iter().cloned().collect()
}

/// Selects between `min_count` and `max_count` distinct encounters.
///
/// The target count is drawn uniformly from `[min_count, max_count]` and
/// then clamped to the pool size. Swapped bounds are accepted.
///
/// # Examples
///
/// ```
/// use delver::{select_encounters, Encounter};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let pool = vec![Encounter::new("a", 1), Encounter::new("b", 1), Encounter::new("c", 1)];
/// let mut rng = StdRng::seed_from_u64(1);
///
/// let picked = select_encounters(&pool, 2, 2, &mut rng);
/// assert_eq!(picked.len(), 2);
/// assert!(select_encounters(&[], 1, 5, &mut rng).is_empty());
/// ```
pub fn select_encounters<R: Rng + ?Sized>(
    pool: &[Encounter],
    min_count: usize,
    max_count: usize,
    rng: &mut R,
) -> Vec<Encounter> {
    let (low, high) = if min_count <= max_count {
        (min_count, max_count)
    } else {
        (max_count, min_count)
    };
    let count = rng.gen_range(low..=high);
    select_exact(pool, count, rng)
}

/// Selects with the default bounds of one to five encounters.
pub fn select_default<R: Rng + ?Sized>(pool: &[Encounter], rng: &mut R) -> Vec<Encounter> {
    select_encounters(
        pool,
        config::DEFAULT_MIN_ENCOUNTERS,
        config::DEFAULT_MAX_ENCOUNTERS,
        rng,
    )
}

/// Selects `count` encounters from the pool for `level`.
///
/// A level with no pool yields an empty selection.
pub fn select_encounters_for_level<R: Rng + ?Sized>(
    level_pools: &BTreeMap<Level, Vec<Encounter>>,
    level: Level,
    count: usize,
    rng: &mut R,
) -> Vec<Encounter> {
    match level_pools.get(&level) {
        Some(pool) => select_exact(pool, count, rng),
        None => {
            log::debug!("No encounter pool for level {}", level);
            Vec::new()
        }
    }
}
