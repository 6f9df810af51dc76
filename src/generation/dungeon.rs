//! # Dungeon Assembly
//!
//! Joins a generated floor plan with encounter content.
//!
//! The layout is generated first and never consulted by the selector except
//! for the list of rooms to fill. Each eligible room then receives a
//! selection from the encounter pool named by an [`EncounterQuery`], along
//! with the treasure those encounters reward.

use super::{
    select_encounters, utils, ContentScope, Encounter, EncounterQuery, EncounterSource,
    GenerationConfig, Generator, HubLayoutGenerator, Layout, SizeTier, Theme, TreasureHoard,
};
use crate::{DelverError, DelverResult};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Encounters and treasure attached to one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomContents {
    pub room_id: String,
    pub encounters: Vec<Encounter>,
    pub treasure: TreasureHoard,
}

impl RoomContents {
    fn new(room_id: &str, encounters: Vec<Encounter>) -> Self {
        let treasure = TreasureHoard::from_encounters(&encounters);
        Self {
            room_id: room_id.to_string(),
            encounters,
            treasure,
        }
    }
}

/// A complete generated dungeon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dungeon {
    /// Identifier derived from the seed
    pub id: Uuid,
    pub seed: u64,
    pub theme: Theme,
    pub size: SizeTier,
    pub layout: Layout,
    /// One entry per room, in room order
    pub contents: Vec<RoomContents>,
}

impl Dungeon {
    /// Gets the contents of a room.
    pub fn contents_for(&self, room_id: &str) -> Option<&RoomContents> {
        self.contents.iter().find(|contents| contents.room_id == room_id)
    }

    /// Number of encounters placed across all rooms.
    pub fn total_encounters(&self) -> usize {
        self.contents.iter().map(|c| c.encounters.len()).sum()
    }
}

/// Generates a layout and fills it from an encounter source.
#[derive(Debug, Clone)]
pub struct DungeonGenerator<S> {
    /// Floor plan generator
    pub layout: HubLayoutGenerator,
    /// Where encounter pools come from
    pub source: S,
    /// Which pool to draw from
    pub query: EncounterQuery,
}

impl<S: EncounterSource> DungeonGenerator<S> {
    /// Creates a dungeon generator with the built-in themes.
    pub fn new(source: S, query: EncounterQuery) -> Self {
        Self {
            layout: HubLayoutGenerator::new(),
            source,
            query,
        }
    }

    /// Picks encounters for each eligible room.
    fn populate(
        &self,
        layout: &Layout,
        pool: &[Encounter],
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> Vec<RoomContents> {
        let content = &config.content;
        let eligible: Vec<bool> = layout
            .rooms
            .iter()
            .map(|room| content.include_hub || !room.is_hub())
            .collect();
        let eligible_count = eligible.iter().filter(|&&e| e).count();

        let mut picks: Vec<Vec<Encounter>> = vec![Vec::new(); layout.rooms.len()];

        match content.scope {
            ContentScope::PerRoom => {
                for (index, slot) in picks.iter_mut().enumerate() {
                    if eligible[index] {
                        *slot = select_encounters(
                            pool,
                            content.min_per_room,
                            content.max_per_room,
                            rng,
                        );
                    }
                }
            }
            ContentScope::PerDungeon => {
                let selection = select_encounters(
                    pool,
                    content.min_per_room.saturating_mul(eligible_count),
                    content.max_per_room.saturating_mul(eligible_count),
                    rng,
                );
                let targets: Vec<usize> = eligible
                    .iter()
                    .enumerate()
                    .filter_map(|(index, &e)| e.then_some(index))
                    .collect();
                if !targets.is_empty() {
                    for (n, encounter) in selection.into_iter().enumerate() {
                        picks[targets[n % targets.len()]].push(encounter);
                    }
                }
            }
        }

        layout
            .rooms
            .iter()
            .zip(picks)
            .map(|(room, encounters)| RoomContents::new(&room.id, encounters))
            .collect()
    }
}

impl<S: EncounterSource> Generator<Dungeon> for DungeonGenerator<S> {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> DelverResult<Dungeon> {
        let layout = self.layout.generate(config, rng)?;
        let id = uuid::Builder::from_random_bytes(rng.gen()).into_uuid();

        let pool = self.query.fetch(&self.source);
        if pool.is_empty() {
            log::warn!("Encounter pool for {:?} is empty; rooms stay empty", self.query);
        }

        let contents = self.populate(&layout, &pool, config, rng);
        let dungeon = Dungeon {
            id,
            seed: config.seed,
            theme: config.theme.clone(),
            size: config.size,
            layout,
            contents,
        };
        self.validate(&dungeon, config)?;

        log::info!(
            "Generated dungeon {} with {} encounters in {} rooms",
            dungeon.id,
            dungeon.total_encounters(),
            dungeon.layout.rooms.len()
        );

        Ok(dungeon)
    }

    fn validate(&self, dungeon: &Dungeon, config: &GenerationConfig) -> DelverResult<()> {
        self.layout.validate(&dungeon.layout, config)?;

        if dungeon.contents.len() != dungeon.layout.rooms.len() {
            return Err(DelverError::GenerationFailed(format!(
                "{} content entries for {} rooms",
                dungeon.contents.len(),
                dungeon.layout.rooms.len()
            )));
        }

        let mut dungeon_ids = HashSet::new();
        for (room, contents) in dungeon.layout.rooms.iter().zip(&dungeon.contents) {
            if room.id != contents.room_id {
                return Err(DelverError::GenerationFailed(format!(
                    "contents for {} listed under {}",
                    contents.room_id, room.id
                )));
            }

            if room.is_hub() && !config.content.include_hub && !contents.encounters.is_empty() {
                return Err(DelverError::GenerationFailed(
                    "hub received encounters".to_string(),
                ));
            }

            let mut room_ids = HashSet::new();
            for encounter in &contents.encounters {
                if !room_ids.insert(encounter.id.as_str()) {
                    return Err(DelverError::GenerationFailed(format!(
                        "encounter {} repeated in {}",
                        encounter.id, room.id
                    )));
                }
                if config.content.scope == ContentScope::PerDungeon
                    && !dungeon_ids.insert(encounter.id.as_str())
                {
                    return Err(DelverError::GenerationFailed(format!(
                        "encounter {} repeated across rooms",
                        encounter.id
                    )));
                }
            }
        }

        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "DungeonGenerator"
    }
}

/// Generates a dungeon with an RNG seeded from `config.seed`.
pub fn generate_dungeon<S: EncounterSource>(
    config: &GenerationConfig,
    source: S,
    query: EncounterQuery,
) -> DelverResult<Dungeon> {
    let generator = DungeonGenerator::new(source, query);
    let mut rng = utils::create_rng(config);
    generator.generate(config, &mut rng)
}
