//! # Delver
//!
//! Procedural dungeon floor plans for tabletop campaigns, with
//! level-appropriate encounter content.
//!
//! ## Architecture Overview
//!
//! Delver is built from two independent pieces and one step that joins them:
//!
//! - **Layout Generation**: a hub room at the canvas center with peripheral
//!   rooms in four wings, each joined to the hub by a corridor
//! - **Content Selection**: de-duplicated random subsets of pre-authored
//!   encounters drawn from level- or dungeon-keyed pools
//! - **Dungeon Assembly**: runs the layout, then attaches encounters and
//!   treasure to its rooms
//!
//! Every random decision is drawn from an injected, seeded RNG, so equal
//! configurations always produce equal dungeons.
//!
//! ## Example
//!
//! ```
//! use delver::{generate_dungeon, Encounter, EncounterCatalog, EncounterQuery, GenerationConfig, Theme};
//!
//! let catalog = EncounterCatalog::from_encounters(vec![
//!     Encounter::new("rat-swarm", 1).with_reward("5 cp"),
//!     Encounter::new("cave-bear", 1).with_reward("bear claw"),
//! ]);
//! let config = GenerationConfig::for_testing(42).with_theme(Theme::Cave);
//!
//! let dungeon = generate_dungeon(&config, catalog, EncounterQuery::Level(1)).unwrap();
//! assert!(dungeon.layout.rooms.len() >= 1);
//! ```

pub mod generation;
pub mod utils;

pub use generation::*;
pub use utils::*;

/// Core error type for Delver.
#[derive(thiserror::Error, Debug)]
pub enum DelverError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// The canvas cannot hold a layout
    #[error("Invalid canvas: {0}")]
    InvalidCanvas(String),

    /// A configuration value is out of range or unrecognized
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Generated content broke a layout or content invariant
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the Delver codebase.
pub type DelverResult<T> = Result<T, DelverError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generation constants.
pub mod config {
    /// Default edge length of a grid cell in canvas units
    pub const DEFAULT_GRID_SIZE: u32 = 30;

    /// Default canvas width in canvas units
    pub const DEFAULT_CANVAS_WIDTH: u32 = 800;

    /// Default canvas height in canvas units
    pub const DEFAULT_CANVAS_HEIGHT: u32 = 600;

    /// Edge length of the hub room in grid cells
    pub const HUB_CELLS: u32 = 4;

    /// Edge length of a peripheral room in grid cells
    pub const ROOM_CELLS: u32 = 3;

    /// Default lower bound on encounters per room
    pub const DEFAULT_MIN_ENCOUNTERS: usize = 1;

    /// Default upper bound on encounters per room
    pub const DEFAULT_MAX_ENCOUNTERS: usize = 5;
}
