//! # Generation Module
//!
//! Procedural dungeon generation: the hub-and-wing layout generator, the
//! encounter content selector, and the assembly step that joins them.
//!
//! Layout and content are independent. The layout generator never looks at
//! encounter data and the selector never looks at geometry; the
//! [`DungeonGenerator`] is the only place where the two meet.

pub mod dungeon;
pub mod encounters;
pub mod layout;
pub mod themes;
pub mod treasure;

pub use dungeon::*;
pub use encounters::*;
pub use layout::*;
pub use themes::*;
pub use treasure::*;

use crate::config;
use crate::utils::{Position, Rect};
use crate::{DelverError, DelverResult};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Largest canvas or grid extent. Slot offsets reach nine cells from the
/// center, so this keeps all layout arithmetic inside `i32`.
const MAX_EXTENT: u32 = i32::MAX as u32 / 16;

/// Requested dungeon size.
///
/// The tier only sets a target; the final room count may be lower when the
/// canvas cannot hold every candidate slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeTier {
    Small,
    #[default]
    Medium,
    Large,
}

impl SizeTier {
    /// Target room count for this tier, hub included.
    ///
    /// # Examples
    ///
    /// ```
    /// use delver::SizeTier;
    ///
    /// assert_eq!(SizeTier::Small.target_room_count(), 5);
    /// assert_eq!(SizeTier::Medium.target_room_count(), 8);
    /// assert_eq!(SizeTier::Large.target_room_count(), 12);
    /// ```
    pub fn target_room_count(self) -> usize {
        match self {
            SizeTier::Small => 5,
            SizeTier::Medium => 8,
            SizeTier::Large => 12,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SizeTier::Small => "small",
            SizeTier::Medium => "medium",
            SizeTier::Large => "large",
        }
    }
}

impl fmt::Display for SizeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SizeTier {
    type Err = DelverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "small" => Ok(SizeTier::Small),
            "medium" => Ok(SizeTier::Medium),
            "large" => Ok(SizeTier::Large),
            other => Err(DelverError::InvalidConfig(format!(
                "unknown size tier '{other}' (expected small, medium or large)"
            ))),
        }
    }
}

/// How encounters are attached to a generated floor plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentScope {
    /// Every eligible room draws its own selection from the pool
    #[default]
    PerRoom,
    /// One selection is made for the whole dungeon and dealt out to rooms,
    /// so no encounter appears twice
    PerDungeon,
}

/// Settings for the content selection step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Minimum encounters per eligible room
    pub min_per_room: usize,
    /// Maximum encounters per eligible room
    pub max_per_room: usize,
    /// Per-room or per-dungeon selection
    pub scope: ContentScope,
    /// Whether the hub room receives encounters too
    pub include_hub: bool,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            min_per_room: config::DEFAULT_MIN_ENCOUNTERS,
            max_per_room: config::DEFAULT_MAX_ENCOUNTERS,
            scope: ContentScope::PerRoom,
            include_hub: false,
        }
    }
}

/// Configuration for a generation call.
///
/// All randomness flows from `seed`; two calls with equal configurations
/// produce identical output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Canvas width in canvas units
    pub canvas_width: u32,
    /// Canvas height in canvas units
    pub canvas_height: u32,
    /// Edge length of one grid cell in canvas units
    pub grid_size: u32,
    /// Requested dungeon size
    pub size: SizeTier,
    /// Narrative theme for names, descriptions and features
    pub theme: Theme,
    /// Encounter selection settings
    pub content: ContentConfig,
}

impl GenerationConfig {
    /// Creates a default generation configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use delver::{GenerationConfig, SizeTier};
    ///
    /// let config = GenerationConfig::new(7);
    /// assert_eq!(config.seed, 7);
    /// assert_eq!(config.size, SizeTier::Medium);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            canvas_width: config::DEFAULT_CANVAS_WIDTH,
            canvas_height: config::DEFAULT_CANVAS_HEIGHT,
            grid_size: config::DEFAULT_GRID_SIZE,
            size: SizeTier::Medium,
            theme: Theme::Dungeon,
            content: ContentConfig::default(),
        }
    }

    /// Creates a configuration for testing with small dungeons and light content.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            size: SizeTier::Small,
            content: ContentConfig {
                min_per_room: 1,
                max_per_room: 2,
                ..ContentConfig::default()
            },
            ..Self::new(seed)
        }
    }

    pub fn with_canvas(mut self, width: u32, height: u32) -> Self {
        self.canvas_width = width;
        self.canvas_height = height;
        self
    }

    pub fn with_size(mut self, size: SizeTier) -> Self {
        self.size = size;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_grid_size(mut self, grid_size: u32) -> Self {
        self.grid_size = grid_size;
        self
    }

    pub fn with_content(mut self, content: ContentConfig) -> Self {
        self.content = content;
        self
    }

    /// Loads a configuration from a JSON file.
    ///
    /// Missing fields take their default values.
    pub fn from_json_file(path: impl AsRef<Path>) -> DelverResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        Ok(config)
    }

    /// Gets the canvas as a rectangle anchored at the origin.
    pub fn canvas(&self) -> Rect {
        Rect::new(0, 0, self.canvas_width as i32, self.canvas_height as i32)
    }

    /// Checks the preconditions a layout needs.
    ///
    /// A canvas that cannot hold the hub room is rejected. A canvas that
    /// holds the hub but few or no peripheral rooms is accepted; the
    /// generator degrades to fewer rooms in that case.
    pub fn validate(&self) -> DelverResult<()> {
        if self.grid_size == 0 || self.grid_size > MAX_EXTENT {
            return Err(DelverError::InvalidConfig(format!(
                "grid size must be between 1 and {MAX_EXTENT}, got {}",
                self.grid_size
            )));
        }

        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(DelverError::InvalidCanvas(format!(
                "canvas must have positive dimensions, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }

        if self.canvas_width > MAX_EXTENT || self.canvas_height > MAX_EXTENT {
            return Err(DelverError::InvalidCanvas(format!(
                "canvas {}x{} exceeds the {MAX_EXTENT} unit limit",
                self.canvas_width, self.canvas_height
            )));
        }

        let hub_extent = config::HUB_CELLS
            .checked_mul(self.grid_size)
            .filter(|&extent| extent <= MAX_EXTENT)
            .ok_or_else(|| {
                DelverError::InvalidConfig(format!(
                    "grid size {} makes the hub room too large",
                    self.grid_size
                ))
            })?;
        if self.canvas_width < hub_extent || self.canvas_height < hub_extent {
            return Err(DelverError::InvalidCanvas(format!(
                "canvas {}x{} cannot hold the {}x{} hub room",
                self.canvas_width, self.canvas_height, hub_extent, hub_extent
            )));
        }

        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// One of the four placement zones around the hub.
///
/// Wings only exist during generation; they decide door flags and how the
/// corridor to the hub is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Wing {
    North,
    South,
    East,
    West,
}

impl Wing {
    /// Gets the opposite wing.
    pub fn opposite(self) -> Wing {
        match self {
            Wing::North => Wing::South,
            Wing::South => Wing::North,
            Wing::East => Wing::West,
            Wing::West => Wing::East,
        }
    }

    /// All wings in a fixed order.
    pub fn all() -> [Wing; 4] {
        [Wing::North, Wing::South, Wing::East, Wing::West]
    }
}

/// Which walls of a room have an opening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Doors {
    pub north: bool,
    pub south: bool,
    pub east: bool,
    pub west: bool,
}

impl Doors {
    /// Opens the door on the given side.
    pub fn open(&mut self, side: Wing) {
        match side {
            Wing::North => self.north = true,
            Wing::South => self.south = true,
            Wing::East => self.east = true,
            Wing::West => self.west = true,
        }
    }

    /// Checks whether the given side has a door.
    pub fn is_open(&self, side: Wing) -> bool {
        match side {
            Wing::North => self.north,
            Wing::South => self.south,
            Wing::East => self.east,
            Wing::West => self.west,
        }
    }

    /// Number of sides with a door.
    pub fn count(&self) -> usize {
        Wing::all()
            .into_iter()
            .filter(|&side| self.is_open(side))
            .count()
    }
}

/// A rectangular room in the floor plan.
///
/// Bounds are in canvas units and always lie on grid lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Stable identifier, `room-{index}`; the hub is `room-0`
    pub id: String,
    /// Bounding box in canvas units
    pub bounds: Rect,
    /// Display name assigned by the naming pass
    pub name: String,
    /// Flavor description assigned by the theming pass
    pub description: String,
    /// Flavor features assigned by the theming pass
    pub features: Vec<String>,
    /// Door flags per wall
    pub doors: Doors,
}

impl Room {
    /// Creates an undressed room at the given creation index.
    ///
    /// # Examples
    ///
    /// ```
    /// use delver::{Rect, Room};
    ///
    /// let room = Room::new(0, Rect::new(330, 240, 120, 120));
    /// assert_eq!(room.id, "room-0");
    /// assert!(room.is_hub());
    /// assert_eq!(room.doors.count(), 0);
    /// ```
    pub fn new(index: usize, bounds: Rect) -> Self {
        Self {
            id: format!("room-{index}"),
            bounds,
            name: String::new(),
            description: String::new(),
            features: Vec::new(),
            doors: Doors::default(),
        }
    }

    /// Checks whether this is the hub room.
    pub fn is_hub(&self) -> bool {
        self.id == "room-0"
    }

    /// Gets the center of the room.
    pub fn center(&self) -> Position {
        self.bounds.center()
    }

    /// Gets the midpoint of the wall on the given side.
    pub fn door_point(&self, side: Wing) -> Position {
        let b = &self.bounds;
        let center = b.center();
        match side {
            Wing::North => Position::new(center.x, b.y),
            Wing::South => Position::new(center.x, b.bottom()),
            Wing::East => Position::new(b.right(), center.y),
            Wing::West => Position::new(b.x, center.y),
        }
    }
}

/// A straight, one-cell-wide corridor segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corridor {
    /// Identifier, `corridor-{n}` in emission order
    pub id: String,
    pub start: Position,
    pub end: Position,
    #[serde(rename = "isVertical")]
    pub is_vertical: bool,
}

impl Corridor {
    pub fn new(index: usize, start: Position, end: Position, is_vertical: bool) -> Self {
        Self {
            id: format!("corridor-{index}"),
            start,
            end,
            is_vertical,
        }
    }

    /// Length along the corridor's axis.
    pub fn length(&self) -> i32 {
        self.start.manhattan_distance(self.end) as i32
    }

    /// Gets the corridor as a rectangle one grid cell wide, centered on its axis.
    pub fn bounds(&self, grid_size: i32) -> Rect {
        let half = grid_size / 2;
        if self.is_vertical {
            let top = self.start.y.min(self.end.y);
            Rect::new(self.start.x - half, top, grid_size, self.length())
        } else {
            let left = self.start.x.min(self.end.x);
            Rect::new(left, self.start.y - half, self.length(), grid_size)
        }
    }
}

/// Trait for procedural generators.
///
/// Generators take every random decision from the supplied RNG, so the
/// same seed always yields the same content.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> DelverResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> DelverResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;
    use rand::SeedableRng;

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_config_creation() {
        let config = GenerationConfig::new(12345);
        assert_eq!(config.seed, 12345);
        assert_eq!(config.grid_size, 30);
        assert_eq!(config.canvas(), Rect::new(0, 0, 800, 600));
        assert!(config.content.min_per_room <= config.content.max_per_room);
    }

    #[test]
    fn test_config_validation() {
        assert!(GenerationConfig::new(1).validate().is_ok());
        assert!(GenerationConfig::new(1).with_canvas(120, 120).validate().is_ok());

        let zero = GenerationConfig::new(1).with_canvas(0, 600);
        assert!(matches!(zero.validate(), Err(DelverError::InvalidCanvas(_))));

        let tiny = GenerationConfig::new(1).with_canvas(119, 600);
        assert!(matches!(tiny.validate(), Err(DelverError::InvalidCanvas(_))));

        let no_grid = GenerationConfig::new(1).with_grid_size(0);
        assert!(matches!(no_grid.validate(), Err(DelverError::InvalidConfig(_))));
    }

    #[test]
    fn test_oversized_values_are_rejected() {
        let huge_hub = GenerationConfig::new(1)
            .with_grid_size(1_100_000_000)
            .with_canvas(i32::MAX as u32, i32::MAX as u32);
        assert!(matches!(huge_hub.validate(), Err(DelverError::InvalidConfig(_))));

        let huge_grid = GenerationConfig::new(1).with_grid_size(u32::MAX);
        assert!(matches!(huge_grid.validate(), Err(DelverError::InvalidConfig(_))));

        let wide = GenerationConfig::new(1).with_canvas(3_000_000_000, 600);
        assert!(matches!(wide.validate(), Err(DelverError::InvalidCanvas(_))));

        let tall = GenerationConfig::new(1).with_canvas(800, u32::MAX);
        assert!(matches!(tall.validate(), Err(DelverError::InvalidCanvas(_))));
    }

    #[test]
    fn test_config_json_defaults() {
        let config: GenerationConfig =
            serde_json::from_str(r#"{"seed": 9, "size": "large", "theme": "cave"}"#).unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.size, SizeTier::Large);
        assert_eq!(config.theme, Theme::Cave);
        assert_eq!(config.canvas_width, 800);
        assert_eq!(config.content, ContentConfig::default());
    }

    #[test]
    fn test_size_tier_parsing() {
        assert_eq!("Small".parse::<SizeTier>().unwrap(), SizeTier::Small);
        assert_eq!("large".parse::<SizeTier>().unwrap(), SizeTier::Large);
        assert!("huge".parse::<SizeTier>().is_err());
    }

    #[test]
    fn test_doors() {
        let mut doors = Doors::default();
        assert_eq!(doors.count(), 0);

        doors.open(Wing::North);
        doors.open(Wing::West);
        doors.open(Wing::North);
        assert!(doors.is_open(Wing::North));
        assert!(doors.is_open(Wing::West));
        assert!(!doors.is_open(Wing::South));
        assert_eq!(doors.count(), 2);
    }

    #[test]
    fn test_wing_opposites() {
        for wing in Wing::all() {
            assert_ne!(wing, wing.opposite());
            assert_eq!(wing.opposite().opposite(), wing);
        }
    }

    #[test]
    fn test_room_door_points() {
        let room = Room::new(3, Rect::new(90, 60, 90, 90));
        assert_eq!(room.id, "room-3");
        assert!(!room.is_hub());
        assert_eq!(room.door_point(Wing::North), Position::new(135, 60));
        assert_eq!(room.door_point(Wing::South), Position::new(135, 150));
        assert_eq!(room.door_point(Wing::East), Position::new(180, 105));
        assert_eq!(room.door_point(Wing::West), Position::new(90, 105));
    }

    #[test]
    fn test_corridor_bounds() {
        let vertical = Corridor::new(0, Position::new(105, 150), Position::new(105, 240), true);
        assert_eq!(vertical.length(), 90);
        assert_eq!(vertical.bounds(30), Rect::new(90, 150, 30, 90));

        let horizontal = Corridor::new(1, Position::new(390, 240), Position::new(105, 240), false);
        assert_eq!(horizontal.length(), 285);
        assert_eq!(horizontal.bounds(30), Rect::new(105, 225, 285, 30));
    }

    #[test]
    fn test_utils_rng_creation() {
        use rand::Rng;

        let config = GenerationConfig::new(12345);
        let mut a = utils::create_rng(&config);
        let mut b = utils::create_rng(&config);
        assert_eq!(a.gen::<u64>(), b.gen::<u64>());
    }
}
