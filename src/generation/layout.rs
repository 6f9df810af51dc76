//! # Layout Generation
//!
//! Hub-and-wing floor plans.
//!
//! The generator places a 4×4 hub room at the center of the canvas and up to
//! eight 3×3 rooms in fixed candidate slots, two per wing. Every peripheral
//! room connects to the hub and nothing else, so the floor plan is a star.
//! The process is:
//! 1. Snap the canvas center to the grid and place the hub there
//! 2. Shuffle the candidate slots and take as many as the size tier asks for
//! 3. Drop slots that do not fit inside the canvas minus a one-cell margin
//! 4. Open a door pair and route an elbow corridor for each accepted room
//! 5. Dress rooms from the theme's text pools, then hand out names

use super::{Corridor, GenerationConfig, Generator, Room, ThemePool, ThemeRegistry, Wing};
use crate::config;
use crate::utils::{snap_to_grid, Position, Rect};
use crate::{DelverError, DelverResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A fixed placement slot for a peripheral room.
///
/// Offsets are in grid cells from the snapped canvas center to the room's
/// top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateSlot {
    pub wing: Wing,
    pub offset_x: i32,
    pub offset_y: i32,
}

impl CandidateSlot {
    const fn new(wing: Wing, offset_x: i32, offset_y: i32) -> Self {
        Self {
            wing,
            offset_x,
            offset_y,
        }
    }

    /// Gets the room rectangle this slot produces around `center`.
    pub fn bounds(&self, center: Position, grid_size: i32) -> Rect {
        let extent = config::ROOM_CELLS as i32 * grid_size;
        Rect::new(
            center.x + self.offset_x * grid_size,
            center.y + self.offset_y * grid_size,
            extent,
            extent,
        )
    }
}

/// The eight candidate slots.
///
/// North and south rooms sit further out than east and west ones so that a
/// north room never shares rows with an east or west room, and so on around
/// the hub. No two slots overlap each other or the hub.
pub const CANDIDATE_SLOTS: [CandidateSlot; 8] = [
    CandidateSlot::new(Wing::North, -5, -9),
    CandidateSlot::new(Wing::North, 2, -9),
    CandidateSlot::new(Wing::South, -5, 6),
    CandidateSlot::new(Wing::South, 2, 6),
    CandidateSlot::new(Wing::East, 4, -5),
    CandidateSlot::new(Wing::East, 4, 2),
    CandidateSlot::new(Wing::West, -7, -5),
    CandidateSlot::new(Wing::West, -7, 2),
];

/// Route from a peripheral room's door to the hub's door.
///
/// The route is a polyline with one explicit elbow. Corridor segments are
/// cut from it, so when both segments exist they meet at `elbow`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Peripheral room this route belongs to
    pub room_id: String,
    /// Wing the room was placed in
    pub wing: Wing,
    /// Door point on the peripheral room
    pub from: Position,
    /// Corner of the route
    pub elbow: Position,
    /// Door point on the hub
    pub to: Position,
}

/// A generated floor plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    /// Rooms in creation order; index 0 is the hub
    pub rooms: Vec<Room>,
    /// Corridor segments in emission order
    pub corridors: Vec<Corridor>,
    /// One route per peripheral room
    pub connections: Vec<Connection>,
}

impl Layout {
    /// Gets the hub room.
    pub fn hub(&self) -> Option<&Room> {
        self.rooms.first()
    }

    /// Iterates over every room except the hub.
    pub fn peripheral_rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter().skip(1)
    }

    /// Finds a room by id.
    pub fn room(&self, id: &str) -> Option<&Room> {
        self.rooms.iter().find(|room| room.id == id)
    }
}

/// Generator for hub-and-wing floor plans.
#[derive(Debug, Clone, Default)]
pub struct HubLayoutGenerator {
    /// Text pools used by the theming and naming passes
    pub themes: ThemeRegistry,
}

impl HubLayoutGenerator {
    /// Creates a layout generator with the built-in themes.
    ///
    /// # Examples
    ///
    /// ```
    /// use delver::{GenerationConfig, Generator, HubLayoutGenerator, utils};
    ///
    /// let generator = HubLayoutGenerator::new();
    /// let config = GenerationConfig::for_testing(7);
    /// let mut rng = utils::create_rng(&config);
    ///
    /// let layout = generator.generate(&config, &mut rng).unwrap();
    /// assert!(layout.hub().is_some());
    /// ```
    pub fn new() -> Self {
        Self {
            themes: ThemeRegistry::new(),
        }
    }

    /// Creates a layout generator that draws text from the given registry.
    pub fn with_themes(themes: ThemeRegistry) -> Self {
        Self { themes }
    }

    /// Places the hub room centered on the snapped canvas center.
    fn place_hub(&self, config: &GenerationConfig) -> Room {
        let grid = config.grid_size as i32;
        let canvas = config.canvas();
        let center = Self::snapped_center(&canvas, grid);
        let extent = config::HUB_CELLS as i32 * grid;

        Room::new(
            0,
            Rect::new(center.x - extent / 2, center.y - extent / 2, extent, extent),
        )
    }

    fn snapped_center(canvas: &Rect, grid: i32) -> Position {
        Position::new(
            snap_to_grid(canvas.width / 2, grid),
            snap_to_grid(canvas.height / 2, grid),
        )
    }

    /// Places peripheral rooms in shuffled candidate slots.
    fn place_rooms(
        &self,
        hub: &mut Room,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> Vec<(Room, Wing)> {
        let grid = config.grid_size as i32;
        let canvas = config.canvas();
        let center = Self::snapped_center(&canvas, grid);
        let usable = canvas.inset(grid);

        let mut slots = CANDIDATE_SLOTS;
        slots.shuffle(rng);

        let wanted = config.size.target_room_count().saturating_sub(1);
        let mut placed = Vec::new();

        for slot in slots.iter().take(wanted) {
            let bounds = slot.bounds(center, grid);
            if !usable.contains_rect(&bounds) {
                log::debug!(
                    "Skipping {:?} slot at ({}, {}): outside usable canvas",
                    slot.wing,
                    bounds.x,
                    bounds.y
                );
                continue;
            }

            let mut room = Room::new(placed.len() + 1, bounds);
            room.doors.open(slot.wing.opposite());
            hub.doors.open(slot.wing);
            log::debug!("Placed {} in {:?} wing", room.id, slot.wing);

            placed.push((room, slot.wing));
        }

        placed
    }

    /// Builds the route from a peripheral room to the hub.
    ///
    /// The hub's door is slid along its wall toward the room, staying half a
    /// cell clear of the corners. The elbow sits on the axis leaving the
    /// room: vertical first for north and south rooms, horizontal first for
    /// east and west ones.
    fn route(room: &Room, wing: Wing, hub: &Room, grid: i32) -> Connection {
        let from = room.door_point(wing.opposite());
        let hub_door = hub.door_point(wing);
        let half = grid / 2;
        let hb = &hub.bounds;

        let (to, elbow) = match wing {
            Wing::North | Wing::South => {
                let x = from.x.clamp(hb.x + half, hb.right() - half);
                let to = Position::new(x, hub_door.y);
                (to, Position::new(from.x, to.y))
            }
            Wing::East | Wing::West => {
                let y = from.y.clamp(hb.y + half, hb.bottom() - half);
                let to = Position::new(hub_door.x, y);
                (to, Position::new(to.x, from.y))
            }
        };

        Connection {
            room_id: room.id.clone(),
            wing,
            from,
            elbow,
            to,
        }
    }

    /// Cuts corridor segments from a route.
    ///
    /// A segment is emitted only when its gap exceeds one grid cell, giving
    /// two segments for an L-shaped route, one for a straight route and none
    /// for rooms that are directly adjacent.
    fn carve_corridors(connection: &Connection, grid: i32, corridors: &mut Vec<Corridor>) {
        let legs = [
            (connection.from, connection.elbow),
            (connection.elbow, connection.to),
        ];

        for (start, end) in legs {
            let is_vertical = start.x == end.x;
            let gap = if is_vertical {
                (end.y - start.y).abs()
            } else {
                (end.x - start.x).abs()
            };

            if gap > grid {
                corridors.push(Corridor::new(corridors.len(), start, end, is_vertical));
            }
        }
    }

    /// Draws one description and one feature per room from the theme's pool.
    fn apply_theme(rooms: &mut [Room], pool: &ThemePool, rng: &mut StdRng) {
        for room in rooms.iter_mut() {
            room.description = pool.descriptions.choose(rng).cloned().unwrap_or_default();
            room.features = pool.features.choose(rng).cloned().into_iter().collect();
        }
    }

    /// Shuffles the theme's names and hands them out in creation order.
    ///
    /// Rooms beyond the pool's size are called `Chamber {n}`, where `n` is
    /// the room's 1-based creation position.
    fn assign_names(rooms: &mut [Room], pool: &ThemePool, rng: &mut StdRng) {
        let mut names = pool.names.clone();
        names.shuffle(rng);

        for (index, room) in rooms.iter_mut().enumerate() {
            room.name = names
                .get(index)
                .filter(|name| !name.is_empty())
                .cloned()
                .unwrap_or_else(|| format!("Chamber {}", index + 1));
        }
    }
}

impl Generator<Layout> for HubLayoutGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> DelverResult<Layout> {
        config.validate()?;
        let grid = config.grid_size as i32;

        let mut hub = self.place_hub(config);
        let placed = self.place_rooms(&mut hub, config, rng);

        let mut corridors = Vec::new();
        let mut connections = Vec::with_capacity(placed.len());
        for (room, wing) in &placed {
            let connection = Self::route(room, *wing, &hub, grid);
            Self::carve_corridors(&connection, grid, &mut corridors);
            connections.push(connection);
        }

        let mut rooms = Vec::with_capacity(placed.len() + 1);
        rooms.push(hub);
        rooms.extend(placed.into_iter().map(|(room, _)| room));

        let pool = self.themes.resolve(&config.theme);
        Self::apply_theme(&mut rooms, pool, rng);
        Self::assign_names(&mut rooms, pool, rng);

        let reachable = config.size.target_room_count().min(CANDIDATE_SLOTS.len() + 1);
        if rooms.len() < reachable {
            log::warn!(
                "Placed {} of {} rooms for a {} dungeon on a {}x{} canvas",
                rooms.len(),
                reachable,
                config.size,
                config.canvas_width,
                config.canvas_height
            );
        }

        let layout = Layout {
            rooms,
            corridors,
            connections,
        };
        self.validate(&layout, config)?;

        log::info!(
            "Generated {} layout: {} rooms, {} corridors (seed {})",
            config.theme,
            layout.rooms.len(),
            layout.corridors.len(),
            config.seed
        );

        Ok(layout)
    }

    fn validate(&self, layout: &Layout, config: &GenerationConfig) -> DelverResult<()> {
        let fail = |msg: String| Err(DelverError::GenerationFailed(msg));
        let canvas = config.canvas();
        let usable = canvas.inset(config.grid_size as i32);

        let Some(hub) = layout.hub() else {
            return fail("layout has no hub room".to_string());
        };
        if !hub.is_hub() || !canvas.contains_rect(&hub.bounds) {
            return fail(format!("hub {} is missing or outside the canvas", hub.id));
        }

        if layout.rooms.len() > config.size.target_room_count() {
            return fail(format!(
                "{} rooms exceed the {} target",
                layout.rooms.len(),
                config.size
            ));
        }

        let mut seen = HashSet::new();
        for room in &layout.rooms {
            if !seen.insert(room.id.as_str()) {
                return fail(format!("duplicate room id {}", room.id));
            }
            if room.name.is_empty() {
                return fail(format!("{} has no name", room.id));
            }
        }

        for room in layout.peripheral_rooms() {
            if !usable.contains_rect(&room.bounds) {
                return fail(format!("{} lies outside the usable canvas", room.id));
            }
            if room.doors.count() != 1 {
                return fail(format!("{} must have exactly one door", room.id));
            }
            if layout
                .rooms
                .iter()
                .any(|other| other.id != room.id && other.bounds.overlaps(&room.bounds))
            {
                return fail(format!("{} overlaps another room", room.id));
            }

            let Some(connection) = layout.connections.iter().find(|c| c.room_id == room.id) else {
                return fail(format!("{} is not connected to the hub", room.id));
            };
            if !room.doors.is_open(connection.wing.opposite()) || !hub.doors.is_open(connection.wing)
            {
                return fail(format!("door flags of {} do not face the hub", room.id));
            }
        }

        if layout.connections.len() != layout.rooms.len() - 1 {
            return fail(format!(
                "{} connections for {} peripheral rooms",
                layout.connections.len(),
                layout.rooms.len() - 1
            ));
        }

        if layout.corridors.len() > 2 * (layout.rooms.len() - 1) {
            return fail(format!(
                "{} corridors for {} rooms",
                layout.corridors.len(),
                layout.rooms.len()
            ));
        }

        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "HubLayoutGenerator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::utils;
    use crate::{SizeTier, Theme};

    fn generate(config: &GenerationConfig) -> Layout {
        let generator = HubLayoutGenerator::new();
        let mut rng = utils::create_rng(config);
        generator.generate(config, &mut rng).unwrap()
    }

    #[test]
    fn test_candidate_slots_are_disjoint() {
        let center = Position::new(390, 300);
        let grid = 30;
        let hub = Rect::new(330, 240, 120, 120);

        for (i, a) in CANDIDATE_SLOTS.iter().enumerate() {
            let a_bounds = a.bounds(center, grid);
            assert!(!a_bounds.overlaps(&hub), "{:?} overlaps the hub", a);
            for b in CANDIDATE_SLOTS.iter().skip(i + 1) {
                assert!(!a_bounds.overlaps(&b.bounds(center, grid)), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_two_slots_per_wing() {
        for wing in Wing::all() {
            let count = CANDIDATE_SLOTS.iter().filter(|slot| slot.wing == wing).count();
            assert_eq!(count, 2);
        }
    }

    #[test]
    fn test_hub_is_centered() {
        let generator = HubLayoutGenerator::new();
        let config = GenerationConfig::new(1);
        let hub = generator.place_hub(&config);

        assert_eq!(hub.bounds, Rect::new(330, 240, 120, 120));
        assert!(hub.is_hub());
    }

    #[test]
    fn test_default_canvas_fits_every_slot() {
        let config = GenerationConfig::new(5).with_size(SizeTier::Large);
        let layout = generate(&config);

        assert_eq!(layout.rooms.len(), 9);
        assert_eq!(layout.connections.len(), 8);
        assert_eq!(layout.hub().unwrap().doors.count(), 4);
    }

    #[test]
    fn test_small_tier_places_four_rooms() {
        let config = GenerationConfig::new(11).with_size(SizeTier::Small);
        let layout = generate(&config);
        assert_eq!(layout.rooms.len(), 5);
    }

    #[test]
    fn test_route_for_north_room() {
        let hub = Room::new(0, Rect::new(330, 240, 120, 120));
        let room = Room::new(1, CANDIDATE_SLOTS[0].bounds(Position::new(390, 300), 30));
        assert_eq!(room.bounds, Rect::new(240, 30, 90, 90));

        let connection = HubLayoutGenerator::route(&room, Wing::North, &hub, 30);
        assert_eq!(connection.from, Position::new(285, 120));
        assert_eq!(connection.to, Position::new(345, 240));
        assert_eq!(connection.elbow, Position::new(285, 240));

        let mut corridors = Vec::new();
        HubLayoutGenerator::carve_corridors(&connection, 30, &mut corridors);
        assert_eq!(corridors.len(), 2);
        assert!(corridors[0].is_vertical);
        assert!(!corridors[1].is_vertical);
        assert_eq!(corridors[0].end, corridors[1].start);
        assert_eq!(corridors[1].id, "corridor-1");
    }

    #[test]
    fn test_route_for_east_room() {
        let hub = Room::new(0, Rect::new(330, 240, 120, 120));
        let room = Room::new(1, CANDIDATE_SLOTS[5].bounds(Position::new(390, 300), 30));
        assert_eq!(room.bounds, Rect::new(510, 360, 90, 90));

        let connection = HubLayoutGenerator::route(&room, Wing::East, &hub, 30);
        assert_eq!(connection.from, Position::new(510, 405));
        assert_eq!(connection.to, Position::new(450, 345));
        assert_eq!(connection.elbow, Position::new(450, 405));

        let mut corridors = Vec::new();
        HubLayoutGenerator::carve_corridors(&connection, 30, &mut corridors);
        assert_eq!(corridors.len(), 2);
        assert!(!corridors[0].is_vertical);
        assert!(corridors[1].is_vertical);
    }

    #[test]
    fn test_adjacent_rooms_get_no_corridor() {
        let connection = Connection {
            room_id: "room-1".to_string(),
            wing: Wing::North,
            from: Position::new(100, 100),
            elbow: Position::new(100, 130),
            to: Position::new(120, 130),
        };

        let mut corridors = Vec::new();
        HubLayoutGenerator::carve_corridors(&connection, 30, &mut corridors);
        assert!(corridors.is_empty());
    }

    #[test]
    fn test_naming_overflow_uses_chamber_labels() {
        let mut themes = ThemeRegistry::new();
        let tiny = Theme::from_key("closet");
        themes.register(
            &tiny,
            crate::ThemePool::from_static(&["Cramped."], &["mop"], &["Broom Closet"]),
        );
        let generator = HubLayoutGenerator::with_themes(themes);
        let config = GenerationConfig::new(3).with_size(SizeTier::Small).with_theme(tiny);
        let mut rng = utils::create_rng(&config);

        let layout = generator.generate(&config, &mut rng).unwrap();
        assert_eq!(layout.rooms[0].name, "Broom Closet");
        for (index, room) in layout.rooms.iter().enumerate().skip(1) {
            assert_eq!(room.name, format!("Chamber {}", index + 1));
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let config = GenerationConfig::new(777).with_theme(Theme::Temple);
        assert_eq!(generate(&config), generate(&config));
    }

    #[test]
    fn test_validation_rejects_broken_layout() {
        let generator = HubLayoutGenerator::new();
        let config = GenerationConfig::new(8);
        let mut layout = generate(&config);
        assert!(generator.validate(&layout, &config).is_ok());

        layout.rooms[1].doors.open(Wing::East);
        layout.rooms[1].doors.open(Wing::West);
        assert!(generator.validate(&layout, &config).is_err());

        let empty = Layout {
            rooms: Vec::new(),
            corridors: Vec::new(),
            connections: Vec::new(),
        };
        assert!(generator.validate(&empty, &config).is_err());
    }

    #[test]
    fn test_generator_type() {
        assert_eq!(HubLayoutGenerator::new().generator_type(), "HubLayoutGenerator");
    }
}
