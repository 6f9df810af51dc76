//! Integration tests for hub-and-wing layout generation.

use delver::{
    create_rng, DelverError, GenerationConfig, Generator, HubLayoutGenerator, Layout, SizeTier,
    Theme, ThemeRegistry, Wing,
};

fn generate(config: &GenerationConfig) -> Result<Layout, DelverError> {
    let generator = HubLayoutGenerator::new();
    let mut rng = create_rng(config);
    generator.generate(config, &mut rng)
}

/// A small cave on the default canvas gets a cave-named hub and up to four
/// themed peripheral rooms.
#[test]
fn test_small_cave_on_default_canvas() {
    let registry = ThemeRegistry::new();
    let cave = registry.resolve(&Theme::Cave);

    for seed in 0..20 {
        let config = GenerationConfig::new(seed)
            .with_canvas(800, 600)
            .with_size(SizeTier::Small)
            .with_theme(Theme::Cave);
        let layout = generate(&config).expect("800x600 should always generate");

        assert!(layout.rooms.len() >= 1 && layout.rooms.len() <= 5);
        assert!(layout.corridors.len() <= 8);

        let hub = layout.hub().unwrap();
        assert!(cave.names.contains(&hub.name), "hub name {} not from cave pool", hub.name);

        for room in &layout.rooms {
            assert!(!room.description.is_empty());
            assert!(cave.descriptions.contains(&room.description));
            assert_eq!(room.features.len(), 1);
            assert!(cave.features.contains(&room.features[0]));
        }
    }
}

/// A canvas exactly the size of the hub holds the hub and nothing else.
#[test]
fn test_hub_sized_canvas_yields_only_hub() {
    let config = GenerationConfig::new(9).with_canvas(120, 120).with_size(SizeTier::Large);
    let layout = generate(&config).unwrap();

    assert_eq!(layout.rooms.len(), 1);
    assert!(layout.corridors.is_empty());
    assert!(layout.connections.is_empty());

    let hub = &layout.rooms[0];
    assert!(hub.is_hub());
    assert_eq!(hub.bounds.x, 0);
    assert_eq!(hub.bounds.right(), 120);
    assert_eq!(hub.doors.count(), 0);
}

/// A canvas smaller than the hub is a rejected precondition.
#[test]
fn test_canvas_smaller_than_hub_is_rejected() {
    for (width, height) in [(100, 100), (800, 90), (0, 0)] {
        let config = GenerationConfig::new(1).with_canvas(width, height);
        let result = generate(&config);
        assert!(
            matches!(result, Err(DelverError::InvalidCanvas(_))),
            "{}x{} should be rejected",
            width,
            height
        );
    }
}

/// A narrow canvas drops the wings that do not fit but keeps the rest.
#[test]
fn test_narrow_canvas_degrades_gracefully() {
    // Tall enough for north and south wings, too narrow for east and west.
    let config = GenerationConfig::new(77).with_canvas(330, 600).with_size(SizeTier::Large);
    let layout = generate(&config).unwrap();

    assert!(layout.rooms.len() < SizeTier::Large.target_room_count());
    for connection in &layout.connections {
        assert!(
            matches!(connection.wing, Wing::North | Wing::South),
            "{:?} should not fit on a narrow canvas",
            connection.wing
        );
    }
}

/// Every peripheral room has a single door facing the hub, and the hub has
/// the matching door.
#[test]
fn test_door_flags_face_the_hub() {
    let config = GenerationConfig::new(1234).with_size(SizeTier::Medium);
    let layout = generate(&config).unwrap();
    let hub = layout.hub().unwrap();

    for connection in &layout.connections {
        let room = layout.room(&connection.room_id).unwrap();
        assert_eq!(room.doors.count(), 1);
        assert!(room.doors.is_open(connection.wing.opposite()));
        assert!(hub.doors.is_open(connection.wing));
    }
}

/// Corridor segments cut from the same route share the elbow point.
#[test]
fn test_corridor_segments_meet_at_elbow() {
    let config = GenerationConfig::new(55).with_size(SizeTier::Large);
    let layout = generate(&config).unwrap();

    for connection in &layout.connections {
        let touching: Vec<_> = layout
            .corridors
            .iter()
            .filter(|c| c.start == connection.elbow || c.end == connection.elbow)
            .collect();
        // Slot geometry on the default canvas always produces L-shaped routes.
        assert_eq!(touching.len(), 2, "route for {} is not L-shaped", connection.room_id);
        assert_ne!(touching[0].is_vertical, touching[1].is_vertical);
    }
    assert_eq!(layout.corridors.len(), 2 * (layout.rooms.len() - 1));
}

/// Unknown themes borrow the dungeon pools.
#[test]
fn test_unknown_theme_uses_dungeon_text() {
    let registry = ThemeRegistry::new();
    let dungeon = registry.resolve(&Theme::Dungeon);

    let config = GenerationConfig::new(3).with_theme(Theme::from_key("volcano"));
    let layout = generate(&config).unwrap();

    for room in &layout.rooms {
        assert!(dungeon.descriptions.contains(&room.description));
    }
}

/// Names are unique until the pool runs out.
#[test]
fn test_room_names_are_unique() {
    let config = GenerationConfig::new(8).with_size(SizeTier::Large).with_theme(Theme::Ruins);
    let layout = generate(&config).unwrap();

    let mut names: Vec<_> = layout.rooms.iter().map(|r| r.name.clone()).collect();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), layout.rooms.len());
    // Nine rooms, eight ruin names.
    assert!(layout.rooms.iter().any(|r| r.name.starts_with("Chamber ")));
}

/// Different seeds eventually produce different wing choices.
#[test]
fn test_seeds_vary_layouts() {
    let first = generate(&GenerationConfig::new(0).with_size(SizeTier::Small)).unwrap();
    let varied = (1..50).any(|seed| {
        let other = generate(&GenerationConfig::new(seed).with_size(SizeTier::Small)).unwrap();
        other.connections != first.connections
    });
    assert!(varied);
}
