//! # Theme Registry
//!
//! Narrative themes and the text pools used to dress generated rooms.
//!
//! A theme has no structural effect on a layout. It only selects which
//! names, descriptions and feature strings the theming and naming passes
//! draw from. Pools live in a [`ThemeRegistry`] so new themes can be added
//! at runtime without touching the layout algorithm.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Key of the pool used when a theme is not registered.
pub const FALLBACK_THEME_KEY: &str = "dungeon";

/// Narrative theme of a dungeon.
///
/// Unknown keys are preserved as [`Theme::Other`] rather than rejected; the
/// registry decides what to do with them.
///
/// # Examples
///
/// ```
/// use delver::Theme;
///
/// assert_eq!(Theme::from_key("Cave"), Theme::Cave);
/// assert_eq!(Theme::from_key("swamp"), Theme::Other("swamp".to_string()));
/// assert_eq!(Theme::Temple.key(), "temple");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Theme {
    Ruins,
    Temple,
    #[default]
    Dungeon,
    Cave,
    /// Any other key, e.g. a theme registered by the caller
    Other(String),
}

impl Theme {
    /// Parses a theme key, case-insensitively.
    pub fn from_key(key: &str) -> Self {
        let key = key.trim().to_lowercase();
        match key.as_str() {
            "ruins" => Theme::Ruins,
            "temple" => Theme::Temple,
            "dungeon" => Theme::Dungeon,
            "cave" => Theme::Cave,
            _ => Theme::Other(key),
        }
    }

    /// Gets the registry key for this theme.
    pub fn key(&self) -> &str {
        match self {
            Theme::Ruins => "ruins",
            Theme::Temple => "temple",
            Theme::Dungeon => "dungeon",
            Theme::Cave => "cave",
            Theme::Other(key) => key,
        }
    }

    /// The themes that ship with built-in pools.
    pub fn builtin() -> [Theme; 4] {
        [Theme::Ruins, Theme::Temple, Theme::Dungeon, Theme::Cave]
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Theme {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Theme::from_key(s))
    }
}

impl From<String> for Theme {
    fn from(key: String) -> Self {
        Theme::from_key(&key)
    }
}

impl From<Theme> for String {
    fn from(theme: Theme) -> Self {
        theme.key().to_string()
    }
}

/// Text pools for one theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemePool {
    /// Room descriptions; one is drawn per room
    pub descriptions: Vec<String>,
    /// Flavor features; one is drawn per room
    pub features: Vec<String>,
    /// Room names, shuffled and handed out in room-creation order
    pub names: Vec<String>,
}

impl ThemePool {
    /// Builds a pool from static string slices.
    pub fn from_static(descriptions: &[&str], features: &[&str], names: &[&str]) -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            descriptions: owned(descriptions),
            features: owned(features),
            names: owned(names),
        }
    }

    /// Checks that every list in the pool has at least one entry.
    pub fn is_complete(&self) -> bool {
        !self.descriptions.is_empty() && !self.features.is_empty() && !self.names.is_empty()
    }
}

/// Maps theme keys to their text pools.
///
/// The registry always holds a `dungeon` pool; it is the fallback for any
/// theme that has no pool of its own.
#[derive(Debug, Clone)]
pub struct ThemeRegistry {
    pools: HashMap<String, ThemePool>,
}

impl ThemeRegistry {
    /// Creates a registry populated with the built-in themes.
    pub fn new() -> Self {
        let mut pools = HashMap::new();
        pools.insert("ruins".to_string(), ruins_pool());
        pools.insert("temple".to_string(), temple_pool());
        pools.insert(FALLBACK_THEME_KEY.to_string(), dungeon_pool());
        pools.insert("cave".to_string(), cave_pool());
        Self { pools }
    }

    /// Adds or replaces the pool for a theme.
    pub fn register(&mut self, theme: &Theme, pool: ThemePool) {
        self.pools.insert(theme.key().to_string(), pool);
    }

    /// Checks whether a theme has its own pool.
    pub fn contains(&self, theme: &Theme) -> bool {
        self.pools.contains_key(theme.key())
    }

    /// Gets the pool for a theme, falling back to the `dungeon` pool.
    pub fn resolve(&self, theme: &Theme) -> &ThemePool {
        if let Some(pool) = self.pools.get(theme.key()) {
            return pool;
        }
        log::warn!(
            "No text pool registered for theme '{}', falling back to '{}'",
            theme,
            FALLBACK_THEME_KEY
        );
        &self.pools[FALLBACK_THEME_KEY]
    }

    /// Lists the registered theme keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.pools.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn ruins_pool() -> ThemePool {
    ThemePool::from_static(
        &[
            "Crumbling walls lean inward, held up by roots as thick as a man's arm.",
            "Faded frescoes of a forgotten court peel from the plaster.",
            "Rubble from a collapsed ceiling fills half the chamber.",
            "Broken columns lie where they fell centuries ago.",
            "Wind whistles through cracks in the ancient masonry.",
            "Moss carpets the flagstones, muffling every footstep.",
        ],
        &[
            "toppled statue",
            "cracked mosaic floor",
            "overgrown archway",
            "dry fountain",
            "scattered pottery shards",
            "half-buried stone tablet",
        ],
        &[
            "Fallen Hall",
            "Shattered Atrium",
            "Overgrown Court",
            "Collapsed Library",
            "Broken Gallery",
            "Forgotten Throne Room",
            "Weathered Barracks",
            "Sunken Garden",
        ],
    )
}

fn temple_pool() -> ThemePool {
    ThemePool::from_static(
        &[
            "Rows of stone pews face a defaced altar.",
            "Incense residue still clings to the blackened braziers.",
            "Carved saints watch from alcoves with chiselled-out eyes.",
            "A mosaic of the sun covers the floor, its gold tiles long pried away.",
            "Prayer ribbons hang motionless from the vaulted ceiling.",
            "The air is cool and smells faintly of myrrh.",
        ],
        &[
            "stained-glass window",
            "offering bowl",
            "reliquary niche",
            "ritual basin",
            "bell rope",
            "votive candles",
        ],
        &[
            "Sanctum",
            "Nave",
            "Reliquary",
            "Cloister",
            "Vestry",
            "Chapel of Dawn",
            "Hall of Vigils",
            "Ossuary",
        ],
    )
}

fn dungeon_pool() -> ThemePool {
    ThemePool::from_static(
        &[
            "Damp stone walls glisten in the torchlight.",
            "Rusted chains dangle from iron rings set in the wall.",
            "A foul smell rises from a grate in the floor.",
            "Scratch marks score the door frame at knee height.",
            "Straw and old bones are piled in one corner.",
            "Water drips steadily from the ceiling into a shallow pool.",
        ],
        &[
            "iron portcullis",
            "torch sconces",
            "drainage grate",
            "weapon rack",
            "manacles",
            "collapsed cell",
        ],
        &[
            "Guard Room",
            "Cell Block",
            "Torture Chamber",
            "Armory",
            "Storeroom",
            "Warden's Office",
            "Oubliette",
            "Great Hall",
        ],
    )
}

fn cave_pool() -> ThemePool {
    ThemePool::from_static(
        &[
            "Stalactites hang like teeth over a slick stone floor.",
            "Phosphorescent fungus casts a pale green glow.",
            "An underground stream gurgles somewhere in the dark.",
            "Veins of quartz catch and scatter any light.",
            "The passage narrows before opening into a wide grotto.",
            "Bats stir in the shadows of the high ceiling.",
        ],
        &[
            "glowing mushrooms",
            "stalagmite cluster",
            "underground pool",
            "crystal formation",
            "bat guano",
            "narrow fissure",
        ],
        &[
            "Crystal Cave",
            "Echoing Grotto",
            "Fungal Hollow",
            "Dripping Cavern",
            "Bat Roost",
            "Underground Lake",
            "Narrow Crawl",
            "Glowworm Gallery",
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_key_round_trip() {
        for theme in Theme::builtin() {
            assert_eq!(Theme::from_key(theme.key()), theme);
        }
        assert_eq!(Theme::from_key(" TEMPLE "), Theme::Temple);
        assert_eq!("ruins".parse::<Theme>().unwrap(), Theme::Ruins);
    }

    #[test]
    fn test_theme_serializes_as_key() {
        let json = serde_json::to_string(&Theme::Cave).unwrap();
        assert_eq!(json, "\"cave\"");

        let parsed: Theme = serde_json::from_str("\"volcano\"").unwrap();
        assert_eq!(parsed, Theme::Other("volcano".to_string()));
    }

    #[test]
    fn test_builtin_pools_are_complete() {
        let registry = ThemeRegistry::new();
        for theme in Theme::builtin() {
            assert!(registry.contains(&theme));
            assert!(registry.resolve(&theme).is_complete());
        }
        assert_eq!(registry.keys(), vec!["cave", "dungeon", "ruins", "temple"]);
    }

    #[test]
    fn test_cave_pool_has_crystal_cave() {
        let registry = ThemeRegistry::new();
        let pool = registry.resolve(&Theme::Cave);
        assert!(pool.names.iter().any(|name| name == "Crystal Cave"));
    }

    #[test]
    fn test_unknown_theme_falls_back_to_dungeon() {
        let registry = ThemeRegistry::new();
        let unknown = Theme::from_key("swamp");
        assert!(!registry.contains(&unknown));
        assert_eq!(
            registry.resolve(&unknown),
            registry.resolve(&Theme::Dungeon)
        );
    }

    #[test]
    fn test_register_custom_theme() {
        let mut registry = ThemeRegistry::new();
        let swamp = Theme::from_key("swamp");
        let pool = ThemePool::from_static(&["Knee-deep bog water."], &["rotting log"], &["Mire"]);
        registry.register(&swamp, pool.clone());

        assert!(registry.contains(&swamp));
        assert_eq!(registry.resolve(&swamp), &pool);
    }
}
