//! Paint colors, the category registry and the POI vocabulary.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifier of a paint color, normalized to lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ColorKey(String);

impl ColorKey {
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(key.as_ref().trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ColorKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl fmt::Display for ColorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ColorKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(s))
    }
}

pub const WALKWAY_COLOR: &str = "#16a34a";
pub const POI_COLOR: &str = "#2563eb";
pub const ELEVATOR_COLOR: &str = "#7c3aed";
pub const STAIRS_COLOR: &str = "#ea580c";
pub const ESCALATOR_COLOR: &str = "#db2777";

/// What a painted cell means for navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaintCategory {
    Walkway,
    Poi,
    Elevator,
    Stairs,
    Escalator,
    /// Any color outside the registry.
    Custom,
}

impl PaintCategory {
    /// The vertical connection this category represents, if any.
    pub fn connection_kind(self) -> Option<ConnectionKind> {
        match self {
            PaintCategory::Elevator => Some(ConnectionKind::Elevator),
            PaintCategory::Stairs => Some(ConnectionKind::Stairs),
            PaintCategory::Escalator => Some(ConnectionKind::Escalator),
            _ => None,
        }
    }

    /// Whether a pathfinder may step onto cells of this category.
    pub fn is_walkable(self) -> bool {
        !matches!(self, PaintCategory::Custom)
    }
}

/// Vertical connection types linking floors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    Elevator,
    Stairs,
    Escalator,
}

impl ConnectionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionKind::Elevator => "elevator",
            ConnectionKind::Stairs => "stairs",
            ConnectionKind::Escalator => "escalator",
        }
    }

    /// Fixed travel time between two floors.
    pub fn travel_time_seconds(self) -> u32 {
        match self {
            ConnectionKind::Elevator => 30,
            ConnectionKind::Stairs => 60,
            ConnectionKind::Escalator => 45,
        }
    }
}

/// One registry entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorEntry {
    pub key: ColorKey,
    pub name: String,
    pub category: Option<PaintCategory>,
    /// Fixed label forced onto cells of this color. `Some("")` means the
    /// category never carries labels.
    pub default_label: Option<String>,
}

impl ColorEntry {
    fn navigation(key: &str, name: &str, category: PaintCategory, default_label: Option<&str>) -> Self {
        Self {
            key: ColorKey::new(key),
            name: name.to_string(),
            category: Some(category),
            default_label: default_label.map(str::to_string),
        }
    }

    /// Whether painting this color strips existing labels.
    pub fn clears_labels(&self) -> bool {
        self.default_label.as_deref() == Some("")
    }
}

/// Named swatches offered next to the navigation colors.
pub const PALETTE: &[(&str, &str)] = &[
    ("Emerald", "#059669"),
    ("Red", "#dc2626"),
    ("Teal", "#0d9488"),
    ("Indigo", "#4f46e5"),
    ("Yellow", "#ca8a04"),
    ("Slate", "#475569"),
    ("Black", "#1f2937"),
];

/// Maps color keys to paint categories.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRegistry {
    entries: Vec<ColorEntry>,
}

impl Default for ColorRegistry {
    fn default() -> Self {
        Self {
            entries: vec![
                ColorEntry::navigation(WALKWAY_COLOR, "Walkway", PaintCategory::Walkway, Some("")),
                ColorEntry::navigation(POI_COLOR, "POI", PaintCategory::Poi, None),
                ColorEntry::navigation(ELEVATOR_COLOR, "Elevator", PaintCategory::Elevator, None),
                ColorEntry::navigation(STAIRS_COLOR, "Stairs", PaintCategory::Stairs, None),
                ColorEntry::navigation(ESCALATOR_COLOR, "Escalator", PaintCategory::Escalator, None),
            ],
        }
    }
}

impl ColorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebind a navigation category to another color.
    pub fn set_color(&mut self, category: PaintCategory, key: ColorKey) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.category == Some(category)) {
            entry.key = key;
        }
    }

    pub fn entries(&self) -> &[ColorEntry] {
        &self.entries
    }

    pub fn entry(&self, key: &ColorKey) -> Option<&ColorEntry> {
        self.entries.iter().find(|e| &e.key == key)
    }

    pub fn category_of(&self, key: &ColorKey) -> PaintCategory {
        self.entry(key)
            .and_then(|e| e.category)
            .unwrap_or(PaintCategory::Custom)
    }

    /// The color bound to a navigation category.
    pub fn color_for(&self, category: PaintCategory) -> Option<&ColorKey> {
        self.entries
            .iter()
            .find(|e| e.category == Some(category))
            .map(|e| &e.key)
    }

    pub fn walkway(&self) -> ColorKey {
        self.color_for(PaintCategory::Walkway)
            .cloned()
            .unwrap_or_else(|| ColorKey::new(WALKWAY_COLOR))
    }

    pub fn poi(&self) -> ColorKey {
        self.color_for(PaintCategory::Poi)
            .cloned()
            .unwrap_or_else(|| ColorKey::new(POI_COLOR))
    }

    /// Human readable name: registry name, swatch name, or the key itself.
    pub fn display_name(&self, key: &ColorKey) -> String {
        if let Some(entry) = self.entry(key) {
            return entry.name.clone();
        }
        PALETTE
            .iter()
            .find(|(_, value)| *value == key.as_str())
            .map(|(name, _)| (*name).to_string())
            .unwrap_or_else(|| key.to_string())
    }
}

/// Fixed vocabulary for POI cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoiCategory {
    Store,
    Restaurant,
    Cafe,
    Restroom,
    Information,
    Entrance,
    Exit,
    Parking,
    Atm,
    Office,
    Service,
    Other,
}

impl PoiCategory {
    pub const ALL: [PoiCategory; 12] = [
        PoiCategory::Store,
        PoiCategory::Restaurant,
        PoiCategory::Cafe,
        PoiCategory::Restroom,
        PoiCategory::Information,
        PoiCategory::Entrance,
        PoiCategory::Exit,
        PoiCategory::Parking,
        PoiCategory::Atm,
        PoiCategory::Office,
        PoiCategory::Service,
        PoiCategory::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PoiCategory::Store => "store",
            PoiCategory::Restaurant => "restaurant",
            PoiCategory::Cafe => "cafe",
            PoiCategory::Restroom => "restroom",
            PoiCategory::Information => "information",
            PoiCategory::Entrance => "entrance",
            PoiCategory::Exit => "exit",
            PoiCategory::Parking => "parking",
            PoiCategory::Atm => "atm",
            PoiCategory::Office => "office",
            PoiCategory::Service => "service",
            PoiCategory::Other => "other",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

/// Text color readable on top of a `#rrggbb` fill.
pub fn contrast_color(hex: &str) -> &'static str {
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
            .map(f64::from)
    };
    match (channel(1..3), channel(3..5), channel(5..7)) {
        (Some(r), Some(g), Some(b)) if (r * 299.0 + g * 587.0 + b * 114.0) / 1000.0 > 128.0 => "#1f2937",
        _ => "#ffffff",
    }
}
