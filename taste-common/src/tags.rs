//! Taste tag catalog
//!
//! The five style-affinity categories quiz answers are scored against.
//! The catalog is fixed at compile time; catalog order doubles as the
//! tie-break when two tags end up with equal scores.

use serde::{Deserialize, Serialize};

/// One of the five fixed taste tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TasteTag {
    ParisArchive,
    NycStreet,
    MinimalCore,
    DesignerVintage,
    DealHunter,
}

impl TasteTag {
    /// All tags in catalog order
    pub const ALL: [TasteTag; 5] = [
        TasteTag::ParisArchive,
        TasteTag::NycStreet,
        TasteTag::MinimalCore,
        TasteTag::DesignerVintage,
        TasteTag::DealHunter,
    ];

    /// Stable identifier used in storage and payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            TasteTag::ParisArchive => "paris_archive",
            TasteTag::NycStreet => "nyc_street",
            TasteTag::MinimalCore => "minimal_core",
            TasteTag::DesignerVintage => "designer_vintage",
            TasteTag::DealHunter => "deal_hunter",
        }
    }

    /// Parse a tag from its stable identifier
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "paris_archive" => Some(TasteTag::ParisArchive),
            "nyc_street" => Some(TasteTag::NycStreet),
            "minimal_core" => Some(TasteTag::MinimalCore),
            "designer_vintage" => Some(TasteTag::DesignerVintage),
            "deal_hunter" => Some(TasteTag::DealHunter),
            _ => None,
        }
    }

    /// Display metadata for this tag
    pub fn info(&self) -> &'static TagInfo {
        match self {
            TasteTag::ParisArchive => &TagInfo {
                tag: TasteTag::ParisArchive,
                label: "Paris Archive",
                description: "Refined vintage, archival pieces, investment dressing",
                color: "#C9A87C",
            },
            TasteTag::NycStreet => &TagInfo {
                tag: TasteTag::NycStreet,
                label: "NYC Street",
                description: "Oversized layers, streetwear edge, effortless cool",
                color: "#8B8B8B",
            },
            TasteTag::MinimalCore => &TagInfo {
                tag: TasteTag::MinimalCore,
                label: "Minimal Core",
                description: "Clean lines, capsule thinking, timeless staples",
                color: "#1A1A1A",
            },
            TasteTag::DesignerVintage => &TagInfo {
                tag: TasteTag::DesignerVintage,
                label: "Designer Vintage",
                description: "Runway moments, unique designers, statement pieces",
                color: "#722F37",
            },
            TasteTag::DealHunter => &TagInfo {
                tag: TasteTag::DealHunter,
                label: "Deal Hunter",
                description: "Value-driven, thrifting wins, budget-conscious style",
                color: "#2D5A27",
            },
        }
    }
}

/// Display metadata for a taste tag
#[derive(Debug, Clone, Serialize)]
pub struct TagInfo {
    pub tag: TasteTag,
    pub label: &'static str,
    pub description: &'static str,
    pub color: &'static str,
}
