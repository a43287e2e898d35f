//! Sector catalog
//!
//! The per-round tuning table: each sector sets asteroid speed/size
//! multipliers and the round palette. Selected in the lobby, immutable for
//! the duration of a round. Every field is mandatory; the catalog is fixed
//! at compile time and checked by tests.

use serde::{Deserialize, Serialize};

/// Identifier for one entry of the fixed catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SectorId {
    #[default]
    Orion,
    Crystal,
    Void,
}

/// All sectors, in lobby display order
pub const ALL_SECTORS: [SectorId; 3] = [SectorId::Orion, SectorId::Crystal, SectorId::Void];

/// Static configuration for one sector
#[derive(Debug, Clone, PartialEq)]
pub struct SectorConfig {
    pub id: SectorId,
    pub name: &'static str,
    pub description: &'static str,
    /// Scales every asteroid velocity drawn during the round
    pub speed_mult: f32,
    /// Scales every asteroid collision radius
    pub size_mult: f32,
    /// Asteroid stroke / explosion burst color
    pub accent: [f32; 4],
    /// Surface clear color
    pub background: wgpu::Color,
}

impl SectorId {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectorId::Orion => "orion",
            SectorId::Crystal => "crystal",
            SectorId::Void => "void",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "orion" => Some(SectorId::Orion),
            "crystal" => Some(SectorId::Crystal),
            "void" => Some(SectorId::Void),
            _ => None,
        }
    }

    /// Look up the full configuration for this sector
    pub fn config(&self) -> SectorConfig {
        match self {
            SectorId::Orion => SectorConfig {
                id: SectorId::Orion,
                name: "Orion Belt",
                description: "Standard sector with balanced asteroid density.",
                speed_mult: 1.0,
                size_mult: 1.0,
                accent: [0.58, 0.64, 0.72, 1.0],
                background: wgpu::Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 },
            },
            SectorId::Crystal => SectorConfig {
                id: SectorId::Crystal,
                name: "Crystal Nebula",
                description: "Fast rocks and razor-edged fragments.",
                speed_mult: 1.5,
                size_mult: 0.7,
                accent: [0.13, 0.83, 0.93, 1.0],
                background: wgpu::Color { r: 0.04, g: 0.08, b: 0.16, a: 1.0 },
            },
            SectorId::Void => SectorConfig {
                id: SectorId::Void,
                name: "Deep Void",
                description: "Massive asteroids and poor visibility.",
                speed_mult: 0.7,
                size_mult: 1.8,
                accent: [0.66, 0.33, 0.97, 1.0],
                background: wgpu::Color { r: 0.06, g: 0.0, b: 0.1, a: 1.0 },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_round_trips_through_str() {
        for id in ALL_SECTORS {
            assert_eq!(SectorId::from_str(id.as_str()), Some(id));
        }
        assert_eq!(SectorId::from_str("kuiper"), None);
    }

    #[test]
    fn test_catalog_is_complete_and_sane() {
        for id in ALL_SECTORS {
            let config = id.config();
            assert_eq!(config.id, id);
            assert!(!config.name.is_empty());
            assert!(!config.description.is_empty());
            assert!(config.speed_mult > 0.0);
            assert!(config.size_mult > 0.0);
            assert!(config.accent.iter().all(|c| (0.0..=1.0).contains(c)));
        }
    }

    #[test]
    fn test_multipliers_differentiate_sectors() {
        let crystal = SectorId::Crystal.config();
        let void = SectorId::Void.config();
        assert!(crystal.speed_mult > void.speed_mult);
        assert!(void.size_mult > crystal.size_mult);
    }
}
