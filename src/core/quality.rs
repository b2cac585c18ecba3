//=========================================================================
// Quality Levels
//=========================================================================
//
// Rendering-fidelity tiers broadcast to every registered scene, and the
// capability flags that decide which scenes register at all.
//
// Flow:
//   adaptive-quality collaborator → SceneManager::set_quality_level()
//     ├─ Renderer::set_quality(QualitySettings)
//     └─ Scene::on_quality_change(resolved tier)   (every scene)
//
//=========================================================================

//=== External Dependencies ===============================================

use serde::{Deserialize, Serialize};

//=== QualityLevel ========================================================

/// One of four ordinal rendering-fidelity tiers.
///
/// Ordering follows fidelity: `Low < Medium < High < Ultra`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    Low,
    Medium,
    #[default]
    High,
    Ultra,
}

impl QualityLevel {
    /// All tiers in ascending order.
    pub const ALL: [QualityLevel; 4] = [Self::Low, Self::Medium, Self::High, Self::Ultra];

    /// Renderer-facing settings for this tier.
    pub fn settings(self) -> QualitySettings {
        match self {
            Self::Low => QualitySettings {
                pixel_ratio: 0.75,
                shadow_map_size: 0,
                particle_budget: 500,
                antialias: false,
            },
            Self::Medium => QualitySettings {
                pixel_ratio: 1.0,
                shadow_map_size: 512,
                particle_budget: 2_000,
                antialias: false,
            },
            Self::High => QualitySettings {
                pixel_ratio: 1.5,
                shadow_map_size: 1024,
                particle_budget: 5_000,
                antialias: true,
            },
            Self::Ultra => QualitySettings {
                pixel_ratio: 2.0,
                shadow_map_size: 2048,
                particle_budget: 10_000,
                antialias: true,
            },
        }
    }

    /// Picks the tier a scene should actually run at.
    ///
    /// Returns the highest supported tier not above `self`, or the lowest
    /// supported tier when every supported tier is above `self`. Returns
    /// `self` if `supported` is empty.
    pub fn resolve(self, supported: &[QualityLevel]) -> QualityLevel {
        supported
            .iter()
            .copied()
            .filter(|level| *level <= self)
            .max()
            .or_else(|| supported.iter().copied().min())
            .unwrap_or(self)
    }
}

impl std::fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Ultra => "ultra",
        };
        f.write_str(name)
    }
}

//=== QualitySettings =====================================================

/// Concrete renderer parameters derived from a [`QualityLevel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualitySettings {
    /// Device-pixel multiplier applied to the drawing buffer.
    pub pixel_ratio: f32,
    /// Shadow map edge length in texels. Zero disables shadows.
    pub shadow_map_size: u32,
    /// Upper bound on particles a scene may spawn.
    pub particle_budget: u32,
    pub antialias: bool,
}

//=== Capabilities ========================================================

/// Host feature flags supplied by the capability-detection collaborator.
///
/// The core never probes the device itself. Scenes declare what they
/// need and registration is skipped when the host lacks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub webgl: bool,
    pub wasm: bool,
}

impl Capabilities {
    /// Capabilities of a fully featured host.
    pub const ALL: Capabilities = Capabilities { webgl: true, wasm: true };

    /// Returns `true` if every flag set in `required` is also set here.
    pub fn satisfies(&self, required: Capabilities) -> bool {
        (!required.webgl || self.webgl) && (!required.wasm || self.wasm)
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered_by_fidelity() {
        assert!(QualityLevel::Low < QualityLevel::Medium);
        assert!(QualityLevel::High < QualityLevel::Ultra);
        assert_eq!(QualityLevel::default(), QualityLevel::High);
    }

    #[test]
    fn resolve_picks_highest_supported_not_above_request() {
        let supported = [QualityLevel::Low, QualityLevel::High];
        assert_eq!(QualityLevel::Ultra.resolve(&supported), QualityLevel::High);
        assert_eq!(QualityLevel::Medium.resolve(&supported), QualityLevel::Low);
        assert_eq!(QualityLevel::High.resolve(&supported), QualityLevel::High);
    }

    #[test]
    fn resolve_falls_back_to_lowest_supported() {
        let supported = [QualityLevel::High, QualityLevel::Ultra];
        assert_eq!(QualityLevel::Low.resolve(&supported), QualityLevel::High);
    }

    #[test]
    fn resolve_with_no_supported_levels_keeps_request() {
        assert_eq!(QualityLevel::Medium.resolve(&[]), QualityLevel::Medium);
    }

    #[test]
    fn settings_scale_with_tier() {
        let low = QualityLevel::Low.settings();
        let ultra = QualityLevel::Ultra.settings();
        assert!(low.particle_budget < ultra.particle_budget);
        assert_eq!(low.shadow_map_size, 0);
        assert!(ultra.antialias);
    }

    #[test]
    fn capabilities_satisfaction() {
        let host = Capabilities { webgl: true, wasm: false };
        assert!(host.satisfies(Capabilities::default()));
        assert!(host.satisfies(Capabilities { webgl: true, wasm: false }));
        assert!(!host.satisfies(Capabilities { webgl: false, wasm: true }));
        assert!(Capabilities::ALL.satisfies(Capabilities::ALL));
    }

    #[test]
    fn quality_deserializes_from_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            level: QualityLevel,
        }
        let parsed: Wrapper = toml::from_str("level = \"ultra\"").unwrap();
        assert_eq!(parsed.level, QualityLevel::Ultra);
    }
}
