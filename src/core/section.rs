//=========================================================================
// Sections
//=========================================================================
//
// The closed set of navigation targets shared with the UI. Each section
// is bound to at most one registered scene.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::str::FromStr;

use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::scene::SceneKey;

//=== Section =============================================================

/// Navigation target of the portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Section {
    Home,
    Resume,
    MathGallery,
    CodeVisualizer,
    WasmDemos,
    ShaderPlayground,
}

impl SceneKey for Section {}

impl Section {
    /// All sections in menu order.
    pub const ALL: [Section; 6] = [
        Self::Home,
        Self::Resume,
        Self::MathGallery,
        Self::CodeVisualizer,
        Self::WasmDemos,
        Self::ShaderPlayground,
    ];

    /// Stable identifier shared with the navigation UI.
    pub fn id(self) -> &'static str {
        match self {
            Self::Home => "HOME",
            Self::Resume => "RESUME",
            Self::MathGallery => "MATH_GALLERY",
            Self::CodeVisualizer => "CODE_VISUALIZER",
            Self::WasmDemos => "WASM_DEMOS",
            Self::ShaderPlayground => "SHADER_PLAYGROUND",
        }
    }

    /// Menu title.
    pub fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Resume => "Resume",
            Self::MathGallery => "Math Gallery",
            Self::CodeVisualizer => "Code Visualizer",
            Self::WasmDemos => "WASM Demos",
            Self::ShaderPlayground => "Shader Playground",
        }
    }

    /// Position in the menu, starting at zero.
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|&s| s == self).unwrap_or(0)
    }

    /// Next section in menu order, wrapping around.
    pub fn next(self) -> Section {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous section in menu order, wrapping around.
    pub fn previous(self) -> Section {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Error returned when parsing an unknown section identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown section '{0}'")]
pub struct UnknownSection(pub String);

impl FromStr for Section {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|section| section.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownSection(s.to_string()))
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_from_str() {
        for section in Section::ALL {
            assert_eq!(section.id().parse::<Section>(), Ok(section));
        }
        assert_eq!("math_gallery".parse::<Section>(), Ok(Section::MathGallery));
    }

    #[test]
    fn unknown_id_is_rejected() {
        assert_eq!(
            "BLOG".parse::<Section>(),
            Err(UnknownSection("BLOG".to_string()))
        );
    }

    #[test]
    fn menu_navigation_wraps() {
        assert_eq!(Section::Home.next(), Section::Resume);
        assert_eq!(Section::ShaderPlayground.next(), Section::Home);
        assert_eq!(Section::Home.previous(), Section::ShaderPlayground);
    }

    #[test]
    fn display_uses_ui_identifier() {
        assert_eq!(Section::CodeVisualizer.to_string(), "CODE_VISUALIZER");
    }
}
