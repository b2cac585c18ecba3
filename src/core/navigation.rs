//=========================================================================
// Navigation Commands
//=========================================================================
//
// Platform-neutral navigation intents. The platform layer maps keys to
// commands; the core thread resolves them against the current section.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::section::Section;

//=== NavigationCommand ===================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationCommand {
    /// Go straight to a section.
    Goto(Section),
    /// Next section in menu order, wrapping around.
    Next,
    /// Previous section in menu order, wrapping around.
    Previous,
    /// Abort the transition in flight, if any.
    Cancel,
}

impl NavigationCommand {
    /// Section this command leads to from `current`.
    ///
    /// Returns `None` for [`NavigationCommand::Cancel`]. Relative moves
    /// with no current section start from the first menu entry.
    pub fn resolve(self, current: Option<Section>) -> Option<Section> {
        match self {
            Self::Goto(section) => Some(section),
            Self::Next => Some(current.map_or(Section::Home, Section::next)),
            Self::Previous => Some(current.map_or(Section::Home, Section::previous)),
            Self::Cancel => None,
        }
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_moves_wrap() {
        assert_eq!(
            NavigationCommand::Next.resolve(Some(Section::ShaderPlayground)),
            Some(Section::Home)
        );
        assert_eq!(
            NavigationCommand::Previous.resolve(Some(Section::Home)),
            Some(Section::ShaderPlayground)
        );
    }

    #[test]
    fn goto_ignores_current() {
        assert_eq!(
            NavigationCommand::Goto(Section::Resume).resolve(None),
            Some(Section::Resume)
        );
    }

    #[test]
    fn no_current_section_starts_at_home() {
        assert_eq!(NavigationCommand::Next.resolve(None), Some(Section::Home));
        assert_eq!(NavigationCommand::Cancel.resolve(Some(Section::Resume)), None);
    }
}
