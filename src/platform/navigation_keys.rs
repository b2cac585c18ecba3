//=========================================================================
// Navigation Keys
//=========================================================================
//
// Converts Winit keyboard events into navigation commands.
//
// Architecture:
//   Winit KeyEvent → NavigationKeys → NavigationCommand → PlatformEvent
//
// Stateful modifier tracking: presses while Ctrl, Alt or Super is held
// belong to OS or browser shortcuts and are ignored. Key repeats and
// releases never navigate.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::{ElementState, KeyEvent},
    keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::navigation::NavigationCommand;
use crate::core::section::Section;

//=== NavigationKeys ======================================================

pub(crate) struct NavigationKeys {
    modifiers: ModifiersState,
}

impl NavigationKeys {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self {
            modifiers: ModifiersState::empty(),
        }
    }

    //--- Modifier State Management ----------------------------------------

    pub(crate) fn update_modifiers(&mut self, modifiers: ModifiersState) {
        self.modifiers = modifiers;
    }

    //--- Event Processing -------------------------------------------------

    pub(crate) fn process_key_event(&self, key_event: &KeyEvent) -> Option<NavigationCommand> {
        match key_event.physical_key {
            PhysicalKey::Code(code) => self.process_press(code, key_event.state, key_event.repeat),
            PhysicalKey::Unidentified(_) => None,
        }
    }

    fn process_press(
        &self,
        code: WinitKeyCode,
        state: ElementState,
        repeat: bool,
    ) -> Option<NavigationCommand> {
        if state != ElementState::Pressed || repeat {
            return None;
        }
        if self.modifiers.control_key() || self.modifiers.alt_key() || self.modifiers.super_key() {
            return None;
        }
        command_for_key(code)
    }
}

//=== Key Table ===========================================================

/// Digits pick a section by menu position; arrows step through the menu.
pub(crate) fn command_for_key(code: WinitKeyCode) -> Option<NavigationCommand> {
    use WinitKeyCode::*;
    let command = match code {
        //--- Direct -----------------------------------------------------

        Digit1 | Numpad1 => NavigationCommand::Goto(Section::Home),
        Digit2 | Numpad2 => NavigationCommand::Goto(Section::Resume),
        Digit3 | Numpad3 => NavigationCommand::Goto(Section::MathGallery),
        Digit4 | Numpad4 => NavigationCommand::Goto(Section::CodeVisualizer),
        Digit5 | Numpad5 => NavigationCommand::Goto(Section::WasmDemos),
        Digit6 | Numpad6 => NavigationCommand::Goto(Section::ShaderPlayground),
        Home => NavigationCommand::Goto(Section::Home),

        //--- Relative ---------------------------------------------------

        ArrowRight | ArrowDown | PageDown => NavigationCommand::Next,
        ArrowLeft | ArrowUp | PageUp => NavigationCommand::Previous,

        //--- Control ----------------------------------------------------

        Escape => NavigationCommand::Cancel,

        _ => return None,
    };
    Some(command)
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_follow_menu_order() {
        let digits = [
            WinitKeyCode::Digit1,
            WinitKeyCode::Digit2,
            WinitKeyCode::Digit3,
            WinitKeyCode::Digit4,
            WinitKeyCode::Digit5,
            WinitKeyCode::Digit6,
        ];
        for (key, section) in digits.into_iter().zip(Section::ALL) {
            assert_eq!(command_for_key(key), Some(NavigationCommand::Goto(section)));
        }
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        assert_eq!(command_for_key(WinitKeyCode::KeyQ), None);
        assert_eq!(command_for_key(WinitKeyCode::Digit9), None);
    }

    #[test]
    fn only_plain_presses_navigate() {
        let mut keys = NavigationKeys::new();
        let press = |keys: &NavigationKeys, state, repeat| {
            keys.process_press(WinitKeyCode::ArrowRight, state, repeat)
        };

        assert_eq!(press(&keys, ElementState::Pressed, false), Some(NavigationCommand::Next));
        assert_eq!(press(&keys, ElementState::Pressed, true), None);
        assert_eq!(press(&keys, ElementState::Released, false), None);

        keys.update_modifiers(ModifiersState::CONTROL);
        assert_eq!(press(&keys, ElementState::Pressed, false), None);

        keys.update_modifiers(ModifiersState::SHIFT);
        assert_eq!(press(&keys, ElementState::Pressed, false), Some(NavigationCommand::Next));
    }
}
