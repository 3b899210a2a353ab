//! Keyboard and mouse input state.
//!
//! [`InputState`] tracks which keys and mouse buttons are currently pressed,
//! just pressed this frame, or just released this frame, plus the cursor
//! position in window coordinates. The window event handler feeds it; screens
//! read it during `update`.

use std::collections::HashSet;
use std::hash::Hash;

use glam::Vec2;

pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;

/// Tracks the state of a set of inputs (keys or mouse buttons).
///
/// - `pressed`: currently held down
/// - `just_pressed`: pressed this frame (not held last frame)
/// - `just_released`: released this frame
pub struct Input<T: Eq + Hash + Copy> {
    pressed: HashSet<T>,
    just_pressed: HashSet<T>,
    just_released: HashSet<T>,
}

impl<T: Eq + Hash + Copy> Input<T> {
    pub fn new() -> Self {
        Self {
            pressed: HashSet::new(),
            just_pressed: HashSet::new(),
            just_released: HashSet::new(),
        }
    }

    /// Returns `true` if the input is currently held down.
    pub fn pressed(&self, input: T) -> bool {
        self.pressed.contains(&input)
    }

    /// Returns `true` if the input was pressed this frame.
    pub fn just_pressed(&self, input: T) -> bool {
        self.just_pressed.contains(&input)
    }

    /// Returns `true` if the input was released this frame.
    pub fn just_released(&self, input: T) -> bool {
        self.just_released.contains(&input)
    }

    pub(crate) fn press(&mut self, input: T) {
        if self.pressed.insert(input) {
            self.just_pressed.insert(input);
        }
    }

    pub(crate) fn release(&mut self, input: T) {
        if self.pressed.remove(&input) {
            self.just_released.insert(input);
        }
    }

    /// Clear per-frame state. Called after each update.
    pub(crate) fn clear_just(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

impl<T: Eq + Hash + Copy> Default for Input<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// All input a screen can read: keyboard, mouse buttons, cursor position.
#[derive(Default)]
pub struct InputState {
    pub keyboard: Input<KeyCode>,
    pub mouse: Input<MouseButton>,
    /// Cursor position in window pixels, origin top-left.
    pub cursor: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn clear_just(&mut self) {
        self.keyboard.clear_just();
        self.mouse.clear_just();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_release_lifecycle() {
        let mut input: Input<KeyCode> = Input::new();

        input.press(KeyCode::Space);
        assert!(input.pressed(KeyCode::Space));
        assert!(input.just_pressed(KeyCode::Space));

        // Next frame: still held, no longer "just".
        input.clear_just();
        assert!(input.pressed(KeyCode::Space));
        assert!(!input.just_pressed(KeyCode::Space));

        input.release(KeyCode::Space);
        assert!(!input.pressed(KeyCode::Space));
        assert!(input.just_released(KeyCode::Space));
    }

    #[test]
    fn key_repeat_does_not_retrigger_just_pressed() {
        let mut input: Input<KeyCode> = Input::new();
        input.press(KeyCode::KeyA);
        input.clear_just();
        // OS key-repeat delivers another press while held.
        input.press(KeyCode::KeyA);
        assert!(!input.just_pressed(KeyCode::KeyA));
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut input: Input<MouseButton> = Input::new();
        input.release(MouseButton::Left);
        assert!(!input.just_released(MouseButton::Left));
    }
}
