//! Screens and screen transitions.
//!
//! A game is a set of screens (menu, gameplay, game over) exactly one of
//! which is current. Each frame the current screen updates and returns a
//! [`Transition`]; the frontend resolves it against the [`ScreenList`],
//! calling `on_exit` on the old screen and `on_entry` on the new one.
//!
//! Screens live in an arena `Vec` and are addressed by index, so a screen
//! can name its neighbors without holding references to them.

use crate::context::Context;
use crate::frame::Frame;

/// What the current screen wants to happen after this update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transition {
    /// Stay on this screen.
    #[default]
    None,
    /// Go to the next screen in the list.
    Next,
    /// Go to the previous screen in the list.
    Previous,
    /// Jump to a specific screen index.
    To(usize),
    /// Shut the game down.
    Exit,
}

/// One game screen. Implementors hold their own state; the engine state
/// arrives through [`Context`].
pub trait Screen {
    /// Called once when this screen becomes current.
    fn on_entry(&mut self, _ctx: &mut Context) {}

    /// Called once when this screen stops being current.
    fn on_exit(&mut self, _ctx: &mut Context) {}

    /// Advance the screen's state by one frame.
    fn update(&mut self, ctx: &mut Context) -> Transition;

    /// Record this screen's draw commands into the frame.
    fn draw(&mut self, ctx: &mut Context, frame: &mut Frame);
}

/// Arena of screens plus the index of the current one.
pub struct ScreenList {
    screens: Vec<Box<dyn Screen>>,
    current: usize,
}

impl ScreenList {
    /// Build from a non-empty screen set. `start` is the initial screen.
    ///
    /// Panics if `screens` is empty or `start` is out of range; both are
    /// setup bugs, not runtime conditions.
    pub fn new(screens: Vec<Box<dyn Screen>>, start: usize) -> Self {
        assert!(!screens.is_empty(), "ScreenList needs at least one screen");
        assert!(
            start < screens.len(),
            "start screen {start} out of range (have {})",
            screens.len()
        );
        Self {
            screens,
            current: start,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_mut(&mut self) -> &mut dyn Screen {
        self.screens[self.current].as_mut()
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    /// Resolve a transition to a target screen index, or `None` when the
    /// transition leaves the current screen in place (including `Next` at
    /// the last screen, `Previous` at the first, and out-of-range `To`).
    /// `Exit` is handled by the caller before resolving.
    pub fn resolve(&self, transition: Transition) -> Option<usize> {
        match transition {
            Transition::None | Transition::Exit => None,
            Transition::Next => {
                let next = self.current + 1;
                (next < self.screens.len()).then_some(next)
            }
            Transition::Previous => self.current.checked_sub(1),
            Transition::To(index) => {
                (index < self.screens.len() && index != self.current).then_some(index)
            }
        }
    }

    /// Switch to a new current screen, running exit/entry hooks.
    pub fn switch_to(&mut self, index: usize, ctx: &mut Context) {
        self.screens[self.current].on_exit(ctx);
        self.current = index;
        self.screens[self.current].on_entry(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stub;

    impl Screen for Stub {
        fn update(&mut self, _ctx: &mut Context) -> Transition {
            Transition::None
        }
        fn draw(&mut self, _ctx: &mut Context, _frame: &mut Frame) {}
    }

    fn list(n: usize, start: usize) -> ScreenList {
        let screens: Vec<Box<dyn Screen>> =
            (0..n).map(|_| Box::new(Stub) as Box<dyn Screen>).collect();
        ScreenList::new(screens, start)
    }

    #[test]
    fn next_and_previous_move_within_bounds() {
        let screens = list(3, 1);
        assert_eq!(screens.resolve(Transition::Next), Some(2));
        assert_eq!(screens.resolve(Transition::Previous), Some(0));
    }

    #[test]
    fn next_at_end_stays_put() {
        let screens = list(3, 2);
        assert_eq!(screens.resolve(Transition::Next), None);
    }

    #[test]
    fn previous_at_start_stays_put() {
        let screens = list(3, 0);
        assert_eq!(screens.resolve(Transition::Previous), None);
    }

    #[test]
    fn to_rejects_out_of_range_and_self() {
        let screens = list(3, 1);
        assert_eq!(screens.resolve(Transition::To(0)), Some(0));
        assert_eq!(screens.resolve(Transition::To(3)), None);
        assert_eq!(screens.resolve(Transition::To(1)), None);
    }

    #[test]
    fn none_and_exit_resolve_to_nothing() {
        let screens = list(2, 0);
        assert_eq!(screens.resolve(Transition::None), None);
        assert_eq!(screens.resolve(Transition::Exit), None);
    }

    #[test]
    #[should_panic(expected = "at least one screen")]
    fn empty_list_panics() {
        ScreenList::new(Vec::new(), 0);
    }
}
