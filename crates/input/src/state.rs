use crate::direction::MoveDirection;
use glam::DVec2;

/// Input device state sampled once per frame.
///
/// The window layer feeds events in; the camera controller only reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    held: [bool; MoveDirection::ALL.len()],
    look_held: bool,
    cursor: DVec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_held(&mut self, direction: MoveDirection, held: bool) {
        self.held[direction.index()] = held;
    }

    pub fn is_held(&self, direction: MoveDirection) -> bool {
        self.held[direction.index()]
    }

    pub fn held(&self) -> impl Iterator<Item = MoveDirection> + '_ {
        MoveDirection::ALL
            .into_iter()
            .filter(|dir| self.is_held(*dir))
    }

    /// Secondary mouse button: mouse-look is active while held.
    pub fn set_look_held(&mut self, held: bool) {
        self.look_held = held;
    }

    pub fn look_held(&self) -> bool {
        self.look_held
    }

    pub fn cursor(&self) -> DVec2 {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: DVec2) {
        self.cursor = cursor;
    }

    /// Accumulate raw motion. Locked cursors stop reporting positions, so the
    /// desktop app drives a virtual cursor from device deltas instead.
    pub fn add_cursor_delta(&mut self, delta: DVec2) {
        self.cursor += delta;
    }

    /// Drop every held key and button, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held = Default::default();
        self.look_held = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release_direction() {
        let mut input = InputState::new();
        input.set_held(MoveDirection::Forward, true);
        input.set_held(MoveDirection::Left, true);
        assert!(input.is_held(MoveDirection::Forward));
        assert_eq!(
            input.held().collect::<Vec<_>>(),
            vec![MoveDirection::Forward, MoveDirection::Left]
        );

        input.set_held(MoveDirection::Forward, false);
        assert!(!input.is_held(MoveDirection::Forward));
        assert!(input.is_held(MoveDirection::Left));
    }

    #[test]
    fn cursor_deltas_accumulate() {
        let mut input = InputState::new();
        input.set_cursor(DVec2::new(10.0, 20.0));
        input.add_cursor_delta(DVec2::new(3.0, -5.0));
        input.add_cursor_delta(DVec2::new(1.0, 1.0));
        assert_eq!(input.cursor(), DVec2::new(14.0, 16.0));
    }

    #[test]
    fn release_all_clears_buttons_but_keeps_cursor() {
        let mut input = InputState::new();
        input.set_held(MoveDirection::Up, true);
        input.set_look_held(true);
        input.set_cursor(DVec2::new(4.0, 2.0));
        input.release_all();
        assert_eq!(input.held().count(), 0);
        assert!(!input.look_held());
        assert_eq!(input.cursor(), DVec2::new(4.0, 2.0));
    }
}
