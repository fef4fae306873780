//! Per-frame pointer state.
//!
//! [`PointerState`] is the main-thread view of the cursor: the last dispatched
//! position, the movement delta for the current frame, the toggle states of
//! the three pointer buttons and the one-frame double-click flag. It is
//! refreshed once per frame from the cursor snapshot copied out at the swap;
//! it never touches the ingest lock itself.

use crate::button::ButtonState;
use crate::event::{Point, PointerButton};

#[derive(Debug, Default)]
pub struct PointerState {
    position: Point,
    last_position: Point,
    last_position_set: bool,
    delta: Point,
    buttons: [ButtonState; 3],
    double_clicked: bool,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start-of-frame pass: age button toggles, clear the per-frame delta and
    /// the double-click flag.
    pub(crate) fn begin_frame(&mut self) {
        for state in &mut self.buttons {
            *state = state.age();
        }
        self.delta = Point::ZERO;
        self.double_clicked = false;
    }

    /// Record the cursor position copied out at the swap. Returns the delta
    /// against the previously dispatched position, which is zero until a
    /// previous position exists.
    pub(crate) fn record_position(&mut self, position: Point) -> Point {
        if self.last_position_set {
            self.delta = Point::new(
                position.x - self.last_position.x,
                position.y - self.last_position.y,
            );
        }
        self.last_position = position;
        self.last_position_set = true;
        self.delta
    }

    #[inline]
    pub(crate) fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    #[inline]
    pub(crate) fn last_position(&self) -> Point {
        self.last_position
    }

    pub(crate) fn press(&mut self, button: PointerButton) {
        let slot = &mut self.buttons[button.index()];
        *slot = slot.press();
    }

    pub(crate) fn release(&mut self, button: PointerButton) {
        let slot = &mut self.buttons[button.index()];
        *slot = slot.release();
    }

    #[inline]
    pub(crate) fn mark_double_click(&mut self) {
        self.double_clicked = true;
    }

    /// Current cursor position in screen coordinates.
    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }

    /// Cursor movement dispatched this frame.
    #[inline]
    pub fn delta(&self) -> Point {
        self.delta
    }

    #[inline]
    pub fn button_state(&self, button: PointerButton) -> ButtonState {
        self.buttons[button.index()]
    }

    #[inline]
    pub fn is_held(&self, button: PointerButton) -> bool {
        self.button_state(button).is_held()
    }

    #[inline]
    pub fn is_down(&self, button: PointerButton) -> bool {
        self.button_state(button).is_down()
    }

    #[inline]
    pub fn is_up(&self, button: PointerButton) -> bool {
        self.button_state(button).is_up()
    }

    /// True for exactly the frame in which a double click was dispatched.
    #[inline]
    pub fn is_double_clicked(&self) -> bool {
        self.double_clicked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_position_yields_zero_delta() {
        let mut pointer = PointerState::new();

        let delta = pointer.record_position(Point::new(100, 50));
        assert_eq!(delta, Point::ZERO);

        let delta = pointer.record_position(Point::new(110, 45));
        assert_eq!(delta, Point::new(10, -5));
    }

    #[test]
    fn begin_frame_clears_transients() {
        let mut pointer = PointerState::new();
        pointer.record_position(Point::new(1, 1));
        pointer.record_position(Point::new(4, 4));
        pointer.mark_double_click();
        pointer.press(PointerButton::Left);

        assert_eq!(pointer.delta(), Point::new(3, 3));
        assert!(pointer.is_double_clicked());
        assert!(pointer.is_down(PointerButton::Left));

        pointer.begin_frame();

        assert_eq!(pointer.delta(), Point::ZERO);
        assert!(!pointer.is_double_clicked());
        assert!(!pointer.is_down(PointerButton::Left));
        assert!(pointer.is_held(PointerButton::Left));
    }

    #[test]
    fn same_frame_click_reports_both_edges() {
        let mut pointer = PointerState::new();
        pointer.press(PointerButton::Right);
        pointer.release(PointerButton::Right);

        assert!(pointer.is_down(PointerButton::Right));
        assert!(pointer.is_up(PointerButton::Right));

        pointer.begin_frame();
        assert_eq!(pointer.button_state(PointerButton::Right), ButtonState::Off);
    }
}
