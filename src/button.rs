//! Button identity and the per-frame toggle-state machine.
//!
//! Every button on every device moves through [`ButtonState`]. The three
//! `Toggled*` states are transient: they are set while replaying the event
//! queue and survive exactly one frame before [`ButtonState::age`] collapses
//! them into the steady `On`/`Off` states. `ToggledOnOff` records a press and
//! release that both happened inside a single frame window, so neither edge
//! is lost even though the button is back up by the time anyone looks.

/// Identifies a single button on a device.
///
/// The code doubles as the index into the per-device state table; codes at or
/// above [`ButtonCode::TABLE_SIZE`] are accepted but never tracked (sets are
/// ignored, queries answer the off/default state).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ButtonCode(pub u16);

impl ButtonCode {
    /// Number of tracked slots in a device's button table.
    pub const TABLE_SIZE: usize = 0x120;

    #[inline]
    pub(crate) fn table_index(self) -> Option<usize> {
        let idx = self.0 as usize;
        (idx < Self::TABLE_SIZE).then_some(idx)
    }
}

/// Per-frame state of a single button.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ButtonState {
    /// Not pressed.
    #[default]
    Off,
    /// Held since at least the previous frame.
    On,
    /// Pressed this frame.
    ToggledOn,
    /// Released this frame.
    ToggledOff,
    /// Pressed and released within this frame.
    ToggledOnOff,
}

impl ButtonState {
    /// Transition taken when a press event is replayed.
    #[inline]
    pub fn press(self) -> ButtonState {
        ButtonState::ToggledOn
    }

    /// Transition taken when a release event is replayed.
    ///
    /// A release landing on `ToggledOn` means the press happened earlier in
    /// the same frame; the combined `ToggledOnOff` state keeps both edges
    /// observable.
    #[inline]
    pub fn release(self) -> ButtonState {
        match self {
            ButtonState::ToggledOn => ButtonState::ToggledOnOff,
            _ => ButtonState::ToggledOff,
        }
    }

    /// Start-of-frame aging pass: transient states collapse into steady ones.
    #[inline]
    pub fn age(self) -> ButtonState {
        match self {
            ButtonState::ToggledOff | ButtonState::ToggledOnOff => ButtonState::Off,
            ButtonState::ToggledOn => ButtonState::On,
            steady => steady,
        }
    }

    /// The button is currently down, whether it went down this frame or
    /// earlier.
    #[inline]
    pub fn is_held(self) -> bool {
        matches!(
            self,
            ButtonState::On | ButtonState::ToggledOn | ButtonState::ToggledOnOff
        )
    }

    /// The button was pressed this frame.
    #[inline]
    pub fn is_down(self) -> bool {
        matches!(self, ButtonState::ToggledOn | ButtonState::ToggledOnOff)
    }

    /// The button was released this frame.
    #[inline]
    pub fn is_up(self) -> bool {
        matches!(self, ButtonState::ToggledOff | ButtonState::ToggledOnOff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_then_age_becomes_held() {
        let state = ButtonState::Off.press();
        assert_eq!(state, ButtonState::ToggledOn);
        assert!(state.is_down());
        assert!(state.is_held());
        assert!(!state.is_up());

        let aged = state.age();
        assert_eq!(aged, ButtonState::On);
        assert!(!aged.is_down());
        assert!(aged.is_held());
    }

    #[test]
    fn release_of_held_button() {
        let state = ButtonState::On.release();
        assert_eq!(state, ButtonState::ToggledOff);
        assert!(state.is_up());
        assert!(!state.is_held());
        assert_eq!(state.age(), ButtonState::Off);
    }

    #[test]
    fn same_frame_press_release_keeps_both_edges() {
        let state = ButtonState::Off.press().release();
        assert_eq!(state, ButtonState::ToggledOnOff);
        assert!(state.is_down());
        assert!(state.is_up());
        assert!(state.is_held());

        // A same-frame tap ends up released, not stuck on.
        assert_eq!(state.age(), ButtonState::Off);
    }

    #[test]
    fn steady_states_survive_aging() {
        assert_eq!(ButtonState::Off.age(), ButtonState::Off);
        assert_eq!(ButtonState::On.age(), ButtonState::On);
    }

    #[test]
    fn out_of_table_codes_have_no_slot() {
        assert_eq!(ButtonCode(0).table_index(), Some(0));
        assert_eq!(
            ButtonCode(ButtonCode::TABLE_SIZE as u16 - 1).table_index(),
            Some(ButtonCode::TABLE_SIZE - 1)
        );
        assert_eq!(ButtonCode(ButtonCode::TABLE_SIZE as u16).table_index(), None);
        assert_eq!(ButtonCode(u16::MAX).table_index(), None);
    }
}
