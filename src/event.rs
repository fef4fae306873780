//! Event payloads and channel conventions.
//!
//! The core represents input as small typed payloads staged by producers and
//! replayed once per frame ([`ButtonEvent`], [`PointerEvent`], [`TextEvent`]).
//!
//! ## Value conventions
//! - **Button events** carry the raw device index, the [`ButtonCode`] and the
//!   producer-supplied timestamp; they are not interpreted here.
//! - **Pointer positions** are absolute screen coordinates; `delta` is the
//!   movement since the previous dispatched frame and is zero on the very
//!   first report.
//! - **Axes** are `f32`. Gamepad axes are normalized to `[-1.0, 1.0]` before
//!   they are published; the mouse axes are attenuated raw counts (X/Y) and
//!   raw wheel ticks (Z). See the sampler module for both paths.
//! - **Scroll** is in wheel ticks, accumulated over the frame window.

use crate::button::ButtonCode;

/// A point in screen coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0, y: 0 };

    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

/// Modifier-key state captured alongside pointer and cursor reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
}

/// The three pointer buttons tracked by the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
}

impl PointerButton {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Well-known axis ids. The numeric index doubles as the slot in a device's
/// axis array; backends may publish additional axes above these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputAxis {
    MouseX,
    MouseY,
    MouseZ,
    LeftStickX,
    LeftStickY,
    RightStickX,
    RightStickY,
    LeftTrigger,
    RightTrigger,
}

impl From<InputAxis> for u32 {
    #[inline]
    fn from(axis: InputAxis) -> u32 {
        axis as u32
    }
}

/// A button transitioned down or up on some device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonEvent {
    /// Dense device index assigned on first observed event.
    pub device: u32,
    /// Which button changed.
    pub code: ButtonCode,
    /// Producer-supplied timestamp, passed through untouched.
    pub timestamp: u64,
}

/// A pointer report: movement, a button edge, or a double click.
///
/// `buttons_down` mirrors the OS-reported held state of Left/Middle/Right at
/// the time of the report; it is independent of the per-frame
/// [`ButtonState`](crate::button::ButtonState) edges the core derives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub position: Point,
    pub delta: Point,
    /// The button this event is about; `None` for pure movement.
    pub button: Option<PointerButton>,
    pub buttons_down: [bool; 3],
    /// Wheel movement for the frame; nonzero only on movement events.
    pub scroll: f32,
    pub modifiers: Modifiers,
}

/// A translated character of text input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextEvent {
    pub character: char,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_ids_are_stable() {
        assert_eq!(u32::from(InputAxis::MouseX), 0);
        assert_eq!(u32::from(InputAxis::MouseY), 1);
        assert_eq!(u32::from(InputAxis::MouseZ), 2);
        assert_eq!(u32::from(InputAxis::RightTrigger), 8);
    }

    #[test]
    fn pointer_button_indices() {
        assert_eq!(PointerButton::Left.index(), 0);
        assert_eq!(PointerButton::Middle.index(), 1);
        assert_eq!(PointerButton::Right.index(), 2);
    }
}
