use tracing::debug;

use crate::event::{ButtonEvent, PointerEvent, TextEvent};
use crate::eventbus::InputObserver;

/// A simple observer that logs every dispatched event.
pub struct Logger;

impl Logger {
    pub fn new() -> Self {
        Logger
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl InputObserver for Logger {
    fn button_down(&mut self, event: &ButtonEvent) {
        debug!(device = event.device, code = event.code.0, "button down");
    }

    fn button_up(&mut self, event: &ButtonEvent) {
        debug!(device = event.device, code = event.code.0, "button up");
    }

    fn pointer_moved(&mut self, event: &PointerEvent) {
        debug!(
            x = event.position.x,
            y = event.position.y,
            dx = event.delta.x,
            dy = event.delta.y,
            scroll = event.scroll,
            "pointer moved"
        );
    }

    fn pointer_pressed(&mut self, event: &PointerEvent) {
        debug!(button = ?event.button, "pointer pressed");
    }

    fn pointer_released(&mut self, event: &PointerEvent) {
        debug!(button = ?event.button, "pointer released");
    }

    fn pointer_double_click(&mut self, event: &PointerEvent) {
        debug!(x = event.position.x, y = event.position.y, "double click");
    }

    fn text_input(&mut self, event: &TextEvent) {
        debug!(character = %event.character, "text input");
    }
}
