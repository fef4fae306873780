use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::button::ButtonCode;
use crate::device::DeviceBackend;
use crate::input::Input;

#[derive(Clone, Copy, Debug)]
enum Step {
    Press(ButtonCode),
    Release(ButtonCode),
    Axis { axis: u32, raw: i32 },
}

/// A backend that replays queued steps on capture.
///
/// Clones share the same queue, so a test or demo can keep one handle to feed
/// steps while a clone is registered on the context. Timestamps are a simple
/// monotonic counter.
#[derive(Clone)]
pub struct ScriptedBackend {
    name: String,
    device: u32,
    queue: Arc<Mutex<Vec<Step>>>,
    clock: Arc<AtomicU64>,
}

impl ScriptedBackend {
    pub fn new(name: &str, device: u32) -> Self {
        Self {
            name: name.to_string(),
            device,
            queue: Arc::new(Mutex::new(Vec::new())),
            clock: Arc::new(AtomicU64::new(0)),
        }
    }

    fn feed(&self, step: Step) {
        self.queue.lock().unwrap_or_else(|e| e.into_inner()).push(step);
    }

    /// Queue a button press for the next capture.
    pub fn press(&self, code: ButtonCode) {
        self.feed(Step::Press(code));
    }

    /// Queue a button release for the next capture.
    pub fn release(&self, code: ButtonCode) {
        self.feed(Step::Release(code));
    }

    /// Queue a raw axis sample for the next capture.
    pub fn move_axis(&self, axis: impl Into<u32>, raw: i32) {
        self.feed(Step::Axis {
            axis: axis.into(),
            raw,
        });
    }
}

impl DeviceBackend for ScriptedBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn capture(&mut self, input: &mut Input) {
        let steps = mem::take(&mut *self.queue.lock().unwrap_or_else(|e| e.into_inner()));
        for step in steps {
            match step {
                Step::Press(code) => {
                    let at = self.clock.fetch_add(1, Ordering::Relaxed);
                    input.sink().button_pressed(self.device, code, at);
                }
                Step::Release(code) => {
                    let at = self.clock.fetch_add(1, Ordering::Relaxed);
                    input.sink().button_released(self.device, code, at);
                }
                Step::Axis { axis, raw } => {
                    input.notify_axis_moved(self.device, axis, raw);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::InputAxis;
    use crate::sampler::GAMEPAD_AXIS_MAX;

    #[test]
    fn queued_steps_replay_on_capture() {
        let mut input = Input::new();
        let script = ScriptedBackend::new("scripted:0", 1);
        input.register_backend(Box::new(script.clone()));

        script.press(ButtonCode(9));
        script.move_axis(InputAxis::RightStickY, GAMEPAD_AXIS_MAX);

        input.update();
        input.trigger_callbacks();

        assert!(input.is_button_down(ButtonCode(9), 1));
        assert_eq!(input.axis_value(InputAxis::RightStickY, 1), 1.0);

        // The queue drained; the next capture replays nothing.
        input.update();
        input.trigger_callbacks();
        assert!(input.is_button_held(ButtonCode(9), 1));
        assert!(!input.is_button_down(ButtonCode(9), 1));
    }
}
