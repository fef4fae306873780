//! The input context and its per-frame protocol.
//!
//! [`Input`] owns every piece of input state: the ingest double buffer, the
//! device registry, the pointer, the observer bus and the registered device
//! backends. One main thread drives it with exactly two calls per simulation
//! frame, in order:
//!
//! 1. [`Input::update`] ages toggle states, captures the backends and
//!    consumes the accumulated mouse motion into axis values.
//! 2. [`Input::trigger_callbacks`] (after the platform has pumped its
//!    messages) swaps the double buffer and replays the frame's events to the
//!    observers.
//!
//! Queries are stable between `trigger_callbacks` and the next `update`.
//! Producers on other threads only ever touch the [`EventSink`] handle.

use std::mem;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::button::{ButtonCode, ButtonState};
use crate::device::{ensure_device, DeviceBackend, DeviceRecord};
use crate::event::{InputAxis, Point, PointerButton, PointerEvent};
use crate::eventbus::{EventFilter, InputObserver, ObserverBus};
use crate::ingest::{EventMarker, EventSink, Ingest};
use crate::pointer::PointerState;
use crate::sampler::{
    apply_deadzone, normalize_axis, MouseSampler, GAMEPAD_AXIS_MAX, GAMEPAD_AXIS_MIN,
    MOUSE_AXIS_ATTENUATION,
};
use crate::settings::InputSettings;

pub struct Input {
    ingest: Arc<Ingest>,
    sink: EventSink,
    settings: InputSettings,
    devices: Vec<DeviceRecord>,
    pointer: PointerState,
    observers: ObserverBus,
    backends: Vec<Box<dyn DeviceBackend>>,
    last_frame: Option<Instant>,
}

impl Default for Input {
    fn default() -> Self {
        Self::new()
    }
}

impl Input {
    pub fn new() -> Self {
        Self::with_settings(InputSettings::default())
    }

    pub fn with_settings(settings: InputSettings) -> Self {
        let ingest = Arc::new(Ingest::new(MouseSampler::new(settings.mouse_sample_rate)));
        let sink = EventSink::new(ingest.clone());
        debug!(?settings, "input core initialized");
        Input {
            ingest,
            sink,
            settings,
            devices: Vec::new(),
            pointer: PointerState::new(),
            observers: ObserverBus::new(),
            backends: Vec::new(),
            last_frame: None,
        }
    }

    /// The handle producers use to report raw events. Clone it freely; it is
    /// valid on any thread for the lifetime of the process.
    #[inline]
    pub fn sink(&self) -> &EventSink {
        &self.sink
    }

    #[inline]
    pub fn settings(&self) -> &InputSettings {
        &self.settings
    }

    /// Mutable access to the settings. `mouse_sample_rate` only seeds the
    /// rate estimator at construction; the other knobs apply immediately.
    #[inline]
    pub fn settings_mut(&mut self) -> &mut InputSettings {
        &mut self.settings
    }

    /// Registers a backend to be captured every frame, in registration order.
    pub fn register_backend(&mut self, backend: Box<dyn DeviceBackend>) {
        info!(name = backend.name(), "registered input backend");
        self.backends.push(backend);
    }

    /// Registers an observer; returns an id for
    /// [`enable_observer`](Self::enable_observer) /
    /// [`disable_observer`](Self::disable_observer) /
    /// [`remove_observer`](Self::remove_observer).
    pub fn add_observer(&mut self, observer: impl InputObserver + 'static, filter: EventFilter) -> u64 {
        self.observers.add(observer, filter)
    }

    pub fn enable_observer(&mut self, id: u64) {
        self.observers.enable(id);
    }

    pub fn disable_observer(&mut self, id: u64) {
        self.observers.disable(id);
    }

    pub fn remove_observer(&mut self, id: u64) {
        self.observers.remove(id);
    }

    /// First half of the frame protocol.
    ///
    /// Ages every toggle state from transient to steady, clears the per-frame
    /// pointer transients, captures the registered backends and consumes the
    /// accumulated mouse motion into the device-0 mouse axes.
    pub fn update(&mut self) {
        let now = Instant::now();
        let delta = self
            .last_frame
            .map(|t| now.duration_since(t).as_secs_f32())
            .unwrap_or(0.0);
        self.last_frame = Some(now);
        self.ingest.mouse.begin_frame(delta);

        for device in &mut self.devices {
            device.begin_frame();
        }
        self.pointer.begin_frame();

        // Backends push through the sink (and publish axes directly) while we
        // iterate, so take the list out of self for the duration.
        let mut backends = mem::take(&mut self.backends);
        for backend in &mut backends {
            backend.capture(self);
        }
        backends.append(&mut self.backends);
        self.backends = backends;

        let (x, y, wheel) = self.ingest.mouse.consume(self.settings.mouse_smoothing);
        self.axis_moved(0, -(x * MOUSE_AXIS_ATTENUATION), InputAxis::MouseX);
        self.axis_moved(0, -(y * MOUSE_AXIS_ATTENUATION), InputAxis::MouseY);
        self.axis_moved(0, wheel, InputAxis::MouseZ);
    }

    /// Second half of the frame protocol.
    ///
    /// Swaps the double buffer under the ingest lock, synthesizes a
    /// pointer-moved event if the cursor moved or scrolled, then replays the
    /// frame's events to the observers in arrival order. Toggle transitions
    /// are applied here, as a side effect of replay. Events staged while this
    /// runs land in the next frame.
    pub fn trigger_callbacks(&mut self) {
        let (mut read, cursor) = self.ingest.lock_queue().swap_and_take();

        if cursor.position != self.pointer.last_position() || cursor.scroll != 0.0 {
            let delta = self.pointer.record_position(cursor.position);
            let event = PointerEvent {
                position: cursor.position,
                delta,
                button: None,
                buttons_down: cursor.buttons_down,
                scroll: cursor.scroll,
                modifiers: cursor.modifiers,
            };
            self.observers.emit_pointer_moved(&event);
        }
        self.pointer.set_position(cursor.position);

        for marker in &read.markers {
            match *marker {
                EventMarker::ButtonDown(idx) => {
                    let event = read.button_down[idx];
                    ensure_device(&mut self.devices, event.device);
                    self.devices[event.device as usize].press(event.code);
                    self.observers.emit_button_down(&event);
                }
                EventMarker::ButtonUp(idx) => {
                    let event = read.button_up[idx];
                    // A release can be the first thing we ever hear from a
                    // device; grow the table rather than fail the frame.
                    ensure_device(&mut self.devices, event.device);
                    self.devices[event.device as usize].release(event.code);
                    self.observers.emit_button_up(&event);
                }
                EventMarker::PointerDown(idx) => {
                    let event = read.pointer_pressed[idx];
                    if let Some(button) = event.button {
                        self.pointer.press(button);
                    }
                    self.observers.emit_pointer_pressed(&event);
                }
                EventMarker::PointerUp(idx) => {
                    let event = read.pointer_released[idx];
                    if let Some(button) = event.button {
                        self.pointer.release(button);
                    }
                    self.observers.emit_pointer_released(&event);
                }
                EventMarker::PointerDoubleClick(idx) => {
                    self.pointer.mark_double_click();
                    self.observers.emit_pointer_double_click(&read.double_click[idx]);
                }
                EventMarker::TextInput(idx) => {
                    self.observers.emit_text_input(&read.text[idx]);
                }
            }
        }

        read.clear();
        self.ingest.lock_queue().restore(read);
    }

    /// Publishes an already-normalized axis value. Main thread only; used by
    /// backends during capture and by the core for the per-frame mouse axes.
    pub fn axis_moved(&mut self, device: u32, value: f32, axis: impl Into<u32>) {
        ensure_device(&mut self.devices, device);
        self.devices[device as usize].set_axis(axis.into(), value);
    }

    /// Publishes a raw gamepad axis sample: normalized into `[-1.0, 1.0]`
    /// and passed through the configured deadzone. Main thread only.
    pub fn notify_axis_moved(&mut self, gamepad: u32, axis: impl Into<u32>, raw: i32) {
        let value = normalize_axis(raw, GAMEPAD_AXIS_MIN, GAMEPAD_AXIS_MAX);
        let value = apply_deadzone(value, self.settings.gamepad_deadzone);
        self.axis_moved(gamepad, value, axis);
    }

    /// Current cursor position, as of the last `trigger_callbacks`.
    #[inline]
    pub fn pointer_position(&self) -> Point {
        self.pointer.position()
    }

    /// Cursor movement dispatched this frame.
    #[inline]
    pub fn pointer_delta(&self) -> Point {
        self.pointer.delta()
    }

    /// Full pointer state, for callers that want the button table directly.
    #[inline]
    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    /// Value of an axis on a device; unknown devices and axes answer 0.0.
    pub fn axis_value(&self, axis: impl Into<u32>, device: u32) -> f32 {
        self.devices
            .get(device as usize)
            .map(|record| record.axis(axis.into()))
            .unwrap_or(0.0)
    }

    /// State of a button on a device; unknown devices answer `Off`.
    pub fn button_state(&self, code: ButtonCode, device: u32) -> ButtonState {
        self.devices
            .get(device as usize)
            .map(|record| record.button_state(code))
            .unwrap_or(ButtonState::Off)
    }

    #[inline]
    pub fn is_button_held(&self, code: ButtonCode, device: u32) -> bool {
        self.button_state(code, device).is_held()
    }

    #[inline]
    pub fn is_button_down(&self, code: ButtonCode, device: u32) -> bool {
        self.button_state(code, device).is_down()
    }

    #[inline]
    pub fn is_button_up(&self, code: ButtonCode, device: u32) -> bool {
        self.button_state(code, device).is_up()
    }

    #[inline]
    pub fn is_pointer_button_held(&self, button: PointerButton) -> bool {
        self.pointer.is_held(button)
    }

    #[inline]
    pub fn is_pointer_button_down(&self, button: PointerButton) -> bool {
        self.pointer.is_down(button)
    }

    #[inline]
    pub fn is_pointer_button_up(&self, button: PointerButton) -> bool {
        self.pointer.is_up(button)
    }

    /// True for exactly the frame in which a double click was dispatched.
    #[inline]
    pub fn is_pointer_double_clicked(&self) -> bool {
        self.pointer.is_double_clicked()
    }

    /// Number of devices observed so far (including the implicit mouse-axis
    /// device 0 once a frame has run).
    #[inline]
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queries_degrade_for_unknown_devices() {
        let input = Input::new();
        assert_eq!(input.axis_value(InputAxis::MouseX, 7), 0.0);
        assert_eq!(input.button_state(ButtonCode(3), 7), ButtonState::Off);
        assert!(!input.is_button_held(ButtonCode(3), 7));
        assert!(!input.is_button_up(ButtonCode(3), 7));
    }

    #[test]
    fn axis_publish_grows_registry_and_storage() {
        let mut input = Input::new();
        input.axis_moved(2, 0.75, 5u32);

        assert_eq!(input.device_count(), 3);
        assert_eq!(input.axis_value(5u32, 2), 0.75);
        assert_eq!(input.axis_value(4u32, 2), 0.0);
    }

    #[test]
    fn gamepad_axis_normalized_and_deadzoned() {
        let mut input = Input::new();
        input.notify_axis_moved(1, InputAxis::LeftStickX, GAMEPAD_AXIS_MAX);
        assert_eq!(input.axis_value(InputAxis::LeftStickX, 1), 1.0);

        // Centered stick noise disappears into the deadzone.
        input.notify_axis_moved(1, InputAxis::LeftStickY, 100);
        assert_eq!(input.axis_value(InputAxis::LeftStickY, 1), 0.0);
    }

    #[test]
    fn mouse_axes_published_each_frame() {
        let mut input = Input::new();
        input.sink().mouse_moved(10, -20, 3);
        input.update();

        assert_eq!(input.axis_value(InputAxis::MouseX, 0), -1.0);
        assert_eq!(input.axis_value(InputAxis::MouseY, 0), 2.0);
        assert_eq!(input.axis_value(InputAxis::MouseZ, 0), 3.0);

        // Nothing new: the next frame zeroes the axes again.
        input.update();
        assert_eq!(input.axis_value(InputAxis::MouseX, 0), 0.0);
        assert_eq!(input.axis_value(InputAxis::MouseZ, 0), 0.0);
    }
}
