//! Producer-side event staging.
//!
//! All raw events funnel through one mutex into the "write" half of a double
//! buffer. Each marker records the event kind plus an index into a payload
//! vector of that kind, so one unified sequence preserves arrival order
//! across kinds while payloads stay densely typed. At the frame boundary the
//! consumer flips which generation is written, moves the read generation out
//! and replays it without holding the lock; the drained buffers are handed
//! back afterwards so their capacity is reused.
//!
//! [`EventSink`] is the handle given to platform callbacks and device
//! backends. It is cheap to clone and safe to use from any thread; relative
//! mouse motion bypasses the mutex entirely and lands in the atomic
//! accumulator.

use std::mem;
use std::sync::{Arc, Mutex};

use tracing::trace;

use crate::button::ButtonCode;
use crate::event::{ButtonEvent, Modifiers, Point, PointerButton, PointerEvent, TextEvent};
use crate::sampler::MouseSampler;

/// Kind tag plus index into the matching payload vector of the same
/// generation.
#[derive(Clone, Copy, Debug)]
pub(crate) enum EventMarker {
    ButtonDown(usize),
    ButtonUp(usize),
    PointerDown(usize),
    PointerUp(usize),
    PointerDoubleClick(usize),
    TextInput(usize),
}

/// One half of the double buffer.
#[derive(Default)]
pub(crate) struct Generation {
    pub markers: Vec<EventMarker>,
    pub button_down: Vec<ButtonEvent>,
    pub button_up: Vec<ButtonEvent>,
    pub pointer_pressed: Vec<PointerEvent>,
    pub pointer_released: Vec<PointerEvent>,
    pub double_click: Vec<PointerEvent>,
    pub text: Vec<TextEvent>,
}

impl Generation {
    pub fn clear(&mut self) {
        self.markers.clear();
        self.button_down.clear();
        self.button_up.clear();
        self.pointer_pressed.clear();
        self.pointer_released.clear();
        self.double_click.clear();
        self.text.clear();
    }
}

/// Latest cursor report shared by producers, copied out at the swap.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct CursorSnapshot {
    pub position: Point,
    pub buttons_down: [bool; 3],
    pub modifiers: Modifiers,
    pub scroll: f32,
}

/// The double buffer itself: two symmetric generations and a flag selecting
/// which one producers write. Swapping flips the flag; neither generation
/// ever moves.
#[derive(Default)]
pub(crate) struct EventQueue {
    generations: [Generation; 2],
    write: usize,
    pub cursor: CursorSnapshot,
}

impl EventQueue {
    #[inline]
    fn write_side(&mut self) -> &mut Generation {
        &mut self.generations[self.write]
    }

    pub fn stage_button_down(&mut self, event: ButtonEvent) {
        let side = self.write_side();
        side.markers.push(EventMarker::ButtonDown(side.button_down.len()));
        side.button_down.push(event);
    }

    pub fn stage_button_up(&mut self, event: ButtonEvent) {
        let side = self.write_side();
        side.markers.push(EventMarker::ButtonUp(side.button_up.len()));
        side.button_up.push(event);
    }

    pub fn stage_pointer_pressed(&mut self, event: PointerEvent) {
        let side = self.write_side();
        side.markers.push(EventMarker::PointerDown(side.pointer_pressed.len()));
        side.pointer_pressed.push(event);
    }

    pub fn stage_pointer_released(&mut self, event: PointerEvent) {
        let side = self.write_side();
        side.markers.push(EventMarker::PointerUp(side.pointer_released.len()));
        side.pointer_released.push(event);
    }

    pub fn stage_double_click(&mut self, event: PointerEvent) {
        let side = self.write_side();
        side.markers.push(EventMarker::PointerDoubleClick(side.double_click.len()));
        side.double_click.push(event);
    }

    pub fn stage_text(&mut self, event: TextEvent) {
        let side = self.write_side();
        side.markers.push(EventMarker::TextInput(side.text.len()));
        side.text.push(event);
    }

    /// Frame boundary: flip the write flag, move the now-readable generation
    /// out, and copy the cursor snapshot, resetting its scroll accumulator.
    /// Everything staged from here on belongs to the next frame.
    pub fn swap_and_take(&mut self) -> (Generation, CursorSnapshot) {
        self.write ^= 1;
        let read = mem::take(&mut self.generations[self.write ^ 1]);
        let snapshot = self.cursor;
        self.cursor.scroll = 0.0;
        (read, snapshot)
    }

    /// Hands a drained generation's buffers back so capacity survives the
    /// frame.
    pub fn restore(&mut self, generation: Generation) {
        self.generations[self.write ^ 1] = generation;
    }
}

pub(crate) struct Ingest {
    pub queue: Mutex<EventQueue>,
    pub mouse: MouseSampler,
}

impl Ingest {
    pub fn new(mouse: MouseSampler) -> Self {
        Ingest {
            queue: Mutex::new(EventQueue::default()),
            mouse,
        }
    }

    /// A poisoned queue only means a producer panicked mid-append; the
    /// buffers themselves are still structurally sound.
    pub fn lock_queue(&self) -> std::sync::MutexGuard<'_, EventQueue> {
        self.queue.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Thread-safe handle through which platform callbacks and device backends
/// report raw events.
///
/// Clones share the same staging buffers. Every entry point is safe to call
/// concurrently from any number of producer threads; events staged before a
/// frame's swap are dispatched in that frame, later ones in the next.
#[derive(Clone)]
pub struct EventSink {
    ingest: Arc<Ingest>,
}

impl EventSink {
    pub(crate) fn new(ingest: Arc<Ingest>) -> Self {
        EventSink { ingest }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, EventQueue> {
        self.ingest.lock_queue()
    }

    /// A button went down on `device`.
    pub fn button_pressed(&self, device: u32, code: ButtonCode, timestamp: u64) {
        trace!(device, code = code.0, timestamp, "button pressed");
        self.lock().stage_button_down(ButtonEvent {
            device,
            code,
            timestamp,
        });
    }

    /// A button came up on `device`.
    pub fn button_released(&self, device: u32, code: ButtonCode, timestamp: u64) {
        trace!(device, code = code.0, timestamp, "button released");
        self.lock().stage_button_up(ButtonEvent {
            device,
            code,
            timestamp,
        });
    }

    /// Relative mouse motion and wheel ticks. Lock-free; see the sampler.
    pub fn mouse_moved(&self, dx: i32, dy: i32, dz: i32) {
        trace!(dx, dy, dz, "mouse moved");
        self.ingest.mouse.record_relative(dx, dy, dz);
    }

    /// A translated character of text input.
    pub fn char_input(&self, character: char) {
        trace!(%character, "char input");
        self.lock().stage_text(TextEvent { character });
    }

    /// Absolute cursor position report. Overwrites the shared snapshot; the
    /// per-frame movement event is synthesized at dispatch.
    pub fn cursor_moved(&self, position: Point, buttons_down: [bool; 3], modifiers: Modifiers) {
        let mut queue = self.lock();
        queue.cursor.position = position;
        queue.cursor.buttons_down = buttons_down;
        queue.cursor.modifiers = modifiers;
    }

    /// A pointer button went down.
    pub fn cursor_pressed(
        &self,
        position: Point,
        button: PointerButton,
        buttons_down: [bool; 3],
        modifiers: Modifiers,
    ) {
        trace!(?button, "cursor pressed");
        self.lock().stage_pointer_pressed(PointerEvent {
            position,
            delta: Point::ZERO,
            button: Some(button),
            buttons_down,
            scroll: 0.0,
            modifiers,
        });
    }

    /// A pointer button came up.
    pub fn cursor_released(
        &self,
        position: Point,
        button: PointerButton,
        buttons_down: [bool; 3],
        modifiers: Modifiers,
    ) {
        trace!(?button, "cursor released");
        self.lock().stage_pointer_released(PointerEvent {
            position,
            delta: Point::ZERO,
            button: Some(button),
            buttons_down,
            scroll: 0.0,
            modifiers,
        });
    }

    /// The platform reported a double click.
    pub fn cursor_double_click(
        &self,
        position: Point,
        buttons_down: [bool; 3],
        modifiers: Modifiers,
    ) {
        trace!("cursor double click");
        self.lock().stage_double_click(PointerEvent {
            position,
            delta: Point::ZERO,
            button: Some(PointerButton::Left),
            buttons_down,
            scroll: 0.0,
            modifiers,
        });
    }

    /// Wheel movement, accumulated until the next swap.
    pub fn wheel_scrolled(&self, amount: f32) {
        trace!(amount, "wheel scrolled");
        self.lock().cursor.scroll += amount;
    }
}
