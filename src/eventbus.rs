//! Observer registry for dispatched input events.
//!
//! Observers are boxed into the bus and invoked synchronously, on the main
//! thread, while the frame's event queue is replayed. Within one frame the
//! channels fire in the exact order the producers staged the corresponding
//! raw events.

use std::collections::HashMap;

use crate::event::{ButtonEvent, PointerEvent, TextEvent};

/// Trait for reacting to dispatched input events.
///
/// Every method has an empty default body; implement only the channels you
/// care about.
pub trait InputObserver: Send {
    fn button_down(&mut self, _event: &ButtonEvent) {}
    fn button_up(&mut self, _event: &ButtonEvent) {}
    fn pointer_moved(&mut self, _event: &PointerEvent) {}
    fn pointer_pressed(&mut self, _event: &PointerEvent) {}
    fn pointer_released(&mut self, _event: &PointerEvent) {}
    fn pointer_double_click(&mut self, _event: &PointerEvent) {}
    fn text_input(&mut self, _event: &TextEvent) {}
}

/// Determines which channels a registered observer receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventFilter {
    All,
    ButtonsOnly,
    PointerOnly,
    TextOnly,
}

impl EventFilter {
    #[inline]
    fn passes_buttons(self) -> bool {
        matches!(self, EventFilter::All | EventFilter::ButtonsOnly)
    }

    #[inline]
    fn passes_pointer(self) -> bool {
        matches!(self, EventFilter::All | EventFilter::PointerOnly)
    }

    #[inline]
    fn passes_text(self) -> bool {
        matches!(self, EventFilter::All | EventFilter::TextOnly)
    }
}

/// Metadata-wrapped observer with filter and control flags.
struct ObserverEntry {
    observer: Box<dyn InputObserver>,
    enabled: bool,
    filter: EventFilter,
}

pub struct ObserverBus {
    next_id: u64,
    entries: HashMap<u64, ObserverEntry>,
}

impl Default for ObserverBus {
    fn default() -> Self {
        Self::new()
    }
}

impl ObserverBus {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entries: HashMap::new(),
        }
    }

    /// Registers an observer with the given channel filter.
    pub fn add(&mut self, observer: impl InputObserver + 'static, filter: EventFilter) -> u64 {
        let id = self.next_id;
        self.entries.insert(
            id,
            ObserverEntry {
                observer: Box::new(observer),
                enabled: true,
                filter,
            },
        );
        self.next_id += 1;
        id
    }

    /// Enables a previously registered observer.
    pub fn enable(&mut self, id: u64) {
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.enabled = true;
        }
    }

    /// Disables (mutes) an observer without removing it.
    pub fn disable(&mut self, id: u64) {
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.enabled = false;
        }
    }

    /// Unregisters an observer entirely.
    pub fn remove(&mut self, id: u64) {
        self.entries.remove(&id);
    }

    fn each_button(&mut self, f: impl Fn(&mut dyn InputObserver)) {
        for entry in self.entries.values_mut() {
            if entry.enabled && entry.filter.passes_buttons() {
                f(entry.observer.as_mut());
            }
        }
    }

    fn each_pointer(&mut self, f: impl Fn(&mut dyn InputObserver)) {
        for entry in self.entries.values_mut() {
            if entry.enabled && entry.filter.passes_pointer() {
                f(entry.observer.as_mut());
            }
        }
    }

    pub(crate) fn emit_button_down(&mut self, event: &ButtonEvent) {
        self.each_button(|obs| obs.button_down(event));
    }

    pub(crate) fn emit_button_up(&mut self, event: &ButtonEvent) {
        self.each_button(|obs| obs.button_up(event));
    }

    pub(crate) fn emit_pointer_moved(&mut self, event: &PointerEvent) {
        self.each_pointer(|obs| obs.pointer_moved(event));
    }

    pub(crate) fn emit_pointer_pressed(&mut self, event: &PointerEvent) {
        self.each_pointer(|obs| obs.pointer_pressed(event));
    }

    pub(crate) fn emit_pointer_released(&mut self, event: &PointerEvent) {
        self.each_pointer(|obs| obs.pointer_released(event));
    }

    pub(crate) fn emit_pointer_double_click(&mut self, event: &PointerEvent) {
        self.each_pointer(|obs| obs.pointer_double_click(event));
    }

    pub(crate) fn emit_text_input(&mut self, event: &TextEvent) {
        for entry in self.entries.values_mut() {
            if entry.enabled && entry.filter.passes_text() {
                entry.observer.text_input(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::button::ButtonCode;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counter {
        buttons: Arc<AtomicUsize>,
        text: Arc<AtomicUsize>,
    }

    impl InputObserver for Counter {
        fn button_down(&mut self, _event: &ButtonEvent) {
            self.buttons.fetch_add(1, Ordering::Relaxed);
        }

        fn text_input(&mut self, _event: &TextEvent) {
            self.text.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn counter() -> (Counter, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let buttons = Arc::new(AtomicUsize::new(0));
        let text = Arc::new(AtomicUsize::new(0));
        (
            Counter {
                buttons: buttons.clone(),
                text: text.clone(),
            },
            buttons,
            text,
        )
    }

    fn press() -> ButtonEvent {
        ButtonEvent {
            device: 0,
            code: ButtonCode(1),
            timestamp: 0,
        }
    }

    #[test]
    fn filter_selects_channels() {
        let mut bus = ObserverBus::new();
        let (obs, buttons, text) = counter();
        bus.add(obs, EventFilter::ButtonsOnly);

        bus.emit_button_down(&press());
        bus.emit_text_input(&TextEvent { character: 'x' });

        assert_eq!(buttons.load(Ordering::Relaxed), 1);
        assert_eq!(text.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn disable_mutes_without_removing() {
        let mut bus = ObserverBus::new();
        let (obs, buttons, _) = counter();
        let id = bus.add(obs, EventFilter::All);

        bus.emit_button_down(&press());
        bus.disable(id);
        bus.emit_button_down(&press());
        bus.enable(id);
        bus.emit_button_down(&press());

        assert_eq!(buttons.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn remove_unregisters() {
        let mut bus = ObserverBus::new();
        let (obs, buttons, _) = counter();
        let id = bus.add(obs, EventFilter::All);

        bus.emit_button_down(&press());
        bus.remove(id);
        bus.emit_button_down(&press());

        assert_eq!(buttons.load(Ordering::Relaxed), 1);
    }
}
