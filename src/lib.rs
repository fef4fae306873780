//! inlet: frame-synchronous input core for interactive applications.
//!
//! Platform callbacks push raw keyboard/mouse/gamepad/text events from any
//! thread through an [`EventSink`]; once per frame the main loop drives
//! [`Input::update`] and [`Input::trigger_callbacks`] to turn them into a
//! deterministic snapshot: single-frame pressed/released edges, continuous
//! held state, smoothed analog axes and ordered observer callbacks.

pub mod backends;
pub mod button;
pub mod device;
pub mod event;
pub mod eventbus;
pub mod ingest;
pub mod input;
pub mod logger;
pub mod pointer;
pub mod sampler;
pub mod settings;

pub use button::{ButtonCode, ButtonState};
pub use device::{DeviceBackend, DeviceRecord};
pub use event::{ButtonEvent, InputAxis, Modifiers, Point, PointerButton, PointerEvent, TextEvent};
pub use eventbus::{EventFilter, InputObserver};
pub use ingest::EventSink;
pub use input::Input;
pub use logger::Logger;
pub use pointer::PointerState;
pub use sampler::{apply_deadzone, normalize_axis, GAMEPAD_AXIS_MAX, GAMEPAD_AXIS_MIN};
pub use settings::{InputSettings, SettingsError};
