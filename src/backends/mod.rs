//! Device backends.
//!
//! A backend implements [`DeviceBackend`](crate::device::DeviceBackend) and is
//! registered on the [`Input`](crate::input::Input) context, which captures it
//! once per frame on the main thread. Real keyboard/mouse/gamepad backends
//! live with the platform layer and feed the core through the same trait and
//! the [`EventSink`](crate::ingest::EventSink) handle; this crate ships only
//! the scripted backend used by tests and demos.

pub mod scripted;

pub use scripted::ScriptedBackend;
