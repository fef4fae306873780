//! Per-device state records and the backend capture seam.

use crate::button::{ButtonCode, ButtonState};
use crate::input::Input;

/// State owned by the core for one device: a fixed table of button states and
/// a growable array of axis values.
///
/// Records are created lazily the first time an event references an unseen
/// device index and are never destroyed; a device that disconnects simply
/// stops receiving updates.
pub struct DeviceRecord {
    buttons: [ButtonState; ButtonCode::TABLE_SIZE],
    axes: Vec<f32>,
}

impl Default for DeviceRecord {
    fn default() -> Self {
        DeviceRecord {
            buttons: [ButtonState::Off; ButtonCode::TABLE_SIZE],
            axes: Vec::new(),
        }
    }
}

impl DeviceRecord {
    /// Start-of-frame pass: age every button toggle and zero the axis values
    /// so backends re-publish their current readings during capture.
    pub(crate) fn begin_frame(&mut self) {
        for state in &mut self.buttons {
            *state = state.age();
        }
        for axis in &mut self.axes {
            *axis = 0.0;
        }
    }

    pub(crate) fn press(&mut self, code: ButtonCode) {
        if let Some(idx) = code.table_index() {
            self.buttons[idx] = self.buttons[idx].press();
        }
    }

    pub(crate) fn release(&mut self, code: ButtonCode) {
        if let Some(idx) = code.table_index() {
            self.buttons[idx] = self.buttons[idx].release();
        }
    }

    /// State of a button; codes outside the table answer `Off`.
    pub fn button_state(&self, code: ButtonCode) -> ButtonState {
        code.table_index()
            .map(|idx| self.buttons[idx])
            .unwrap_or(ButtonState::Off)
    }

    /// Publish an axis value, growing the array with zeroed slots up to the
    /// referenced id.
    pub(crate) fn set_axis(&mut self, axis: u32, value: f32) {
        let idx = axis as usize;
        while idx >= self.axes.len() {
            self.axes.push(0.0);
        }
        self.axes[idx] = value;
    }

    /// Value of an axis; unset ids answer 0.0.
    pub fn axis(&self, axis: u32) -> f32 {
        self.axes.get(axis as usize).copied().unwrap_or(0.0)
    }
}

/// Grows the registry so `device` is a valid index, preserving existing
/// records. Indices are dense and monotonically assigned, never reused.
pub(crate) fn ensure_device(devices: &mut Vec<DeviceRecord>, device: u32) {
    while device as usize >= devices.len() {
        devices.push(DeviceRecord::default());
    }
}

/// A source of raw input owned by the core.
///
/// Backends are captured once per frame from `Input::update`, on the main
/// thread. A capture pushes fresh button/pointer/text events through
/// [`Input::sink`](crate::input::Input::sink) and publishes already-normalized
/// axis values through [`Input::axis_moved`](crate::input::Input::axis_moved)
/// or [`Input::notify_axis_moved`](crate::input::Input::notify_axis_moved).
pub trait DeviceBackend: Send {
    fn name(&self) -> &str;

    /// Reads the input since the last call and reports it to `input`.
    fn capture(&mut self, input: &mut Input);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_storage_grows_with_zero_fill() {
        let mut record = DeviceRecord::default();
        assert_eq!(record.axis(4), 0.0);

        record.set_axis(4, 0.5);
        assert_eq!(record.axis(4), 0.5);
        assert_eq!(record.axis(0), 0.0);
        assert_eq!(record.axis(3), 0.0);
        assert_eq!(record.axis(9), 0.0);
    }

    #[test]
    fn begin_frame_zeroes_axes_and_ages_buttons() {
        let mut record = DeviceRecord::default();
        record.set_axis(1, -0.25);
        record.press(ButtonCode(7));

        record.begin_frame();

        assert_eq!(record.axis(1), 0.0);
        assert_eq!(record.button_state(ButtonCode(7)), ButtonState::On);
    }

    #[test]
    fn registry_growth_preserves_existing_records() {
        let mut devices = vec![DeviceRecord::default(), DeviceRecord::default()];
        devices[1].press(ButtonCode(3));

        ensure_device(&mut devices, 5);

        assert_eq!(devices.len(), 6);
        assert!(devices[1].button_state(ButtonCode(3)).is_down());
        for record in &devices[2..] {
            assert_eq!(record.button_state(ButtonCode(3)), ButtonState::Off);
        }
    }

    #[test]
    fn out_of_table_codes_degrade_gracefully() {
        let mut record = DeviceRecord::default();
        record.press(ButtonCode(u16::MAX));
        assert_eq!(record.button_state(ButtonCode(u16::MAX)), ButtonState::Off);
    }
}
