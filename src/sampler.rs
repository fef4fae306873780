//! Raw axis sampling.
//!
//! Producer threads report relative mouse motion at whatever rate the OS
//! delivers it; the main thread drains the accumulated motion once per frame.
//! Every field a producer can touch is atomic, so concurrent reports from
//! multiple platform threads can never corrupt the accumulator. The ingest
//! mutex is never taken on this path.
//!
//! The sampler also keeps the bookkeeping needed to estimate the effective
//! mouse sampling rate (seeded at a configurable rate, 125 Hz by default) and
//! an optional smoothing filter that renormalizes uneven sample batches
//! against the frame time and decays toward zero when the device goes idle.

use std::sync::atomic::{AtomicI32, AtomicU32, AtomicU64, Ordering};

/// Scale applied to the summed raw X/Y counts before they become the per-frame
/// mouse axis values. The wheel axis is published unscaled.
pub(crate) const MOUSE_AXIS_ATTENUATION: f32 = 0.1;

/// Hardware range reported by gamepad thumb axes.
pub const GAMEPAD_AXIS_MIN: i32 = -32768;
/// See [`GAMEPAD_AXIS_MAX`].
pub const GAMEPAD_AXIS_MAX: i32 = 32767;

/// Maps an integer axis sample linearly into `[-1.0, 1.0]`.
#[inline]
pub fn normalize_axis(raw: i32, min: i32, max: i32) -> f32 {
    ((raw - min) as f32 / (max - min) as f32) * 2.0 - 1.0
}

/// Clamps values inside the deadzone to zero and rescales the remainder so
/// the output still spans the full `[-1.0, 1.0]` range.
pub fn apply_deadzone(value: f32, deadzone: f32) -> f32 {
    if value.abs() < deadzone {
        0.0
    } else {
        value.signum() * (value.abs() - deadzone) / (1.0 - deadzone)
    }
}

/// An `f32` cell shared between producer threads and the frame loop.
struct AtomicF32(AtomicU32);

impl AtomicF32 {
    const fn new(value: f32) -> Self {
        AtomicF32(AtomicU32::new(value.to_bits()))
    }

    #[inline]
    fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    #[inline]
    fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }

    fn fetch_add(&self, delta: f32) {
        let mut current = self.0.load(Ordering::Relaxed);
        loop {
            let next = (f32::from_bits(current) + delta).to_bits();
            match self
                .0
                .compare_exchange_weak(current, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return,
                Err(observed) => current = observed,
            }
        }
    }
}

const AXIS_X: usize = 0;
const AXIS_Y: usize = 1;
const AXIS_WHEEL: usize = 2;

/// Accumulates relative mouse motion between frames.
pub struct MouseSampler {
    /// Summed raw counts since the last consume: X, Y, wheel.
    accumulator: [AtomicI32; 3],
    /// Cumulative sample count per axis, weighted by delta magnitude.
    samples: [AtomicU32; 2],
    /// Cumulative time spent actively sampling each axis.
    sampling_time: [AtomicF32; 2],
    smoothed: [AtomicF32; 2],
    zero_time: [AtomicF32; 2],
    last_sample_frame: AtomicU64,
    frame_index: AtomicU64,
    frame_delta: AtomicF32,
}

impl MouseSampler {
    /// `sample_rate` seeds the rate estimate until real samples dominate it.
    pub fn new(sample_rate: f32) -> Self {
        let initial_interval = 1.0 / sample_rate.max(1.0);
        MouseSampler {
            accumulator: [AtomicI32::new(0), AtomicI32::new(0), AtomicI32::new(0)],
            samples: [AtomicU32::new(1), AtomicU32::new(1)],
            sampling_time: [
                AtomicF32::new(initial_interval),
                AtomicF32::new(initial_interval),
            ],
            smoothed: [AtomicF32::new(0.0), AtomicF32::new(0.0)],
            zero_time: [AtomicF32::new(0.0), AtomicF32::new(0.0)],
            last_sample_frame: AtomicU64::new(0),
            frame_index: AtomicU64::new(0),
            frame_delta: AtomicF32::new(0.0),
        }
    }

    /// Publishes the new frame index and delta so producer-side bookkeeping
    /// can tell frames apart. Main thread, once per frame.
    pub(crate) fn begin_frame(&self, delta_seconds: f32) {
        self.frame_index.fetch_add(1, Ordering::Relaxed);
        self.frame_delta.store(delta_seconds);
    }

    /// Adds raw relative motion to the accumulator. Any thread, any rate.
    pub fn record_relative(&self, dx: i32, dy: i32, dz: i32) {
        self.accumulator[AXIS_X].fetch_add(dx, Ordering::Relaxed);
        self.accumulator[AXIS_Y].fetch_add(dy, Ordering::Relaxed);
        self.accumulator[AXIS_WHEEL].fetch_add(dz, Ordering::Relaxed);

        self.samples[AXIS_X].fetch_add(dx.unsigned_abs(), Ordering::Relaxed);
        self.samples[AXIS_Y].fetch_add(dy.unsigned_abs(), Ordering::Relaxed);

        // Advance the sampling-rate estimate once per frame per axis, and
        // only while the axis is genuinely active; idle periods would skew
        // the interval estimate downward.
        let frame = self.frame_index.load(Ordering::Relaxed);
        if self.last_sample_frame.swap(frame, Ordering::Relaxed) != frame {
            let delta = self.frame_delta.load();
            if dx != 0 && self.smoothed[AXIS_X].load().abs() > f32::EPSILON {
                self.sampling_time[AXIS_X].fetch_add(delta);
            }
            if dy != 0 && self.smoothed[AXIS_Y].load().abs() > f32::EPSILON {
                self.sampling_time[AXIS_Y].fetch_add(delta);
            }
        }
    }

    /// Reads and zeroes the accumulated motion. Main thread, once per frame.
    ///
    /// Returns the raw `(x, y, wheel)` sums, smoothed when requested; the
    /// caller applies attenuation and publishes the axis values.
    pub fn consume(&self, smoothing: bool) -> (f32, f32, f32) {
        let raw_x = self.accumulator[AXIS_X].swap(0, Ordering::Relaxed) as f32;
        let raw_y = self.accumulator[AXIS_Y].swap(0, Ordering::Relaxed) as f32;
        let raw_z = self.accumulator[AXIS_WHEEL].swap(0, Ordering::Relaxed) as f32;

        if smoothing {
            let delta = self.frame_delta.load();
            (
                self.smooth(raw_x, AXIS_X, delta),
                self.smooth(raw_y, AXIS_Y, delta),
                raw_z,
            )
        } else {
            (raw_x, raw_y, raw_z)
        }
    }

    /// Renormalizes one axis' frame sum against the estimated sample
    /// interval. Zero samples decay from the last smoothed value until the
    /// axis has been idle for a full interval; a stall of 0.25 s or longer
    /// resets the filter.
    fn smooth(&self, mut value: f32, idx: usize, delta: f32) -> f32 {
        if delta >= 0.25 {
            self.smoothed[idx].store(0.0);
            self.zero_time[idx].store(0.0);
            return value;
        }

        let interval = self.sampling_time[idx].load() / self.samples[idx].load(Ordering::Relaxed) as f32;

        if value == 0.0 {
            let idle = self.zero_time[idx].load() + delta;
            self.zero_time[idx].store(idle);
            if idle < interval {
                value = self.smoothed[idx].load() * delta / interval;
            } else {
                self.smoothed[idx].store(0.0);
            }
        } else {
            self.zero_time[idx].store(0.0);

            let mut batch = 1u32;
            if self.smoothed[idx].load().abs() > f32::EPSILON {
                if delta < interval * (batch + 1) as f32 {
                    value = value * delta / (interval * batch as f32);
                } else {
                    batch = (delta / interval).round() as u32;
                }
            }
            self.smoothed[idx].store(value / batch as f32);
        }

        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_raw_sums_until_consumed() {
        let sampler = MouseSampler::new(125.0);
        sampler.record_relative(2, -1, 0);
        sampler.record_relative(1, 1, 0);
        sampler.record_relative(0, 3, 0);

        assert_eq!(sampler.consume(false), (3.0, 3.0, 0.0));
        // Drained; the next frame starts from zero.
        assert_eq!(sampler.consume(false), (0.0, 0.0, 0.0));
    }

    #[test]
    fn wheel_ticks_accumulate_independently() {
        let sampler = MouseSampler::new(125.0);
        sampler.record_relative(0, 0, 2);
        sampler.record_relative(5, 0, -1);

        assert_eq!(sampler.consume(false), (5.0, 0.0, 1.0));
    }

    #[test]
    fn normalize_axis_endpoints() {
        assert_eq!(normalize_axis(GAMEPAD_AXIS_MIN, GAMEPAD_AXIS_MIN, GAMEPAD_AXIS_MAX), -1.0);
        assert_eq!(normalize_axis(GAMEPAD_AXIS_MAX, GAMEPAD_AXIS_MIN, GAMEPAD_AXIS_MAX), 1.0);

        let mid = normalize_axis(0, GAMEPAD_AXIS_MIN, GAMEPAD_AXIS_MAX);
        assert!(mid.abs() < 1e-4);
    }

    #[test]
    fn deadzone_clamps_and_rescales() {
        assert_eq!(apply_deadzone(0.02, 0.05), 0.0);
        assert_eq!(apply_deadzone(-0.04, 0.05), 0.0);
        assert_eq!(apply_deadzone(1.0, 0.05), 1.0);
        assert_eq!(apply_deadzone(-1.0, 0.05), -1.0);

        let rescaled = apply_deadzone(0.05, 0.05);
        assert!(rescaled.abs() < 1e-6);
    }

    #[test]
    fn smoothing_decays_toward_zero_when_idle() {
        // Seeded interval: (1/125) / 2 samples = 4 ms once one count lands.
        let sampler = MouseSampler::new(125.0);

        // Active frame establishes a smoothed value of 1.0.
        sampler.begin_frame(0.002);
        sampler.record_relative(1, 0, 0);
        let (x, _, _) = sampler.consume(true);
        assert_eq!(x, 1.0);

        // Idle frame shorter than the interval: the filter coasts on the
        // smoothed value instead of snapping to zero.
        sampler.begin_frame(0.002);
        let (x, _, _) = sampler.consume(true);
        assert!((x - 0.5).abs() < 1e-6);

        // Idle for a full interval: the output reaches zero.
        sampler.begin_frame(0.002);
        let (x, _, _) = sampler.consume(true);
        assert_eq!(x, 0.0);
    }

    #[test]
    fn long_stall_resets_the_filter() {
        let sampler = MouseSampler::new(125.0);
        sampler.begin_frame(1.0 / 125.0);
        sampler.record_relative(4, 0, 0);
        sampler.consume(true);

        sampler.begin_frame(0.5);
        let (x, _, _) = sampler.consume(true);
        assert_eq!(x, 0.0);
    }
}
