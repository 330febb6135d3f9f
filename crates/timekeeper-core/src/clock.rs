//! Authority clock: the player-manipulable time value.
//!
//! The clock is a pure function of two inputs: the last wall-clock sample
//! and the accumulated player offset. The displayed "authority time" is
//! `real + offset`; its hour/minute/second components feed every puzzle
//! predicate.
//!
//! # Design Principles
//!
//! - The clock never reads the system time itself. The runner samples a
//!   [`TimeSource`] at a fixed cadence and pushes samples in, which keeps
//!   the whole engine a pure function of its inputs and testable with
//!   fabricated timestamps.
//! - Offset accumulation saturates (no silent overflow).
//! - All derivations are total: an offset that would push the timestamp
//!   out of chrono's representable range falls back to the unshifted
//!   sample instead of failing.

use chrono::{Duration, NaiveDateTime, Timelike};
use timekeeper_types::ClockReading;

/// The player-manipulable clock shown on the face.
///
/// Holds the most recent real-time sample and the accumulated adjustment
/// offset. Derivations are pure; mutation happens only via [`sample`],
/// [`shift`], and [`clear_offset`].
///
/// [`sample`]: AuthorityClock::sample
/// [`shift`]: AuthorityClock::shift
/// [`clear_offset`]: AuthorityClock::clear_offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityClock {
    /// Last wall-clock sample pushed by the runner.
    real: NaiveDateTime,

    /// Accumulated player adjustment in milliseconds. Unbounded by design.
    offset_ms: i64,
}

impl AuthorityClock {
    /// Create a clock from an initial wall-clock sample, with zero offset.
    pub const fn new(real: NaiveDateTime) -> Self {
        Self { real, offset_ms: 0 }
    }

    /// Replace the real-time sample (called by the runner at >= 1 Hz).
    pub const fn sample(&mut self, now: NaiveDateTime) {
        self.real = now;
    }

    /// Accumulate a manual adjustment. Saturates at the i64 range.
    pub const fn shift(&mut self, delta_ms: i64) {
        self.offset_ms = self.offset_ms.saturating_add(delta_ms);
    }

    /// Zero the accumulated offset (the "sync" action).
    pub const fn clear_offset(&mut self) {
        self.offset_ms = 0;
    }

    /// The accumulated player offset in milliseconds.
    pub const fn offset_ms(&self) -> i64 {
        self.offset_ms
    }

    /// The last real-time sample.
    pub const fn real_time(&self) -> NaiveDateTime {
        self.real
    }

    /// The displayed authority time: `real + offset`.
    ///
    /// Falls back to the unshifted sample if the shift would leave
    /// chrono's representable range.
    pub fn authority_time(&self) -> NaiveDateTime {
        self.real
            .checked_add_signed(Duration::milliseconds(self.offset_ms))
            .unwrap_or(self.real)
    }

    /// Hour/minute/second components of the authority time on a 24-hour
    /// wall clock.
    pub fn reading(&self) -> ClockReading {
        let shown = self.authority_time();
        ClockReading {
            hour: shown.hour(),
            minute: shown.minute(),
            second: shown.second(),
        }
    }
}

/// Source of wall-clock samples: the single impure input to the engine.
///
/// The runner polls this once per sample interval. Production uses
/// [`SystemTimeSource`]; tests and scripted demos use
/// [`FixedStepTimeSource`] for full determinism.
pub trait TimeSource {
    /// The current wall-clock time.
    fn now(&mut self) -> NaiveDateTime;
}

/// Wall-clock time from the host system, in local time (the clock face
/// shows the player's own wall clock).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&mut self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// A deterministic time source advancing a fixed step per call.
#[derive(Debug, Clone)]
pub struct FixedStepTimeSource {
    /// The value returned by the next `now()` call.
    current: NaiveDateTime,
    /// Milliseconds added after each call.
    step_ms: i64,
}

impl FixedStepTimeSource {
    /// Create a source starting at `start`, advancing `step_ms` per call.
    pub const fn new(start: NaiveDateTime, step_ms: i64) -> Self {
        Self {
            current: start,
            step_ms,
        }
    }
}

impl TimeSource for FixedStepTimeSource {
    fn now(&mut self) -> NaiveDateTime {
        let now = self.current;
        self.current = self
            .current
            .checked_add_signed(Duration::milliseconds(self.step_ms))
            .unwrap_or(self.current);
        now
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 14)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn zero_offset_shows_real_time() {
        let clock = AuthorityClock::new(at(20, 22, 0));
        assert_eq!(
            clock.reading(),
            ClockReading {
                hour: 20,
                minute: 22,
                second: 0
            }
        );
        assert_eq!(clock.offset_ms(), 0);
    }

    #[test]
    fn forward_shift_moves_the_reading() {
        let mut clock = AuthorityClock::new(at(10, 0, 0));
        clock.shift(3_600_000); // +1 hour
        assert_eq!(clock.reading().hour, 11);
        clock.shift(60_000); // +1 minute
        assert_eq!(clock.reading().minute, 1);
        assert_eq!(clock.offset_ms(), 3_660_000);
    }

    #[test]
    fn backward_shift_wraps_past_midnight() {
        let mut clock = AuthorityClock::new(at(0, 30, 0));
        clock.shift(-3_600_000); // -1 hour
        assert_eq!(clock.reading().hour, 23);
        assert_eq!(clock.reading().minute, 30);
    }

    #[test]
    fn forward_shift_wraps_into_the_next_day() {
        let mut clock = AuthorityClock::new(at(23, 30, 0));
        clock.shift(3_600_000);
        assert_eq!(clock.reading().hour, 0);
        assert_eq!(clock.reading().minute, 30);
    }

    #[test]
    fn opposite_shifts_cancel() {
        let mut clock = AuthorityClock::new(at(12, 0, 0));
        clock.shift(3_600_000);
        clock.shift(-3_600_000);
        assert_eq!(clock.offset_ms(), 0);
        assert_eq!(clock.reading().hour, 12);
    }

    #[test]
    fn clear_offset_restores_real_time() {
        let mut clock = AuthorityClock::new(at(8, 15, 42));
        clock.shift(-7_200_000);
        clock.clear_offset();
        assert_eq!(clock.offset_ms(), 0);
        assert_eq!(
            clock.reading(),
            ClockReading {
                hour: 8,
                minute: 15,
                second: 42
            }
        );
    }

    #[test]
    fn sample_updates_real_time_under_offset() {
        let mut clock = AuthorityClock::new(at(9, 0, 0));
        clock.shift(60_000);
        clock.sample(at(9, 0, 1));
        assert_eq!(clock.reading().minute, 1);
        assert_eq!(clock.reading().second, 1);
    }

    #[test]
    fn shift_saturates_instead_of_overflowing() {
        let mut clock = AuthorityClock::new(at(12, 0, 0));
        clock.shift(i64::MAX);
        clock.shift(i64::MAX);
        assert_eq!(clock.offset_ms(), i64::MAX);
        // Out-of-range authority time falls back to the raw sample.
        assert_eq!(clock.reading().hour, 12);
    }

    #[test]
    fn fixed_step_source_advances() {
        let mut source = FixedStepTimeSource::new(at(0, 0, 0), 1_000);
        assert_eq!(source.now(), at(0, 0, 0));
        assert_eq!(source.now(), at(0, 0, 1));
        assert_eq!(source.now(), at(0, 0, 2));
    }
}
