//! Compile-time tunables. The tick period is 1 ms, so tick counts and
//! millisecond durations coincide.

/// Clock ticks per wall-clock second.
pub const TICKS_PER_SECOND: u32 = 1_000;

/// Minutes the alarm is pushed back by each postpone.
pub const POSTPONE_MINUTES: u32 = 5;

/// Continuous hold required on the set-time/set-alarm buttons.
pub const LONG_PRESS_MS: u32 = 3_000;

/// Idle time after which a setting mode falls back to the time display.
pub const INACTIVITY_MS: u32 = 30_000;

/// Period of the colon-blink pulse.
pub const HALF_SECOND_MS: u32 = 500;

/// Half-period of digit/point flashing, in display refresh cycles.
pub const FLASH_HALF_PERIOD: u16 = 200;

/// Digits populated on the display.
pub const DIGITS: u8 = 4;

/// Button sampling period.
pub const BUTTON_SCAN_MS: u32 = 100;

/// Wraparound limit for the minute field.
pub const MINUTE_WRAP: u8 = 60;

/// Wraparound limit for the hour field.
pub const HOUR_WRAP: u8 = 24;
