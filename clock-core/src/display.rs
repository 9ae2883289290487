//! State machine of a multiplexed 7-segment display.
//!
//! The display owns a buffer of segment patterns and pushes one digit per
//! [`Display::refresh`] call through a [`DisplayDriver`]; refreshing fast
//! enough makes all digits appear steady. Digit-range and decimal-point
//! flashing are counted in refresh cycles (one count per full multiplex
//! sweep), with `period = 2 * half_period`.

/// Hard upper bound on digits; the configured count may be lower.
pub const MAX_DIGITS: usize = 8;

pub const SEGMENT_A: u8 = 1 << 0;
pub const SEGMENT_B: u8 = 1 << 1;
pub const SEGMENT_C: u8 = 1 << 2;
pub const SEGMENT_D: u8 = 1 << 3;
pub const SEGMENT_E: u8 = 1 << 4;
pub const SEGMENT_F: u8 = 1 << 5;
pub const SEGMENT_G: u8 = 1 << 6;
pub const SEGMENT_P: u8 = 1 << 7;

/// Segment patterns for the decimal digits.
pub const DIGIT_MAP: [u8; 10] = [
    SEGMENT_A | SEGMENT_B | SEGMENT_C | SEGMENT_D | SEGMENT_E | SEGMENT_F,
    SEGMENT_B | SEGMENT_C,
    SEGMENT_A | SEGMENT_B | SEGMENT_D | SEGMENT_E | SEGMENT_G,
    SEGMENT_A | SEGMENT_B | SEGMENT_C | SEGMENT_D | SEGMENT_G,
    SEGMENT_B | SEGMENT_C | SEGMENT_F | SEGMENT_G,
    SEGMENT_A | SEGMENT_C | SEGMENT_D | SEGMENT_F | SEGMENT_G,
    SEGMENT_A | SEGMENT_C | SEGMENT_D | SEGMENT_E | SEGMENT_F | SEGMENT_G,
    SEGMENT_A | SEGMENT_B | SEGMENT_C,
    SEGMENT_A | SEGMENT_B | SEGMENT_C | SEGMENT_D | SEGMENT_E | SEGMENT_F | SEGMENT_G,
    SEGMENT_A | SEGMENT_B | SEGMENT_C | SEGMENT_D | SEGMENT_F | SEGMENT_G,
];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// A digit index or range fell outside the configured digit count.
    BoundsViolation,
}

/// Raw segment/digit lines, implemented over GPIO by the board layer.
pub trait DisplayDriver {
    fn digits_off(&mut self);
    fn update_segments(&mut self, segments: u8);
    fn digit_on(&mut self, digit: u8);
}

#[derive(Default)]
struct DigitFlash {
    from: u8,
    to: u8,
    count: u16,
    period: u16,
}

#[derive(Default)]
struct PointFlash {
    mask: u8,
    count: u16,
    period: u16,
}

pub struct Display<D> {
    digits: u8,
    current_digit: u8,
    digit_flashing: DigitFlash,
    point_flashing: PointFlash,
    point_set_mask: u8,
    value: [u8; MAX_DIGITS],
    driver: D,
}

impl<D: DisplayDriver> Display<D> {
    pub fn new(digits: u8, driver: D) -> Self {
        Self {
            digits: digits.min(MAX_DIGITS as u8),
            current_digit: 0,
            digit_flashing: DigitFlash::default(),
            point_flashing: PointFlash::default(),
            point_set_mask: 0,
            value: [0; MAX_DIGITS],
            driver,
        }
    }

    /// Replaces the displayed digits. Values beyond the configured digit
    /// count are ignored; codes outside `0..=9` blank their digit.
    pub fn write(&mut self, values: &[u8]) {
        self.value = [0; MAX_DIGITS];
        let count = usize::from(self.digits).min(values.len());
        for (slot, &digit) in self.value.iter_mut().zip(&values[..count]) {
            *slot = DIGIT_MAP.get(usize::from(digit)).copied().unwrap_or(0);
        }
    }

    /// Drives the next digit. Called from the fixed-rate refresh task.
    pub fn refresh(&mut self) {
        self.driver.digits_off();
        self.current_digit = (self.current_digit + 1) % self.digits;

        let mut segments = self.value[usize::from(self.current_digit)];

        if self.digit_flashing.period != 0 {
            if self.current_digit == 0 {
                self.digit_flashing.count =
                    (self.digit_flashing.count + 1) % self.digit_flashing.period;
            }
            if self.digit_flashing.count < self.digit_flashing.period / 2
                && self.current_digit >= self.digit_flashing.from
                && self.current_digit <= self.digit_flashing.to
            {
                segments = 0;
            }
        }

        if self.point_flashing.period != 0 {
            if self.current_digit == 0 {
                self.point_flashing.count =
                    (self.point_flashing.count + 1) % self.point_flashing.period;
            }
            if self.point_flashing.count >= self.point_flashing.period / 2
                && self.point_flashing.mask & (1 << self.current_digit) != 0
            {
                segments |= SEGMENT_P;
            }
        }

        if self.point_set_mask & (1 << self.current_digit) != 0 {
            segments |= SEGMENT_P;
        }

        self.driver.update_segments(segments);
        self.driver.digit_on(self.current_digit);
    }

    /// Blinks the digits in `from..=to`; `half_period = 0` stops blinking.
    pub fn flash_digits(&mut self, from: u8, to: u8, half_period: u16) -> Result<(), DisplayError> {
        if from > to || to >= self.digits {
            return Err(DisplayError::BoundsViolation);
        }
        self.digit_flashing.from = from;
        self.digit_flashing.to = to;
        self.digit_flashing.period = 2 * half_period;
        self.digit_flashing.count = 0;
        Ok(())
    }

    /// Blinks the decimal points selected by `mask`; `half_period = 0`
    /// stops blinking.
    pub fn flash_point(&mut self, mask: u8, half_period: u16) {
        self.point_flashing.mask = mask;
        self.point_flashing.period = 2 * half_period;
        self.point_flashing.count = 0;
    }

    /// Steady override for a single decimal point.
    pub fn set_point(&mut self, digit: u8, on: bool) -> Result<(), DisplayError> {
        if digit >= self.digits {
            return Err(DisplayError::BoundsViolation);
        }
        if on {
            self.point_set_mask |= 1 << digit;
        } else {
            self.point_set_mask &= !(1 << digit);
        }
        Ok(())
    }
}
