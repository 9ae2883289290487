//! Edge and hold detection over sampled button levels.

/// Level and edge bookkeeping for one digital input.
///
/// The owner samples the raw line and feeds it to [`EdgeInput::update`];
/// `inverted` (fixed at construction) selects the active level. Each edge
/// is latched and reported exactly once by the `was_*` queries.
pub struct EdgeInput {
    inverted: bool,
    last_state: bool,
    activated: bool,
    deactivated: bool,
}

impl EdgeInput {
    pub fn new(inverted: bool) -> Self {
        Self {
            inverted,
            last_state: false,
            activated: false,
            deactivated: false,
        }
    }

    /// Feeds one raw level sample.
    pub fn update(&mut self, raw_level: bool) {
        let state = raw_level != self.inverted;
        if state && !self.last_state {
            self.activated = true;
        }
        if !state && self.last_state {
            self.deactivated = true;
        }
        self.last_state = state;
    }

    /// Logical level of the most recent sample.
    pub fn is_active(&self) -> bool {
        self.last_state
    }

    /// True once per observed rising edge.
    pub fn was_activated(&mut self) -> bool {
        core::mem::take(&mut self.activated)
    }

    /// True once per observed falling edge.
    pub fn was_deactivated(&mut self) -> bool {
        core::mem::take(&mut self.deactivated)
    }
}

/// Long-press detector for the set-time/set-alarm buttons.
///
/// Fed `(active, elapsed_ms)` once per poll; fires exactly once when the
/// button has been continuously active for at least the threshold, and
/// rearms when it is released.
pub struct HoldDetector {
    threshold_ms: u32,
    pressed: bool,
    fired: bool,
    held_ms: u32,
}

impl HoldDetector {
    pub fn new(threshold_ms: u32) -> Self {
        Self {
            threshold_ms,
            pressed: false,
            fired: false,
            held_ms: 0,
        }
    }

    pub fn update(&mut self, active: bool, elapsed_ms: u32) -> bool {
        if active {
            if !self.pressed {
                self.pressed = true;
                self.held_ms = 0;
            } else if !self.fired {
                self.held_ms = self.held_ms.saturating_add(elapsed_ms);
                if self.held_ms >= self.threshold_ms {
                    self.fired = true;
                    return true;
                }
            }
        } else {
            self.pressed = false;
            self.fired = false;
            self.held_ms = 0;
        }
        false
    }
}
