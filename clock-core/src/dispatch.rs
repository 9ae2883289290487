//! Converts the fixed-rate tick stream into clock advance and the slow
//! pulses the state machine consumes.

use crate::clock::{AlarmSink, Clock};
use crate::config::{HALF_SECOND_MS, INACTIVITY_MS};

/// Pulses raised by a single tick.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickEvents {
    pub half_second: bool,
    pub inactivity_timeout: bool,
}

/// Tick fan-out: advances the clock and counts out the half-second and
/// inactivity periods. Button activity resets the inactivity count via
/// [`TickDispatcher::note_activity`].
pub struct TickDispatcher {
    half_second_period: u32,
    inactivity_period: u32,
    half_second_count: u32,
    inactivity_count: u32,
}

impl TickDispatcher {
    pub fn new(half_second_period: u32, inactivity_period: u32) -> Self {
        assert!(half_second_period >= 1);
        assert!(inactivity_period >= 1);
        Self {
            half_second_period,
            inactivity_period,
            half_second_count: 0,
            inactivity_count: 0,
        }
    }

    /// One tick: advances `clock` and returns the pulses that elapsed.
    pub fn tick<S: AlarmSink>(&mut self, clock: &mut Clock<S>) -> TickEvents {
        clock.tick();

        let mut events = TickEvents::default();
        self.half_second_count += 1;
        if self.half_second_count >= self.half_second_period {
            self.half_second_count = 0;
            events.half_second = true;
        }
        self.inactivity_count += 1;
        if self.inactivity_count >= self.inactivity_period {
            self.inactivity_count = 0;
            events.inactivity_timeout = true;
        }
        events
    }

    /// Restarts the inactivity period; called on any button edge.
    pub fn note_activity(&mut self) {
        self.inactivity_count = 0;
    }
}

impl Default for TickDispatcher {
    fn default() -> Self {
        Self::new(HALF_SECOND_MS, INACTIVITY_MS)
    }
}
