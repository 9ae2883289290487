//! The wall-clock/alarm state model. Advances on fixed-rate ticks and
//! raises the alarm edge through an [`AlarmSink`] capability.

use crate::time::{TimeValue, SECONDS_PER_DAY};

/// What the clock drives when the alarm edge is crossed.
///
/// The clock never calls `activate` twice without an intervening
/// `deactivate` or postpone, so implementations need no latching of
/// their own.
pub trait AlarmSink {
    fn activate(&mut self);
    fn deactivate(&mut self);
}

/// No-op sink, for tests and for clocks without an annunciator.
impl AlarmSink for () {
    fn activate(&mut self) {}
    fn deactivate(&mut self) {}
}

/// 24-hour clock with a single postponable alarm.
///
/// Current time and alarm time each carry a validity flag that stays
/// false until a valid value has been stored. Postpones accumulate in
/// `postpone_count` so that cancelling the alarm
/// ([`activate_alarm(false)`](Clock::activate_alarm)) can roll the alarm
/// time back to the originally programmed one.
pub struct Clock<S> {
    current_time: TimeValue,
    alarm_time: TimeValue,
    time_valid: bool,
    alarm_valid: bool,
    alarm_enabled: bool,
    alarm_active: bool,
    tick_counter: u32,
    ticks_per_second: u32,
    postpone_minutes: u32,
    postpone_count: u32,
    sink: S,
}

impl<S: AlarmSink> Clock<S> {
    pub fn new(ticks_per_second: u32, postpone_minutes: u32, sink: S) -> Self {
        assert!(ticks_per_second >= 1);
        assert!(postpone_minutes >= 1);
        Self {
            current_time: TimeValue::default(),
            alarm_time: TimeValue::default(),
            time_valid: false,
            alarm_valid: false,
            alarm_enabled: false,
            alarm_active: false,
            tick_counter: 0,
            ticks_per_second,
            postpone_minutes,
            postpone_count: 0,
            sink,
        }
    }

    /// Current time; `00:00:00` until a valid time has been set.
    pub fn time(&self) -> TimeValue {
        self.current_time
    }

    pub fn is_time_valid(&self) -> bool {
        self.time_valid
    }

    /// Stores a new current time. Invalid values are rejected and leave
    /// both the stored time and its validity unchanged.
    pub fn set_time(&mut self, new_time: TimeValue) -> bool {
        if !new_time.is_valid() {
            return false;
        }
        self.current_time = new_time;
        self.time_valid = true;
        true
    }

    /// Programmed alarm time; `00:00:00` until an alarm has been set.
    pub fn alarm(&self) -> TimeValue {
        self.alarm_time
    }

    pub fn is_alarm_valid(&self) -> bool {
        self.alarm_valid
    }

    /// Programs the alarm and enables it. Invalid values are rejected and
    /// leave the alarm state unchanged.
    pub fn set_alarm(&mut self, new_alarm: TimeValue) -> bool {
        if !new_alarm.is_valid() {
            return false;
        }
        self.alarm_time = new_alarm;
        self.alarm_valid = true;
        self.alarm_enabled = true;
        self.alarm_active = false;
        self.postpone_count = 0;
        true
    }

    /// Arms or disarms the alarm. Disarming while ringing also silences
    /// it, so a ringing alarm is always an enabled one.
    pub fn enable_alarm(&mut self, enable: bool) {
        self.alarm_enabled = enable;
        if !enable && self.alarm_active {
            self.alarm_active = false;
            self.sink.deactivate();
        }
    }

    pub fn is_alarm_enabled(&self) -> bool {
        self.alarm_enabled
    }

    pub fn is_alarm_active(&self) -> bool {
        self.alarm_active
    }

    /// Pushes the alarm back by the configured number of minutes and
    /// silences the ring flag without touching the sink; the tick path
    /// raises the edge again when the postponed time comes around.
    /// Fails when no alarm has been programmed.
    pub fn postpone_alarm(&mut self) -> bool {
        if !self.alarm_valid {
            return false;
        }
        self.alarm_active = false;
        let seconds =
            (self.alarm_time.total_seconds() + self.postpone_minutes * 60) % SECONDS_PER_DAY;
        self.alarm_time = TimeValue::from_seconds(seconds);
        self.postpone_count += 1;
        true
    }

    /// `on = true`: raises the alarm when the current time has reached the
    /// alarm time and the alarm is armed; called from [`Clock::tick`] so
    /// the edge fires on equality.
    ///
    /// `on = false`: cancels the ring for today. The accumulated
    /// postponement is rolled back so the alarm returns tomorrow at the
    /// originally programmed time.
    pub fn activate_alarm(&mut self, on: bool) {
        if on {
            if !self.alarm_active
                && self.alarm_valid
                && self.alarm_enabled
                && self.current_time == self.alarm_time
            {
                self.alarm_active = true;
                self.sink.activate();
            }
        } else {
            self.alarm_active = false;
            self.sink.deactivate();
            let rollback = i64::from(self.postpone_minutes) * 60 * i64::from(self.postpone_count);
            let seconds = (i64::from(self.alarm_time.total_seconds()) - rollback)
                .rem_euclid(i64::from(SECONDS_PER_DAY)) as u32;
            self.alarm_time = TimeValue::from_seconds(seconds);
            self.postpone_count = 0;
        }
    }

    /// One step of the fixed-rate tick source. Every `ticks_per_second`
    /// calls the clock advances one second, wrapping at midnight, and the
    /// alarm edge is evaluated.
    pub fn tick(&mut self) {
        self.tick_counter += 1;
        if self.tick_counter == self.ticks_per_second {
            self.tick_counter = 0;
            let seconds = (self.current_time.total_seconds() + 1) % SECONDS_PER_DAY;
            self.current_time = TimeValue::from_seconds(seconds);
            self.activate_alarm(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    const TICKS: u32 = 5;
    const POSTPONE: u32 = 5;

    #[derive(Default)]
    struct RingLog {
        activated: u32,
        deactivated: u32,
    }

    #[derive(Clone, Default)]
    struct SharedSink(Rc<RefCell<RingLog>>);

    impl AlarmSink for SharedSink {
        fn activate(&mut self) {
            self.0.borrow_mut().activated += 1;
        }

        fn deactivate(&mut self) {
            self.0.borrow_mut().deactivated += 1;
        }
    }

    fn clock() -> (Clock<SharedSink>, SharedSink) {
        let sink = SharedSink::default();
        (Clock::new(TICKS, POSTPONE, sink.clone()), sink)
    }

    fn advance_seconds(clock: &mut Clock<SharedSink>, seconds: u32) {
        for _ in 0..seconds * TICKS {
            clock.tick();
        }
    }

    #[test]
    fn starts_at_invalid_zero() {
        let (clock, _) = clock();
        assert!(!clock.is_time_valid());
        assert_eq!(clock.time(), TimeValue::from_hms(0, 0, 0));
        assert!(!clock.is_alarm_valid());
        assert!(!clock.is_alarm_enabled());
        assert!(!clock.is_alarm_active());
    }

    #[test]
    fn accepts_a_valid_time() {
        let (mut clock, _) = clock();
        assert!(clock.set_time(TimeValue::from_hms(21, 30, 45)));
        assert!(clock.is_time_valid());
        assert_eq!(clock.time(), TimeValue::from_hms(21, 30, 45));
    }

    #[test]
    fn rejects_an_invalid_time_without_touching_state() {
        let (mut clock, _) = clock();
        assert!(!clock.set_time(TimeValue::from_hms(24, 30, 45)));
        assert!(!clock.is_time_valid());
        assert_eq!(clock.time(), TimeValue::from_hms(0, 0, 0));

        clock.set_time(TimeValue::from_hms(10, 0, 0));
        assert!(!clock.set_time(TimeValue::from_hms(25, 0, 0)));
        assert!(clock.is_time_valid());
        assert_eq!(clock.time(), TimeValue::from_hms(10, 0, 0));
    }

    #[test]
    fn advances_one_second_per_tick_batch() {
        let (mut clock, _) = clock();
        clock.set_time(TimeValue::from_hms(0, 0, 0));
        advance_seconds(&mut clock, 1);
        assert_eq!(clock.time(), TimeValue::from_hms(0, 0, 1));
        advance_seconds(&mut clock, 9);
        assert_eq!(clock.time(), TimeValue::from_hms(0, 0, 10));
    }

    #[test]
    fn carries_through_minutes_and_hours() {
        let (mut clock, _) = clock();
        clock.set_time(TimeValue::from_hms(0, 0, 59));
        advance_seconds(&mut clock, 1);
        assert_eq!(clock.time(), TimeValue::from_hms(0, 1, 0));

        clock.set_time(TimeValue::from_hms(0, 59, 59));
        advance_seconds(&mut clock, 1);
        assert_eq!(clock.time(), TimeValue::from_hms(1, 0, 0));

        clock.set_time(TimeValue::from_hms(9, 59, 59));
        advance_seconds(&mut clock, 1);
        assert_eq!(clock.time(), TimeValue::from_hms(10, 0, 0));
    }

    #[test]
    fn wraps_at_midnight() {
        let (mut clock, _) = clock();
        clock.set_time(TimeValue::from_hms(23, 59, 55));
        advance_seconds(&mut clock, 5);
        assert_eq!(clock.time(), TimeValue::from_hms(0, 0, 0));
    }

    #[test]
    fn whole_ticks_only_advance_whole_seconds() {
        let (mut clock, _) = clock();
        clock.set_time(TimeValue::from_hms(0, 0, 0));
        for n in 0..(3 * TICKS + 2) {
            assert_eq!(clock.time().total_seconds(), n / TICKS);
            clock.tick();
        }
    }

    #[test]
    fn stores_and_reads_back_the_alarm() {
        let (mut clock, _) = clock();
        assert!(clock.set_alarm(TimeValue::from_hms(6, 30, 0)));
        assert!(clock.is_alarm_valid());
        assert!(clock.is_alarm_enabled());
        assert_eq!(clock.alarm(), TimeValue::from_hms(6, 30, 0));
    }

    #[test]
    fn rejects_an_invalid_alarm_without_touching_state() {
        let (mut clock, _) = clock();
        assert!(!clock.set_alarm(TimeValue::from_hms(24, 30, 0)));
        assert!(!clock.is_alarm_valid());
        assert!(!clock.is_alarm_enabled());
    }

    #[test]
    fn rings_on_equality_exactly_once() {
        let (mut clock, sink) = clock();
        clock.set_time(TimeValue::from_hms(12, 30, 0));
        clock.set_alarm(TimeValue::from_hms(12, 30, 2));
        advance_seconds(&mut clock, 2);
        assert!(clock.is_alarm_active());
        assert_eq!(sink.0.borrow().activated, 1);
    }

    #[test]
    fn does_not_ring_before_the_alarm_time() {
        let (mut clock, sink) = clock();
        clock.set_time(TimeValue::from_hms(12, 30, 0));
        clock.set_alarm(TimeValue::from_hms(12, 30, 3));
        advance_seconds(&mut clock, 2);
        assert!(!clock.is_alarm_active());
        assert_eq!(sink.0.borrow().activated, 0);
    }

    #[test]
    fn does_not_ring_while_disabled() {
        let (mut clock, sink) = clock();
        clock.set_time(TimeValue::from_hms(12, 30, 0));
        clock.set_alarm(TimeValue::from_hms(12, 30, 2));
        clock.enable_alarm(false);
        advance_seconds(&mut clock, 2);
        assert!(!clock.is_alarm_active());
        assert_eq!(sink.0.borrow().activated, 0);
    }

    #[test]
    fn postpone_silences_then_rings_five_minutes_later() {
        let (mut clock, sink) = clock();
        clock.set_time(TimeValue::from_hms(12, 30, 0));
        clock.set_alarm(TimeValue::from_hms(12, 30, 2));
        advance_seconds(&mut clock, 2);
        assert!(clock.is_alarm_active());

        assert!(clock.postpone_alarm());
        assert!(!clock.is_alarm_active());
        assert_eq!(clock.alarm(), TimeValue::from_hms(12, 35, 2));
        assert_eq!(sink.0.borrow().deactivated, 0);

        advance_seconds(&mut clock, POSTPONE * 60);
        assert!(clock.is_alarm_active());
        assert_eq!(sink.0.borrow().activated, 2);
    }

    #[test]
    fn postpone_requires_a_programmed_alarm() {
        let (mut clock, _) = clock();
        assert!(!clock.postpone_alarm());
    }

    #[test]
    fn cancel_restores_the_alarm_for_the_next_day() {
        let (mut clock, sink) = clock();
        clock.set_time(TimeValue::from_hms(12, 30, 0));
        clock.set_alarm(TimeValue::from_hms(12, 30, 2));
        advance_seconds(&mut clock, 2);
        assert!(clock.is_alarm_active());

        clock.activate_alarm(false);
        assert!(!clock.is_alarm_active());
        assert_eq!(sink.0.borrow().deactivated, 1);
        assert_eq!(clock.alarm(), TimeValue::from_hms(12, 30, 2));

        advance_seconds(&mut clock, SECONDS_PER_DAY - 1);
        assert!(!clock.is_alarm_active());
        advance_seconds(&mut clock, 1);
        assert!(clock.is_alarm_active());
    }

    #[test]
    fn cancel_rolls_back_accumulated_postponement() {
        let (mut clock, _) = clock();
        clock.set_time(TimeValue::from_hms(7, 0, 0));
        clock.set_alarm(TimeValue::from_hms(7, 0, 2));
        advance_seconds(&mut clock, 2);

        clock.postpone_alarm();
        clock.postpone_alarm();
        clock.postpone_alarm();
        assert_eq!(clock.alarm(), TimeValue::from_hms(7, 15, 2));

        clock.activate_alarm(false);
        assert_eq!(clock.alarm(), TimeValue::from_hms(7, 0, 2));
    }

    #[test]
    fn postpone_and_rollback_cross_midnight() {
        let (mut clock, _) = clock();
        clock.set_time(TimeValue::from_hms(23, 58, 0));
        clock.set_alarm(TimeValue::from_hms(23, 58, 0));
        assert!(clock.postpone_alarm());
        assert_eq!(clock.alarm(), TimeValue::from_hms(0, 3, 0));

        clock.activate_alarm(false);
        assert_eq!(clock.alarm(), TimeValue::from_hms(23, 58, 0));
    }

    #[test]
    fn active_implies_enabled() {
        let (mut clock, sink) = clock();
        clock.set_time(TimeValue::from_hms(12, 30, 0));
        clock.set_alarm(TimeValue::from_hms(12, 30, 1));
        advance_seconds(&mut clock, 1);
        assert!(clock.is_alarm_active() && clock.is_alarm_enabled());

        clock.enable_alarm(false);
        assert!(!clock.is_alarm_active());
        assert_eq!(sink.0.borrow().deactivated, 1);
    }

    #[test]
    fn never_rings_without_a_programmed_alarm() {
        let (mut clock, sink) = clock();
        clock.set_time(TimeValue::from_hms(23, 59, 58));
        clock.enable_alarm(true);
        advance_seconds(&mut clock, 3);
        assert!(!clock.is_alarm_active());
        assert_eq!(sink.0.borrow().activated, 0);
    }
}
