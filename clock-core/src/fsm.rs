//! The six-mode user-interface state machine.
//!
//! One [`ClockFsm::step`] consumes the edges and pulses gathered since the
//! previous wakeup and issues the resulting clock and display commands.
//! When several inputs arrive in the same wakeup the per-mode rules are
//! applied in order; transitions are mutually exclusive because each one
//! installs a new mode.

use crate::clock::{AlarmSink, Clock};
use crate::config::{FLASH_HALF_PERIOD, HOUR_WRAP, MINUTE_WRAP};
use crate::display::{Display, DisplayDriver};
use crate::time::{bcd_decrement, bcd_increment, TimeValue};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    UnsetTime,
    ShowTime,
    SetTimeMinute,
    SetTimeHour,
    SetAlarmMinute,
    SetAlarmHour,
}

/// Inputs drained for one step. Every field is an edge or pulse that
/// fires at most once per wakeup.
#[derive(Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FsmInputs {
    pub accept: bool,
    pub cancel: bool,
    pub increment: bool,
    pub decrement: bool,
    pub set_time_long: bool,
    pub set_alarm_long: bool,
    pub half_second: bool,
    pub inactivity_timeout: bool,
}

impl FsmInputs {
    /// True when any button edge is present (timer pulses excluded).
    pub fn any_button(&self) -> bool {
        self.accept
            || self.cancel
            || self.increment
            || self.decrement
            || self.set_time_long
            || self.set_alarm_long
    }
}

pub struct ClockFsm {
    mode: Mode,
    hour: [u8; 2],
    minute: [u8; 2],
    alarm_was_set: bool,
    colon: bool,
}

impl ClockFsm {
    pub fn new() -> Self {
        Self {
            mode: Mode::UnsetTime,
            hour: [0; 2],
            minute: [0; 2],
            alarm_was_set: false,
            colon: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Installs the display preset of the current mode. The composition
    /// root calls this once at startup for the initial `UnsetTime` screen;
    /// afterwards every transition reapplies it.
    pub fn apply_display_preset<D: DisplayDriver>(&self, display: &mut Display<D>) {
        match self.mode {
            Mode::UnsetTime => {
                display.flash_digits(0, 3, FLASH_HALF_PERIOD).ok();
                display.flash_point(0b0000_0010, FLASH_HALF_PERIOD);
                display.set_point(0, false).ok();
                display.set_point(2, false).ok();
                display.set_point(3, false).ok();
            }
            Mode::ShowTime => {
                display.flash_digits(0, 0, 0).ok();
                display.flash_point(0, 0);
                display.set_point(2, false).ok();
            }
            Mode::SetTimeMinute => {
                display.flash_digits(2, 3, FLASH_HALF_PERIOD).ok();
                display.flash_point(0, 0);
                for digit in 0..4 {
                    display.set_point(digit, false).ok();
                }
            }
            Mode::SetTimeHour => {
                display.flash_digits(0, 1, FLASH_HALF_PERIOD).ok();
                display.flash_point(0, 0);
                for digit in 0..4 {
                    display.set_point(digit, false).ok();
                }
            }
            Mode::SetAlarmMinute => {
                display.flash_digits(2, 3, FLASH_HALF_PERIOD).ok();
                display.flash_point(0, 0);
                for digit in 0..4 {
                    display.set_point(digit, true).ok();
                }
            }
            Mode::SetAlarmHour => {
                display.flash_digits(0, 1, FLASH_HALF_PERIOD).ok();
                display.flash_point(0, 0);
                for digit in 0..4 {
                    display.set_point(digit, true).ok();
                }
            }
        }
    }

    pub fn step<S: AlarmSink, D: DisplayDriver>(
        &mut self,
        inputs: &FsmInputs,
        clock: &mut Clock<S>,
        display: &mut Display<D>,
    ) {
        match self.mode {
            Mode::UnsetTime => {
                self.load_buffers(clock.time());
                display.write(&self.digits());
                if inputs.set_time_long {
                    self.change_mode(Mode::SetTimeMinute, display);
                }
            }
            Mode::ShowTime => {
                self.load_buffers(clock.time());
                display.write(&self.digits());
                display.set_point(0, clock.is_alarm_active()).ok();
                display.set_point(3, clock.is_alarm_enabled()).ok();
                if inputs.half_second {
                    self.colon = !self.colon;
                    display.set_point(1, self.colon).ok();
                }
                if inputs.set_time_long {
                    self.change_mode(Mode::SetTimeMinute, display);
                }
                if inputs.set_alarm_long {
                    self.load_buffers(clock.alarm());
                    display.write(&self.digits());
                    self.change_mode(Mode::SetAlarmMinute, display);
                }
                if clock.is_alarm_active() {
                    if inputs.accept {
                        clock.postpone_alarm();
                    }
                    if inputs.cancel {
                        clock.activate_alarm(false);
                    }
                } else if self.alarm_was_set {
                    if inputs.accept {
                        clock.enable_alarm(true);
                    }
                    if inputs.cancel {
                        clock.enable_alarm(false);
                    }
                }
            }
            Mode::SetTimeMinute => {
                if inputs.increment {
                    bcd_increment(&mut self.minute, MINUTE_WRAP);
                }
                if inputs.decrement {
                    bcd_decrement(&mut self.minute, MINUTE_WRAP);
                }
                display.write(&self.digits());
                if inputs.accept {
                    self.change_mode(Mode::SetTimeHour, display);
                }
                if inputs.cancel || inputs.inactivity_timeout {
                    self.leave_time_setting(clock, display);
                }
            }
            Mode::SetTimeHour => {
                if inputs.increment {
                    bcd_increment(&mut self.hour, HOUR_WRAP);
                }
                if inputs.decrement {
                    bcd_decrement(&mut self.hour, HOUR_WRAP);
                }
                display.write(&self.digits());
                if inputs.accept {
                    clock.set_time(TimeValue::from_display_digits(self.digits()));
                    self.change_mode(Mode::ShowTime, display);
                }
                if inputs.cancel || inputs.inactivity_timeout {
                    self.leave_time_setting(clock, display);
                }
            }
            Mode::SetAlarmMinute => {
                if inputs.increment {
                    bcd_increment(&mut self.minute, MINUTE_WRAP);
                }
                if inputs.decrement {
                    bcd_decrement(&mut self.minute, MINUTE_WRAP);
                }
                display.write(&self.digits());
                if inputs.accept {
                    self.change_mode(Mode::SetAlarmHour, display);
                }
                if inputs.cancel || inputs.inactivity_timeout {
                    self.change_mode(Mode::ShowTime, display);
                }
            }
            Mode::SetAlarmHour => {
                if inputs.increment {
                    bcd_increment(&mut self.hour, HOUR_WRAP);
                }
                if inputs.decrement {
                    bcd_decrement(&mut self.hour, HOUR_WRAP);
                }
                display.write(&self.digits());
                if inputs.accept {
                    clock.set_alarm(TimeValue::from_display_digits(self.digits()));
                    self.alarm_was_set = true;
                    self.change_mode(Mode::ShowTime, display);
                }
                if inputs.cancel || inputs.inactivity_timeout {
                    self.change_mode(Mode::ShowTime, display);
                }
            }
        }
    }

    fn digits(&self) -> [u8; 4] {
        [self.hour[0], self.hour[1], self.minute[0], self.minute[1]]
    }

    fn load_buffers(&mut self, time: TimeValue) {
        let digits = time.display_digits();
        self.hour = [digits[0], digits[1]];
        self.minute = [digits[2], digits[3]];
    }

    fn change_mode<D: DisplayDriver>(&mut self, mode: Mode, display: &mut Display<D>) {
        self.mode = mode;
        self.apply_display_preset(display);
    }

    fn leave_time_setting<S: AlarmSink, D: DisplayDriver>(
        &mut self,
        clock: &Clock<S>,
        display: &mut Display<D>,
    ) {
        if clock.is_time_valid() {
            self.change_mode(Mode::ShowTime, display);
        } else {
            self.change_mode(Mode::UnsetTime, display);
        }
    }
}

impl Default for ClockFsm {
    fn default() -> Self {
        Self::new()
    }
}
