//! Blue Pill board bindings: the GPIO-backed display driver, the
//! buzzer/LED alarm sink, and the sampled pushbuttons.
//!
//! Pin map: segments a..g,p on PA0..PA7, digit selects on PB12..PB15,
//! buttons on PB5..PB10 (pull-up, active low), buzzer on PA8, alarm LEDs
//! on PA9..PA11.

use core::convert::Infallible;

use clock_core::clock::AlarmSink;
use clock_core::display::{
    DisplayDriver, SEGMENT_A, SEGMENT_B, SEGMENT_C, SEGMENT_D, SEGMENT_E, SEGMENT_F, SEGMENT_G,
    SEGMENT_P,
};
use clock_core::input::EdgeInput;
use embedded_hal::digital::v2::{InputPin, OutputPin};
use stm32f1xx_hal::gpio::{
    gpioa::{PA0, PA1, PA10, PA11, PA2, PA3, PA4, PA5, PA6, PA7, PA8, PA9},
    gpiob::{PB10, PB12, PB13, PB14, PB15, PB5, PB6, PB7, PB8, PB9},
    Input, Output, PullUp, PushPull,
};

pub struct SegmentPins {
    pub a: PA0<Output<PushPull>>,
    pub b: PA1<Output<PushPull>>,
    pub c: PA2<Output<PushPull>>,
    pub d: PA3<Output<PushPull>>,
    pub e: PA4<Output<PushPull>>,
    pub f: PA5<Output<PushPull>>,
    pub g: PA6<Output<PushPull>>,
    pub p: PA7<Output<PushPull>>,
}

impl SegmentPins {
    fn write(&mut self, value: u8) {
        let lines: [(&mut dyn OutputPin<Error = Infallible>, u8); 8] = [
            (&mut self.a, SEGMENT_A),
            (&mut self.b, SEGMENT_B),
            (&mut self.c, SEGMENT_C),
            (&mut self.d, SEGMENT_D),
            (&mut self.e, SEGMENT_E),
            (&mut self.f, SEGMENT_F),
            (&mut self.g, SEGMENT_G),
            (&mut self.p, SEGMENT_P),
        ];
        for (pin, mask) in lines {
            if value & mask != 0 {
                pin.set_high().ok();
            } else {
                pin.set_low().ok();
            }
        }
    }
}

pub struct DigitPins {
    pub d0: PB12<Output<PushPull>>,
    pub d1: PB13<Output<PushPull>>,
    pub d2: PB14<Output<PushPull>>,
    pub d3: PB15<Output<PushPull>>,
}

impl DigitPins {
    fn all_off(&mut self) {
        self.d0.set_low();
        self.d1.set_low();
        self.d2.set_low();
        self.d3.set_low();
    }

    fn on(&mut self, digit: u8) {
        match digit {
            0 => self.d0.set_high(),
            1 => self.d1.set_high(),
            2 => self.d2.set_high(),
            3 => self.d3.set_high(),
            _ => {}
        }
    }
}

/// One multiplexed 7-segment block driven over raw GPIO.
pub struct SevenSegment {
    segments: SegmentPins,
    digits: DigitPins,
}

impl SevenSegment {
    pub fn new(segments: SegmentPins, digits: DigitPins) -> Self {
        Self { segments, digits }
    }
}

impl DisplayDriver for SevenSegment {
    fn digits_off(&mut self) {
        self.digits.all_off();
    }

    fn update_segments(&mut self, segments: u8) {
        self.segments.write(segments);
    }

    fn digit_on(&mut self, digit: u8) {
        self.digits.on(digit);
    }
}

/// Buzzer and the three alarm LEDs, driven in lockstep.
pub struct AlarmOutputs {
    pub buzzer: PA8<Output<PushPull>>,
    pub led1: PA9<Output<PushPull>>,
    pub led2: PA10<Output<PushPull>>,
    pub led3: PA11<Output<PushPull>>,
}

impl AlarmSink for AlarmOutputs {
    fn activate(&mut self) {
        defmt::info!("alarm on");
        self.buzzer.set_high();
        self.led1.set_high();
        self.led2.set_high();
        self.led3.set_high();
    }

    fn deactivate(&mut self) {
        defmt::info!("alarm off");
        self.buzzer.set_low();
        self.led1.set_low();
        self.led2.set_low();
        self.led3.set_low();
    }
}

/// A sampled pushbutton: the pin plus its edge bookkeeping.
pub struct Key<P> {
    pin: P,
    edge: EdgeInput,
}

impl<P: InputPin> Key<P> {
    pub fn new(pin: P, inverted: bool) -> Self {
        Self {
            pin,
            edge: EdgeInput::new(inverted),
        }
    }

    /// Samples the pin and returns the edge detector for queries.
    pub fn poll(&mut self) -> &mut EdgeInput {
        let level = self.pin.is_high().unwrap_or(false);
        self.edge.update(level);
        &mut self.edge
    }

    pub fn is_active(&self) -> bool {
        self.edge.is_active()
    }
}

pub struct Keys {
    pub accept: Key<PB5<Input<PullUp>>>,
    pub cancel: Key<PB6<Input<PullUp>>>,
    pub increment: Key<PB7<Input<PullUp>>>,
    pub decrement: Key<PB8<Input<PullUp>>>,
    pub set_time: Key<PB9<Input<PullUp>>>,
    pub set_alarm: Key<PB10<Input<PullUp>>>,
}
