//! 24-hour alarm clock on a Blue Pill: four multiplexed 7-segment digits,
//! six pushbuttons, buzzer and alarm LEDs. All timekeeping and UI logic
//! lives in `clock-core`; this binary only binds it to the board and the
//! RTIC task structure.

#![no_main]
#![no_std]

use defmt_rtt as _;
use panic_probe as _;

mod board;

#[defmt::panic_handler]
fn panic() -> ! {
    cortex_m::asm::udf()
}

#[rtic::app(device = stm32f1xx_hal::pac, peripherals = true, dispatchers = [PVD, WWDG, RTC])]
mod app {
    use clock_core::config::{
        BUTTON_SCAN_MS, DIGITS, LONG_PRESS_MS, POSTPONE_MINUTES, TICKS_PER_SECOND,
    };
    use clock_core::{Clock, ClockFsm, Display, FsmInputs, HoldDetector, TickDispatcher};
    use dwt_systick_monotonic::{DwtSystick, ExtU32};
    use rtic::Monotonic;
    use stm32f1xx_hal::gpio::{gpioc::PC13, Output, PushPull};
    use stm32f1xx_hal::prelude::*;
    use stm32f1xx_hal::watchdog::IndependentWatchdog;

    use crate::board::{AlarmOutputs, DigitPins, Key, Keys, SegmentPins, SevenSegment};

    const FREQ: u32 = 72_000_000;
    #[monotonic(binds = SysTick, default = true)]
    type MyMono = DwtSystick<FREQ>;
    type Instant = <MyMono as Monotonic>::Instant;

    #[shared]
    struct Shared {
        clock: Clock<AlarmOutputs>,
        display: Display<SevenSegment>,
        dispatcher: TickDispatcher,
    }

    #[local]
    struct Local {
        fsm: ClockFsm,
        keys: Keys,
        set_time_hold: HoldDetector,
        set_alarm_hold: HoldDetector,
        led: PC13<Output<PushPull>>,
        wdg: IndependentWatchdog,
    }

    #[init]
    fn init(cx: init::Context) -> (Shared, Local, init::Monotonics) {
        defmt::info!("alarm clock starting");

        // workaround, see: https://github.com/knurling-rs/defmt/issues/322
        #[cfg(debug_assertions)]
        cx.device.DBGMCU.cr.modify(|_, w| {
            w.dbg_sleep().set_bit();
            w.dbg_standby().set_bit();
            w.dbg_stop().set_bit()
        });

        let mut flash = cx.device.FLASH.constrain();
        let rcc = cx.device.RCC.constrain();

        let clocks = rcc
            .cfgr
            .use_hse(8.mhz())
            .sysclk(FREQ.hz())
            .freeze(&mut flash.acr);

        let mut gpioa = cx.device.GPIOA.split();
        let mut gpiob = cx.device.GPIOB.split();
        let mut gpioc = cx.device.GPIOC.split();

        let segments = SegmentPins {
            a: gpioa.pa0.into_push_pull_output(&mut gpioa.crl),
            b: gpioa.pa1.into_push_pull_output(&mut gpioa.crl),
            c: gpioa.pa2.into_push_pull_output(&mut gpioa.crl),
            d: gpioa.pa3.into_push_pull_output(&mut gpioa.crl),
            e: gpioa.pa4.into_push_pull_output(&mut gpioa.crl),
            f: gpioa.pa5.into_push_pull_output(&mut gpioa.crl),
            g: gpioa.pa6.into_push_pull_output(&mut gpioa.crl),
            p: gpioa.pa7.into_push_pull_output(&mut gpioa.crl),
        };
        let digits = DigitPins {
            d0: gpiob.pb12.into_push_pull_output(&mut gpiob.crh),
            d1: gpiob.pb13.into_push_pull_output(&mut gpiob.crh),
            d2: gpiob.pb14.into_push_pull_output(&mut gpiob.crh),
            d3: gpiob.pb15.into_push_pull_output(&mut gpiob.crh),
        };
        let mut display = Display::new(DIGITS, SevenSegment::new(segments, digits));

        let sink = AlarmOutputs {
            buzzer: gpioa.pa8.into_push_pull_output(&mut gpioa.crh),
            led1: gpioa.pa9.into_push_pull_output(&mut gpioa.crh),
            led2: gpioa.pa10.into_push_pull_output(&mut gpioa.crh),
            led3: gpioa.pa11.into_push_pull_output(&mut gpioa.crh),
        };
        let clock = Clock::new(TICKS_PER_SECOND, POSTPONE_MINUTES, sink);

        // buttons are wired to ground, so the active level is low
        let keys = Keys {
            accept: Key::new(gpiob.pb5.into_pull_up_input(&mut gpiob.crl), true),
            cancel: Key::new(gpiob.pb6.into_pull_up_input(&mut gpiob.crl), true),
            increment: Key::new(gpiob.pb7.into_pull_up_input(&mut gpiob.crl), true),
            decrement: Key::new(gpiob.pb8.into_pull_up_input(&mut gpiob.crh), true),
            set_time: Key::new(gpiob.pb9.into_pull_up_input(&mut gpiob.crh), true),
            set_alarm: Key::new(gpiob.pb10.into_pull_up_input(&mut gpiob.crh), true),
        };

        let mut led = gpioc.pc13.into_push_pull_output(&mut gpioc.crh);
        led.set_high();

        let fsm = ClockFsm::new();
        fsm.apply_display_preset(&mut display);

        let mut dcb = cx.core.DCB;
        let dwt = cx.core.DWT;
        let systick = cx.core.SYST;
        let mut mono = DwtSystick::new(&mut dcb, dwt, systick, clocks.sysclk().0);

        let wdg = IndependentWatchdog::new(cx.device.IWDG);

        let first = mono.now() + 1.millis();
        tick::spawn_at(first, first).unwrap();
        poll_buttons::spawn_after(BUTTON_SCAN_MS.millis()).unwrap();

        (
            Shared {
                clock,
                display,
                dispatcher: TickDispatcher::default(),
            },
            Local {
                fsm,
                keys,
                set_time_hold: HoldDetector::new(LONG_PRESS_MS),
                set_alarm_hold: HoldDetector::new(LONG_PRESS_MS),
                led,
                wdg,
            },
            init::Monotonics(mono),
        )
    }

    #[task(shared = [clock, display, dispatcher], priority = 2)]
    fn tick(cx: tick::Context, instant: Instant) {
        let tick::SharedResources {
            clock,
            display,
            dispatcher,
        } = cx.shared;

        let events = (clock, display, dispatcher).lock(|clock, display, dispatcher| {
            display.refresh();
            dispatcher.tick(clock)
        });

        if events.half_second || events.inactivity_timeout {
            main_sm::spawn(FsmInputs {
                half_second: events.half_second,
                inactivity_timeout: events.inactivity_timeout,
                ..FsmInputs::default()
            })
            .ok();
        }

        let next = instant + 1.millis();
        tick::spawn_at(next, next).unwrap();
    }

    #[task(shared = [dispatcher], local = [keys, set_time_hold, set_alarm_hold], priority = 1)]
    fn poll_buttons(cx: poll_buttons::Context) {
        let keys = cx.local.keys;
        let mut dispatcher = cx.shared.dispatcher;

        keys.set_time.poll();
        keys.set_alarm.poll();
        let inputs = FsmInputs {
            accept: keys.accept.poll().was_activated(),
            cancel: keys.cancel.poll().was_activated(),
            increment: keys.increment.poll().was_activated(),
            decrement: keys.decrement.poll().was_activated(),
            set_time_long: cx
                .local
                .set_time_hold
                .update(keys.set_time.is_active(), BUTTON_SCAN_MS),
            set_alarm_long: cx
                .local
                .set_alarm_hold
                .update(keys.set_alarm.is_active(), BUTTON_SCAN_MS),
            half_second: false,
            inactivity_timeout: false,
        };

        if inputs.any_button() {
            dispatcher.lock(|dispatcher| dispatcher.note_activity());
        }
        main_sm::spawn(inputs).ok();

        poll_buttons::spawn_after(BUTTON_SCAN_MS.millis()).unwrap();
    }

    #[task(shared = [clock, display], local = [fsm], priority = 3, capacity = 4)]
    fn main_sm(cx: main_sm::Context, inputs: FsmInputs) {
        let main_sm::SharedResources { clock, display } = cx.shared;
        let fsm = cx.local.fsm;

        (clock, display).lock(|clock, display| {
            let previous = fsm.mode();
            fsm.step(&inputs, clock, display);
            if fsm.mode() != previous {
                defmt::debug!("mode {} -> {}", previous, fsm.mode());
            }
        });
    }

    #[idle(local = [led, wdg])]
    fn idle(cx: idle::Context) -> ! {
        cx.local.wdg.start(4000.ms());

        loop {
            cx.local.led.set_high();
            rtic::export::wfi();
            cx.local.led.set_low();
            cx.local.wdg.feed();
        }
    }
}
