//! Portable logic core of a 24-hour alarm clock with a 4-digit multiplexed
//! 7-segment display and six pushbuttons.
//!
//! Everything in this crate is hardware-free and advances on fixed-rate
//! ticks, so the whole model runs under `cargo test` on the host. The
//! firmware crate plugs in the hardware at the seams: an [`AlarmSink`] for
//! the buzzer/LED lines, a [`DisplayDriver`] for the segment multiplexer,
//! and raw GPIO levels fed into [`EdgeInput`].
//!
//! [`AlarmSink`]: clock::AlarmSink
//! [`DisplayDriver`]: display::DisplayDriver
//! [`EdgeInput`]: input::EdgeInput

#![cfg_attr(not(test), no_std)]

pub mod clock;
pub mod config;
pub mod dispatch;
pub mod display;
pub mod fsm;
pub mod input;
pub mod time;

pub use clock::{AlarmSink, Clock};
pub use dispatch::{TickDispatcher, TickEvents};
pub use display::{Display, DisplayDriver, DisplayError};
pub use fsm::{ClockFsm, FsmInputs, Mode};
pub use input::{EdgeInput, HoldDetector};
pub use time::TimeValue;
