//! Hand gesture pointer control.
//!
//! Turns the hand landmarks estimated from a webcam feed into pointer actions: the index fingertip
//! moves the pointer, and a small set of hand poses click, scroll, or stop pointer control.
//!
//! The pipeline for every frame is:
//!
//! 1. [`hand::fingers::finger_states`] decides which fingers are extended.
//! 2. [`gesture::GestureMode::classify`] maps the finger states to a mode.
//! 3. [`pointer::PointerMapper::update`] maps the fingertip to the screen and smooths the pointer
//!    movement, producing a [`pointer::Action`].
//!
//! [`control::ControlLoop`] runs these steps on frames from a [`control::HandSource`] and passes
//! the actions to a [`control::ActionSink`].
//!
//! # Coordinates
//!
//! Landmarks use the pixel coordinates of the camera image, screen positions use screen pixels.
//! In both, X points to the right and Y points *down*.
//!
//! # Environment Variables
//!
//! * `RUST_LOG`: overrides the log levels set up by [`init_logger!`].

use log::LevelFilter;

pub mod config;
pub mod control;
pub mod filter;
pub mod gesture;
pub mod hand;
pub mod pointer;
pub mod recording;
pub mod resolution;
pub mod timer;


/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = LevelFilter::Debug;
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_CRATE_NAME")), log_level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// The calling crate and this library will log at *debug* level, unless overridden with
/// `RUST_LOG`.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
