//! Performance measurement tools.

use std::{
    cell::Cell,
    fmt,
    time::{Duration, Instant},
};

use crate::filter::{
    ema::{Ema, EmaState},
    Filter,
};

const EMA_ALPHA: f32 = 0.3;

/// A timer that measures and averages the time an operation takes.
///
/// Collected timings are reset whenever the timer is displayed using `{}`
/// ([`std::fmt::Display`]).
pub struct Timer {
    name: &'static str,
    ema: Ema,
    ema_state: Cell<EmaState>,
    count: Cell<usize>,
}

impl Timer {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            ema: Ema::new(EMA_ALPHA),
            ema_state: Cell::new(EmaState::default()),
            count: Cell::new(0),
        }
    }

    /// Invokes a closure, measuring and recording the time it takes.
    pub fn time<T>(&self, timee: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let result = timee();
        self.record(start.elapsed());
        result
    }

    fn record(&self, duration: Duration) {
        let mut state = self.ema_state.get();
        self.ema.filter(&mut state, duration.as_secs_f32());
        self.ema_state.set(state);
        self.count.set(self.count.get() + 1);
    }
}

/// Displays the average recorded time and resets it.
impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let avg = self.ema_state.take().last().unwrap_or(0.0);
        let count = self.count.take();
        let avg_ms = avg * 1000.0;

        write!(f, "{}: {count}x{avg_ms:.02}ms", self.name)
    }
}

/// Logs frames per second, together with the timings of a [`Timer`].
pub struct FpsCounter {
    name: String,
    frames: u32,
    start: Instant,
}

impl FpsCounter {
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self {
            name: name.into(),
            frames: 0,
            start: Instant::now(),
        }
    }

    /// Advances the frame counter by 1 and logs FPS and `timer` if one second has passed.
    pub fn tick_with(&mut self, timer: &Timer) {
        self.frames += 1;
        if self.start.elapsed() > Duration::from_secs(1) {
            log::debug!("{}: {} FPS ({})", self.name, self.frames, timer);

            self.frames = 0;
            self.start = Instant::now();
        }
    }
}
