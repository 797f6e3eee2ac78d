//! Mapping of hand gestures to pointer actions.
//!
//! The index fingertip is tracked inside of an inset rectangle of the camera frame (the
//! "trackpad"), which is stretched to cover the whole screen. Pointer movement is smoothed with an
//! [`Ema`] filter whose state lives in a [`PointerState`] owned by the caller.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::{
    filter::{
        ema::{Ema, EmaState},
        Filter,
    },
    gesture::GestureMode,
    resolution::Resolution,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Left,
}

/// An action to be performed by the OS pointer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Move the pointer to an absolute screen position, in pixels.
    MoveTo { x: f32, y: f32 },
    /// Click a mouse button once.
    Click { button: MouseButton },
    /// Scroll by `amount` units. Positive values scroll up.
    Scroll { amount: i32 },
    /// Stop pointer control.
    Terminate,
}

/// Smoothed pointer position, carried from frame to frame.
///
/// Starts out at the screen origin. The position only changes while the hand is in
/// [`GestureMode::Move`], so movement resumes from the last position after any other gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    x: EmaState,
    y: EmaState,
}

impl PointerState {
    pub fn new() -> Self {
        Self::starting_at(Point2::origin())
    }

    /// Creates a pointer state as if the pointer was last moved to `pos`.
    pub fn starting_at(pos: Point2<f32>) -> Self {
        Self {
            x: EmaState::starting_at(pos.x),
            y: EmaState::starting_at(pos.y),
        }
    }

    /// Returns the last smoothed pointer position, in screen pixels.
    pub fn position(&self) -> Point2<f32> {
        Point2::new(
            self.x.last().unwrap_or(0.0),
            self.y.last().unwrap_or(0.0),
        )
    }
}

impl Default for PointerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns gesture modes and fingertip positions into pointer [`Action`]s.
#[derive(Debug, Clone)]
pub struct PointerMapper {
    screen: Resolution,
    margin: u32,
    ema: Ema,
    scroll_amount: i32,
}

impl PointerMapper {
    pub const DEFAULT_MARGIN: u32 = 140;

    pub const DEFAULT_LAG_FACTOR: f32 = 1.2;

    pub const DEFAULT_SCROLL_AMOUNT: i32 = 5;

    /// Creates a pointer mapper targeting a screen of the given resolution, using default margin,
    /// smoothing and scroll settings.
    pub fn new(screen: Resolution) -> Self {
        Self {
            screen,
            margin: Self::DEFAULT_MARGIN,
            ema: Ema::from_lag_factor(Self::DEFAULT_LAG_FACTOR),
            scroll_amount: Self::DEFAULT_SCROLL_AMOUNT,
        }
    }

    /// Sets the width of the border (in camera pixels) that is excluded from the trackpad area on
    /// every side of the camera frame.
    pub fn set_margin(&mut self, margin: u32) {
        self.margin = margin;
    }

    /// Sets the smoothing factor.
    ///
    /// Every frame, the pointer moves `1 / lag_factor` of the way from its last position to the
    /// position of the fingertip. Higher values result in smoother, but laggier, movement.
    ///
    /// # Panics
    ///
    /// This method will panic if `lag_factor` is less than 1.0.
    pub fn set_lag_factor(&mut self, lag_factor: f32) {
        self.ema = Ema::from_lag_factor(lag_factor);
    }

    /// Sets the magnitude of the scroll actions emitted for [`GestureMode::ScrollUp`] and
    /// [`GestureMode::ScrollDown`].
    pub fn set_scroll_amount(&mut self, amount: i32) {
        self.scroll_amount = amount;
    }

    pub fn screen(&self) -> Resolution {
        self.screen
    }

    pub fn margin(&self) -> u32 {
        self.margin
    }

    /// Returns the filter used to smooth pointer movement.
    pub fn smoothing(&self) -> &Ema {
        &self.ema
    }

    pub fn scroll_amount(&self) -> i32 {
        self.scroll_amount
    }

    /// Returns the top left and bottom right corner of the trackpad area within a camera frame of
    /// resolution `camera`.
    pub fn active_rect(&self, camera: Resolution) -> (Point2<i32>, Point2<i32>) {
        let m = saturating_i32(self.margin);
        (
            Point2::new(m, m),
            Point2::new(
                saturating_i32(camera.width()).saturating_sub(m),
                saturating_i32(camera.height()).saturating_sub(m),
            ),
        )
    }

    /// Maps a fingertip position in a camera frame to the screen, without any smoothing.
    ///
    /// Positions outside of the trackpad area are clamped to its edges, so the result always lies
    /// on the screen.
    pub fn map_to_screen(&self, tip: Point2<i32>, camera: Resolution) -> Point2<f32> {
        let (min, max) = self.active_rect(camera);
        Point2::new(
            interp(
                tip.x as f32,
                (min.x as f32, max.x as f32),
                (0.0, self.screen.width() as f32),
            ),
            interp(
                tip.y as f32,
                (min.y as f32, max.y as f32),
                (0.0, self.screen.height() as f32),
            ),
        )
    }

    /// Computes the action for one camera frame.
    ///
    /// `tip` is the position of the index fingertip in the camera frame, or `None` if no hand was
    /// detected. Only [`GestureMode::Move`] modifies `state`.
    pub fn update(
        &self,
        state: &mut PointerState,
        mode: GestureMode,
        tip: Option<Point2<i32>>,
        camera: Resolution,
    ) -> Option<Action> {
        match mode {
            GestureMode::Move => {
                let target = self.map_to_screen(tip?, camera);
                let x = self.ema.filter(&mut state.x, target.x);
                let y = self.ema.filter(&mut state.y, target.y);
                Some(Action::MoveTo { x, y })
            }
            GestureMode::LeftClick => Some(Action::Click {
                button: MouseButton::Left,
            }),
            GestureMode::ScrollUp => Some(Action::Scroll {
                amount: self.scroll_amount,
            }),
            GestureMode::ScrollDown => Some(Action::Scroll {
                amount: -self.scroll_amount,
            }),
            GestureMode::Break => Some(Action::Terminate),
            GestureMode::Idle => None,
        }
    }
}

fn saturating_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Linearly maps `value` from the range `from` to the range `to`, clamping to the end points.
///
/// A degenerate (empty or inverted) `from` range maps everything at or below its start to `to.0`
/// and everything else to `to.1`.
fn interp(value: f32, from: (f32, f32), to: (f32, f32)) -> f32 {
    if value <= from.0 {
        to.0
    } else if value >= from.1 {
        to.1
    } else {
        to.0 + (value - from.0) * (to.1 - to.0) / (from.1 - from.0)
    }
}
