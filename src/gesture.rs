//! Classification of finger states into pointer control modes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hand::fingers::FingerStates;

/// The interaction mode expressed by a hand pose.
///
/// All recognized poses other than [`GestureMode::Break`] require ring and pinky finger to be
/// curled, so that a relaxed, open hand does not accidentally control the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GestureMode {
    /// Index finger extended: the pointer follows the index fingertip.
    Move,
    /// Thumb and index finger extended.
    LeftClick,
    /// Index and middle finger extended.
    ScrollUp,
    /// Thumb, index and middle finger extended.
    ScrollDown,
    /// All fingers extended: stop pointer control.
    Break,
    /// No hand, or a pose that doesn't correspond to any mode.
    Idle,
}

impl GestureMode {
    /// Classifies a set of finger states.
    ///
    /// `None` (no hand in the frame) is classified as [`GestureMode::Idle`].
    pub fn classify(states: Option<FingerStates>) -> Self {
        let Some(states) = states else {
            return Self::Idle;
        };

        // (thumb, index, middle, ring, pinky)
        match states.to_array() {
            [false, true, false, false, false] => Self::Move,
            [true, true, false, false, false] => Self::LeftClick,
            [false, true, true, false, false] => Self::ScrollUp,
            [true, true, true, false, false] => Self::ScrollDown,
            [true, true, true, true, true] => Self::Break,
            _ => Self::Idle,
        }
    }
}

impl fmt::Display for GestureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Move => "move",
            Self::LeftClick => "left click",
            Self::ScrollUp => "scroll up",
            Self::ScrollDown => "scroll down",
            Self::Break => "break",
            Self::Idle => "idle",
        })
    }
}
