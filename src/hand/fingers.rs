//! Extended/curled finger detection.
//!
//! Finger states are derived purely from the relative positions of a fingertip and one of the
//! joints below it. No angles are computed.

use super::landmark::{Handedness, LandmarkFrame, LandmarkIdx};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    /// All fingers, from thumb to pinky.
    pub const ALL: [Self; 5] = [
        Self::Thumb,
        Self::Index,
        Self::Middle,
        Self::Ring,
        Self::Pinky,
    ];

    /// Returns the landmark at the tip of this finger.
    pub fn tip(self) -> LandmarkIdx {
        match self {
            Self::Thumb => LandmarkIdx::ThumbTip,
            Self::Index => LandmarkIdx::IndexFingerTip,
            Self::Middle => LandmarkIdx::MiddleFingerTip,
            Self::Ring => LandmarkIdx::RingFingerTip,
            Self::Pinky => LandmarkIdx::PinkyTip,
        }
    }

    /// Returns the joint that the fingertip is compared against.
    ///
    /// For the thumb, this is the joint directly below the tip. For all other fingers, it is the
    /// PIP joint, two landmarks below the tip.
    pub fn reference_joint(self) -> LandmarkIdx {
        match self {
            Self::Thumb => LandmarkIdx::ThumbIp,
            Self::Index => LandmarkIdx::IndexFingerPip,
            Self::Middle => LandmarkIdx::MiddleFingerPip,
            Self::Ring => LandmarkIdx::RingFingerPip,
            Self::Pinky => LandmarkIdx::PinkyPip,
        }
    }
}

/// Extended/curled state of all five fingers of a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FingerStates([bool; 5]);

impl FingerStates {
    /// Creates a finger state vector. `true` means the finger is extended.
    pub const fn new(thumb: bool, index: bool, middle: bool, ring: bool, pinky: bool) -> Self {
        Self([thumb, index, middle, ring, pinky])
    }

    /// Creates a finger state vector from an array ordered from thumb to pinky.
    pub const fn from_array(extended: [bool; 5]) -> Self {
        Self(extended)
    }

    /// Returns the states as an array ordered from thumb to pinky.
    #[inline]
    pub fn to_array(self) -> [bool; 5] {
        self.0
    }

    #[inline]
    pub fn is_extended(&self, finger: Finger) -> bool {
        self.0[finger as usize]
    }

    /// Returns the number of extended fingers.
    pub fn extended_count(&self) -> usize {
        self.0.iter().filter(|ext| **ext).count()
    }
}

/// Determines which fingers of the hand in `frame` are extended.
///
/// Returns `None` if `frame` contains no hand.
///
/// The four fingers are considered extended when their tip is *above* (has a smaller Y coordinate
/// than) their PIP joint. The thumb bends sideways, so it is tested horizontally: for a left hand,
/// it is extended when the tip is to the right of its IP joint, for a right hand when it is to the
/// left.
///
/// If the handedness of the frame is unknown, the hand is assumed to be a right hand. This is an
/// approximation that will misclassify the thumb of left hands.
pub fn finger_states(frame: &LandmarkFrame) -> Option<FingerStates> {
    let handedness = frame.handedness().unwrap_or(Handedness::Right);

    let mut states = [false; 5];
    for (finger, state) in Finger::ALL.into_iter().zip(&mut states) {
        let tip = frame.get(finger.tip())?;
        let joint = frame.get(finger.reference_joint())?;

        *state = match (finger, handedness) {
            (Finger::Thumb, Handedness::Left) => tip.x() > joint.x(),
            (Finger::Thumb, Handedness::Right) => tip.x() < joint.x(),
            _ => tip.y() < joint.y(),
        };
    }

    Some(FingerStates(states))
}
