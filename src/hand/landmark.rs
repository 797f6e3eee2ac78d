//! Hand landmarks in camera pixel space.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Number of landmarks the hand landmark network estimates for every hand.
pub const LANDMARK_COUNT: usize = 21;

/// A single estimated hand landmark, in integer pixel coordinates of the camera frame.
///
/// The Y axis points *down*, like in the input image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Landmark {
    index: usize,
    position: Point2<i32>,
}

impl Landmark {
    pub fn new(index: usize, x: i32, y: i32) -> Self {
        Self {
            index,
            position: Point2::new(x, y),
        }
    }

    /// The anatomical index of this landmark, see [`LandmarkIdx`].
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn position(&self) -> Point2<i32> {
        self.position
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.position.x
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.position.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    /// Returns the handedness of the mirror image of a hand.
    pub fn flipped(self) -> Self {
        match self {
            Handedness::Left => Handedness::Right,
            Handedness::Right => Handedness::Left,
        }
    }
}

/// The landmarks of a single hand in one camera frame.
///
/// A frame either contains all [`LANDMARK_COUNT`] landmarks in anatomical order, or none at all.
/// The empty frame means that no hand was detected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkFrame {
    landmarks: Vec<Landmark>,
    handedness: Option<Handedness>,
}

impl LandmarkFrame {
    /// Creates the empty frame, which contains no hand.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a frame from the landmarks reported by the estimator.
    ///
    /// If `landmarks` is not a complete set of hand landmarks in anatomical order, the landmarks
    /// are discarded and the empty frame is returned instead.
    pub fn new(landmarks: Vec<Landmark>, handedness: Option<Handedness>) -> Self {
        if landmarks.is_empty() {
            return Self::empty();
        }
        if landmarks.len() != LANDMARK_COUNT {
            log::warn!(
                "discarding hand with {} landmarks (expected {})",
                landmarks.len(),
                LANDMARK_COUNT
            );
            return Self::empty();
        }
        if let Some((pos, lm)) = landmarks
            .iter()
            .enumerate()
            .find(|(pos, lm)| lm.index() != *pos)
        {
            log::warn!(
                "discarding hand with landmark {} at position {}",
                lm.index(),
                pos
            );
            return Self::empty();
        }

        Self {
            landmarks,
            handedness,
        }
    }

    /// Creates a frame from `(x, y)` pixel positions, assigning indices in iteration order.
    pub fn from_positions<I>(positions: I, handedness: Option<Handedness>) -> Self
    where
        I: IntoIterator<Item = (i32, i32)>,
    {
        let landmarks = positions
            .into_iter()
            .enumerate()
            .map(|(index, (x, y))| Landmark::new(index, x, y))
            .collect();
        Self::new(landmarks, handedness)
    }

    /// Returns whether this frame contains no hand.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// Returns the handedness reported by the estimator.
    ///
    /// Estimators typically only report handedness when tracking a single hand, so this may be
    /// `None` even for a non-empty frame.
    #[inline]
    pub fn handedness(&self) -> Option<Handedness> {
        self.handedness
    }

    /// Returns all landmarks, in anatomical order.
    ///
    /// The returned slice is either empty or has length [`LANDMARK_COUNT`].
    #[inline]
    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    /// Returns the landmark `idx`, or `None` if the frame is empty.
    pub fn get(&self, idx: LandmarkIdx) -> Option<Landmark> {
        self.landmarks.get(idx as usize).copied()
    }

    /// Mirrors all landmarks horizontally inside of a frame of the given `width`.
    ///
    /// Handedness describes the hand as it appears in the image, so a left hand becomes a right
    /// hand and vice versa. Coordinates saturate instead of overflowing.
    pub fn flip_horizontal(&mut self, width: u32) {
        let max_x = i32::try_from(width).unwrap_or(i32::MAX).saturating_sub(1);
        for lm in &mut self.landmarks {
            lm.position.x = max_x.saturating_sub(lm.position.x);
        }
        self.handedness = self.handedness.map(Handedness::flipped);
    }
}

/// Names for the hand pose landmarks.
///
/// # Terminology
///
/// - **CMC**: [Carpometacarpal joint], the lowest joint of the thumb, located near the wrist.
/// - **MCP**: [Metacarpophalangeal joint], the lower joint forming the knuckles near the palm of
///   the hand.
/// - **PIP**: Proximal Interphalangeal joint, the joint between the MCP and DIP.
/// - **DIP**: Distal Interphalangeal joint, the highest joint of a finger.
/// - **IP**: Interphalangeal joint of the thumb.
/// - **Tip**: This landmark is just placed on the tip of the finger, above the DIP.
///
/// [Carpometacarpal joint]: https://en.wikipedia.org/wiki/Carpometacarpal_joint
/// [Metacarpophalangeal joint]: https://en.wikipedia.org/wiki/Metacarpophalangeal_joint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandmarkIdx {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexFingerMcp,
    IndexFingerPip,
    IndexFingerDip,
    IndexFingerTip,
    MiddleFingerMcp,
    MiddleFingerPip,
    MiddleFingerDip,
    MiddleFingerTip,
    RingFingerMcp,
    RingFingerPip,
    RingFingerDip,
    RingFingerTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}
