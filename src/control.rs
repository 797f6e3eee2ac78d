//! The pointer control loop.
//!
//! Everything that talks to the outside world is hidden behind two traits: a [`HandSource`]
//! produces the landmarks of the tracked hand for every camera frame, and an [`ActionSink`]
//! executes the resulting pointer [`Action`]s. The loop itself is single-threaded and processes
//! each frame to completion before fetching the next one.

use std::collections::VecDeque;

use crate::{
    gesture::GestureMode,
    hand::{
        fingers::finger_states,
        landmark::{LandmarkFrame, LandmarkIdx},
    },
    pointer::{Action, PointerMapper, PointerState},
    resolution::Resolution,
    timer::{FpsCounter, Timer},
};

/// Hand landmarks estimated in one camera frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraFrame {
    resolution: Resolution,
    hand: LandmarkFrame,
}

impl CameraFrame {
    /// Creates a camera frame of the given resolution, containing `hand`.
    ///
    /// `hand` may be empty if no hand was detected.
    pub fn new(resolution: Resolution, hand: LandmarkFrame) -> Self {
        Self { resolution, hand }
    }

    #[inline]
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    #[inline]
    pub fn hand(&self) -> &LandmarkFrame {
        &self.hand
    }
}

/// A source of hand landmarks, typically a camera feed combined with a hand landmark estimator.
pub trait HandSource {
    /// Blocks until the next camera frame has been processed and returns its hand landmarks.
    ///
    /// Returns `Ok(None)` when the source is exhausted and no more frames will be produced.
    fn next_hand_frame(&mut self) -> anyhow::Result<Option<CameraFrame>>;
}

/// Replays a fixed sequence of frames.
impl HandSource for VecDeque<CameraFrame> {
    fn next_hand_frame(&mut self) -> anyhow::Result<Option<CameraFrame>> {
        Ok(self.pop_front())
    }
}

/// Receives the pointer actions produced by the control loop.
pub trait ActionSink {
    /// Executes `action`.
    ///
    /// [`Action::MoveTo`] coordinates are absolute screen pixels.
    fn dispatch(&mut self, action: Action) -> anyhow::Result<()>;
}

/// Records all dispatched actions.
impl ActionSink for Vec<Action> {
    fn dispatch(&mut self, action: Action) -> anyhow::Result<()> {
        self.push(action);
        Ok(())
    }
}

/// The result of processing a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub mode: GestureMode,
    pub action: Option<Action>,
}

/// Reason for [`ControlLoop::run`] to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// The user made the [`GestureMode::Break`] gesture.
    Terminated,
    /// The [`HandSource`] ran out of frames.
    SourceExhausted,
}

/// Counters collected by a [`ControlLoop`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Number of frames processed.
    pub frames: u64,
    /// Number of processed frames that contained a hand.
    pub hands: u64,
    /// Number of actions dispatched to the sink.
    pub actions: u64,
}

/// Drives the [`PointerMapper`] with frames from a [`HandSource`].
pub struct ControlLoop {
    mapper: PointerMapper,
    state: PointerState,
    mirror: bool,
    stats: LoopStats,
}

impl ControlLoop {
    pub fn new(mapper: PointerMapper) -> Self {
        Self {
            mapper,
            state: PointerState::new(),
            mirror: false,
            stats: LoopStats::default(),
        }
    }

    /// If `mirror` is `true`, landmarks are mirrored horizontally before being processed.
    ///
    /// This makes the pointer follow the hand like a mirror image when the source delivers
    /// landmarks for an unflipped camera image.
    pub fn set_mirror(&mut self, mirror: bool) {
        self.mirror = mirror;
    }

    /// Returns the smoothed pointer state.
    pub fn pointer_state(&self) -> &PointerState {
        &self.state
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    /// Classifies the hand in `frame` and computes the resulting pointer action.
    ///
    /// This performs no I/O. The returned action has not been dispatched yet.
    pub fn process(&mut self, frame: CameraFrame) -> Step {
        let CameraFrame {
            resolution,
            mut hand,
        } = frame;
        if self.mirror {
            hand.flip_horizontal(resolution.width());
        }

        self.stats.frames += 1;
        if !hand.is_empty() {
            self.stats.hands += 1;
        }

        let mode = GestureMode::classify(finger_states(&hand));
        let tip = hand
            .get(LandmarkIdx::IndexFingerTip)
            .map(|lm| lm.position());
        let action = self.mapper.update(&mut self.state, mode, tip, resolution);
        log::trace!("{mode}: {action:?}");

        Step { mode, action }
    }

    /// Runs the control loop until the [`GestureMode::Break`] gesture is made or `source` runs
    /// out of frames.
    ///
    /// Errors returned by `source` or `sink` abort the loop and are propagated to the caller.
    pub fn run<S, K>(&mut self, source: &mut S, sink: &mut K) -> anyhow::Result<Exit>
    where
        S: HandSource + ?Sized,
        K: ActionSink + ?Sized,
    {
        log::debug!(
            "mapping trackpad (margin {}) to {} screen, smoothing alpha {:.3}, scroll {}",
            self.mapper.margin(),
            self.mapper.screen(),
            self.mapper.smoothing().alpha(),
            self.mapper.scroll_amount(),
        );
        let timer = Timer::new("process");
        let mut fps = FpsCounter::new("pointer control");

        loop {
            let Some(frame) = source.next_hand_frame()? else {
                log::info!("hand source exhausted after {} frames", self.stats.frames);
                return Ok(Exit::SourceExhausted);
            };

            let step = timer.time(|| self.process(frame));
            if let Some(action) = step.action {
                sink.dispatch(action)?;
                self.stats.actions += 1;
            }
            fps.tick_with(&timer);

            if step.mode == GestureMode::Break {
                log::info!("break gesture detected, stopping pointer control");
                return Ok(Exit::Terminated);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::bail;
    use approx::assert_relative_eq;
    use nalgebra::Point2;

    use crate::{
        hand::{fingers::FingerStates, landmark::Handedness},
        pointer::MouseButton,
        test::{hand, open_hand, pointing_hand},
    };

    use super::*;

    const CAMERA: Resolution = Resolution::RES_VGA;

    fn control_loop() -> ControlLoop {
        ControlLoop::new(PointerMapper::new(Resolution::RES_1080P))
    }

    fn frame(hand: LandmarkFrame) -> CameraFrame {
        CameraFrame::new(CAMERA, hand)
    }

    #[test]
    fn test_empty_frame_is_idle() {
        let mut lp = control_loop();
        lp.process(frame(pointing_hand(320, 240)));
        let state = *lp.pointer_state();

        for _ in 0..3 {
            let step = lp.process(frame(LandmarkFrame::empty()));
            assert_eq!(step.mode, GestureMode::Idle);
            assert_eq!(step.action, None);
            assert_eq!(*lp.pointer_state(), state);
        }
        assert_eq!(
            lp.stats(),
            LoopStats {
                frames: 4,
                hands: 1,
                actions: 0,
            }
        );
    }

    #[test]
    fn test_process_gestures() {
        let mut lp = control_loop();

        let step = lp.process(frame(hand(
            FingerStates::new(true, true, false, false, false),
            Some(Handedness::Left),
        )));
        assert_eq!(step.mode, GestureMode::LeftClick);
        assert_eq!(
            step.action,
            Some(Action::Click {
                button: MouseButton::Left
            })
        );

        let step = lp.process(frame(hand(
            FingerStates::new(false, true, true, false, false),
            None,
        )));
        assert_eq!(step.mode, GestureMode::ScrollUp);
        assert_eq!(step.action, Some(Action::Scroll { amount: 5 }));

        let step = lp.process(frame(hand(
            FingerStates::new(true, true, true, false, false),
            Some(Handedness::Right),
        )));
        assert_eq!(step.mode, GestureMode::ScrollDown);
        assert_eq!(step.action, Some(Action::Scroll { amount: -5 }));

        let step = lp.process(frame(open_hand(None)));
        assert_eq!(step.mode, GestureMode::Break);
        assert_eq!(step.action, Some(Action::Terminate));
    }

    #[test]
    fn test_move() {
        let mut lp = control_loop();
        let step = lp.process(frame(pointing_hand(320, 240)));
        assert_eq!(step.mode, GestureMode::Move);
        let Some(Action::MoveTo { x, y }) = step.action else {
            panic!("expected move, got {:?}", step.action);
        };
        assert_relative_eq!(x, 960.0 / 1.2, epsilon = 1e-2);
        assert_relative_eq!(y, 540.0 / 1.2, epsilon = 1e-2);
        assert_eq!(lp.pointer_state().position(), Point2::new(x, y));
    }

    #[test]
    fn test_mirror() {
        let mirrored_loop = |mirror| {
            let mut mapper = PointerMapper::new(Resolution::new(640, 480));
            mapper.set_margin(0);
            mapper.set_lag_factor(1.0);
            let mut lp = ControlLoop::new(mapper);
            lp.set_mirror(mirror);
            lp
        };

        // Mirroring must not change how a hand of known handedness is classified.
        for handedness in [Handedness::Left, Handedness::Right] {
            for (states, mode) in [
                ([false, true, false, false, false], GestureMode::Move),
                ([true, true, false, false, false], GestureMode::LeftClick),
                ([false, true, true, false, false], GestureMode::ScrollUp),
                ([true, true, true, false, false], GestureMode::ScrollDown),
                ([true; 5], GestureMode::Break),
            ] {
                let hand = hand(FingerStates::from_array(states), Some(handedness));
                let plain = mirrored_loop(false).process(frame(hand.clone()));
                let mirrored = mirrored_loop(true).process(frame(hand));
                assert_eq!(plain.mode, mode, "{handedness:?} {states:?}");
                assert_eq!(mirrored.mode, mode, "{handedness:?} {states:?}");
            }
        }

        // The pointer follows the mirrored fingertip.
        let pointing = hand(
            FingerStates::new(false, true, false, false, false),
            Some(Handedness::Right),
        );
        let tip_x = pointing.get(LandmarkIdx::IndexFingerTip).unwrap().x();
        let step = mirrored_loop(true).process(frame(pointing));
        assert_eq!(
            step.action,
            Some(Action::MoveTo {
                x: (639 - tip_x) as f32,
                y: 240.0
            })
        );
    }

    #[test]
    fn test_run_until_break() {
        let mut source: VecDeque<_> = [
            frame(pointing_hand(320, 240)),
            frame(LandmarkFrame::empty()),
            frame(hand(
                FingerStates::new(false, true, true, false, false),
                None,
            )),
            frame(open_hand(None)),
            // Never reached.
            frame(pointing_hand(100, 100)),
        ]
        .into_iter()
        .collect();
        let mut sink = Vec::new();

        let mut lp = control_loop();
        assert_eq!(lp.run(&mut source, &mut sink).unwrap(), Exit::Terminated);

        assert_eq!(sink.len(), 3);
        assert!(matches!(sink[0], Action::MoveTo { .. }));
        assert_eq!(sink[1], Action::Scroll { amount: 5 });
        assert_eq!(sink[2], Action::Terminate);
        assert_eq!(source.len(), 1);
        assert_eq!(
            lp.stats(),
            LoopStats {
                frames: 4,
                hands: 3,
                actions: 3,
            }
        );
    }

    #[test]
    fn test_run_until_exhausted() {
        let mut source: VecDeque<_> = (0..10)
            .map(|i| frame(pointing_hand(200 + i * 10, 240)))
            .collect();
        let mut sink = Vec::new();

        let mut lp = control_loop();
        assert_eq!(
            lp.run(&mut source, &mut sink).unwrap(),
            Exit::SourceExhausted
        );
        assert_eq!(sink.len(), 10);

        // Smoothed positions trail the fingertip, but never overshoot it.
        let mut last_x = 0.0;
        for action in &sink {
            let Action::MoveTo { x, .. } = *action else {
                panic!("unexpected action {action:?}");
            };
            assert!(x > last_x);
            last_x = x;
        }
        let target = PointerMapper::new(Resolution::RES_1080P)
            .map_to_screen(Point2::new(290, 240), CAMERA);
        assert!(last_x < target.x);
    }

    #[test]
    fn test_sink_error_aborts() {
        struct FailingSink;

        impl ActionSink for FailingSink {
            fn dispatch(&mut self, _: Action) -> anyhow::Result<()> {
                bail!("pointer device unavailable")
            }
        }

        let mut source: VecDeque<_> = [frame(pointing_hand(320, 240))].into_iter().collect();
        let err = control_loop()
            .run(&mut source, &mut FailingSink)
            .unwrap_err();
        assert_eq!(err.to_string(), "pointer device unavailable");
    }
}
