//! JSON Lines I/O for recorded landmarks and pointer actions.
//!
//! The landmark estimator and the OS pointer driver run in separate processes, connected via
//! newline-delimited JSON. Each line on the input describes one camera frame:
//!
//! ```json
//! {"width":640,"height":480,"hands":[{"handedness":"Right","landmarks":[[0,312,401],[1,280,380],...]}]}
//! ```
//!
//! `width` and `height` may be omitted, in which case the configured camera resolution is
//! assumed. A frame without hands has an empty (or missing) `hands` list. Every landmark is an
//! `[index, x, y]` triple in pixel coordinates.
//!
//! Each output line is one serialized [`Action`].

use std::io::{BufRead, Write};

use anyhow::Context;
use serde::Deserialize;

use crate::{
    control::{ActionSink, CameraFrame, HandSource},
    hand::landmark::{Handedness, Landmark, LandmarkFrame},
    pointer::Action,
    resolution::Resolution,
};

#[derive(Debug, Deserialize)]
struct RecordedFrame {
    width: Option<u32>,
    height: Option<u32>,
    #[serde(default)]
    hands: Vec<RecordedHand>,
}

#[derive(Debug, Deserialize)]
struct RecordedHand {
    #[serde(default)]
    handedness: Option<Handedness>,
    landmarks: Vec<(usize, i32, i32)>,
}

/// A [`HandSource`] reading recorded frames from a JSON Lines stream.
///
/// Only the first hand of every frame is used.
pub struct JsonLinesSource<R> {
    reader: R,
    camera: Resolution,
    line: String,
    line_no: usize,
}

impl<R: BufRead> JsonLinesSource<R> {
    /// Creates a source reading from `reader`.
    ///
    /// `camera` is the resolution assumed for frames that don't specify their own.
    pub fn new(reader: R, camera: Resolution) -> Self {
        Self {
            reader,
            camera,
            line: String::new(),
            line_no: 0,
        }
    }

    fn parse_line(&self) -> anyhow::Result<CameraFrame> {
        let recorded: RecordedFrame = serde_json::from_str(&self.line)?;
        let resolution = Resolution::new(
            recorded.width.unwrap_or(self.camera.width()),
            recorded.height.unwrap_or(self.camera.height()),
        );

        let mut hands = recorded.hands.into_iter();
        let hand = match hands.next() {
            Some(hand) => {
                let landmarks = hand
                    .landmarks
                    .into_iter()
                    .map(|(index, x, y)| Landmark::new(index, x, y))
                    .collect();
                LandmarkFrame::new(landmarks, hand.handedness)
            }
            None => LandmarkFrame::empty(),
        };
        let extra = hands.len();
        if extra != 0 {
            log::trace!("line {}: ignoring {} additional hands", self.line_no, extra);
        }

        Ok(CameraFrame::new(resolution, hand))
    }
}

impl<R: BufRead> HandSource for JsonLinesSource<R> {
    fn next_hand_frame(&mut self) -> anyhow::Result<Option<CameraFrame>> {
        loop {
            self.line.clear();
            let n = self
                .reader
                .read_line(&mut self.line)
                .context("failed to read landmark recording")?;
            if n == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            if self.line.trim().is_empty() {
                continue;
            }

            let frame = self
                .parse_line()
                .with_context(|| format!("invalid frame on line {}", self.line_no))?;
            return Ok(Some(frame));
        }
    }
}

/// An [`ActionSink`] writing every action as a line of JSON.
pub struct JsonLinesSink<W> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ActionSink for JsonLinesSink<W> {
    fn dispatch(&mut self, action: Action) -> anyhow::Result<()> {
        serde_json::to_writer(&mut self.writer, &action)?;
        // The consumer is driving a pointer in real time, so don't let actions sit in a buffer.
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use crate::{hand::landmark::LandmarkIdx, pointer::MouseButton, test::pointing_hand};

    use super::*;

    fn hand_json(frame: &LandmarkFrame, handedness: &str) -> String {
        let landmarks: Vec<_> = frame
            .landmarks()
            .iter()
            .map(|lm| format!("[{},{},{}]", lm.index(), lm.x(), lm.y()))
            .collect();
        format!(
            r#"{{"handedness":"{handedness}","landmarks":[{}]}}"#,
            landmarks.join(",")
        )
    }

    #[test]
    fn test_read_frames() {
        let hand = hand_json(&pointing_hand(300, 200), "Left");
        let input = format!(
            "{{\"width\":1280,\"height\":720,\"hands\":[{hand},{hand}]}}\n\
             \n\
             {{\"hands\":[]}}\n\
             {{}}\n"
        );
        let mut source = JsonLinesSource::new(Cursor::new(input), Resolution::RES_VGA);

        let frame = source.next_hand_frame().unwrap().unwrap();
        assert_eq!(frame.resolution(), Resolution::new(1280, 720));
        assert_eq!(frame.hand().handedness(), Some(Handedness::Left));
        let tip = frame.hand().get(LandmarkIdx::IndexFingerTip).unwrap();
        assert_eq!((tip.x(), tip.y()), (300, 200));

        let frame = source.next_hand_frame().unwrap().unwrap();
        assert_eq!(frame.resolution(), Resolution::RES_VGA);
        assert!(frame.hand().is_empty());

        let frame = source.next_hand_frame().unwrap().unwrap();
        assert!(frame.hand().is_empty());

        assert!(source.next_hand_frame().unwrap().is_none());
        assert!(source.next_hand_frame().unwrap().is_none());
    }

    #[test]
    fn test_malformed_hand_is_empty() {
        let input = r#"{"hands":[{"landmarks":[[0,1,2],[1,3,4]]}]}"#;
        let mut source = JsonLinesSource::new(Cursor::new(input), Resolution::RES_VGA);
        let frame = source.next_hand_frame().unwrap().unwrap();
        assert!(frame.hand().is_empty());
    }

    #[test]
    fn test_invalid_json() {
        let input = "{\"hands\":[]}\nnot json\n";
        let mut source = JsonLinesSource::new(Cursor::new(input), Resolution::RES_VGA);
        source.next_hand_frame().unwrap();
        let err = source.next_hand_frame().unwrap_err();
        assert_eq!(err.to_string(), "invalid frame on line 2");
    }

    #[test]
    fn test_write_actions() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.dispatch(Action::Scroll { amount: -5 }).unwrap();
        sink.dispatch(Action::Click {
            button: MouseButton::Left,
        })
        .unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            out,
            "{\"action\":\"scroll\",\"amount\":-5}\n{\"action\":\"click\",\"button\":\"left\"}\n"
        );
    }
}
