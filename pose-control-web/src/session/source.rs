//! Frame sources and the driving loop

use std::collections::VecDeque;

use log::info;

use super::engine::{ActionEvent, ControlSession};
use crate::actuation::{Actuator, ChordScheduler};
use crate::pose::PoseFrame;

/// What a source yields on each pull
#[derive(Clone, Debug, PartialEq)]
pub enum SourceTick {
    Frame(PoseFrame),
    /// The detector ran but found nobody
    NoDetection { timestamp: f64 },
    /// No more input; the loop ends
    Exhausted,
}

/// Anything that produces pose frames in time order
pub trait FrameSource {
    fn next_tick(&mut self) -> SourceTick;
}

/// Replays a recorded sequence
#[derive(Clone, Debug, Default)]
pub struct ReplaySource {
    ticks: VecDeque<SourceTick>,
}

impl ReplaySource {
    pub fn new(ticks: impl IntoIterator<Item = SourceTick>) -> Self {
        Self {
            ticks: ticks.into_iter().collect(),
        }
    }

    /// Frames only; `None` entries become no-detection ticks at `t0 + i * dt`
    pub fn from_frames(frames: Vec<Option<PoseFrame>>, t0: f64, dt: f64) -> Self {
        Self::new(frames.into_iter().enumerate().map(|(i, frame)| match frame {
            Some(frame) => SourceTick::Frame(frame),
            None => SourceTick::NoDetection {
                timestamp: t0 + i as f64 * dt,
            },
        }))
    }

    pub fn remaining(&self) -> usize {
        self.ticks.len()
    }
}

impl FrameSource for ReplaySource {
    fn next_tick(&mut self) -> SourceTick {
        self.ticks.pop_front().unwrap_or(SourceTick::Exhausted)
    }
}

/// Pull from `source` until exhausted, pressing chords through `actuator`.
///
/// Frame timestamps are the clock. Keys still held at the end are released.
pub fn drive(
    session: &mut ControlSession,
    source: &mut dyn FrameSource,
    scheduler: &mut ChordScheduler,
    actuator: &mut dyn Actuator,
) -> Vec<ActionEvent> {
    let mut events = Vec::new();
    loop {
        let (frame, now) = match source.next_tick() {
            SourceTick::Frame(frame) => {
                let now = frame.timestamp;
                (Some(frame), now)
            }
            SourceTick::NoDetection { timestamp } => (None, timestamp),
            SourceTick::Exhausted => break,
        };

        let outcome = session.tick(frame.as_ref(), now);
        if let Some(event) = outcome.event {
            scheduler.schedule(&event.chord, now);
            events.push(event);
        }
        scheduler.dispatch(now, actuator);
    }

    for command in scheduler.release_all() {
        actuator.apply(command);
    }
    info!(
        "source exhausted: {} frames, {} events",
        session.stats().frames,
        events.len()
    );
    events
}
