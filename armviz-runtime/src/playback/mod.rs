// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

//! Playback state machine.
//!
//! The controller decides which joint angles are authoritative for display.
//! The committed pose is only changed by a finished animation or a reset.
//! Chart hovering places a scrub overlay on top of the base mode which takes
//! precedence for display without touching the committed pose.

use armviz_core::{JointAngles, Point, Trajectory};

mod clock;

pub use self::clock::{AnimationClock, ClockSource};

/// Animation clock generation.
///
/// Ticks carry the epoch of the clock that produced them. Ticks from an
/// earlier epoch are ignored.
pub type Epoch = u64;

/// Planning request identifier.
///
/// Only the response to the outstanding ticket is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl std::fmt::Display for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Observable playback state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    /// Displaying the committed pose.
    Idle,
    /// Replaying the trajectory at the given frame.
    Animating { frame: usize },
    /// Inspecting the trajectory at the given frame.
    Scrubbing { frame: usize },
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackState::Idle => write!(f, "Idle"),
            PlaybackState::Animating { frame } => write!(f, "Animating [{}]", frame),
            PlaybackState::Scrubbing { frame } => write!(f, "Scrubbing [{}]", frame),
        }
    }
}

enum Mode {
    Idle {
        angles: JointAngles,
    },
    Animating {
        frame: usize,
        /// Dropping the mode stops the clock.
        clock: Option<AnimationClock>,
    },
}

pub struct PlaybackController {
    home: JointAngles,
    mode: Mode,
    trajectory: Trajectory,
    scrub: Option<usize>,
    target: Option<Point>,
    error: Option<String>,
    pending: Option<Ticket>,
    next_ticket: u64,
    epoch: Epoch,
    clock_source: Option<ClockSource>,
}

impl PlaybackController {
    /// Construct a controller without an animation clock.
    ///
    /// Ticks must be delivered with [`PlaybackController::tick`].
    pub fn new(home: JointAngles) -> Self {
        Self {
            home,
            mode: Mode::Idle { angles: home },
            trajectory: Trajectory::empty(),
            scrub: None,
            target: None,
            error: None,
            pending: None,
            next_ticket: 0,
            epoch: 0,
            clock_source: None,
        }
    }

    /// Construct a controller which starts a clock for every animation.
    pub fn with_clock(home: JointAngles, clock_source: ClockSource) -> Self {
        Self {
            clock_source: Some(clock_source),
            ..Self::new(home)
        }
    }

    pub fn state(&self) -> PlaybackState {
        match (self.scrub, &self.mode) {
            (Some(frame), _) => PlaybackState::Scrubbing { frame },
            (None, Mode::Animating { frame, .. }) => PlaybackState::Animating { frame: *frame },
            (None, Mode::Idle { .. }) => PlaybackState::Idle,
        }
    }

    /// Joint angles the next motion is planned from.
    ///
    /// While animating this is the current animation frame. Scrubbing never
    /// affects the committed angles.
    pub fn committed_angles(&self) -> JointAngles {
        match &self.mode {
            Mode::Idle { angles } => *angles,
            Mode::Animating { frame, .. } => self.frame_angles(*frame).unwrap_or(self.home),
        }
    }

    /// Joint angles to display.
    ///
    /// Scrubbing takes precedence over animating, animating takes precedence
    /// over the committed pose.
    pub fn display_angles(&self) -> JointAngles {
        self.display_frame()
            .and_then(|frame| self.frame_angles(frame))
            .unwrap_or_else(|| self.committed_angles())
    }

    /// Trajectory frame on display, if any.
    pub fn display_frame(&self) -> Option<usize> {
        match self.state() {
            PlaybackState::Scrubbing { frame } | PlaybackState::Animating { frame } => Some(frame),
            PlaybackState::Idle => None,
        }
    }

    fn frame_angles(&self, frame: usize) -> Option<JointAngles> {
        self.trajectory.get(frame).map(|sample| sample.angles())
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        matches!(self.mode, Mode::Animating { .. })
    }

    #[inline]
    pub fn is_scrubbing(&self) -> bool {
        self.scrub.is_some()
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether the animation clock is running.
    pub fn is_clock_running(&self) -> bool {
        match &self.mode {
            Mode::Animating {
                clock: Some(clock),
                ..
            } => clock.is_running(),
            _ => false,
        }
    }

    #[inline]
    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    /// Target marker of the last accepted request.
    #[inline]
    pub fn target(&self) -> Option<Point> {
        self.target
    }

    #[inline]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[inline]
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Accept a new motion request towards the target.
    ///
    /// Requests are refused while animating or while another request is
    /// outstanding. The previous error is cleared on acceptance.
    pub fn request(&mut self, target: Point) -> Option<Ticket> {
        if self.is_animating() {
            log::warn!("Request refused: animation in progress");
            return None;
        }
        if let Some(ticket) = self.pending {
            log::warn!("Request refused: request {} outstanding", ticket);
            return None;
        }

        self.next_ticket += 1;

        let ticket = Ticket(self.next_ticket);

        self.pending = Some(ticket);
        self.target = Some(target);
        self.error = None;

        Some(ticket)
    }

    /// Apply the planner response for a ticket.
    ///
    /// Responses to anything but the outstanding ticket are discarded. A
    /// valid trajectory replaces the previous one and starts the animation
    /// from the first frame. A failure removes the target marker and keeps
    /// the committed pose.
    pub fn complete(&mut self, ticket: Ticket, result: Result<Trajectory, String>) -> bool {
        if self.pending != Some(ticket) {
            log::debug!("Discard stale response {}", ticket);
            return false;
        }

        self.pending = None;

        match result {
            Ok(trajectory) if !trajectory.is_empty() => {
                self.trajectory = trajectory;
                self.scrub = None;
                self.epoch += 1;

                let clock = self
                    .clock_source
                    .as_ref()
                    .map(|source| source.start(self.epoch));

                self.mode = Mode::Animating { frame: 0, clock };

                log::debug!("Animate {}", self.trajectory);
            }
            Ok(_) => {
                self.target = None;
                self.error = Some("Planning service returned an empty trajectory".to_string());
            }
            Err(e) => {
                log::error!("Planning failed: {}", e);

                self.target = None;
                self.error = Some(e);
            }
        }

        true
    }

    /// Advance the animation by one frame.
    ///
    /// Passing the last frame commits the last sample and stops the clock.
    /// Returns whether the display changed.
    pub fn tick(&mut self, epoch: Epoch) -> bool {
        if epoch != self.epoch {
            return false;
        }

        let next = match &self.mode {
            Mode::Animating { frame, .. } => frame + 1,
            Mode::Idle { .. } => return false,
        };

        if next >= self.trajectory.len() {
            let angles = self
                .trajectory
                .last()
                .map_or(self.home, |sample| sample.angles());

            self.mode = Mode::Idle { angles };

            log::debug!("Animation finished at {}", angles);
        } else if let Mode::Animating { frame, .. } = &mut self.mode {
            *frame = next;
        }

        !self.is_scrubbing()
    }

    /// Inspect the trajectory at a frame.
    ///
    /// The frame is bounded to the last frame. Ignored without a trajectory.
    pub fn hover(&mut self, frame: usize) -> bool {
        match self.trajectory.clamp_frame(frame) {
            Some(frame) => {
                let changed = self.scrub != Some(frame);
                self.scrub = Some(frame);
                changed
            }
            None => false,
        }
    }

    /// Stop inspecting the trajectory.
    pub fn leave(&mut self) -> bool {
        self.scrub.take().is_some()
    }

    /// Return to the home pose.
    ///
    /// Stops the animation, discards the trajectory, target, error and any
    /// outstanding request.
    pub fn reset(&mut self) {
        self.mode = Mode::Idle { angles: self.home };
        self.trajectory = Trajectory::empty();
        self.scrub = None;
        self.target = None;
        self.error = None;
        self.pending = None;
        self.epoch += 1;
    }

    /// Stop the animation clock, keeping the current frame.
    pub fn stop(&mut self) {
        if let Mode::Animating { clock, .. } = &mut self.mode {
            clock.take();
        }
    }
}
