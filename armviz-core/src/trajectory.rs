use nalgebra::Point2;

use crate::{algorithm::ForwardKinematics, JointAngles, LinkLengths};

/// Single frame of a joint space trajectory.
///
/// The effector position is derived locally from the joint angles and the
/// link lengths at the time the trajectory was received.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct TrajectorySample {
    /// Time since trajectory start in seconds.
    pub time: f32,
    pub q1: f32,
    pub q2: f32,
    pub q3: f32,
    pub ee_x: f32,
    pub ee_y: f32,
}

impl TrajectorySample {
    #[inline]
    pub fn angles(&self) -> JointAngles {
        JointAngles::new(self.q1, self.q2, self.q3)
    }

    #[inline]
    pub fn effector(&self) -> Point2<f32> {
        Point2::new(self.ee_x, self.ee_y)
    }
}

impl std::fmt::Display for TrajectorySample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "t={:.3}s {} Effector [{:.2}, {:.2}]",
            self.time,
            self.angles(),
            self.ee_x,
            self.ee_y
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrajectoryError {
    /// Sample time is negative or not a number.
    InvalidTime(usize),
    /// Sample time goes back in time.
    NonMonotonic(usize),
    /// Sample holds a non finite joint angle.
    InvalidAngle(usize),
}

impl std::fmt::Display for TrajectoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTime(idx) => write!(f, "sample {} has an invalid time", idx),
            Self::NonMonotonic(idx) => write!(f, "sample {} is out of order", idx),
            Self::InvalidAngle(idx) => write!(f, "sample {} has a non finite joint angle", idx),
        }
    }
}

impl std::error::Error for TrajectoryError {}

/// Ordered, immutable sequence of trajectory samples.
///
/// The frame number of a sample is its index. An empty trajectory means
/// there is no active trajectory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trajectory {
    samples: Vec<TrajectorySample>,
}

impl Trajectory {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a trajectory from timed joint angles.
    ///
    /// The effector path is computed with the given link lengths and frozen
    /// from then on.
    pub fn from_joint_samples<I>(samples: I, lengths: &LinkLengths) -> Result<Self, TrajectoryError>
    where
        I: IntoIterator<Item = (f32, JointAngles)>,
    {
        let fk = ForwardKinematics::new(*lengths);

        let mut last_time = 0.0_f32;
        let mut trajectory = Vec::new();

        for (idx, (time, angles)) in samples.into_iter().enumerate() {
            if !time.is_finite() || time < 0.0 {
                return Err(TrajectoryError::InvalidTime(idx));
            }
            if time < last_time {
                return Err(TrajectoryError::NonMonotonic(idx));
            }
            if !angles.is_finite() {
                return Err(TrajectoryError::InvalidAngle(idx));
            }

            last_time = time;

            let effector = fk.effector(&angles);

            trajectory.push(TrajectorySample {
                time,
                q1: angles.q1(),
                q2: angles.q2(),
                q3: angles.q3(),
                ee_x: effector.x,
                ee_y: effector.y,
            });
        }

        Ok(Self {
            samples: trajectory,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    pub fn get(&self, frame: usize) -> Option<&TrajectorySample> {
        self.samples.get(frame)
    }

    #[inline]
    pub fn last(&self) -> Option<&TrajectorySample> {
        self.samples.last()
    }

    /// Bound a frame index to the last frame.
    ///
    /// Returns `None` for an empty trajectory.
    pub fn clamp_frame(&self, frame: usize) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(frame.min(self.samples.len() - 1))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrajectorySample> {
        self.samples.iter()
    }

    /// Time of the last sample.
    pub fn duration(&self) -> f32 {
        self.last().map_or(0.0, |sample| sample.time)
    }

    /// Effector positions of all samples, in robot space.
    pub fn effector_path(&self) -> impl Iterator<Item = Point2<f32>> + '_ {
        self.samples.iter().map(|sample| sample.effector())
    }
}

impl std::fmt::Display for Trajectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => write!(
                f,
                "{} frames over {:.2}s [{:.2}, {:.2}] -> [{:.2}, {:.2}]",
                self.len(),
                self.duration(),
                first.ee_x,
                first.ee_y,
                last.ee_x,
                last.ee_y
            ),
            _ => write!(f, "empty"),
        }
    }
}
