use std::{f32::consts::FRAC_PI_4, ops::RangeInclusive};

/// Distance subtracted from the total arm length to obtain the usable reach.
///
/// A target on the exact outer boundary is a kinematic singularity, the
/// planner is never handed one.
pub const REACH_SAFETY_MARGIN: f32 = 0.1;

/// Link lengths of the planar arm, base to effector.
///
/// The lengths are expected to be positive. The range constants are
/// enforced by the input controls via [`LinkLengths::clamped`], the
/// kinematic algorithms accept any value.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LinkLengths {
    pub l1: f32,
    pub l2: f32,
    pub l3: f32,
}

impl LinkLengths {
    pub const RANGE_L1: RangeInclusive<f32> = 50.0..=150.0;
    pub const RANGE_L2: RangeInclusive<f32> = 50.0..=150.0;
    pub const RANGE_L3: RangeInclusive<f32> = 30.0..=100.0;

    /// Construct the link lengths as is.
    pub fn new(l1: f32, l2: f32, l3: f32) -> Self {
        Self { l1, l2, l3 }
    }

    /// Construct the link lengths, bounded by the control ranges.
    pub fn clamped(l1: f32, l2: f32, l3: f32) -> Self {
        Self {
            l1: l1.clamp(*Self::RANGE_L1.start(), *Self::RANGE_L1.end()),
            l2: l2.clamp(*Self::RANGE_L2.start(), *Self::RANGE_L2.end()),
            l3: l3.clamp(*Self::RANGE_L3.start(), *Self::RANGE_L3.end()),
        }
    }

    #[inline]
    pub fn as_array(&self) -> [f32; 3] {
        [self.l1, self.l2, self.l3]
    }

    /// Sum of all link lengths.
    #[inline]
    pub fn total(&self) -> f32 {
        self.l1 + self.l2 + self.l3
    }

    /// Usable radius of the workspace disc.
    #[inline]
    pub fn max_reach(&self) -> f32 {
        self.total() - REACH_SAFETY_MARGIN
    }
}

impl Default for LinkLengths {
    fn default() -> Self {
        Self::new(100.0, 80.0, 60.0)
    }
}

impl std::fmt::Display for LinkLengths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "L1: {:.1} L2: {:.1} L3: {:.1} (reach {:.1})",
            self.l1,
            self.l2,
            self.l3,
            self.max_reach()
        )
    }
}

/// Relative joint rotations in radians.
///
/// Each angle is relative to the orientation of the previous link, the
/// first angle is relative to the base X axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct JointAngles(pub [f32; 3]);

impl JointAngles {
    /// Pose the arm assumes on startup and reset.
    pub const HOME: JointAngles = JointAngles([FRAC_PI_4, -FRAC_PI_4, -FRAC_PI_4]);

    pub fn new(q1: f32, q2: f32, q3: f32) -> Self {
        Self([q1, q2, q3])
    }

    #[inline]
    pub fn q1(&self) -> f32 {
        self.0[0]
    }

    #[inline]
    pub fn q2(&self) -> f32 {
        self.0[1]
    }

    #[inline]
    pub fn q3(&self) -> f32 {
        self.0[2]
    }

    /// Absolute link orientations, accumulated along the chain.
    pub fn cumulative(&self) -> [f32; 3] {
        let mut theta = 0.0;
        self.0.map(|q| {
            theta += q;
            theta
        })
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|q| q.is_finite())
    }
}

impl From<[f32; 3]> for JointAngles {
    fn from(value: [f32; 3]) -> Self {
        Self(value)
    }
}

impl From<(f32, f32, f32)> for JointAngles {
    fn from((q1, q2, q3): (f32, f32, f32)) -> Self {
        Self([q1, q2, q3])
    }
}

impl std::fmt::Display for JointAngles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Q1: {:+.3}rad ({:+.1}°) Q2: {:+.3}rad ({:+.1}°) Q3: {:+.3}rad ({:+.1}°)",
            self.q1(),
            self.q1().to_degrees(),
            self.q2(),
            self.q2().to_degrees(),
            self.q3(),
            self.q3().to_degrees()
        )
    }
}
