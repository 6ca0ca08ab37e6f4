use nalgebra::{Point2, Vector2};

use crate::{JointAngles, LinkLengths};

pub struct ForwardKinematics {
    lengths: LinkLengths,
}

impl ForwardKinematics {
    pub fn new(lengths: LinkLengths) -> Self {
        Self { lengths }
    }

    /// Solve the joint chain.
    ///
    /// Returns the base, the two intermediate joints and the effector, in
    /// that order. Every link endpoint is the previous endpoint offset by
    /// the link length along the accumulated orientation.
    pub fn solve(&self, angles: &JointAngles) -> [Point2<f32>; 4] {
        let mut chain = [Point2::origin(); 4];

        for (idx, (length, theta)) in self
            .lengths
            .as_array()
            .into_iter()
            .zip(angles.cumulative())
            .enumerate()
        {
            chain[idx + 1] = chain[idx] + Vector2::new(theta.cos(), theta.sin()) * length;
        }

        chain
    }

    /// Solve the effector position only.
    #[inline]
    pub fn effector(&self, angles: &JointAngles) -> Point2<f32> {
        self.solve(angles)[3]
    }
}
