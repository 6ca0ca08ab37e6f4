use nalgebra::Matrix2x3;

use crate::{JointAngles, LinkLengths};

/// Analytic linear velocity Jacobian of the effector.
pub struct Jacobian {
    lengths: LinkLengths,
}

impl Jacobian {
    pub fn new(lengths: LinkLengths) -> Self {
        Self { lengths }
    }

    /// Evaluate the Jacobian at the given joint angles.
    ///
    /// Row 0 holds the partial derivatives of the effector X, row 1 those of
    /// the effector Y. Column `i` sums the contribution of every link at or
    /// beyond joint `i`. The matrix is defined everywhere, at a singularity it
    /// merely loses rank.
    pub fn solve(&self, angles: &JointAngles) -> Matrix2x3<f32> {
        let lengths = self.lengths.as_array();
        let theta = angles.cumulative();

        let mut matrix = Matrix2x3::zeros();

        for i in 0..3 {
            for k in i..3 {
                matrix[(0, i)] -= lengths[k] * theta[k].sin();
                matrix[(1, i)] += lengths[k] * theta[k].cos();
            }
        }

        matrix
    }
}

/// Effector velocity for the given joint velocities.
pub fn effector_velocity(jacobian: &Matrix2x3<f32>, joint_velocity: &JointAngles) -> (f32, f32) {
    let velocity = jacobian * nalgebra::Vector3::from(joint_velocity.0);

    (velocity.x, velocity.y)
}
