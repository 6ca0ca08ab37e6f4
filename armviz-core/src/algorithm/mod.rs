pub use self::fk::ForwardKinematics;
pub use self::jacobian::{effector_velocity, Jacobian};
pub use self::reach::{clamp, ReachClamper};

mod fk;
mod jacobian;
mod reach;
