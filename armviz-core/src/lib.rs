// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

//! Kinematic model of a planar arm with three revolute joints.
//!
//! Everything in this crate is pure: the forward kinematics, the analytic
//! Jacobian, the reach clamp and the coordinate mapping hold no state and
//! can be called in any order.

pub mod algorithm;

mod canvas;
mod joint;
mod trajectory;

pub use self::canvas::CoordinateMapper;
pub use self::joint::{JointAngles, LinkLengths, REACH_SAFETY_MARGIN};
pub use self::trajectory::{Trajectory, TrajectoryError, TrajectorySample};

pub use nalgebra;

/// Point in robot space, origin at the arm base.
pub type Point = nalgebra::Point2<f32>;
