// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use armviz_core::{
    algorithm::{effector_velocity, ForwardKinematics, Jacobian},
    nalgebra::Matrix2x3,
    CoordinateMapper, JointAngles, LinkLengths, Point, Trajectory,
};

mod chart;
mod scene;
mod svg;

pub use self::chart::{Chart, Charts, Marker, Series};
pub use self::scene::*;
pub use self::svg::SvgSurface;

/// Everything the renderer needs to draw a single frame.
pub struct Frame<'a> {
    /// Authoritative joint angles.
    pub angles: JointAngles,
    pub lengths: LinkLengths,
    pub trajectory: &'a Trajectory,
    pub target: Option<Point>,
    /// Trajectory frame on display, if any.
    pub frame: Option<usize>,
    /// Draw the scene dimmed.
    pub dimmed: bool,
}

/// Numeric read-outs of the authoritative pose.
#[derive(Clone, Debug, PartialEq)]
pub struct Readout {
    pub angles: JointAngles,
    /// Effector position in robot space.
    pub effector: Point,
    /// Linear velocity Jacobian at the authoritative angles.
    pub jacobian: Matrix2x3<f32>,
    /// Effector velocity along the trajectory, if a frame is on display.
    pub velocity: Option<(f32, f32)>,
}

impl std::fmt::Display for Readout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Effector [{:7.2}, {:7.2}] {} J [[{:8.2}, {:8.2}, {:8.2}], [{:8.2}, {:8.2}, {:8.2}]]",
            self.effector.x,
            self.effector.y,
            self.angles,
            self.jacobian[(0, 0)],
            self.jacobian[(0, 1)],
            self.jacobian[(0, 2)],
            self.jacobian[(1, 0)],
            self.jacobian[(1, 1)],
            self.jacobian[(1, 2)],
        )?;

        if let Some((vx, vy)) = self.velocity {
            write!(f, " V [{:7.2}, {:7.2}]", vx, vy)?;
        }

        Ok(())
    }
}

/// Rendered output of a single frame.
#[derive(Clone, Debug, PartialEq)]
pub struct View {
    pub scene: Scene,
    pub readout: Readout,
    pub charts: Charts,
}

pub struct Renderer {
    mapper: CoordinateMapper,
}

impl Renderer {
    pub fn new(mapper: CoordinateMapper) -> Self {
        Self { mapper }
    }

    #[inline]
    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn render(&self, frame: &Frame) -> View {
        View {
            scene: self.scene(frame),
            readout: self.readout(frame),
            charts: Charts::new(frame.trajectory, frame.frame),
        }
    }

    /// Build the scene, back to front.
    pub fn scene(&self, frame: &Frame) -> Scene {
        let mut scene = Scene::new(self.mapper.width(), self.mapper.height());

        if frame.dimmed {
            scene.opacity = DIMMED_OPACITY;
        }

        let base = self.mapper.base();

        scene.push(Primitive::Grid {
            spacing: GRID_SPACING,
            color: COLOR_GRID,
        });

        scene.push(Primitive::Disc {
            center: base,
            radius: frame.lengths.max_reach(),
            color: COLOR_REACH,
            fill_opacity: 0.1,
        });

        if !frame.trajectory.is_empty() {
            scene.push(Primitive::DashedPath {
                points: frame
                    .trajectory
                    .effector_path()
                    .map(|point| self.mapper.to_canvas(&point))
                    .collect(),
                color: COLOR_PATH,
            });
        }

        if let Some(target) = frame.target {
            scene.push(Primitive::Crosshair {
                center: self.mapper.to_canvas(&target),
                size: 8.0,
                color: COLOR_TARGET,
            });
        }

        let chain = ForwardKinematics::new(frame.lengths)
            .solve(&frame.angles)
            .map(|point| self.mapper.to_canvas(&point));

        for (idx, color) in COLOR_LINKS.into_iter().enumerate() {
            scene.push(Primitive::Link {
                from: chain[idx],
                to: chain[idx + 1],
                width: 8.0,
                color,
            });
        }

        for joint in &chain[..3] {
            scene.push(Primitive::Joint {
                center: *joint,
                radius: 6.0,
                color: COLOR_JOINT,
            });
        }

        scene.push(Primitive::Effector {
            center: chain[3],
            radius: 7.0,
            color: COLOR_EFFECTOR,
        });

        scene
    }

    pub fn readout(&self, frame: &Frame) -> Readout {
        let jacobian = Jacobian::new(frame.lengths).solve(&frame.angles);

        let velocity = frame
            .frame
            .and_then(|idx| joint_velocity(frame.trajectory, idx))
            .map(|velocity| effector_velocity(&jacobian, &velocity));

        Readout {
            angles: frame.angles,
            effector: ForwardKinematics::new(frame.lengths).effector(&frame.angles),
            jacobian,
            velocity,
        }
    }
}

/// Joint velocity at a trajectory frame, by difference of neighbouring frames.
fn joint_velocity(trajectory: &Trajectory, frame: usize) -> Option<JointAngles> {
    let (prev, curr) = match frame {
        0 => (trajectory.get(0)?, trajectory.get(1)?),
        _ => (trajectory.get(frame - 1)?, trajectory.get(frame)?),
    };

    let dt = curr.time - prev.time;
    if dt <= f32::EPSILON {
        return None;
    }

    Some(JointAngles::new(
        (curr.q1 - prev.q1) / dt,
        (curr.q2 - prev.q2) / dt,
        (curr.q3 - prev.q3) / dt,
    ))
}
