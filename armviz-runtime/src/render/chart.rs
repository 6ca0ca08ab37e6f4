use armviz_core::Trajectory;

/// Time series of a single quantity.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub label: &'static str,
    pub color: super::scene::Color,
    /// Time and value pairs, one per frame.
    pub points: Vec<(f32, f32)>,
}

impl Series {
    fn from_trajectory<F>(
        trajectory: &Trajectory,
        label: &'static str,
        color: super::scene::Color,
        value: F,
    ) -> Self
    where
        F: Fn(&armviz_core::TrajectorySample) -> f32,
    {
        Self {
            label,
            color,
            points: trajectory
                .iter()
                .map(|sample| (sample.time, value(sample)))
                .collect(),
        }
    }
}

/// Vertical marker at a trajectory frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Marker {
    pub frame: usize,
    pub time: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Chart {
    pub title: &'static str,
    pub series: Vec<Series>,
    pub marker: Option<Marker>,
}

impl Chart {
    /// Frame nearest to a point in time.
    ///
    /// Used to translate a pointer position on the time axis into a frame.
    pub fn frame_at(&self, time: f32) -> Option<usize> {
        let points = &self.series.first()?.points;
        if points.is_empty() {
            return None;
        }

        let idx = points.partition_point(|(t, _)| *t < time);

        if idx == 0 {
            return Some(0);
        }
        if idx >= points.len() {
            return Some(points.len() - 1);
        }

        if (points[idx].0 - time) < (time - points[idx - 1].0) {
            Some(idx)
        } else {
            Some(idx - 1)
        }
    }
}

/// Time series charts of the active trajectory.
#[derive(Clone, Debug, PartialEq)]
pub struct Charts {
    /// Joint angle over time, one chart per joint.
    pub joints: [Chart; 3],
    /// Effector X and Y over time.
    pub effector: Chart,
}

impl Charts {
    /// Build the charts for a trajectory with an optional frame marker.
    ///
    /// The marker is dropped when the frame does not exist.
    pub fn new(trajectory: &Trajectory, frame: Option<usize>) -> Self {
        use super::scene::COLOR_LINKS;

        let marker = frame.and_then(|frame| {
            trajectory
                .get(frame)
                .map(|sample| Marker { frame, time: sample.time })
        });

        let joint = |title, label, color, value: fn(&armviz_core::TrajectorySample) -> f32| Chart {
            title,
            series: vec![Series::from_trajectory(trajectory, label, color, value)],
            marker,
        };

        Self {
            joints: [
                joint("Joint 1", "q1", COLOR_LINKS[0], |s| s.q1),
                joint("Joint 2", "q2", COLOR_LINKS[1], |s| s.q2),
                joint("Joint 3", "q3", COLOR_LINKS[2], |s| s.q3),
            ],
            effector: Chart {
                title: "Effector",
                series: vec![
                    Series::from_trajectory(trajectory, "x", "#6366f1", |s| s.ee_x),
                    Series::from_trajectory(trajectory, "y", "#ec4899", |s| s.ee_y),
                ],
                marker,
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.effector.series.iter().all(|series| series.points.is_empty())
    }

    pub fn marker(&self) -> Option<Marker> {
        self.effector.marker
    }
}
