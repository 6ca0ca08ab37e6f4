// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

//! Boundary to the external trajectory planning service.
//!
//! The service solves the inverse kinematics for a target and returns a
//! joint space trajectory. The planner only carries the request and decodes
//! the response. The effector path is derived locally from the returned
//! joint angles with the link lengths that were sent in the request.

use armviz_core::{JointAngles, LinkLengths, Point, Trajectory, TrajectoryError};

mod http;

pub use self::http::HttpPlanner;

/// Trajectory planning request.
///
/// Serializes to the wire format of the planning service.
#[derive(Clone, Debug, PartialEq, serde_derive::Serialize)]
pub struct PlanRequest {
    /// Joint angles the motion starts from, in radians.
    pub current_angles: [f32; 3],
    /// Target X in robot space.
    pub target_x: f32,
    /// Target Y in robot space.
    pub target_y: f32,
    /// Motion duration in seconds.
    pub duration: f32,
    /// Sampling step in seconds.
    pub dt: f32,
    pub l1: f32,
    pub l2: f32,
    pub l3: f32,
}

impl PlanRequest {
    pub fn new(
        angles: &JointAngles,
        target: &Point,
        lengths: &LinkLengths,
        duration: f32,
        dt: f32,
    ) -> Self {
        Self {
            current_angles: angles.0,
            target_x: target.x,
            target_y: target.y,
            duration,
            dt,
            l1: lengths.l1,
            l2: lengths.l2,
            l3: lengths.l3,
        }
    }

    /// Link lengths the request was planned with.
    #[inline]
    pub fn lengths(&self) -> LinkLengths {
        LinkLengths::new(self.l1, self.l2, self.l3)
    }

    #[inline]
    pub fn target(&self) -> Point {
        Point::new(self.target_x, self.target_y)
    }
}

impl std::fmt::Display for PlanRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Target [{:.2}, {:.2}] from {} over {:.2}s/{:.3}s",
            self.target_x,
            self.target_y,
            JointAngles::from(self.current_angles),
            self.duration,
            self.dt
        )
    }
}

/// Planned motion.
#[derive(Clone, Debug, PartialEq)]
pub struct Plan {
    /// Goal joint angles, if reported by the service.
    pub goal: Option<JointAngles>,
    /// Joint space trajectory with the derived effector path.
    pub trajectory: Trajectory,
}

#[derive(Debug)]
pub enum PlanError {
    /// Service could not be reached or the request timed out.
    Transport(reqwest::Error),
    /// Service rejected the request.
    Rejected { status: u16, detail: String },
    /// Response could not be decoded.
    Malformed(String),
}

impl PlanError {
    /// Message to present to the user.
    pub fn message(&self) -> String {
        match self {
            PlanError::Transport(e) if e.is_timeout() => {
                "Planning service did not respond in time".to_string()
            }
            PlanError::Transport(_) => "Planning service is unreachable".to_string(),
            PlanError::Rejected { detail, .. } => detail.clone(),
            PlanError::Malformed(_) => "Planning service returned an invalid trajectory".to_string(),
        }
    }
}

impl std::fmt::Display for PlanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanError::Transport(e) => write!(f, "transport: {}", e),
            PlanError::Rejected { status, detail } => write!(f, "rejected ({}): {}", status, detail),
            PlanError::Malformed(e) => write!(f, "malformed response: {}", e),
        }
    }
}

impl std::error::Error for PlanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlanError::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TrajectoryError> for PlanError {
    fn from(value: TrajectoryError) -> Self {
        PlanError::Malformed(value.to_string())
    }
}

#[async_trait::async_trait]
pub trait Planner: Send + Sync {
    /// Plan a motion towards the request target.
    async fn plan(&self, request: &PlanRequest) -> Result<Plan, PlanError>;
}

#[derive(serde_derive::Deserialize)]
struct PlanResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    goal_angles: Option<[f32; 3]>,
    trajectory: Vec<WireSample>,
}

/// Sample as sent by the service. Velocity and acceleration columns are
/// ignored.
#[derive(serde_derive::Deserialize)]
struct WireSample {
    time: f32,
    q1: f32,
    q2: f32,
    q3: f32,
}

/// Decode a successful planner response.
///
/// An empty trajectory is an error, there is nothing to animate. A missing
/// status is accepted, any status other than `success` is not.
pub fn decode_response(body: &[u8], lengths: &LinkLengths) -> Result<Plan, PlanError> {
    let response: PlanResponse =
        serde_json::from_slice(body).map_err(|e| PlanError::Malformed(e.to_string()))?;

    if let Some(status) = response.status.filter(|status| status != "success") {
        return Err(PlanError::Malformed(format!("status '{}'", status)));
    }
    if response.trajectory.is_empty() {
        return Err(PlanError::Malformed("empty trajectory".to_string()));
    }

    let samples = response
        .trajectory
        .into_iter()
        .map(|sample| (sample.time, JointAngles::new(sample.q1, sample.q2, sample.q3)));

    Ok(Plan {
        goal: response.goal_angles.map(JointAngles::from),
        trajectory: Trajectory::from_joint_samples(samples, lengths)?,
    })
}

/// Decode a rejected planner response.
///
/// The service reports the reason in a `detail` field. Anything else falls
/// back to the status line.
pub fn decode_rejection(status: u16, reason: Option<&str>, body: &[u8]) -> PlanError {
    let detail = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| match value.get("detail") {
            Some(serde_json::Value::String(detail)) => Some(detail.clone()),
            Some(serde_json::Value::Null) | None => None,
            Some(detail) => Some(detail.to_string()),
        })
        .unwrap_or_else(|| match reason {
            Some(reason) => format!("Planning failed: {} {}", status, reason),
            None => format!("Planning failed: {}", status),
        });

    PlanError::Rejected { status, detail }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let request = PlanRequest::new(
            &JointAngles::new(0.5, -0.25, 0.0),
            &Point::new(120.0, -40.0),
            &LinkLengths::new(100.0, 80.0, 60.0),
            2.5,
            0.05,
        );

        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["current_angles"], serde_json::json!([0.5, -0.25, 0.0]));
        assert_eq!(value["target_x"], 120.0);
        assert_eq!(value["target_y"], -40.0);
        assert_eq!(value["duration"], 2.5);
        assert_eq!(value["l1"], 100.0);
        assert_eq!(value["l2"], 80.0);
        assert_eq!(value["l3"], 60.0);
        assert!((value["dt"].as_f64().unwrap() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_decode_response() {
        let body = br#"{
            "status": "success",
            "goal_angles": [0.0, 0.0, 0.0],
            "trajectory": [
                {"time": 0.0, "q1": 1.5707963, "v1": 0.0, "a1": 0.0, "q2": 0.0, "v2": 0.0, "a2": 0.0, "q3": 0.0, "v3": 0.0, "a3": 0.0},
                {"time": 0.05, "q1": 0.7853982, "v1": -1.0, "a1": 0.0, "q2": 0.0, "v2": 0.0, "a2": 0.0, "q3": 0.0, "v3": 0.0, "a3": 0.0},
                {"time": 0.1, "q1": 0.0, "v1": 0.0, "a1": 0.0, "q2": 0.0, "v2": 0.0, "a2": 0.0, "q3": 0.0, "v3": 0.0, "a3": 0.0}
            ]
        }"#;

        let plan = decode_response(body, &LinkLengths::new(100.0, 80.0, 60.0)).unwrap();

        assert_eq!(plan.goal, Some(JointAngles::new(0.0, 0.0, 0.0)));
        assert_eq!(plan.trajectory.len(), 3);

        let first = plan.trajectory.get(0).unwrap();
        assert!(first.ee_x.abs() < 1e-3);
        assert!((first.ee_y - 240.0).abs() < 1e-3);

        let last = plan.trajectory.last().unwrap();
        assert!((last.ee_x - 240.0).abs() < 1e-3);
        assert!(last.ee_y.abs() < 1e-3);
    }

    #[test]
    fn test_decode_response_uses_request_lengths() {
        let body = br#"{"trajectory": [{"time": 0.0, "q1": 0.0, "q2": 0.0, "q3": 0.0}]}"#;

        let plan = decode_response(body, &LinkLengths::new(150.0, 150.0, 100.0)).unwrap();

        assert_eq!(plan.goal, None);
        assert!((plan.trajectory.get(0).unwrap().ee_x - 400.0).abs() < 1e-3);
    }

    #[test]
    fn test_decode_response_malformed() {
        let lengths = LinkLengths::default();

        assert!(matches!(
            decode_response(b"not json", &lengths),
            Err(PlanError::Malformed(_))
        ));
        assert!(matches!(
            decode_response(br#"{"status": "success", "trajectory": []}"#, &lengths),
            Err(PlanError::Malformed(_))
        ));
        assert!(matches!(
            decode_response(
                br#"{"status": "pending", "trajectory": [{"time": 0.0, "q1": 0, "q2": 0, "q3": 0}]}"#,
                &lengths
            ),
            Err(PlanError::Malformed(_))
        ));
        assert!(matches!(
            decode_response(
                br#"{"trajectory": [{"time": 0.2, "q1": 0, "q2": 0, "q3": 0}, {"time": 0.1, "q1": 0, "q2": 0, "q3": 0}]}"#,
                &lengths
            ),
            Err(PlanError::Malformed(_))
        ));
    }

    #[test]
    fn test_decode_rejection_detail() {
        let body = br#"{"detail": "Target is out of reach or algorithm hit a singularity limit."}"#;

        let error = decode_rejection(400, Some("Bad Request"), body);

        assert_eq!(
            error.message(),
            "Target is out of reach or algorithm hit a singularity limit."
        );
        assert!(matches!(error, PlanError::Rejected { status: 400, .. }));
    }

    #[test]
    fn test_decode_rejection_fallback() {
        let error = decode_rejection(502, Some("Bad Gateway"), b"<html></html>");

        assert_eq!(error.message(), "Planning failed: 502 Bad Gateway");

        let error = decode_rejection(422, None, br#"{"detail": [{"msg": "field required"}]}"#);

        assert!(error.message().contains("field required"));
    }
}
