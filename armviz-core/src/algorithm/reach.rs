use nalgebra::Point2;

/// Bound a target to the workspace disc.
///
/// A target further from the base than `max_reach` is moved radially onto
/// the disc boundary. Anything inside, including the base itself, passes
/// through unchanged.
pub fn clamp(target: Point2<f32>, max_reach: f32) -> Point2<f32> {
    let distance = target.coords.norm();

    if distance > max_reach {
        Point2::from(target.coords * (max_reach / distance))
    } else {
        target
    }
}

pub struct ReachClamper {
    max_reach: f32,
}

impl ReachClamper {
    pub fn new(max_reach: f32) -> Self {
        Self { max_reach }
    }

    #[inline]
    pub fn max_reach(&self) -> f32 {
        self.max_reach
    }

    /// Whether the target lies within the workspace disc.
    #[inline]
    pub fn is_reachable(&self, target: &Point2<f32>) -> bool {
        target.coords.norm() <= self.max_reach
    }

    #[inline]
    pub fn clamp(&self, target: Point2<f32>) -> Point2<f32> {
        clamp(target, self.max_reach)
    }
}

impl From<&crate::LinkLengths> for ReachClamper {
    fn from(lengths: &crate::LinkLengths) -> Self {
        Self::new(lengths.max_reach())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LinkLengths;

    #[test]
    fn test_clamp_inside() {
        let target = Point2::new(120.0, -35.5);

        assert_eq!(clamp(target, 239.9), target);
    }

    #[test]
    fn test_clamp_on_boundary() {
        let target = Point2::new(0.0, 239.9);

        assert_eq!(clamp(target, 239.9), target);
    }

    #[test]
    fn test_clamp_outside() {
        let clamper = ReachClamper::from(&LinkLengths::new(100.0, 80.0, 60.0));
        let target = Point2::new(300.0, 400.0);

        assert!(!clamper.is_reachable(&target));

        let clamped = clamper.clamp(target);

        assert!((clamped.coords.norm() - 239.9).abs() < 1e-3);
        // Collinear with base and original target, same direction.
        assert!((clamped.x * target.y - clamped.y * target.x).abs() < 1e-2);
        assert!(clamped.coords.dot(&target.coords) > 0.0);
        assert!((clamped.x - 143.94).abs() < 1e-2);
        assert!((clamped.y - 191.92).abs() < 1e-2);
    }

    #[test]
    fn test_clamp_base() {
        let target = Point2::origin();

        assert_eq!(clamp(target, 239.9), target);
    }
}
