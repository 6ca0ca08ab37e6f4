use nalgebra::Point2;

/// Transform between robot space and canvas space.
///
/// Robot space has its origin at the arm base with Y pointing up. Canvas
/// space has its origin at the top left corner with Y pointing down. The
/// arm base sits at the canvas center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateMapper {
    width: f32,
    height: f32,
}

impl CoordinateMapper {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Canvas position of the arm base.
    #[inline]
    pub fn base(&self) -> Point2<f32> {
        Point2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn to_canvas(&self, point: &Point2<f32>) -> Point2<f32> {
        let base = self.base();
        Point2::new(base.x + point.x, base.y - point.y)
    }

    pub fn to_robot(&self, point: &Point2<f32>) -> Point2<f32> {
        let base = self.base();
        Point2::new(point.x - base.x, base.y - point.y)
    }
}

impl Default for CoordinateMapper {
    fn default() -> Self {
        Self::new(600.0, 600.0)
    }
}
