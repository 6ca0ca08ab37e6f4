use armviz_core::Point;

/// Hex colour string.
pub type Color = &'static str;

pub const COLOR_GRID: Color = "#e2e8f0";
pub const COLOR_REACH: Color = "#94a3b8";
pub const COLOR_PATH: Color = "#64748b";
pub const COLOR_TARGET: Color = "#ef4444";
pub const COLOR_JOINT: Color = "#1f2937";
pub const COLOR_EFFECTOR: Color = "#111827";
pub const COLOR_LINKS: [Color; 3] = ["#3b82f6", "#10b981", "#f59e0b"];

/// Grid spacing in canvas units.
pub const GRID_SPACING: f32 = 50.0;

/// Scene opacity while scrubbing.
pub const DIMMED_OPACITY: f32 = 0.5;

/// Scene primitive, in canvas coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Grid {
        spacing: f32,
        color: Color,
    },
    Disc {
        center: Point,
        radius: f32,
        color: Color,
        fill_opacity: f32,
    },
    DashedPath {
        points: Vec<Point>,
        color: Color,
    },
    Crosshair {
        center: Point,
        size: f32,
        color: Color,
    },
    Link {
        from: Point,
        to: Point,
        width: f32,
        color: Color,
    },
    Joint {
        center: Point,
        radius: f32,
        color: Color,
    },
    Effector {
        center: Point,
        radius: f32,
        color: Color,
    },
}

/// Ordered list of primitives, painted back to front.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    /// Opacity applied to the whole scene.
    pub opacity: f32,
    pub primitives: Vec<Primitive>,
}

impl Scene {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            opacity: 1.0,
            primitives: Vec::new(),
        }
    }

    #[inline]
    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    #[inline]
    pub fn is_dimmed(&self) -> bool {
        self.opacity < 1.0
    }

    /// Paint the scene onto a surface.
    pub fn paint<S: Surface>(&self, surface: &mut S) {
        surface.clear(self.width, self.height);

        for primitive in &self.primitives {
            surface.draw(primitive, self.opacity);
        }
    }
}

/// Rendering backend.
pub trait Surface {
    /// Start a new frame of the given size.
    fn clear(&mut self, width: f32, height: f32);

    /// Draw a primitive with the scene opacity applied.
    fn draw(&mut self, primitive: &Primitive, opacity: f32);
}
