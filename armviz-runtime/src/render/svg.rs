use ::svg::{
    node::element::{Circle, Group, Line, Polyline},
    Document, Node,
};

use super::scene::{Primitive, Surface};

/// Surface producing an SVG document.
pub struct SvgSurface {
    width: f32,
    height: f32,
    document: Document,
}

impl Default for SvgSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgSurface {
    pub fn new() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            document: Document::new(),
        }
    }

    /// Complete SVG document of the last painted frame.
    pub fn document(&self) -> String {
        self.document.to_string()
    }

    fn grid(width: f32, height: f32, spacing: f32, color: &str, opacity: f32) -> Group {
        let mut group = Group::new()
            .set("stroke", color)
            .set("stroke-width", 1)
            .set("opacity", opacity);

        if spacing <= 0.0 {
            return group;
        }

        let mut x = 0.0;
        while x <= width {
            group.append(line(x, 0.0, x, height));
            x += spacing;
        }

        let mut y = 0.0;
        while y <= height {
            group.append(line(0.0, y, width, y));
            y += spacing;
        }

        group
    }
}

fn line(x1: f32, y1: f32, x2: f32, y2: f32) -> Line {
    Line::new()
        .set("x1", x1)
        .set("y1", y1)
        .set("x2", x2)
        .set("y2", y2)
}

impl Surface for SvgSurface {
    fn clear(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.document = Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", (0.0_f32, 0.0_f32, width, height));
    }

    fn draw(&mut self, primitive: &Primitive, opacity: f32) {
        match primitive {
            Primitive::Grid { spacing, color } => {
                let grid = Self::grid(self.width, self.height, *spacing, color, opacity);
                self.document.append(grid);
            }
            Primitive::Disc {
                center,
                radius,
                color,
                fill_opacity,
            } => {
                self.document.append(
                    Circle::new()
                        .set("cx", center.x)
                        .set("cy", center.y)
                        .set("r", *radius)
                        .set("fill", *color)
                        .set("fill-opacity", *fill_opacity)
                        .set("stroke", *color)
                        .set("stroke-dasharray", "4 4")
                        .set("opacity", opacity),
                );
            }
            Primitive::DashedPath { points, color } => {
                if points.len() < 2 {
                    return;
                }

                let points = points
                    .iter()
                    .map(|p| format!("{:.2},{:.2}", p.x, p.y))
                    .collect::<Vec<_>>()
                    .join(" ");

                self.document.append(
                    Polyline::new()
                        .set("points", points)
                        .set("fill", "none")
                        .set("stroke", *color)
                        .set("stroke-width", 2)
                        .set("stroke-dasharray", "6 4")
                        .set("opacity", opacity),
                );
            }
            Primitive::Crosshair {
                center,
                size,
                color,
            } => {
                self.document.append(
                    Group::new()
                        .set("stroke", *color)
                        .set("stroke-width", 2)
                        .set("opacity", opacity)
                        .add(line(center.x - size, center.y, center.x + size, center.y))
                        .add(line(center.x, center.y - size, center.x, center.y + size)),
                );
            }
            Primitive::Link {
                from,
                to,
                width,
                color,
            } => {
                self.document.append(
                    line(from.x, from.y, to.x, to.y)
                        .set("stroke", *color)
                        .set("stroke-width", *width)
                        .set("stroke-linecap", "round")
                        .set("opacity", opacity),
                );
            }
            Primitive::Joint {
                center,
                radius,
                color,
            }
            | Primitive::Effector {
                center,
                radius,
                color,
            } => {
                self.document.append(
                    Circle::new()
                        .set("cx", center.x)
                        .set("cy", center.y)
                        .set("r", *radius)
                        .set("fill", *color)
                        .set("opacity", opacity),
                );
            }
        }
    }
}
