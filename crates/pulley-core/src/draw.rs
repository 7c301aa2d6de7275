//! Debug gizmo geometry and the rendering boundary

use glam::{Affine2, Vec2};

/// RGBA color with components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// Line segment in draw space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Vec2,
    pub to: Vec2,
}

impl Segment {
    pub fn new(from: Vec2, to: Vec2) -> Self {
        Self { from, to }
    }
}

/// Line drawing operations consumed by the joint's debug draw
pub trait Canvas {
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32);

    /// Replace the transform applied to subsequent lines
    fn set_transform(&mut self, transform: Affine2);
}

/// Gizmo for one pulley arm: a vertical segment capped by two horizontal ticks
pub struct ArmGizmo;

impl ArmGizmo {
    pub const COLOR: Color = Color::rgba(0.7, 0.6, 0.0, 0.5);
    pub const WIDTH: f32 = 3.0;
    /// Half the length of each tick mark
    pub const TICK_HALF_WIDTH: f32 = 10.0;

    /// Segments for an arm of `length`, in order: top tick, bottom tick, arm
    pub fn segments(length: f32) -> [Segment; 3] {
        let t = Self::TICK_HALF_WIDTH;
        [
            Segment::new(Vec2::new(-t, 0.0), Vec2::new(t, 0.0)),
            Segment::new(Vec2::new(-t, length), Vec2::new(t, length)),
            Segment::new(Vec2::ZERO, Vec2::new(0.0, length)),
        ]
    }

    /// Draw an arm of `length` under the canvas' current transform
    ///
    /// Returns the number of segments drawn.
    pub fn draw<C: Canvas + ?Sized>(canvas: &mut C, length: f32) -> usize {
        let segments = Self::segments(length);
        for segment in &segments {
            canvas.draw_line(segment.from, segment.to, Self::COLOR, Self::WIDTH);
        }
        segments.len()
    }
}

/// A line captured by [`RecordingCanvas`], with the transform active at the time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawnLine {
    pub segment: Segment,
    pub color: Color,
    pub width: f32,
    pub transform: Affine2,
}

/// Canvas that records lines instead of rasterizing them
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    transform: Affine2,
    lines: Vec<DrawnLine>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self {
            transform: Affine2::IDENTITY,
            lines: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[DrawnLine] {
        &self.lines
    }

    /// Segments mapped through the transform active when they were drawn
    pub fn transformed_segments(&self) -> Vec<Segment> {
        self.lines
            .iter()
            .map(|line| {
                Segment::new(
                    line.transform.transform_point2(line.segment.from),
                    line.transform.transform_point2(line.segment.to),
                )
            })
            .collect()
    }
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas for RecordingCanvas {
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32) {
        self.lines.push(DrawnLine {
            segment: Segment::new(from, to),
            color,
            width,
            transform: self.transform,
        });
    }

    fn set_transform(&mut self, transform: Affine2) {
        self.transform = transform;
    }
}
