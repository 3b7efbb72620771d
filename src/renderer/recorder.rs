//! Headless surface that records draw calls
//!
//! Used by the native binary and by tests to inspect frames without a display.

use glam::Vec2;

use super::{Color, Surface, TextAlign};

/// One recorded primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
    },
    StrokeRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
        line_width: f32,
    },
    VerticalGradient {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        top: Color,
        bottom: Color,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    StrokeArc {
        center: Vec2,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        color: Color,
        line_width: f32,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Color,
        line_width: f32,
    },
    Text {
        pos: Vec2,
        text: String,
        font: String,
        color: Color,
        align: TextAlign,
    },
    SetGlow {
        color: Color,
        blur: f32,
    },
    ClearGlow,
}

/// Surface that keeps every command of the frames drawn on it
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    glow: Option<(Color, f32)>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Glow still active after the last command
    pub fn glow(&self) -> Option<(Color, f32)> {
        self.glow
    }

    pub fn count(&self, predicate: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|&c| predicate(c)).count()
    }

    /// Every string drawn, in order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.glow = None;
    }
}

impl Surface for RecordingSurface {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.commands.push(DrawCommand::FillRect { x, y, w, h, color });
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color, line_width: f32) {
        self.commands.push(DrawCommand::StrokeRect {
            x,
            y,
            w,
            h,
            color,
            line_width,
        });
    }

    fn fill_vertical_gradient(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        top: Color,
        bottom: Color,
    ) {
        self.commands.push(DrawCommand::VerticalGradient {
            x,
            y,
            w,
            h,
            top,
            bottom,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_arc(
        &mut self,
        center: Vec2,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        color: Color,
        line_width: f32,
    ) {
        self.commands.push(DrawCommand::StrokeArc {
            center,
            radius,
            start_angle,
            end_angle,
            color,
            line_width,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color, line_width: f32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            line_width,
        });
    }

    fn text(&mut self, pos: Vec2, text: &str, font: &str, color: Color, align: TextAlign) {
        self.commands.push(DrawCommand::Text {
            pos,
            text: text.to_string(),
            font: font.to_string(),
            color,
            align,
        });
    }

    fn set_glow(&mut self, color: Color, blur: f32) {
        self.glow = Some((color, blur));
        self.commands.push(DrawCommand::SetGlow { color, blur });
    }

    fn clear_glow(&mut self) {
        self.glow = None;
        self.commands.push(DrawCommand::ClearGlow);
    }
}
