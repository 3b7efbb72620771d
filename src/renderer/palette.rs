//! Colors for scene elements

/// Straight-alpha RGBA color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// From a 0xRRGGBB literal
    pub const fn hex(rgb: u32) -> Self {
        Self::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS color string ("#rrggbb" when opaque)
    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

pub mod colors {
    use super::Color;

    pub const BACKGROUND: Color = Color::hex(0x000000);
    pub const STAR: Color = Color::rgba(255, 255, 255, 0.8);
    pub const GROUND_TOP: Color = Color::hex(0x111111);
    pub const GROUND_BOTTOM: Color = Color::hex(0x000000);
    pub const GRASS: Color = Color::hex(0x1a472a);

    pub const TOWER: Color = Color::hex(0x1a1a1a);
    pub const TOWER_HIGHLIGHT: Color = Color::hex(0x262626);
    pub const TOWER_EDGE: Color = Color::hex(0x333333);
    pub const TOWER_CAP: Color = Color::hex(0x555555);
    pub const LAMP_OFF: Color = Color::hex(0x666666);
    pub const LABEL: Color = Color::hex(0xffffff);

    pub const PERSON: Color = Color::hex(0x333333);
    pub const PERSON_ACTIVE: Color = Color::hex(0x444444);
    pub const FACE: Color = Color::hex(0xffffff);
    pub const NAME: Color = Color::hex(0xcccccc);

    pub const DEVICE_BODY: Color = Color::hex(0x222222);
    pub const DEVICE_SCREEN: Color = Color::hex(0x000000);
    pub const DEVICE_KEYBOARD: Color = Color::hex(0x333333);
    pub const SENDER_SCREEN_TEXT: Color = Color::hex(0x3b82f6);
    pub const RECEIVER_SCREEN_TEXT: Color = Color::hex(0x10b981);

    pub const LASER: Color = Color::hex(0xef4444);
    pub const BEAM_HEAD: Color = Color::hex(0xffffff);
    pub const BIT_ZERO: Color = Color::hex(0x3b82f6);
    pub const BIT_ONE: Color = Color::hex(0xef4444);
    pub const BIT_DIGIT: Color = Color::hex(0xffffff);

    pub const PULSE: Color = Color::rgb(16, 185, 129);
}
