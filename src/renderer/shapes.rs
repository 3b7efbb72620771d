//! Composite scene elements built from surface primitives

use glam::Vec2;
use std::f32::consts::{PI, TAU};

use super::palette::{Color, colors};
use super::{Surface, TextAlign};
use crate::consts::{BIT_RADIUS, PERSON_SIZE, TOWER_HEIGHT, TOWER_WIDTH};
use crate::sim::{BitParticle, Layout, SuccessPulse};

const LAMP_RADIUS: f32 = 8.0;

/// Tower shaft, cap, laser lamp and label
pub fn tower(surface: &mut impl Surface, layout: &Layout, x: f32, label: &str, lamp_lit: bool) {
    let left = x - TOWER_WIDTH / 2.0;
    let top = layout.tower_top_y;

    surface.fill_vertical_gradient(
        left,
        top,
        TOWER_WIDTH,
        TOWER_HEIGHT,
        colors::TOWER_HIGHLIGHT,
        colors::TOWER,
    );
    surface.stroke_rect(left, top, TOWER_WIDTH, TOWER_HEIGHT, colors::TOWER_EDGE, 2.0);
    surface.fill_rect(left - 5.0, top - 10.0, TOWER_WIDTH + 10.0, 10.0, colors::TOWER_CAP);

    let lamp = Vec2::new(x, top - 5.0);
    if lamp_lit {
        surface.set_glow(colors::LASER, 15.0);
        surface.fill_circle(lamp, LAMP_RADIUS, colors::LASER);
        surface.clear_glow();
    } else {
        surface.fill_circle(lamp, LAMP_RADIUS, colors::LAMP_OFF);
    }

    surface.text(
        Vec2::new(x, top - 24.0),
        label,
        "12px Arial",
        colors::LABEL,
        TextAlign::Center,
    );
}

/// Round-faced figure standing at a tower
pub fn person(surface: &mut impl Surface, center: Vec2, name: &str, active: bool) {
    let body = if active {
        colors::PERSON_ACTIVE
    } else {
        colors::PERSON
    };
    surface.fill_circle(center, PERSON_SIZE / 2.0, body);

    // Eyes
    surface.fill_circle(center + Vec2::new(-5.0, -3.0), 2.0, colors::FACE);
    surface.fill_circle(center + Vec2::new(5.0, -3.0), 2.0, colors::FACE);
    // Smile
    surface.stroke_arc(center + Vec2::new(0.0, 5.0), 3.0, 0.0, PI, colors::FACE, 1.0);

    surface.text(
        center + Vec2::new(0.0, PERSON_SIZE / 2.0 + 10.0),
        name,
        "10px Arial",
        colors::NAME,
        TextAlign::Center,
    );
}

/// Laptop-style panel; `screen_text` is shown centered on its screen
pub fn device(
    surface: &mut impl Surface,
    center: Vec2,
    screen_text: Option<&str>,
    text_color: Color,
) {
    let Vec2 { x, y } = center;
    surface.fill_rect(x - 25.0, y - 10.0, 50.0, 30.0, colors::DEVICE_BODY);
    surface.fill_rect(x - 20.0, y - 5.0, 40.0, 20.0, colors::DEVICE_SCREEN);

    if let Some(text) = screen_text {
        surface.text(
            Vec2::new(x, y + 5.0),
            text,
            "8px Arial",
            text_color,
            TextAlign::Center,
        );
    }

    surface.fill_rect(x - 25.0, y + 20.0, 50.0, 5.0, colors::DEVICE_KEYBOARD);
}

/// Glowing bit token with its digit
pub fn bit(surface: &mut impl Surface, particle: &BitParticle) {
    let (color, digit) = if particle.value {
        (colors::BIT_ONE, "1")
    } else {
        (colors::BIT_ZERO, "0")
    };
    surface.set_glow(color, 10.0);
    surface.fill_circle(particle.pos, BIT_RADIUS, color);
    surface.clear_glow();
    surface.text(particle.pos, digit, "bold 8px Arial", colors::BIT_DIGIT, TextAlign::Center);
}

/// Laser beam from the sender lamp to its leading edge
pub fn beam(
    surface: &mut impl Surface,
    from: Vec2,
    head: Vec2,
    lit_head: bool,
    sparkles: &[(Vec2, f32)],
) {
    surface.set_glow(colors::LASER, 15.0);
    surface.line(from, head, colors::LASER, 3.0);
    surface.clear_glow();

    for &(pos, size) in sparkles {
        surface.fill_circle(pos, size, colors::LASER);
    }

    if lit_head {
        surface.set_glow(colors::BEAM_HEAD, 20.0);
        surface.fill_circle(head, LAMP_RADIUS, colors::BEAM_HEAD);
        surface.clear_glow();
    }
}

/// Expanding completion ring
pub fn pulse(surface: &mut impl Surface, pulse: &SuccessPulse) {
    surface.stroke_arc(
        pulse.center,
        pulse.radius,
        0.0,
        TAU,
        colors::PULSE.with_alpha(pulse.opacity()),
        2.0,
    );
}
