//! Scene rendering
//!
//! The renderer paints a frame from `SimulationState` onto any `Surface`.
//! Its only state is the cached layout and the scenery generated from it.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod palette;
pub mod recorder;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use palette::{Color, colors};
pub use recorder::{DrawCommand, RecordingSurface};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::settings::Settings;
use crate::sim::{Layout, SimulationState, Stage};

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// Primitive 2D drawing operations. Text is vertically centered on `pos`.
pub trait Surface {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);
    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color, line_width: f32);
    /// Fill a rect with a top-to-bottom gradient
    fn fill_vertical_gradient(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        top: Color,
        bottom: Color,
    );
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn stroke_arc(
        &mut self,
        center: Vec2,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        color: Color,
        line_width: f32,
    );
    /// Round-capped line
    fn line(&mut self, from: Vec2, to: Vec2, color: Color, line_width: f32);
    fn text(&mut self, pos: Vec2, text: &str, font: &str, color: Color, align: TextAlign);
    /// Blurred halo applied to subsequent fills and strokes
    fn set_glow(&mut self, color: Color, blur: f32);
    fn clear_glow(&mut self);
}

/// Seed for star and grass placement
const SCENERY_SEED: u64 = 0x1a5e_715c;
/// Mixed with the frame counter for beam sparkle jitter
const SPARKLE_SEED: u64 = 0x5ba2_4c1e;
/// Longest received text shown on the receiver panel
const SCREEN_TEXT_MAX: usize = 10;

/// Pre-placed background decoration
#[derive(Debug, Clone, Default)]
struct Scenery {
    /// (position, radius)
    stars: Vec<(Vec2, f32)>,
    /// (x, blade height)
    grass: Vec<(f32, f32)>,
}

impl Scenery {
    fn generate(layout: &Layout, star_count: usize, grass_count: usize) -> Self {
        let mut rng = Pcg32::seed_from_u64(SCENERY_SEED ^ u64::from(layout.width.to_bits()));
        let sky_height = layout.height * 0.6;
        let stars = (0..star_count)
            .map(|_| {
                let pos = Vec2::new(
                    rng.random::<f32>() * layout.width,
                    rng.random::<f32>() * sky_height,
                );
                (pos, rng.random::<f32>() * 1.5)
            })
            .collect();
        let grass = (0..grass_count)
            .map(|_| {
                (
                    rng.random::<f32>() * layout.width,
                    5.0 + rng.random::<f32>() * 10.0,
                )
            })
            .collect();
        Self { stars, grass }
    }
}

/// Paints the scene for the current simulation state
#[derive(Debug, Clone)]
pub struct Renderer {
    layout: Layout,
    scenery: Scenery,
    star_count: usize,
    grass_count: usize,
    beam_sparkles: usize,
}

impl Renderer {
    pub fn new(layout: Layout, settings: &Settings) -> Self {
        let star_count = settings.quality.star_count();
        let grass_count = settings.quality.grass_count();
        Self {
            scenery: Scenery::generate(&layout, star_count, grass_count),
            layout,
            star_count,
            grass_count,
            beam_sparkles: settings.beam_sparkles(),
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Recompute cached geometry after the surface changed size
    pub fn resize(&mut self, layout: Layout) {
        if layout != self.layout {
            log::debug!("Renderer resized to {}x{}", layout.width, layout.height);
            self.scenery = Scenery::generate(&layout, self.star_count, self.grass_count);
            self.layout = layout;
        }
    }

    /// Paint one full frame
    pub fn render(&self, state: &SimulationState, surface: &mut impl Surface) {
        let layout = &self.layout;
        let stage = state.stage;

        surface.fill_rect(0.0, 0.0, layout.width, layout.height, colors::BACKGROUND);
        self.draw_sky(surface);
        self.draw_ground(surface);

        let lamp_lit = stage == Stage::LaserBeam;
        shapes::tower(surface, layout, layout.sender_x, "Sender Tower", lamp_lit);
        shapes::tower(surface, layout, layout.receiver_x, "Receiver Tower", lamp_lit);

        shapes::person(
            surface,
            Vec2::new(layout.sender_x, layout.person_y),
            "Ahmed",
            stage.index() >= Stage::Encoding.index(),
        );
        shapes::person(
            surface,
            Vec2::new(layout.receiver_x, layout.person_y),
            "Sara",
            stage.index() >= Stage::Decoding.index(),
        );

        shapes::device(
            surface,
            layout.sender_device(),
            sender_screen_text(stage),
            colors::SENDER_SCREEN_TEXT,
        );
        let receiver_text = receiver_screen_text(state);
        shapes::device(
            surface,
            layout.receiver_device(),
            receiver_text.as_deref(),
            colors::RECEIVER_SCREEN_TEXT,
        );

        for bit in &state.particles {
            shapes::bit(surface, bit);
        }

        if stage == Stage::LaserBeam {
            self.draw_beam(state, surface);
        }

        if let Some(pulse) = &state.pulse {
            shapes::pulse(surface, pulse);
        }
    }

    fn draw_sky(&self, surface: &mut impl Surface) {
        for &(pos, radius) in &self.scenery.stars {
            surface.fill_circle(pos, radius, colors::STAR);
        }
    }

    fn draw_ground(&self, surface: &mut impl Surface) {
        let layout = &self.layout;
        let ground_y = layout.tower_base_y;
        surface.fill_vertical_gradient(
            0.0,
            ground_y,
            layout.width,
            layout.ground_height(),
            colors::GROUND_TOP,
            colors::GROUND_BOTTOM,
        );
        for &(x, height) in &self.scenery.grass {
            surface.fill_rect(x, ground_y - height, 2.0, height, colors::GRASS);
        }
    }

    fn draw_beam(&self, state: &SimulationState, surface: &mut impl Surface) {
        let from = self.layout.sender_lamp();
        let progress = state.laser_progress as f32;
        let head = self.layout.beam_point(progress);

        let mut rng = Pcg32::seed_from_u64(SPARKLE_SEED ^ state.frames);
        let sparkles: Vec<(Vec2, f32)> = (0..self.beam_sparkles)
            .map(|_| {
                let x = from.x + (head.x - from.x) * rng.random::<f32>();
                let y = from.y + (rng.random::<f32>() - 0.5) * 10.0;
                (Vec2::new(x, y), 2.0 + rng.random::<f32>() * 3.0)
            })
            .collect();

        shapes::beam(surface, from, head, progress > 0.0, &sparkles);
    }
}

/// Sender panel text for a stage
pub fn sender_screen_text(stage: Stage) -> Option<&'static str> {
    match stage {
        Stage::Idle => Some("Ready..."),
        Stage::Encoding => Some("Encoding..."),
        _ => None,
    }
}

/// Receiver panel text; long messages are cut to fit the screen
pub fn receiver_screen_text(state: &SimulationState) -> Option<String> {
    match state.stage {
        Stage::Decoding => Some("Decoding...".to_string()),
        Stage::Complete => {
            let message = state.decoded.as_deref().unwrap_or("");
            if message.chars().count() > SCREEN_TEXT_MAX {
                let cut: String = message.chars().take(SCREEN_TEXT_MAX).collect();
                Some(format!("{cut}..."))
            } else {
                Some(message.to_string())
            }
        }
        _ => Some("Waiting...".to_string()),
    }
}
