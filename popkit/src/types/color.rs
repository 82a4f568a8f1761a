use palette::Srgba;

/// Straight-alpha sRGB color.
pub type Color = Srgba;

pub const CLEAR: Color = Srgba::new(0.0, 0.0, 0.0, 0.0);

/// Black at the given alpha, used for dimmed backdrops.
pub fn dimmed(alpha: f32) -> Color {
    Srgba::new(0.0, 0.0, 0.0, alpha.clamp(0.0, 1.0))
}
