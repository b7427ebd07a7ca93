use super::Tonemapper;
use crate::math::RGBColor;

/// scales by `2^exposure` and clips.
#[derive(Clone, Debug)]
pub struct Clamp {
    exposure: f32,
}

impl Clamp {
    pub fn new(exposure: f32) -> Self {
        Self { exposure }
    }
}

impl Tonemapper for Clamp {
    fn map(&self, color: RGBColor) -> RGBColor {
        let scaled = color * 2.0f32.powf(self.exposure);
        RGBColor::new(
            scaled.r.clamp(0.0, 1.0),
            scaled.g.clamp(0.0, 1.0),
            scaled.b.clamp(0.0, 1.0),
        )
    }
}
