use super::Tonemapper;
use crate::math::RGBColor;

/// luminance based reinhard, L / (1 + L), keeping chromaticity.
#[derive(Clone, Debug)]
pub struct Reinhard0 {
    exposure: f32,
}

impl Reinhard0 {
    pub fn new(exposure: f32) -> Self {
        Self { exposure }
    }
}

impl Tonemapper for Reinhard0 {
    fn map(&self, color: RGBColor) -> RGBColor {
        let scaled = color * 2.0f32.powf(self.exposure);
        let luminance = scaled.luminance();
        if !(luminance > 0.0) {
            return RGBColor::ZERO;
        }
        scaled * (1.0 / (1.0 + luminance))
    }
}
