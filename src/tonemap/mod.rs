use crate::math::RGBColor;

use serde::{Deserialize, Serialize};

mod clamp;
mod reinhard0;

pub use clamp::Clamp;
pub use reinhard0::Reinhard0;

/// 8-bit RGBA, the surface format of the frame.
pub type Pixel = [u8; 4];

// reference https://64.github.io/tonemapping/
pub trait Tonemapper: Send + Sync {
    /// hdr radiance to linear ldr, each channel in [0, 1].
    fn map(&self, color: RGBColor) -> RGBColor;
}

#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Converter {
    sRGB,
}

impl Converter {
    pub fn transfer_function(&self, linear: f32) -> f32 {
        match self {
            Converter::sRGB => {
                if linear < 0.0031308 {
                    linear * 323.0 / 25.0
                } else {
                    (211.0 * linear.powf(5.0 / 12.0) - 11.0) / 200.0
                }
            }
        }
    }

    pub fn to_pixel(&self, tonemapper: &dyn Tonemapper, color: RGBColor) -> Pixel {
        let mapped = tonemapper.map(color);
        let encode = |c: f32| (self.transfer_function(c.clamp(0.0, 1.0)) * 255.0).round() as u8;
        [encode(mapped.r), encode(mapped.g), encode(mapped.b), 255]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TonemapSettings {
    Clamp { exposure: f32 },
    Reinhard0 { exposure: f32 },
}

impl Default for TonemapSettings {
    fn default() -> Self {
        TonemapSettings::Clamp { exposure: 0.0 }
    }
}

pub fn parse_tonemapper(settings: TonemapSettings) -> (Box<dyn Tonemapper>, Converter) {
    match settings {
        TonemapSettings::Clamp { exposure } => (Box::new(Clamp::new(exposure)), Converter::sRGB),
        TonemapSettings::Reinhard0 { exposure } => {
            (Box::new(Reinhard0::new(exposure)), Converter::sRGB)
        }
    }
}
