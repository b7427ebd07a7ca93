use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign};

#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct RGBColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl RGBColor {
    pub const fn new(r: f32, g: f32, b: f32) -> RGBColor {
        RGBColor { r, g, b }
    }
    pub const ZERO: RGBColor = RGBColor::new(0.0, 0.0, 0.0);
    pub const ONE: RGBColor = RGBColor::new(1.0, 1.0, 1.0);

    pub fn max_channel(&self) -> f32 {
        self.r.max(self.g).max(self.b)
    }

    pub fn luminance(&self) -> f32 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }

    pub fn is_zero(&self) -> bool {
        self.r == 0.0 && self.g == 0.0 && self.b == 0.0
    }

    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }

    pub fn is_nonnegative(&self) -> bool {
        self.r >= 0.0 && self.g >= 0.0 && self.b >= 0.0
    }

    /// replaces NaN, infinite and negative channels with zero.
    /// debug builds treat any such channel as a contract violation.
    pub fn sanitized(self) -> RGBColor {
        debug_assert!(
            self.is_finite() && self.is_nonnegative(),
            "numeric anomaly in radiance estimate: {:?}",
            self
        );
        let fix = |c: f32| if c.is_finite() && c > 0.0 { c } else { 0.0 };
        RGBColor::new(fix(self.r), fix(self.g), fix(self.b))
    }
}

impl Add for RGBColor {
    type Output = RGBColor;
    fn add(self, other: RGBColor) -> RGBColor {
        RGBColor::new(self.r + other.r, self.g + other.g, self.b + other.b)
    }
}

impl AddAssign for RGBColor {
    fn add_assign(&mut self, other: RGBColor) {
        *self = *self + other;
    }
}

impl Mul for RGBColor {
    type Output = RGBColor;
    fn mul(self, other: RGBColor) -> RGBColor {
        RGBColor::new(self.r * other.r, self.g * other.g, self.b * other.b)
    }
}

impl MulAssign for RGBColor {
    fn mul_assign(&mut self, other: RGBColor) {
        *self = *self * other;
    }
}

impl Mul<f32> for RGBColor {
    type Output = RGBColor;
    fn mul(self, other: f32) -> RGBColor {
        RGBColor::new(self.r * other, self.g * other, self.b * other)
    }
}

impl Mul<RGBColor> for f32 {
    type Output = RGBColor;
    fn mul(self, other: RGBColor) -> RGBColor {
        other * self
    }
}

impl MulAssign<f32> for RGBColor {
    fn mul_assign(&mut self, other: f32) {
        *self = *self * other;
    }
}

impl Div<f32> for RGBColor {
    type Output = RGBColor;
    fn div(self, other: f32) -> RGBColor {
        RGBColor::new(self.r / other, self.g / other, self.b / other)
    }
}

impl DivAssign<f32> for RGBColor {
    fn div_assign(&mut self, other: f32) {
        *self = *self / other;
    }
}

impl From<f32> for RGBColor {
    fn from(s: f32) -> RGBColor {
        RGBColor::new(s, s, s)
    }
}

impl From<[f32; 3]> for RGBColor {
    fn from(c: [f32; 3]) -> RGBColor {
        RGBColor::new(c[0], c[1], c[2])
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_sanitized_keeps_valid_values() {
        let c = RGBColor::new(0.5, 1.5, 0.0);
        assert_eq!(c.sanitized(), c);
    }
}
