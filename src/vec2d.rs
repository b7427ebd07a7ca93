#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct UV(pub f32, pub f32);

impl From<(f32, f32)> for UV {
    fn from(value: (f32, f32)) -> Self {
        UV(value.0, value.1)
    }
}

impl From<UV> for (f32, f32) {
    fn from(uv: UV) -> Self {
        (uv.0, uv.1)
    }
}

#[derive(Clone, Debug)]
pub struct Vec2D<T> {
    pub buffer: Vec<T>,
    pub width: usize,
    pub height: usize,
}

impl<T: Copy> Vec2D<T> {
    pub fn new(width: usize, height: usize, fill_value: T) -> Vec2D<T> {
        Vec2D {
            buffer: vec![fill_value; width * height],
            width,
            height,
        }
    }
    pub fn at(&self, x: usize, y: usize) -> T {
        self.buffer[y * self.width + x]
    }

    /// reallocates to the new dimensions. contents are reset to `fill_value`.
    pub fn resize(&mut self, width: usize, height: usize, fill_value: T) {
        self.buffer.clear();
        self.buffer.resize(width * height, fill_value);
        self.width = width;
        self.height = height;
    }
}

impl<T> Vec2D<T> {
    pub fn write_at(&mut self, x: usize, y: usize, value: T) {
        self.buffer[y * self.width + x] = value
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_write_and_read() {
        let mut v = Vec2D::new(4, 3, 0u8);
        v.write_at(3, 2, 7);
        assert_eq!(v.at(3, 2), 7);
        assert_eq!(v.buffer[11], 7);
    }

    #[test]
    fn test_resize_resets() {
        let mut v = Vec2D::new(2, 2, 1u8);
        v.resize(5, 1, 0);
        assert_eq!((v.width, v.height, v.buffer.len()), (5, 1, 5));
        assert!(v.buffer.iter().all(|&p| p == 0));
    }
}
