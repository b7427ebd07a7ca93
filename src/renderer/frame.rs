use crate::error::TransportError;
use crate::tonemap::Pixel;
use crate::vec2d::Vec2D;

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub const CLEAR: Pixel = [0, 0, 0, 255];

/// a pair of pixel surfaces. renders write the back surface, readers see the front one.
///
/// guards returned by `back_mut` and `front` must be dropped before calling `commit` or
/// `resize` on the same thread.
pub struct Frame {
    surfaces: [RwLock<Vec2D<Pixel>>; 2],
    front: AtomicUsize,
    // serializes commit and resize, the front index only changes under it
    swap: Mutex<()>,
}

impl Frame {
    pub fn new(width: usize, height: usize) -> Self {
        Frame {
            surfaces: [
                RwLock::new(Vec2D::new(width, height, CLEAR)),
                RwLock::new(Vec2D::new(width, height, CLEAR)),
            ],
            front: AtomicUsize::new(0),
            swap: Mutex::new(()),
        }
    }

    /// reallocates both surfaces, clearing their contents.
    pub fn resize(&self, width: usize, height: usize) {
        let _swap = self.swap.lock();
        let front = self.front.load(Ordering::Acquire);
        for index in [1 - front, front] {
            self.surfaces[index].write().resize(width, height, CLEAR);
        }
    }

    pub fn width(&self) -> usize {
        self.front().width
    }

    pub fn height(&self) -> usize {
        self.front().height
    }

    /// reads the front surface.
    pub fn pixel(&self, i: usize, j: usize) -> Option<Pixel> {
        let front = self.front();
        front.contains(i, j).then(|| front.at(i, j))
    }

    /// writes the back surface.
    pub fn set_pixel(&self, i: usize, j: usize, pixel: Pixel) -> Result<(), TransportError> {
        let mut back = self.back_mut();
        if !back.contains(i, j) {
            return Err(TransportError::PixelOutOfBounds {
                x: i,
                y: j,
                width: back.width,
                height: back.height,
            });
        }
        back.write_at(i, j, pixel);
        Ok(())
    }

    pub fn back_mut(&self) -> RwLockWriteGuard<'_, Vec2D<Pixel>> {
        loop {
            let back = 1 - self.front.load(Ordering::Acquire);
            let guard = self.surfaces[back].write();
            // a commit may have landed between the load and the lock
            if self.front.load(Ordering::Acquire) != back {
                return guard;
            }
        }
    }

    pub fn front(&self) -> RwLockReadGuard<'_, Vec2D<Pixel>> {
        loop {
            let front = self.front.load(Ordering::Acquire);
            let guard = self.surfaces[front].read();
            if self.front.load(Ordering::Acquire) == front {
                return guard;
            }
        }
    }

    /// presents the back surface. pixel contents are not touched.
    ///
    /// blocks until the back surface is released. the front surface stays readable until the
    /// moment of the swap.
    pub fn commit(&self) {
        let _swap = self.swap.lock();
        let front = self.front.load(Ordering::Acquire);
        let _back = self.surfaces[1 - front].write();
        let _front = self.surfaces[front].write();
        self.front.store(1 - front, Ordering::Release);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_resize() {
        let frame = Frame::new(2, 2);
        frame.resize(5, 3);
        assert_eq!((frame.width(), frame.height()), (5, 3));
        assert_eq!(frame.back_mut().width, 5);
        assert_eq!(frame.back_mut().height, 3);
        assert_eq!(frame.pixel(4, 2), Some(CLEAR));
        assert_eq!(frame.pixel(5, 2), None);
    }

    #[test]
    fn test_commit_swaps_without_touching_pixels() {
        let frame = Frame::new(3, 3);
        let red = [255, 0, 0, 255];
        frame.set_pixel(1, 2, red).unwrap();
        // not visible until presented
        assert_eq!(frame.pixel(1, 2), Some(CLEAR));

        frame.commit();
        assert_eq!(frame.pixel(1, 2), Some(red));
        assert_eq!(frame.back_mut().at(1, 2), CLEAR);

        frame.commit();
        assert_eq!(frame.pixel(1, 2), Some(CLEAR));
        assert_eq!(frame.back_mut().at(1, 2), red);
    }

    #[test]
    fn test_front_readable_while_commit_waits() {
        let frame = Frame::new(2, 2);
        let red = [255, 0, 0, 255];
        std::thread::scope(|scope| {
            let mut back = frame.back_mut();
            back.write_at(0, 0, red);
            let committer = scope.spawn(|| frame.commit());
            std::thread::sleep(Duration::from_millis(50));
            // the commit is parked on the back surface, readers still get through
            assert_eq!(frame.pixel(0, 0), Some(CLEAR));
            assert_eq!(frame.width(), 2);
            drop(back);
            committer.join().unwrap();
        });
        assert_eq!(frame.pixel(0, 0), Some(red));
    }

    #[test]
    fn test_set_pixel_out_of_bounds() {
        let frame = Frame::new(3, 2);
        assert_eq!(
            frame.set_pixel(3, 0, CLEAR),
            Err(TransportError::PixelOutOfBounds {
                x: 3,
                y: 0,
                width: 3,
                height: 2
            })
        );
    }
}
