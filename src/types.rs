// Core types shared by the camera, the kernel, the window and the saver.

use crate::error::Error;

/// Packed image, row-major with the top row first.
/// Normalized coordinates (u, v) put the origin at the bottom-left corner,
/// the way a GPU addresses a texture uploaded from a video frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// Black frame of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }

    /// Normalized coordinate of the centre of texel (x, y).
    #[inline]
    pub fn texel_center(&self, x: usize, y: usize) -> (f32, f32) {
        let u = (x as f32 + 0.5) / self.width as f32;
        let v = ((self.height - 1 - y) as f32 + 0.5) / self.height as f32;
        (u, v)
    }

    /// Nearest-texel lookup at a normalized coordinate. Out-of-range
    /// coordinates clamp to the edge.
    #[inline]
    pub fn sample_nearest(&self, u: f32, v: f32) -> u32 {
        let x = ((u * self.width as f32).floor().max(0.0) as usize).min(self.width - 1);
        let from_bottom = ((v * self.height as f32).floor().max(0.0) as usize).min(self.height - 1);
        self.pixel(x, self.height - 1 - from_bottom)
    }

    /// Unpack to tightly packed 8-bit RGB, top row first.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 3);
        for &px in &self.pixels {
            out.push(((px >> 16) & 0xFF) as u8);
            out.push(((px >> 8) & 0xFF) as u8);
            out.push((px & 0xFF) as u8);
        }
        out
    }
}

/// Number of cells along each axis of the unit square. Never below 2.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct GridLength(u32);

impl GridLength {
    pub const MIN: u32 = 2;

    pub fn new(n: u32) -> Result<Self, Error> {
        if n < Self::MIN {
            return Err(Error::InvalidGridLength(n));
        }
        Ok(Self(n))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn increment(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    pub fn decrement(self) -> Self {
        Self(self.0.saturating_sub(1).max(Self::MIN))
    }
}
