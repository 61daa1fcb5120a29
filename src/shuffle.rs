// The pixel-shuffle feedback kernel.
// Visual: the canvas is split into gridLength x gridLength cells. Every cell
// keeps pulling its pixels from one fixed neighbouring texel of the previous
// output, so the camera image slowly shears along per-cell channels. Cells
// whose direction is (0,0) stay live camera windows.

use crate::error::Error;
use crate::types::{FrameBuffer, GridLength};

/// Fixed per-cell displacement in {-1,0,1}^2.
/// The constants and shifts are part of the look; do not change them.
/// Overflow wraps on purpose.
pub fn offset_direction(x: i32, y: i32) -> (i32, i32) {
    let mut h = x
        .wrapping_mul(374_761_393)
        .wrapping_add(y.wrapping_mul(668_265_263));
    h = (h ^ (h >> 13)).wrapping_mul(1_274_126_177);
    h ^= h >> 16;
    let dx = (h >> 1).rem_euclid(3) - 1;
    let dy = (h >> 3).rem_euclid(3) - 1;
    (dx, dy)
}

/// Grid cell containing a normalized coordinate. Boundaries belong to the
/// higher cell.
#[inline]
pub fn cell_of(u: f32, v: f32, grid: GridLength) -> (i32, i32) {
    let g = grid.get() as f32;
    ((u * g).floor() as i32, (v * g).floor() as i32)
}

/// Produce one output frame from the camera frame and the previous output.
///
/// `out` must have the resolution of `previous`; the camera frame may have
/// any non-empty size since it is sampled in normalized coordinates.
/// On frame 0, or inside a cell whose direction is (0,0), the pixel is the
/// horizontally mirrored camera sample; everywhere else it is the previous
/// output one texel away in the cell's direction, wrapping at the edges.
pub fn shuffle_frame(
    camera: &FrameBuffer,
    previous: &FrameBuffer,
    frame_index: u64,
    grid: GridLength,
    out: &mut FrameBuffer,
) -> Result<(), Error> {
    if camera.is_empty() {
        return Err(Error::EmptyFrame("camera"));
    }
    if previous.is_empty() {
        return Err(Error::EmptyFrame("history"));
    }
    if out.dimensions() != previous.dimensions() || out.pixels.len() != previous.pixels.len() {
        return Err(Error::ResolutionMismatch {
            history: previous.dimensions(),
            output: out.dimensions(),
        });
    }

    let texel_w = 1.0 / previous.width as f32;
    let texel_h = 1.0 / previous.height as f32;
    let width = out.width;

    for (y, row) in out.pixels.chunks_exact_mut(width).enumerate() {
        for (x, px) in row.iter_mut().enumerate() {
            let (u, v) = previous.texel_center(x, y);
            let (cx, cy) = cell_of(u, v, grid);
            let (dx, dy) = offset_direction(cx, cy);

            *px = if frame_index == 0 || (dx, dy) == (0, 0) {
                camera.sample_nearest(1.0 - u, v)
            } else {
                let su = (u + dx as f32 * texel_w).rem_euclid(1.0);
                let sv = (v + dy as f32 * texel_h).rem_euclid(1.0);
                previous.sample_nearest(su, sv)
            };
        }
    }
    Ok(())
}

/// Owns the double-buffered history and the frame counter.
pub struct ShuffleKernel {
    front: FrameBuffer, // last output (read this frame)
    back: FrameBuffer,  // written this frame, then swapped
    frame_index: u64,
    grid: GridLength,
}

impl ShuffleKernel {
    /// History resolution is fixed here for the life of the kernel.
    pub fn new(width: usize, height: usize, grid: GridLength) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyFrame("history"));
        }
        Ok(Self {
            front: FrameBuffer::new(width, height),
            back: FrameBuffer::new(width, height),
            frame_index: 0,
            grid,
        })
    }

    /// Applies from the next frame on. History and counter are kept.
    pub fn set_grid_length(&mut self, grid: GridLength) {
        self.grid = grid;
    }

    pub fn grid_length(&self) -> GridLength {
        self.grid
    }

    /// Index the next call to `step` will render.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn output(&self) -> &FrameBuffer {
        &self.front
    }

    /// Render one frame and make it the new history.
    pub fn step(&mut self, camera: &FrameBuffer) -> Result<&FrameBuffer, Error> {
        shuffle_frame(camera, &self.front, self.frame_index, self.grid, &mut self.back)?;
        std::mem::swap(&mut self.front, &mut self.back);
        self.frame_index += 1;
        Ok(&self.front)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(n: u32) -> GridLength {
        GridLength::new(n).unwrap()
    }

    /// Every pixel gets a distinct value so samples can be traced back.
    fn numbered(width: usize, height: usize, base: u32) -> FrameBuffer {
        FrameBuffer {
            width,
            height,
            pixels: (0..(width * height) as u32).map(|i| base + i).collect(),
        }
    }

    fn mirrored(camera: &FrameBuffer, x: usize, y: usize) -> u32 {
        camera.pixel(camera.width - 1 - x, y)
    }

    #[test]
    fn hash_matches_reference_values() {
        assert_eq!(offset_direction(0, 0), (-1, -1));
        assert_eq!(offset_direction(0, 1), (0, 1));
        assert_eq!(offset_direction(1, 2), (1, 1));
        assert_eq!(offset_direction(2, 0), (-1, 0));
        assert_eq!(offset_direction(2, 1), (0, 0));
        assert_eq!(offset_direction(3, 0), (0, 0));
        assert_eq!(offset_direction(3, 2), (1, 0));
        assert_eq!(offset_direction(4, 2), (1, -1));
    }

    #[test]
    fn hash_is_deterministic_and_in_range() {
        for x in -300..300 {
            for y in [-70_000, -5, 0, 7, 123_456, i32::MAX, i32::MIN] {
                let d = offset_direction(x, y);
                assert_eq!(d, offset_direction(x, y));
                assert!((-1..=1).contains(&d.0), "dx out of range at ({x},{y})");
                assert!((-1..=1).contains(&d.1), "dy out of range at ({x},{y})");
            }
        }
    }

    #[test]
    fn cell_boundaries_belong_to_the_higher_cell() {
        assert_eq!(cell_of(0.5, 0.25, grid(4)), (2, 1));
        assert_eq!(cell_of(0.499, 0.0, grid(2)), (0, 0));
        assert_eq!(cell_of(0.5, 0.5, grid(2)), (1, 1));
    }

    #[test]
    fn grid_of_two_on_four_by_four_resolves_fixed_directions() {
        let expected = [
            ((0, 0), (-1, -1)),
            ((0, 1), (0, 1)),
            ((1, 0), (-1, -1)),
            ((1, 1), (-1, -1)),
        ];
        let fb = FrameBuffer::new(4, 4);
        for y in 0..4 {
            for x in 0..4 {
                let (u, v) = fb.texel_center(x, y);
                let cell = cell_of(u, v, grid(2));
                let want = expected.iter().find(|(c, _)| *c == cell).unwrap().1;
                assert_eq!(offset_direction(cell.0, cell.1), want);
            }
        }
        for (cell, dir) in expected {
            assert_eq!(offset_direction(cell.0, cell.1), dir);
        }
    }

    #[test]
    fn first_frame_is_the_mirrored_camera() {
        let camera = numbered(6, 4, 1000);
        for g in [2, 3, 5, 64] {
            let mut kernel = ShuffleKernel::new(6, 4, grid(g)).unwrap();
            let out = kernel.step(&camera).unwrap().clone();
            for y in 0..4 {
                for x in 0..6 {
                    assert_eq!(out.pixel(x, y), mirrored(&camera, x, y), "grid {g} at ({x},{y})");
                }
            }
        }
    }

    #[test]
    fn history_sample_wraps_around_both_edges() {
        // grid 4 on a 4x4 canvas: one texel per cell.
        let camera = numbered(4, 4, 1000);
        let previous = numbered(4, 4, 0);
        let mut out = FrameBuffer::new(4, 4);
        shuffle_frame(&camera, &previous, 1, grid(4), &mut out).unwrap();

        // cell (3,2) is the right edge, row 1; direction (1,0) wraps to column 0
        assert_eq!(offset_direction(3, 2), (1, 0));
        assert_eq!(out.pixel(3, 1), previous.pixel(0, 1));

        // cell (0,3) is the top-left texel; direction (-1,1) wraps to the
        // right column and the bottom row
        assert_eq!(offset_direction(0, 3), (-1, 1));
        assert_eq!(out.pixel(0, 0), previous.pixel(3, 3));
    }

    #[test]
    fn zero_direction_cells_stay_on_camera_every_frame() {
        let camera = numbered(8, 8, 5000);
        let mut kernel = ShuffleKernel::new(8, 8, grid(4)).unwrap();
        let mut seen = 0;
        for _ in 0..5 {
            let out = kernel.step(&camera).unwrap().clone();
            for y in 0..8 {
                for x in 0..8 {
                    let (u, v) = out.texel_center(x, y);
                    let (cx, cy) = cell_of(u, v, grid(4));
                    if offset_direction(cx, cy) == (0, 0) {
                        assert_eq!(out.pixel(x, y), mirrored(&camera, x, y));
                        seen += 1;
                    }
                }
            }
        }
        // cells (2,1) and (3,0) are windows: 2 cells x 4 texels x 5 frames
        assert_eq!(seen, 40);
    }

    #[test]
    fn later_frames_pull_from_history() {
        let camera = numbered(4, 4, 1000);
        let mut kernel = ShuffleKernel::new(4, 4, grid(4)).unwrap();
        let first = kernel.step(&camera).unwrap().clone();
        let second = kernel.step(&camera).unwrap().clone();
        assert_eq!(kernel.frame_index(), 2);
        // cell (0,0) is the bottom-left texel, direction (-1,-1) wraps to top-right
        assert_eq!(second.pixel(0, 3), first.pixel(3, 0));
    }

    #[test]
    fn grid_change_keeps_history_and_counter() {
        let camera = numbered(4, 4, 1000);
        let mut kernel = ShuffleKernel::new(4, 4, grid(2)).unwrap();
        kernel.step(&camera).unwrap();
        kernel.step(&camera).unwrap();
        let before = kernel.output().clone();

        kernel.set_grid_length(grid(4));
        assert_eq!(kernel.frame_index(), 2);
        assert_eq!(kernel.output(), &before);

        let out = kernel.step(&camera).unwrap().clone();
        assert_eq!(kernel.grid_length(), grid(4));
        assert_eq!(out.pixel(3, 1), before.pixel(0, 1));
    }

    #[test]
    fn camera_may_differ_in_resolution() {
        let camera = numbered(8, 8, 0);
        let mut kernel = ShuffleKernel::new(4, 4, grid(2)).unwrap();
        let out = kernel.step(&camera).unwrap();
        // texel (0,0) centre maps to camera u = 0.875 mirrored, v = 0.875
        assert_eq!(out.pixel(0, 0), camera.pixel(7, 0));
    }

    #[test]
    fn rejects_bad_configuration_before_rendering() {
        assert!(matches!(
            ShuffleKernel::new(0, 4, grid(2)),
            Err(Error::EmptyFrame("history"))
        ));

        let camera = numbered(4, 4, 0);
        let previous = numbered(4, 4, 0);
        let mut out = FrameBuffer::new(3, 4);
        let before = out.clone();
        let err = shuffle_frame(&camera, &previous, 1, grid(2), &mut out).unwrap_err();
        assert!(matches!(err, Error::ResolutionMismatch { history: (4, 4), output: (3, 4) }));
        assert_eq!(out, before);

        let empty = FrameBuffer::new(0, 0);
        let mut out = FrameBuffer::new(4, 4);
        assert!(matches!(
            shuffle_frame(&empty, &previous, 0, grid(2), &mut out),
            Err(Error::EmptyFrame("camera"))
        ));
    }
}
