// Snapshot of the current output as `<dir>/<name>.png`.
// Saving again overwrites the previous snapshot.

use std::path::{Path, PathBuf};

use image::{ExtendedColorType, ImageFormat};

use crate::error::Error;
use crate::types::FrameBuffer;

pub fn save_png(fb: &FrameBuffer, dir: &Path, name: &str) -> Result<PathBuf, Error> {
    let path = dir.join(format!("{name}.png"));
    image::save_buffer_with_format(
        &path,
        &fb.to_rgb_bytes(),
        fb.width as u32,
        fb.height as u32,
        ExtendedColorType::Rgb8,
        ImageFormat::Png,
    )?;
    Ok(path)
}
