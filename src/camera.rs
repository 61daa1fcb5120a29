// Opens a webcam and turns its frames into packed 0x00RRGGBB buffers.
// Visual expectation: each `next_frame()` is the live picture the kernel
// mirrors and shuffles.

use crate::error::Error;
use crate::types::FrameBuffer;

use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};
use tracing::{debug, info};

const TARGET_FPS: u32 = 30;

pub struct CameraCapture {
    cam: Camera,
    width: u32,
    height: u32,
}

impl CameraCapture {
    /// Open device `index` near the requested resolution.
    /// No device or no permission is a startup failure; there is no fallback.
    pub fn new(index: u32, width: u32, height: u32) -> Result<Self, Error> {
        let fmt = CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            TARGET_FPS,
        );
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        let mut cam = Camera::new(CameraIndex::Index(index), req)
            .map_err(|e| Error::CameraInit(format!("create camera {index}: {e}")))?;
        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("open stream: {e}")))?;

        // The stream may settle on a different resolution than requested.
        let actual = cam.resolution();
        info!(
            index,
            requested = %format!("{width}x{height}"),
            width = actual.width(),
            height = actual.height(),
            "camera stream open"
        );

        Ok(Self { cam, width: actual.width(), height: actual.height() })
    }

    /// Block until the next frame arrives and pack it for the kernel.
    pub fn next_frame(&mut self) -> Result<FrameBuffer, Error> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("fetch frame: {e}")))?;
        let rgb = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("decode rgb: {e}")))?;

        let (w, h) = rgb.dimensions();
        if (w, h) != (self.width, self.height) {
            debug!(w, h, "camera frame size differs from negotiated resolution");
        }
        let pixels = rgb
            .pixels()
            .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
            .collect();

        Ok(FrameBuffer { width: w as usize, height: h as usize, pixels })
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
