// One error type for the whole program.
// Every variant states *where* things went wrong.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("window init error: {0}")]
    WindowInit(String), // Creating the window failed
    #[error("window update error: {0}")]
    WindowUpdate(String), // Updating the window buffer failed
    #[error("camera init error: {0}")]
    CameraInit(String), // Opening/starting the camera failed
    #[error("camera frame error: {0}")]
    CameraFrame(String), // Grabbing/decoding a frame failed

    /// Grid length below the minimum of 2 cells per axis.
    #[error("invalid grid length {0}: must be at least 2")]
    InvalidGridLength(u32),

    /// A frame (camera or history) with no pixels.
    #[error("{0} frame is empty")]
    EmptyFrame(&'static str),

    /// Output and history buffers must share one resolution.
    #[error("resolution mismatch: history is {history:?}, output is {output:?}")]
    ResolutionMismatch {
        history: (usize, usize),
        output: (usize, usize),
    },

    #[error("snapshot error: {0}")]
    Save(#[from] image::ImageError),
}
