// Window plumbing: shows the kernel output and reports raw key/mouse state.

use crate::error::Error;
use crate::types::FrameBuffer;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, ScaleMode, Window, WindowOptions};

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Open a window the size of the canvas, capped at `fps` updates per second.
    pub fn new(title: &str, width: usize, height: usize, fps: usize) -> Result<Self, Error> {
        let opts = WindowOptions {
            resize: true,
            scale_mode: ScaleMode::AspectRatioStretch,
            ..WindowOptions::default()
        };
        let mut window = Window::new(title, width, height, opts)
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(fps);
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen. Also pumps input events.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Edge-triggered key press; `repeat` lets a held key fire again.
    pub fn key_pressed(&self, key: Key, repeat: bool) -> bool {
        let mode = if repeat { KeyRepeat::Yes } else { KeyRepeat::No };
        self.window.is_key_pressed(key, mode)
    }

    /// Left button state and the cursor in canvas pixels, if it is over the window.
    pub fn pointer(&self) -> (bool, Option<(f32, f32)>) {
        let down = self.window.get_mouse_down(MouseButton::Left);
        (down, self.window.get_mouse_pos(MouseMode::Clamp))
    }
}
