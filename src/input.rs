// Turns keys and mouse drags into parameter updates for the next frame.
//
// Keys: Up/Down grow/shrink the grid (held keys repeat), Space toggles
// play/pause, S saves a snapshot, Escape quits.
// Drag with the left button: right or up grows the grid, left or down
// shrinks it, one step per `step_px` of travel.

use crate::draw::Drawer;
use crate::types::GridLength;
use minifb::Key;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// One discrete step of a drag gesture. `diff` is in screen pixels, y down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Drag {
    pub axis: Axis,
    pub diff: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    GridUp,
    GridDown,
    TogglePlay,
    Save,
    Drag(Drag),
    Quit,
}

/// Snapshot the frame loop reads at the start of each frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Params {
    pub grid_length: GridLength,
    pub playing: bool,
}

impl Params {
    pub fn new(grid_length: GridLength) -> Self {
        Self { grid_length, playing: true }
    }

    /// Apply one command. Returns true when the grid length changed.
    /// `Save` and `Quit` are left to the caller.
    pub fn apply(&mut self, cmd: &Command) -> bool {
        let before = self.grid_length;
        match *cmd {
            Command::GridUp => self.grid_length = self.grid_length.increment(),
            Command::GridDown => self.grid_length = self.grid_length.decrement(),
            Command::Drag(Drag { axis, diff }) => {
                // screen y grows downward, so an upward drag is negative
                let grow = match axis {
                    Axis::X => diff > 0.0,
                    Axis::Y => diff < 0.0,
                };
                if diff != 0.0 {
                    self.grid_length = if grow {
                        self.grid_length.increment()
                    } else {
                        self.grid_length.decrement()
                    };
                }
            }
            Command::TogglePlay => self.playing = !self.playing,
            Command::Save | Command::Quit => {}
        }
        self.grid_length != before
    }
}

/// Follows one press-move-release gesture and cuts it into `Drag` steps.
#[derive(Debug)]
pub struct DragTracker {
    step_px: f32,
    anchor: Option<(f32, f32)>,
}

impl DragTracker {
    pub fn new(step_px: f32) -> Self {
        Self { step_px: step_px.max(1.0), anchor: None }
    }

    /// Feed the current button state and cursor position once per frame.
    pub fn update(&mut self, down: bool, pos: Option<(f32, f32)>) -> Option<Drag> {
        if !down {
            self.anchor = None;
            return None;
        }
        let pos = pos?;
        let Some((ax, ay)) = self.anchor else {
            self.anchor = Some(pos);
            return None;
        };

        let (dx, dy) = (pos.0 - ax, pos.1 - ay);
        let drag = if dx.abs() >= dy.abs() {
            (dx.abs() >= self.step_px).then_some(Drag { axis: Axis::X, diff: dx })
        } else {
            (dy.abs() >= self.step_px).then_some(Drag { axis: Axis::Y, diff: dy })
        };
        if drag.is_some() {
            self.anchor = Some(pos);
        }
        drag
    }
}

/// Collect this frame's commands from the window.
pub fn poll(drawer: &Drawer, drag: &mut DragTracker) -> Vec<Command> {
    let mut cmds = Vec::new();
    if drawer.key_pressed(Key::Up, true) {
        cmds.push(Command::GridUp);
    }
    if drawer.key_pressed(Key::Down, true) {
        cmds.push(Command::GridDown);
    }
    if drawer.key_pressed(Key::Space, false) {
        cmds.push(Command::TogglePlay);
    }
    if drawer.key_pressed(Key::S, false) {
        cmds.push(Command::Save);
    }
    if drawer.key_pressed(Key::Escape, false) {
        cmds.push(Command::Quit);
    }
    let (down, pos) = drawer.pointer();
    if let Some(d) = drag.update(down, pos) {
        cmds.push(Command::Drag(d));
    }
    cmds
}
