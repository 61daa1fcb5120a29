// What you SEE:
// • The webcam, mirrored, slowly shearing apart cell by cell.
// • Up/Down (or drag right/up, left/down) change the grid size.
// • Space pauses/resumes. S saves the current frame. ESC quits.

mod camera;
mod draw;
mod error;
mod input;
mod save;
mod shuffle;
mod types;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::{Level, debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use camera::CameraCapture;
use draw::Drawer;
use input::{Command, DragTracker, Params};
use shuffle::ShuffleKernel;
use types::GridLength;

#[derive(Debug, Parser)]
#[command(name = "shifter", about = "Webcam pixel-shuffle feedback effect")]
struct Cli {
    /// Capture device index
    #[arg(long, value_name = "INDEX", default_value_t = 0)]
    camera: u32,

    /// Requested capture width; the canvas follows the negotiated size
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Requested capture height
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Initial cells per axis (at least 2)
    #[arg(long, value_name = "N", default_value_t = 64)]
    grid_length: u32,

    /// Window update cap
    #[arg(long, default_value_t = 60)]
    fps: usize,

    /// Drag distance per grid step (pixels)
    #[arg(long, value_name = "PX", default_value_t = 12.0)]
    drag_step: f32,

    /// Directory for snapshots
    #[arg(long, value_name = "DIR", default_value = ".")]
    save_dir: PathBuf,

    /// Snapshot file stem
    #[arg(long, value_name = "NAME", default_value = "shifter")]
    save_name: String,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("shifter={level}").parse()?)
        .add_directive("nokhwa=warn".parse()?);
    fmt().with_env_filter(filter).with_target(true).init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    // Bad configuration stops us before any frame is produced.
    let grid = GridLength::new(cli.grid_length).context("validating --grid-length")?;
    let mut params = Params::new(grid);

    let mut cam = CameraCapture::new(cli.camera, cli.width, cli.height)
        .context("opening webcam")?;
    let (w, h) = cam.resolution();
    let mut kernel = ShuffleKernel::new(w as usize, h as usize, params.grid_length)
        .context("creating history buffers")?;
    let mut drawer = Drawer::new("shifter", w as usize, h as usize, cli.fps)
        .context("opening window")?;
    let mut drag = DragTracker::new(cli.drag_step);

    info!(width = w, height = h, grid = grid.get(), "running");

    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;

    'frames: while drawer.is_open() {
        /* 1) Inputs -> parameter snapshot for this frame */
        for cmd in input::poll(&drawer, &mut drag) {
            match cmd {
                Command::Quit => break 'frames,
                Command::Save => match save::save_png(kernel.output(), &cli.save_dir, &cli.save_name) {
                    Ok(path) => info!(path = %path.display(), "saved snapshot"),
                    Err(e) => warn!(error = %e, "snapshot failed"),
                },
                Command::TogglePlay => {
                    params.apply(&cmd);
                    info!(playing = params.playing, "playback toggled");
                }
                Command::Drag(d) => {
                    debug!(axis = ?d.axis, diff = d.diff, "drag step");
                    params.apply(&cmd);
                }
                Command::GridUp | Command::GridDown => {
                    params.apply(&cmd);
                }
            }
        }
        if params.grid_length != kernel.grid_length() {
            kernel.set_grid_length(params.grid_length);
            info!(grid = params.grid_length.get(), "grid length changed");
        }

        /* 2) One kernel pass per displayed frame while playing */
        if params.playing {
            let live = cam.next_frame().context("reading webcam")?;
            kernel.step(&live).context("rendering frame")?;
            frames_this_second += 1;
        }

        /* 3) Present (also keeps input flowing while paused) */
        drawer.present(kernel.output())?;

        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            debug!(fps = frames_this_second as f32 / secs, frame = kernel.frame_index(), "fps");
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    info!(frames = kernel.frame_index(), "window closed");
    Ok(())
}
