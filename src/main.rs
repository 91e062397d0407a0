// What you SEE:
// • The mirrored camera feed fills the window, with your ink blended on top.
// • Pinch thumb + index (or point with the index finger in pointer mode) to draw.
// • In move mode, pinch thumb + middle finger and drag to move the whole drawing.
// • Without a landmark feed, the mouse stands in for one hand: hold LMB to pinch.
// • P pinch/pointer, E eraser, D draw, M move, C clear, U/Z undo, S save,
//   =/- size, ]/[ opacity, 1-6 palette, K pick color under mouse,
//   R reset colors. ESC quits.

mod camera;
mod compositor;
mod config;
mod detector;
mod draw;
mod error;
mod geometry;
mod gesture;
mod layer;
mod session;
mod stroke;
mod types;

use anyhow::Context;
use camera::{CameraCapture, FrameSource};
use clap::Parser;
use config::Config;
use detector::{HandDetector, PointerHand, ReplayDetector};
use draw::{Drawer, draw_crosshair, draw_text_5x7, fill_disc, pack};
use session::{Command, SessionState};
use std::path::{Path, PathBuf};
use types::FrameBuffer;

#[derive(Parser, Debug)]
#[command(name = "air-draw")]
#[command(version, about = "Draw in the air over your webcam using hand gestures")]
struct Cli {
    /// Config file (default: ~/.config/air-draw/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Camera index to open
    #[arg(long, value_name = "INDEX")]
    camera: Option<u32>,

    /// JSON-lines landmark feed; without it the mouse acts as a hand
    #[arg(long, value_name = "PATH")]
    landmarks: Option<PathBuf>,

    /// Directory exported drawings are written to
    #[arg(long, value_name = "DIR")]
    save_dir: Option<PathBuf>,

    /// Start with the pointing-finger trigger instead of pinch
    #[arg(long)]
    pointer: bool,
}

/// Where hand landmarks come from this run.
enum HandInput {
    Pointer(PointerHand),
    Replay(Box<dyn HandDetector>),
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = Config::load_or_default(cli.config.as_deref());
    if let Some(index) = cli.camera {
        config.camera.index = index;
    }
    if let Some(dir) = cli.save_dir {
        config.session.save_directory = dir;
    }
    if cli.pointer {
        config.gesture.pointer_mode = true;
    }

    let fps = (1000 / config.session.tick_interval_ms).max(1) as usize;
    let mut drawer = Drawer::new(
        "Air Draw",
        config.canvas.width as usize,
        config.canvas.height as usize,
        fps,
    )
    .context("Failed to open the window")?;

    let (w, h) = drawer.canvas_size();
    let mut session = SessionState::new(w, h, config.session_settings());

    let mut camera = match CameraCapture::new(config.camera.index, config.camera.width, config.camera.height) {
        Ok(cam) => {
            let (cw, ch) = cam.resolution();
            log::info!("Camera {} ready at {}x{}", config.camera.index, cw, ch);
            Some(cam)
        }
        Err(e) => {
            log::error!("Cannot open camera: {e}");
            session.mark_camera_unavailable();
            None
        }
    };

    let mut hands = open_hand_input(cli.landmarks.as_deref(), &mut session);

    let mut screen = FrameBuffer::blank(w as usize, h as usize);

    while drawer.is_open() && !drawer.esc_pressed() {
        for command in drawer.commands() {
            session.apply(command);
        }
        if drawer.pick_pressed()
            && let Some((mx, my)) = drawer.mouse_pos()
            && let Some(rgb) = session.color_at(mx as u32, my as u32)
        {
            session.apply(Command::PickColor(rgb));
        }

        let canvas = drawer.canvas_size();
        if canvas.0 == 0 || canvas.1 == 0 {
            // Minimized: keep the window alive without ticking.
            drawer.present(&screen)?;
            continue;
        }

        let detector: &mut dyn HandDetector = match &mut hands {
            HandInput::Pointer(p) => {
                p.set_pointer(drawer.pointer(), drawer.left_mouse_down());
                p
            }
            HandInput::Replay(r) => r.as_mut(),
        };

        // Without a camera the failure was reported once at startup; nothing to tick.
        if let Some(cam) = camera.as_mut() {
            match session.tick(canvas, cam as &mut dyn FrameSource, detector) {
                Ok(outcome) => log::trace!("tick: {} hand(s)", outcome.hands),
                Err(e) => {
                    log::warn!("Tick failed: {e}");
                    session.record_failure(&e);
                }
            }
        }

        screen = match session.last_composite() {
            Some(img) if img.dimensions() == canvas => FrameBuffer::from_rgb(img),
            _ => FrameBuffer::blank(canvas.0 as usize, canvas.1 as usize),
        };
        draw_hud(&mut screen, &session);
        if matches!(hands, HandInput::Pointer(_))
            && let Some((mx, my)) = drawer.mouse_pos()
        {
            draw_crosshair(&mut screen, mx as i32, my as i32, 12, 0x00_FF_CC_33);
        }

        drawer.present(&screen)?;
    }

    log::info!("Window closed, exiting");
    Ok(())
}

/// Replay file when given and readable, the mouse stand-in otherwise.
fn open_hand_input(path: Option<&Path>, session: &mut SessionState) -> HandInput {
    let Some(path) = path else {
        return HandInput::Pointer(PointerHand::new());
    };
    match ReplayDetector::open(path) {
        Ok(replay) => HandInput::Replay(Box::new(replay)),
        Err(e) => {
            log::error!("Cannot open landmark feed {}: {e}", path.display());
            session.set_status("Cannot open landmark feed, using mouse");
            HandInput::Pointer(PointerHand::new())
        }
    }
}

/// Status line on top, brush summary and preview at the bottom.
fn draw_hud(screen: &mut FrameBuffer, session: &SessionState) {
    draw_text_5x7(screen, 8, 8, session.status(), 0x00_FF_FF_FF);

    let brush = session.brush();
    let mode = session.mode();
    let gesture = if mode.move_enabled() {
        "MOVE"
    } else if mode.drawing_enabled() {
        mode.trigger.label()
    } else {
        "OFF"
    };
    let summary = format!(
        "{} | SIZE {} | OPACITY {:.1} | ERASER {}",
        gesture,
        brush.thickness(),
        brush.opacity(),
        if brush.eraser { "ON" } else { "OFF" }
    );
    let bottom = screen.height as i32 - 14;
    draw_text_5x7(screen, 8, bottom, &summary, 0x00_CC_CC_CC);

    let undo = format!("UNDO {}", session.history_len());
    draw_text_5x7(screen, screen.width as i32 - 8 - 6 * undo.len() as i32, bottom, &undo, 0x00_CC_CC_CC);

    // Per-hand color slots, hand 0 first.
    for (i, &rgb) in brush.colors().iter().enumerate() {
        fill_disc(screen, screen.width as i32 - 100 + 16 * i as i32, 80, 5, pack(rgb));
    }

    let radius = (brush.thickness() / 2) as i32;
    let preview = if brush.eraser { 0x00_40_40_40 } else { pack(brush.ink_for(0)) };
    fill_disc(screen, screen.width as i32 - 40, 40, radius, preview);
}
