//! Headless walk-through of the bundled scenes.
//!
//! Usage: `gallery [SCENE_DIR] [START_SCENE]`. Without a directory the
//! scenes compiled into the binary are used.

use anyhow::{Context, Result};
use gallery::{Gallery, GalleryConfig, SceneCatalog};
use input::{Action, ElementState, KeyCode, SceneTarget};
use std::path::PathBuf;
use std::time::Duration;

const FRAME: Duration = Duration::from_micros(16_667);
const DEFAULT_START: &str = "itamar-main";

/// One scripted input step.
enum Step {
    /// Hold a key for this many seconds, then release it.
    Hold(KeyCode, f32),
    /// Pointer-locked mouse movement in pixels.
    Look(f64, f64),
    /// Press, move and release the pointer.
    Drag((f64, f64), (f64, f64)),
    Act(Action),
    Wait(f32),
}

fn tour() -> Vec<Step> {
    vec![
        Step::Wait(0.5),
        // Turn toward the Afro-Brazilian piece and walk up to it.
        Step::Look(232.0, -10.0),
        Step::Hold(KeyCode::KeyW, 1.2),
        Step::Wait(1.0),
        Step::Act(Action::Select { target: None }),
        Step::Wait(1.5),
        // Inventory room: approach the glasses and turn them over.
        Step::Hold(KeyCode::KeyW, 1.0),
        Step::Wait(1.0),
        Step::Act(Action::Select { target: Some(3) }),
        Step::Wait(0.5),
        Step::Drag((400.0, 300.0), (520.0, 260.0)),
        Step::Wait(0.5),
        Step::Act(Action::ResetInspectionRotation),
        Step::Wait(0.5),
        Step::Act(Action::ExitInspection),
        Step::Wait(0.5),
        Step::Act(Action::RequestSceneChange(SceneTarget::Previous)),
        Step::Wait(1.5),
    ]
}

fn frames(seconds: f32) -> usize {
    (seconds / FRAME.as_secs_f32()).ceil() as usize
}

fn run_frames(gallery: &mut Gallery, count: usize) {
    for _ in 0..count {
        gallery.frame(FRAME);
        for event in gallery.drain_events() {
            log::info!("[{:>6.2}s] {:?}", gallery.time().elapsed_seconds(), event);
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let catalog = match args.next().map(PathBuf::from) {
        Some(dir) => SceneCatalog::load_dir(&dir)
            .with_context(|| format!("loading scenes from {}", dir.display()))?,
        None => SceneCatalog::builtin().context("loading bundled scenes")?,
    };
    let start = args.next().unwrap_or_else(|| DEFAULT_START.to_string());

    let config = GalleryConfig::load();
    log::info!("Starting gallery tour in '{}' ({} scene(s))", start, catalog.len());
    let mut gallery = Gallery::new(config, catalog, &start)
        .with_context(|| format!("opening scene '{}'", start))?;

    for step in tour() {
        match step {
            Step::Hold(key, seconds) => {
                gallery.input_mut().process_keyboard(key, ElementState::Pressed);
                run_frames(&mut gallery, frames(seconds));
                gallery.input_mut().process_keyboard(key, ElementState::Released);
            }
            Step::Look(dx, dy) => {
                gallery.input_mut().process_mouse_motion((dx, dy));
                run_frames(&mut gallery, 1);
            }
            Step::Drag(from, to) => {
                gallery.input_mut().process_pointer_down(from);
                gallery.input_mut().process_pointer_move(to);
                run_frames(&mut gallery, 1);
                gallery.input_mut().process_pointer_up();
            }
            Step::Act(action) => {
                gallery.input_mut().push_action(action);
                run_frames(&mut gallery, 1);
            }
            Step::Wait(seconds) => run_frames(&mut gallery, frames(seconds)),
        }
    }

    let camera = gallery.camera();
    log::info!(
        "Tour finished in '{}' at {:?} after {} frames",
        gallery.scene_id(),
        camera.position(),
        gallery.time().frame_count()
    );
    gallery.teardown();
    Ok(())
}
