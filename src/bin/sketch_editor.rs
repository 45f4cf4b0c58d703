//! Sketch Editor - Interactive Prism Sketcher
//!
//! Draw polygons on the ground, extrude them into prisms, then move the
//! prisms or drag their corner handles.
//!
//! Run with: `cargo run --bin sketch_editor`
//! Set `SKETCH_CONFIG=path/to/config.json` to override the defaults.
//!
//! Controls:
//! - D: Draw mode (left click adds a point, right click closes the polygon)
//! - E: Extrude every closed polygon
//! - M: Move mode (left drag a prism)
//! - V: Edit vertex mode (left drag a corner handle)
//! - R: Reset the scene
//! - Middle mouse drag: Orbit camera
//! - Right mouse drag: Pan camera
//! - Scroll wheel: Zoom camera
//! - ESC: Exit

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use tracing::{error, info};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorIcon, Window, WindowAttributes, WindowId};

use prism_sketch_engine::camera::OrbitCamera;
use prism_sketch_engine::input::{MouseButton, PointerAdapter};
use prism_sketch_engine::logging;
use prism_sketch_engine::render::{RenderError, SceneGeometry, SketchGpu, SketchUniforms};
use prism_sketch_engine::scene::Scene;
use prism_sketch_engine::sketch::{CursorStyle, SketchConfig, SketchEditor};

const INITIAL_WIDTH: u32 = 1280;
const INITIAL_HEIGHT: u32 = 800;

// ============================================================================
// APPLICATION STATE
// ============================================================================

struct SketchApp {
    window: Option<Arc<Window>>,
    gpu: Option<SketchGpu>,
    scene: Scene,
    editor: SketchEditor,
    camera: OrbitCamera,
    pointer: PointerAdapter,
    title: String,
    cursor: CursorStyle,
}

impl SketchApp {
    fn new(config: SketchConfig) -> Self {
        Self {
            window: None,
            gpu: None,
            scene: Scene::new(config.ground_half_extent),
            editor: SketchEditor::new(config),
            camera: OrbitCamera::new(INITIAL_WIDTH as f32 / INITIAL_HEIGHT as f32),
            pointer: PointerAdapter::new(INITIAL_WIDTH, INITIAL_HEIGHT),
            title: String::new(),
            cursor: CursorStyle::Default,
        }
    }

    fn initialize(&mut self, window: Arc<Window>) -> Result<(), RenderError> {
        let size = window.inner_size();
        self.gpu = Some(SketchGpu::new(Arc::clone(&window))?);
        self.camera.resize(size.width, size.height);
        self.pointer.resize(size.width, size.height);
        self.window = Some(window);
        info!(width = size.width, height = size.height, "sketch editor initialized");
        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) {
        let now = Instant::now();
        match key {
            KeyCode::KeyD => self.editor.enter_draw_mode(&mut self.scene),
            KeyCode::KeyM => self.editor.enter_move_mode(&mut self.scene),
            KeyCode::KeyV => self.editor.enter_edit_vertex_mode(&mut self.scene),
            KeyCode::KeyE => self.editor.trigger_extrude(&mut self.scene, now),
            KeyCode::KeyR => self.editor.reset(&mut self.scene, now),
            _ => return,
        }
        PointerAdapter::sync_camera(self.editor.camera_locked(), &mut self.camera);
    }

    /// Push mode text, notification and cursor to the window.
    fn present(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        let presenter = self.editor.presenter();

        let title = match presenter.notification() {
            Some(n) if n.is_error => format!("{} | Error: {}", presenter.mode_text(), n.message),
            Some(n) => format!("{} | {}", presenter.mode_text(), n.message),
            None => presenter.mode_text().to_string(),
        };
        if title != self.title {
            window.set_title(&title);
            self.title = title;
        }

        let cursor = presenter.cursor();
        if cursor != self.cursor {
            window.set_cursor(match cursor {
                CursorStyle::Default => CursorIcon::Default,
                CursorStyle::Grab => CursorIcon::Grab,
                CursorStyle::Grabbing => CursorIcon::Grabbing,
            });
            self.cursor = cursor;
        }
    }

    fn render(&mut self) -> Result<(), RenderError> {
        let Some(gpu) = &mut self.gpu else {
            return Ok(());
        };
        let geometry = SceneGeometry::from_scene(&self.scene);
        let uniforms = SketchUniforms::from_camera(&self.camera);
        gpu.render(&geometry, &uniforms)
    }
}

fn to_mouse_button(button: WinitMouseButton) -> MouseButton {
    match button {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Back => MouseButton::Other(3),
        WinitMouseButton::Forward => MouseButton::Other(4),
        WinitMouseButton::Other(id) => MouseButton::Other(id),
    }
}

// ============================================================================
// APPLICATION HANDLER
// ============================================================================

impl ApplicationHandler for SketchApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attrs = WindowAttributes::default()
            .with_title(self.editor.presenter().mode_text())
            .with_inner_size(PhysicalSize::new(INITIAL_WIDTH, INITIAL_HEIGHT));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!(error = %e, "failed to create window");
                event_loop.exit();
                return;
            }
        };
        if let Err(e) = self.initialize(window) {
            error!(error = %e, "failed to initialize GPU");
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        let now = Instant::now();
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                if let PhysicalKey::Code(key) = event.physical_key {
                    if key == KeyCode::Escape {
                        event_loop.exit();
                        return;
                    }
                    self.handle_key(key);
                }
            }

            WindowEvent::MouseInput { button, state, .. } => {
                self.pointer.button_changed(
                    to_mouse_button(button),
                    state == ElementState::Pressed,
                    &mut self.editor,
                    &mut self.scene,
                    &mut self.camera,
                    now,
                );
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.pointer.cursor_moved(
                    position.x as f32,
                    position.y as f32,
                    &mut self.editor,
                    &mut self.scene,
                    &mut self.camera,
                    now,
                );
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
                self.pointer.scrolled(scroll, &mut self.camera);
            }

            WindowEvent::CursorLeft { .. } | WindowEvent::Focused(false) => {
                self.pointer
                    .capture_lost(&mut self.editor, &mut self.scene, &mut self.camera, now);
            }

            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                }
                self.camera.resize(new_size.width, new_size.height);
                self.pointer.resize(new_size.width, new_size.height);
            }

            WindowEvent::RedrawRequested => {
                self.editor.tick(now);
                self.present();
                if let Err(e) = self.render() {
                    error!(error = %e, "render failed");
                    event_loop.exit();
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

// ============================================================================
// MAIN
// ============================================================================

fn main() -> anyhow::Result<()> {
    logging::init_logging().context("failed to initialize logging")?;

    let config = SketchConfig::from_env();
    info!(?config, "starting sketch editor");

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = SketchApp::new(config);
    event_loop
        .run_app(&mut app)
        .context("event loop terminated with an error")?;
    Ok(())
}
