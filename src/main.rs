//! Islewave - animated water under an orbit camera
//!
//! Click the cloud to send it drifting, T toggles day/night, M mutes,
//! H opens the wave tweak panel (Tab selects, Up/Down nudges).

use clap::Parser;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalPosition,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use islewave::audio::AudioSystem;
use islewave::camera::OrbitCamera;
use islewave::cli::Args;
use islewave::error::{Error, Result};
use islewave::ocean::{snapshot, WaterMesh};
use islewave::rendering::{CloudUniforms, RenderSystem, SkyUniforms, WaterUniforms};
use islewave::scene::{AssetSlot, ClickOutcome, SceneController, ThemeState};

/// Pointer travel (logical pixels) beyond which a press is a drag, not a click
const CLICK_SLOP_PX: f32 = 4.0;

/// Pixel wheel deltas per zoom line
const PIXELS_PER_LINE: f32 = 50.0;

/// Mouse button currently held
#[derive(Clone, Copy, Debug)]
struct Drag {
    button: MouseButton,
    travelled_px: f32,
}

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,
    cloud_uploaded: bool,

    // Scene
    controller: SceneController,
    camera: OrbitCamera,
    audio: Option<AudioSystem>,

    // Pointer
    cursor: Option<(f32, f32)>,
    drag: Option<Drag>,

    // Time tracking
    start_time: Instant,
}

impl App {
    fn new(controller: SceneController) -> Self {
        let camera = OrbitCamera::new(controller.config().camera.clone());
        Self {
            window: None,
            render_system: None,
            cloud_uploaded: false,
            controller,
            camera,
            audio: None,
            cursor: None,
            drag: None,
            start_time: Instant::now(),
        }
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let render_config = &self.controller.config().render;
        let window_attributes = Window::default_attributes()
            .with_title(format!("Islewave - {}", self.controller.config().name))
            .with_inner_size(winit::dpi::LogicalSize::new(
                render_config.window_width,
                render_config.window_height,
            ));

        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .map_err(|e| Error::Window(e.to_string()))?,
        );

        let viewport = self.resize_viewport(&window, window.inner_size());
        let water_mesh = WaterMesh::new(&self.controller.config().mesh);
        let render_system = pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            &water_mesh,
            viewport.physical_size(),
        ))?;

        // Audio is optional: a missing device only costs the soundtrack
        if let Some(audio_config) = &self.controller.config().audio {
            match AudioSystem::new(audio_config) {
                Ok(audio) => {
                    audio.set_mix(self.controller.track_mix());
                    self.audio = Some(audio);
                }
                Err(e) => log::warn!("Continuing without audio: {}", e),
            }
        }

        log::info!("Islewave is running (ESC to quit)");

        self.window = Some(window);
        self.render_system = Some(render_system);
        Ok(())
    }

    /// Convert a physical window size into the scene viewport
    fn resize_viewport(
        &mut self,
        window: &Window,
        size: winit::dpi::PhysicalSize<u32>,
    ) -> islewave::scene::Viewport {
        let scale = window.scale_factor();
        let logical = size.to_logical::<f64>(scale);
        self.controller
            .resize(logical.width.round() as u32, logical.height.round() as u32, scale)
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: KeyCode, repeat: bool) {
        match key {
            KeyCode::Escape => event_loop.exit(),
            KeyCode::KeyT if !repeat => {
                if let Some(change) = self.controller.toggle_theme() {
                    if let Some(audio) = &self.audio {
                        audio.set_mix(change.mix);
                    }
                }
            }
            KeyCode::KeyM if !repeat => {
                let mix = self.controller.toggle_mute();
                if let Some(audio) = &self.audio {
                    audio.set_mix(mix);
                }
            }
            KeyCode::KeyH if !repeat => {
                self.controller.toggle_debug_panel();
            }
            KeyCode::Tab => self.controller.select_next_tweak(),
            KeyCode::ArrowUp => {
                self.controller.nudge_tweak(1);
            }
            KeyCode::ArrowDown => {
                self.controller.nudge_tweak(-1);
            }
            _ => {}
        }
    }

    fn handle_cursor(&mut self, position: PhysicalPosition<f64>) {
        let Some(window) = &self.window else {
            return;
        };
        let logical = position.to_logical::<f32>(window.scale_factor());
        let current = (logical.x, logical.y);
        let previous = self.cursor.replace(current);

        let (Some(drag), Some(previous)) = (self.drag.as_mut(), previous) else {
            return;
        };
        let dx = current.0 - previous.0;
        let dy = current.1 - previous.1;
        drag.travelled_px += (dx * dx + dy * dy).sqrt();

        let viewport = self.controller.state().viewport;
        match drag.button {
            MouseButton::Left => self.camera.rotate(dx, dy, viewport.height),
            MouseButton::Right => self.camera.pan(
                dx,
                dy,
                viewport.height,
                self.controller.config().render.fov_degrees,
            ),
            _ => {}
        }
    }

    fn handle_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.drag = Some(Drag {
                    button,
                    travelled_px: 0.0,
                });
            }
            ElementState::Released => {
                let Some(drag) = self.drag.take() else {
                    return;
                };
                if drag.button == MouseButton::Left && drag.travelled_px < CLICK_SLOP_PX {
                    self.click();
                }
            }
        }
    }

    fn click(&mut self) {
        let Some(cursor) = self.cursor else {
            return;
        };
        let viewport = self.controller.state().viewport;
        let ray = self
            .camera
            .screen_ray(cursor, &viewport, &self.controller.config().render);

        if let ClickOutcome::Launched { play_sfx: true } = self.controller.click(&ray) {
            if let Some(audio) = &self.audio {
                audio.play_sfx();
            }
        }
    }

    /// Render a single frame
    fn render_frame(&mut self) {
        let Some(render_system) = self.render_system.as_mut() else {
            return;
        };

        let elapsed_s = self.start_time.elapsed().as_secs_f32();
        self.controller.tick(elapsed_s);
        self.camera.update();

        if !self.cloud_uploaded {
            if let Some(model) = self.controller.cloud_model() {
                render_system.upload_cloud(model);
                self.cloud_uploaded = true;
                log::info!("Cloud mesh uploaded ({} vertices)", model.vertices.len());
            }
        }

        // Baked textures are tracked as a selection only
        if let Some(path) = self.controller.take_texture_refresh() {
            log::info!("Baked texture: {}", path);
        }

        let state = self.controller.state();
        let render_config = &self.controller.config().render;
        let (view_proj, _) = self
            .camera
            .view_proj(render_config, state.viewport.aspect_ratio());

        render_system.update_water_uniforms(&WaterUniforms::new(
            view_proj,
            &state.wave,
            state.water_time_s,
        ));
        render_system.update_sky_uniforms(&SkyUniforms::new(
            view_proj,
            self.controller.sky_color(),
            self.controller.starfield_visible(),
            state.water_time_s,
        ));
        if let (Some(cloud), Some(cloud_config)) = (&state.cloud, &self.controller.config().cloud) {
            render_system.update_cloud_uniforms(&CloudUniforms::new(
                view_proj,
                cloud.transform(),
                cloud_config.color,
            ));
        }

        match render_system.render(self.controller.cloud_visible()) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                render_system.reconfigure();
            }
            Err(e) => log::error!("Render error: {:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }
        if let Err(e) = self.init_window(event_loop) {
            log::error!("Startup failed: {}", e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(key),
                        repeat,
                        ..
                    },
                ..
            } => self.handle_key(event_loop, key, repeat),
            WindowEvent::Resized(size) => {
                let Some(window) = self.window.clone() else {
                    return;
                };
                let viewport = self.resize_viewport(&window, size);
                if let Some(render_system) = self.render_system.as_mut() {
                    let (width, height) = viewport.physical_size();
                    render_system.resize(width, height);
                }
            }
            WindowEvent::CursorMoved { position, .. } => self.handle_cursor(position),
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                self.drag = None;
            }
            WindowEvent::MouseInput { state, button, .. } => self.handle_button(button, state),
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_LINE,
                };
                self.camera.zoom(lines);
            }
            WindowEvent::RedrawRequested => self.render_frame(),
            _ => {}
        }
    }
}

/// Apply `--tweak` overrides; names that do not fit the preset are skipped
fn apply_tweaks(controller: &mut SceneController, tweaks: &[(String, f32)]) {
    for (name, value) in tweaks {
        if controller.set_tweak(name, *value).is_none() {
            log::warn!("Ignoring --tweak {}: not a uniform of this scene", name);
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = args.scene_config()?;
    config.validate()?;

    let theme = ThemeState::new(args.night, args.muted);

    // Snapshot mode: write the colour field and exit without a window
    if let (Some(path), Some(region)) = (&args.snapshot, args.snapshot_region()) {
        let mut controller = SceneController::new(config, theme, AssetSlot::empty());
        apply_tweaks(&mut controller, &args.tweak);
        return snapshot::save_snapshot(path, &controller.state().wave, region, args.snapshot_time);
    }

    let cloud_model = SceneController::spawn_cloud_loader(&config);
    let mut controller = SceneController::new(config, theme, cloud_model);
    apply_tweaks(&mut controller, &args.tweak);
    let mut app = App::new(controller);

    let event_loop = EventLoop::new().map_err(|e| Error::Window(e.to_string()))?;
    event_loop
        .run_app(&mut app)
        .map_err(|e| Error::Window(e.to_string()))
}

fn main() {
    islewave::logging::init();

    if let Err(e) = run(Args::parse()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
