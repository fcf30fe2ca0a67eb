//! Application event loop.
//!
//! [`App`] owns everything: the GPU context, the renderer, the scene and the
//! camera. Each frame follows the same order:
//! 1. Window events update the held keys, the pointer and the scroll speed
//! 2. Held keys move the camera, scaled by the time since the last frame
//! 3. Camera, projection and light uniforms are pushed
//! 4. The scene replays its draw sequence into the renderer
//! 5. The renderer submits the frame and it is presented

use std::sync::Arc;

use instant::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use crate::{
    camera::{Camera, CameraController, prepare_scene_view},
    config::{ViewerConfig, init_logging},
    context::Context,
    input::KeyboardState,
    render::SceneRenderer,
    scene::SceneComposer,
};

/// Scroll distance of one wheel notch on devices that report pixels.
const PIXELS_PER_LINE: f64 = 20.0;

struct AppState {
    ctx: Context,
    renderer: SceneRenderer,
    scene: SceneComposer<usize>,
    camera: Camera,
    controller: CameraController,
    keys: KeyboardState,
}

impl AppState {
    async fn new(window: Arc<Window>, config: &ViewerConfig) -> anyhow::Result<Self> {
        let mut ctx = Context::new(window).await?;
        let mut renderer = SceneRenderer::new(&ctx.device, &ctx.queue, ctx.config.format);
        let mut scene = SceneComposer::new(&config.asset_root);
        scene.load_scene(&mut renderer);

        let size = ctx.window().inner_size();
        ctx.resize(size.width, size.height);

        Ok(Self {
            ctx,
            renderer,
            scene,
            camera: Camera::default(),
            controller: CameraController::default(),
            keys: KeyboardState::new(),
        })
    }

    fn render(&mut self, config: &ViewerConfig) -> Result<(), wgpu::SurfaceError> {
        self.ctx.window().request_redraw();

        // Rendering requires the surface to be configured
        if !self.ctx.is_surface_configured() {
            return Ok(());
        }

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        prepare_scene_view(
            &mut self.renderer,
            &self.camera,
            self.controller.projection_mode(),
            config.aspect_ratio,
        );
        self.scene.render_scene(&mut self.renderer);
        self.renderer
            .render(&view, self.ctx.depth_view(), config.clear_colour);

        output.present();
        Ok(())
    }
}

pub struct App {
    config: ViewerConfig,
    async_runtime: tokio::runtime::Runtime,
    state: Option<AppState>,
    last_time: Instant,
    error: Option<anyhow::Error>,
}

impl App {
    pub fn new(config: ViewerConfig) -> anyhow::Result<Self> {
        Ok(Self {
            config,
            async_runtime: tokio::runtime::Runtime::new()?,
            state: None,
            last_time: Instant::now(),
            error: None,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.error = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window_attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };

        match self
            .async_runtime
            .block_on(AppState::new(window, &self.config))
        {
            Ok(state) => {
                self.state = Some(state);
                self.last_time = Instant::now();
            }
            Err(e) => self.fail(event_loop, e.context("App initialization failed")),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.ctx.resize(size.width, size.height),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::KeyboardInput { event, .. } => state.keys.handle_key_event(&event),
            WindowEvent::Focused(false) => state.keys.clear(),
            WindowEvent::CursorMoved { position, .. } => state.controller.on_pointer_moved(
                &mut state.camera,
                position.x as f32,
                position.y as f32,
            ),
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(position) => (position.y / PIXELS_PER_LINE) as f32,
                };
                state.controller.on_scroll(lines);
            }
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                state
                    .controller
                    .process_input(&mut state.camera, &state.keys, dt);

                match state.render(&self.config) {
                    Ok(()) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window().inner_size();
                        state.ctx.resize(size.width, size.height);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of GPU memory, exiting");
                        event_loop.exit();
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &mut self.state {
            state.scene.destroy(&mut state.renderer);
        }
    }
}

/// Open the viewer window and block until it is closed.
pub fn run(config: ViewerConfig) -> anyhow::Result<()> {
    init_logging(config.log_filter.as_deref());
    log::info!("textures from {}", config.asset_root.display());

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config)?;
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
