//! Application shell and frame loop
//!
//! Owns the winit event loop and drives one simulation generation per frame:
//! record the compute step, flip the grid's buffer roles, then draw the new
//! current generation.

use std::sync::Arc;

use anyhow::Context as _;
use rand::Rng;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes},
};

use crate::{
    config::SimConfig,
    gfx::{GpuContext, PresentationPass},
    performance::FrameCounter,
    simulation::{seed, GridState, SimulationStep},
};

pub struct LifeApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: SimConfig,
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    grid: Option<GridState>,
    step: Option<SimulationStep>,
    presentation: Option<PresentationPass>,
    frame_counter: FrameCounter,
}

impl LifeApp {
    /// Create a new application with the given simulation configuration
    pub fn new(config: SimConfig) -> Self {
        let event_loop = EventLoop::new().expect("Failed to create event loop");

        Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                gpu: None,
                grid: None,
                step: None,
                presentation: None,
                frame_counter: FrameCounter::new(),
            },
        }
    }

    /// Run the application (consumes self and starts the event loop)
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self.event_loop.take().expect("Event loop already consumed");
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.app_state)
            .context("event loop terminated abnormally")?;
        Ok(())
    }
}

impl AppState {
    /// Builds the GPU context and simulation components for the new window.
    ///
    /// Any failure here is fatal: without a device and both grid buffers no
    /// valid simulation can run, so the error is reported and the loop exits.
    fn initialize(&mut self, event_loop: &ActiveEventLoop, window: Arc<Window>) {
        let (width, height) = window.inner_size().into();

        let gpu = match pollster::block_on(GpuContext::new(window.clone(), width, height)) {
            Ok(gpu) => gpu,
            Err(error) => {
                log::error!("GPU initialization failed: {error:#}");
                event_loop.exit();
                return;
            }
        };

        let seed_value = self
            .config
            .seed
            .unwrap_or_else(|| rand::rng().random());
        log::info!(
            "seeding {}x{} grid, seed {}",
            self.config.grid_width,
            self.config.grid_height,
            seed_value
        );

        let grid = match GridState::new(
            gpu.device(),
            gpu.queue(),
            self.config.grid_width,
            self.config.grid_height,
            seed::random(seed_value, self.config.density),
        ) {
            Ok(grid) => grid,
            Err(error) => {
                log::error!("grid allocation failed: {error}");
                event_loop.exit();
                return;
            }
        };

        let step = SimulationStep::new(gpu.device(), &grid);
        let presentation = PresentationPass::new(gpu.device(), gpu.surface_format(), &grid);

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.grid = Some(grid);
        self.step = Some(step);
        self.presentation = Some(presentation);
    }

    /// Advances the simulation one generation and presents it
    fn render_frame(&mut self) {
        let (Some(gpu), Some(grid), Some(step), Some(presentation)) = (
            self.gpu.as_ref(),
            self.grid.as_mut(),
            self.step.as_ref(),
            self.presentation.as_ref(),
        ) else {
            return;
        };

        let frame = match gpu.acquire_frame() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.reconfigure();
                return;
            }
            Err(error) => {
                log::error!("surface acquire failed, skipping frame: {error}");
                return;
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });

        // Step into scratch; the closed pass fences the writes. Only then do
        // the roles flip, so the draw below samples the generation just
        // computed, never a stale or half-written one.
        step.encode(&mut encoder, grid);
        grid.advance();
        presentation.draw(&mut encoder, &view, grid);

        gpu.queue().submit(std::iter::once(encoder.finish()));
        frame.present();

        if let Some(fps) = self.frame_counter.tick() {
            log::info!("{fps:.1} generations/sec");
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.grid_width,
                self.config.grid_height,
            ))
            .with_resizable(false);

        match event_loop.create_window(attributes) {
            Ok(window) => self.initialize(event_loop, Arc::new(window)),
            Err(error) => {
                log::error!("window creation failed: {error}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: winit::keyboard::PhysicalKey::Code(key_code),
                        ..
                    },
                ..
            } => {
                if matches!(key_code, winit::keyboard::KeyCode::Escape) {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.resize(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.render_frame();
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
