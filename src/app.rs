use std::{process, sync::Arc};

use wgpu::{Backends, Color, InstanceDescriptor, Surface, SurfaceError, SurfaceTarget};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    monitor::MonitorHandle,
    window::{Fullscreen, Window, WindowId},
};

use crate::{
    config::Config,
    gpu::{Batch, Gpu, Pass, Uniforms},
    input::PointerTracker,
    math::{vec2, Vec2f},
    scene::Scene,
    sound,
};

pub struct App {
    config: Config,
    instance: wgpu::Instance,
    scene: Scene,
    win: Option<Win>,
}

struct Win {
    window: Arc<Window>,
    surface: Surface<'static>,
    gpu: Gpu,
    batch: Batch,
    pointer: PointerTracker,
}

impl Win {
    fn recreate_swapchain(&self) {
        let res = self.window.inner_size();
        if res.width == 0 || res.height == 0 {
            // Minimized; there is nothing to present to.
            return;
        }

        let Some(config) = self
            .surface
            .get_default_config(&self.gpu.adapter, res.width, res.height)
        else {
            log::error!("adapter no longer supports the window surface");
            return;
        };

        log::debug!(
            "configuring window surface for {}x{} (format: {:?}, present mode: {:?}, alpha mode: {:?})",
            res.width,
            res.height,
            config.format,
            config.present_mode,
            config.alpha_mode,
        );

        self.surface.configure(&self.gpu.device, &config);
    }

    /// Window size in logical pixels, the coordinate space of the scene.
    fn viewport(&self) -> Vec2f {
        let size = self
            .window
            .inner_size()
            .to_logical::<f32>(self.window.scale_factor());
        vec2(size.width, size.height)
    }

    fn redraw(&mut self, scene: &Scene, config: &Config) {
        let st = match self.surface.get_current_texture() {
            Ok(st) => st,
            Err(err @ (SurfaceError::Outdated | SurfaceError::Lost)) => {
                log::debug!("surface error: {}", err);
                self.recreate_swapchain();
                match self.surface.get_current_texture() {
                    Ok(st) => st,
                    Err(e) => {
                        log::warn!("failed to acquire frame after recreating swapchain: {e}");
                        return;
                    }
                }
            }
            Err(e) => {
                log::warn!("failed to acquire frame: {e}");
                return;
            }
        };

        let uniforms = Uniforms::new(self.viewport(), self.window.scale_factor() as f32);
        self.batch
            .prepare(&self.gpu, &scene.draw_commands(), uniforms);

        let bg = self.gpu.color(config.background.0);
        let clear = Color {
            r: bg.r.into(),
            g: bg.g.into(),
            b: bg.b.into(),
            a: 1.0,
        };

        let mut enc = self.gpu.device.create_command_encoder(&Default::default());
        let mut pass = Pass::new(&self.gpu, &mut enc, &st.texture, clear);
        self.batch.draw(&mut pass);
        drop(pass);

        self.gpu.queue.submit([enc.finish()]);
        self.window.pre_present_notify();
        st.present();
    }
}

impl App {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let scene = Scene::new(&config, sound::from_config(&config.sound));
        Ok(Self {
            config,
            instance: wgpu::Instance::new(&InstanceDescriptor {
                backends: Backends::PRIMARY,
                ..Default::default()
            }),
            scene,
            win: None,
        })
    }

    fn find_monitor(&self, event_loop: &ActiveEventLoop) -> Option<MonitorHandle> {
        let name = self.config.monitor.as_deref()?;
        let monitor = event_loop
            .available_monitors()
            .find(|m| m.name().as_deref() == Some(name));
        if monitor.is_none() {
            let available = event_loop
                .available_monitors()
                .filter_map(|m| m.name())
                .collect::<Vec<_>>();
            log::warn!("monitor '{name}' not found, using the current one (available: {available:?})");
        }
        monitor
    }

    fn create_win(&self, event_loop: &ActiveEventLoop) -> anyhow::Result<Win> {
        let mut attrs = Window::default_attributes().with_title("KidPaint");
        if self.config.fullscreen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(self.find_monitor(event_loop))));
        }
        let window = Arc::new(event_loop.create_window(attrs)?);

        let surface = self
            .instance
            .create_surface(SurfaceTarget::from(window.clone()))?;
        let res = window.inner_size();
        let gpu = Gpu::new(&self.instance, &surface, res.width.max(1), res.height.max(1))?;
        log::debug!(
            "created window at {}x{}, format={:?}",
            res.width,
            res.height,
            gpu.format
        );
        let batch = Batch::new(&gpu);

        let win = Win {
            window,
            surface,
            gpu,
            batch,
            pointer: PointerTracker::default(),
        };
        win.recreate_swapchain();
        Ok(win)
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.win.is_none() {
            let win = match self.create_win(event_loop) {
                Ok(win) => win,
                Err(e) => {
                    log::error!("could not create window: {e}");
                    process::exit(1);
                }
            };
            self.scene.set_viewport(win.viewport());
            win.window.request_redraw();
            self.win = Some(win);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(win) = &mut self.win else { return };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::RedrawRequested => win.redraw(&self.scene, &self.config),
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                win.recreate_swapchain();
                self.scene.set_viewport(win.viewport());
                win.window.request_redraw();
            }
            event => {
                let scale_factor = win.window.scale_factor();
                if let Some(cmd) = win.pointer.handle_window_event(&event, scale_factor) {
                    if self.scene.handle(cmd) {
                        win.window.request_redraw();
                    }
                }
            }
        }
    }
}
