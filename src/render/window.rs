use std::{
  sync::Arc,
  time::{Duration, Instant},
};

use kurbo::Point;
use vello::wgpu;
use winit::{
  application::ApplicationHandler,
  event::{KeyEvent, StartCause, WindowEvent},
  event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
  keyboard::Key,
  window::{Window, WindowId},
};

use crate::{
  ChartSpec, Plot,
  error::{RenderError, ResultExt},
  render::{GpuHandle, Render, RenderConfig},
};

type Rebuild<'a> = Box<dyn FnMut() -> Option<ChartSpec> + 'a>;

pub(crate) fn show(chart: ChartSpec) -> Result<(), RenderError> { run(App::new(Some(chart), None)) }

/// Shows whatever `rebuild` returns, calling it again every `interval`.
///
/// `rebuild` runs on the event loop thread. Returning `None` keeps the previous
/// chart on screen.
pub fn show_live<'a>(
  interval: Duration,
  mut rebuild: impl FnMut() -> Option<ChartSpec> + 'a,
) -> Result<(), RenderError> {
  let first = rebuild();
  let rebuild: Rebuild<'a> = Box::new(rebuild);
  run(App::new(first, Some((interval, rebuild))))
}

fn run(mut app: App<'_>) -> Result<(), RenderError> {
  let event_loop = EventLoop::new().map_err(|e| RenderError::Window(e.to_string()))?;
  event_loop.set_control_flow(ControlFlow::Wait);

  event_loop.run_app(&mut app).map_err(|e| RenderError::Window(e.to_string()))?;
  let error = app.error.take();

  // FIXME: Ideally, we'd drop this. But dropping it segfaults.
  std::mem::forget(app);

  error.map_or(Ok(()), Err)
}

struct App<'a> {
  chart:   Option<ChartSpec>,
  refresh: Option<Refresh<'a>>,
  cursor:  Option<Point>,
  stale:   bool,
  render:  Render,
  error:   Option<RenderError>,

  init: Option<Init>,
}

struct Refresh<'a> {
  interval: Duration,
  next:     Instant,
  rebuild:  Rebuild<'a>,
}

struct Init {
  window:  Arc<Window>,
  surface: wgpu::Surface<'static>,
  config:  wgpu::SurfaceConfiguration,
  handle:  GpuHandle,

  blit:  wgpu::util::TextureBlitter,
  vello: vello::Renderer,
}

impl<'a> App<'a> {
  fn new(chart: Option<ChartSpec>, refresh: Option<(Duration, Rebuild<'a>)>) -> Self {
    App {
      chart,
      refresh: refresh.map(|(interval, rebuild)| Refresh {
        interval,
        next: Instant::now() + interval,
        rebuild,
      }),
      cursor: None,
      stale: true,
      render: Render::new(),
      error: None,
      init: None,
    }
  }

  fn refresh(&mut self) {
    let Some(refresh) = &mut self.refresh else { return };
    if Instant::now() < refresh.next {
      return;
    }

    if let Some(chart) = (refresh.rebuild)() {
      self.chart = Some(chart);
    }
    refresh.next = Instant::now() + refresh.interval;
    self.invalidate();
  }

  fn invalidate(&mut self) {
    self.stale = true;
    if let Some(init) = &self.init {
      init.window.request_redraw();
    }
  }

  fn fail(&mut self, event_loop: &ActiveEventLoop, error: RenderError) {
    self.error = Some(error);
    event_loop.exit();
  }

  fn draw(&mut self) -> Result<(), RenderError> {
    let Some(init) = &mut self.init else { return Ok(()) };

    if self.stale {
      self.stale = false;
      let config = RenderConfig { width: init.config.width, height: init.config.height };
      self.render.reset(config);
      if let Some(chart) = &self.chart {
        if let Some(plot) = Plot::new(chart).log_err() {
          plot.draw(&mut self.render, self.cursor);
        }
      }

      init.vello.render_to_texture(
        &init.handle.device,
        &init.handle.queue,
        &self.render.scene,
        &init.handle.view,
        &self.render.params(config),
      )?;
    }

    init.present();
    Ok(())
  }
}

impl ApplicationHandler for App<'_> {
  fn resumed(&mut self, event_loop: &ActiveEventLoop) {
    if self.init.is_some() {
      return;
    }

    match Init::new(event_loop) {
      Ok(init) => {
        self.init = Some(init);
        self.invalidate();
      }
      Err(e) => self.fail(event_loop, e),
    }
  }

  fn new_events(&mut self, _: &ActiveEventLoop, cause: StartCause) {
    if let StartCause::ResumeTimeReached { .. } = cause {
      self.refresh();
    }
  }

  fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
    if let Some(refresh) = &self.refresh {
      event_loop.set_control_flow(ControlFlow::WaitUntil(refresh.next));
    }
  }

  fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
    match event {
      WindowEvent::CloseRequested => event_loop.exit(),

      WindowEvent::KeyboardInput {
        event: KeyEvent { logical_key: Key::Character(c), .. }, ..
      } if c == "q" => event_loop.exit(),

      WindowEvent::Resized(new_size) => {
        if let Some(init) = &mut self.init {
          if new_size.width > 0 && new_size.height > 0 {
            init.resize(new_size.width, new_size.height);
            self.invalidate();
          }
        }
      }

      WindowEvent::CursorMoved { position, .. } => {
        self.cursor = Some(self.render.to_frame(Point::new(position.x, position.y)));
        self.invalidate();
      }

      WindowEvent::CursorLeft { .. } => {
        self.cursor = None;
        self.invalidate();
      }

      WindowEvent::RedrawRequested => {
        if let Err(e) = self.draw() {
          self.fail(event_loop, e);
        }
      }

      _ => (),
    }
  }
}

impl Init {
  fn new(event_loop: &ActiveEventLoop) -> Result<Self, RenderError> {
    let window = event_loop
      .create_window(
        Window::default_attributes()
          .with_title("Medical Facilities Distribution in Lebanon")
          .with_min_inner_size(winit::dpi::LogicalSize::new(100, 100)),
      )
      .map_err(|e| RenderError::Window(e.to_string()))?;
    let window = Arc::new(window);
    let size = window.inner_size();

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
    let surface =
      instance.create_surface(window.clone()).map_err(|e| RenderError::Surface(e.to_string()))?;

    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
      compatible_surface: Some(&surface),
      ..Default::default()
    }))
    .map_err(|e| RenderError::Adapter(e.to_string()))?;

    let surface_caps = surface.get_capabilities(&adapter);
    let surface_format = surface_caps
      .formats
      .iter()
      .copied()
      .find(|f| f.is_srgb())
      .or_else(|| surface_caps.formats.first().copied())
      .ok_or_else(|| RenderError::Surface("surface supports no formats".to_string()))?;

    let config = wgpu::SurfaceConfiguration {
      usage:                         wgpu::TextureUsages::RENDER_ATTACHMENT
        | wgpu::TextureUsages::COPY_DST,
      format:                        surface_format,
      width:                         size.width.max(1),
      height:                        size.height.max(1),
      present_mode:                  wgpu::PresentMode::AutoNoVsync,
      alpha_mode:                    surface_caps
        .alpha_modes
        .first()
        .copied()
        .unwrap_or(wgpu::CompositeAlphaMode::Auto),
      view_formats:                  vec![],
      desired_maximum_frame_latency: 2,
    };

    let handle =
      GpuHandle::new(&RenderConfig { width: config.width, height: config.height }, Some(adapter))?;
    surface.configure(&handle.device, &config);

    let vello = vello::Renderer::new(&handle.device, vello::RendererOptions::default())?;
    let blit = wgpu::util::TextureBlitter::new(&handle.device, config.format);

    Ok(Init { window, surface, config, handle, blit, vello })
  }

  fn resize(&mut self, width: u32, height: u32) {
    self.config.width = width;
    self.config.height = height;
    self.handle.resize(&RenderConfig { width, height });
    self.surface.configure(&self.handle.device, &self.config);
  }

  fn present(&mut self) {
    let frame = match self.surface.get_current_texture() {
      Ok(frame) => frame,
      Err(wgpu::SurfaceError::Lost) => {
        self.surface.configure(&self.handle.device, &self.config);
        return;
      }
      Err(e) => {
        tracing::warn!("dropped frame: {e:?}");
        return;
      }
    };

    let surface_view = &frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

    let mut encoder = self
      .handle
      .device
      .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("Render Encoder") });

    self.blit.copy(&self.handle.device, &mut encoder, &self.handle.view, surface_view);

    self.handle.queue.submit(std::iter::once(encoder.finish()));

    frame.present();
  }
}
