use std::path::Path;

use kurbo::{Affine, Point, Shape, Stroke};
use parley::{Alignment, FontWeight, Layout, PositionedLayoutItem, StyleProperty};
use peniko::{Brush, Color, Fill};
use vello::wgpu;

use crate::{Plot, error::RenderError, theme};

mod texture;
mod window;

pub use window::show_live;

/// Side length of the square every plot is laid out in.
pub(crate) const FRAME: f64 = 1000.0;

pub(crate) struct Render {
  pub(crate) scene:      vello::Scene,
  pub(crate) background: Color,

  font:   parley::FontContext,
  layout: parley::LayoutContext<Brush>,
  root:   Affine,
}

pub(crate) struct GpuHandle {
  pub(crate) device: wgpu::Device,
  pub(crate) queue:  wgpu::Queue,

  texture:         wgpu::Texture,
  pub(crate) view: wgpu::TextureView,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RenderConfig {
  pub width:  u32,
  pub height: u32,
}

#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum Align {
  #[default]
  Start,
  Center,
  End,
}

pub(crate) struct DrawText<'a> {
  pub text:             &'a str,
  pub size:             f32,
  pub weight:           FontWeight,
  pub brush:            Brush,
  pub position:         Point,
  pub transform:        Affine,
  pub horizontal_align: Align,
  pub vertical_align:   Align,
  /// Wraps onto new lines past this width.
  pub max_width:        Option<f32>,
}

impl Default for DrawText<'_> {
  fn default() -> Self {
    DrawText {
      text:             "",
      size:             16.0,
      weight:           FontWeight::NORMAL,
      brush:            Brush::Solid(theme::TEXT),
      position:         Point::ORIGIN,
      transform:        Affine::IDENTITY,
      horizontal_align: Align::Start,
      vertical_align:   Align::Start,
      max_width:        None,
    }
  }
}

impl Plot<'_> {
  /// Renders off-screen and writes a square PNG of `size` pixels.
  pub fn save(&self, path: impl AsRef<Path>, size: u32) -> Result<(), RenderError> {
    let config = RenderConfig { width: size.max(1), height: size.max(1) };
    let handle = GpuHandle::new(&config, None)?;

    let mut render = Render::new();
    render.reset(config);
    self.draw(&mut render, None);

    let mut renderer = vello::Renderer::new(&handle.device, vello::RendererOptions::default())?;
    renderer.render_to_texture(
      &handle.device,
      &handle.queue,
      &render.scene,
      &handle.view,
      &render.params(config),
    )?;

    texture::save(&handle, config, path.as_ref())
  }

  /// Opens a window showing this plot until it is closed or `q` is pressed.
  pub fn show(&self) -> Result<(), RenderError> { window::show(self.spec().clone()) }
}

impl Render {
  pub(crate) fn new() -> Self {
    Render {
      scene:      vello::Scene::new(),
      background: theme::BACKGROUND,
      font:       parley::FontContext::new(),
      layout:     parley::LayoutContext::new(),
      root:       Affine::IDENTITY,
    }
  }

  /// Clears the scene and fits the plot frame, centered, into `config`.
  pub(crate) fn reset(&mut self, config: RenderConfig) {
    self.scene.reset();
    self.root = fit_frame(config);
  }

  /// Maps a pixel position back into plot frame coordinates.
  pub(crate) fn to_frame(&self, pixel: Point) -> Point { self.root.inverse() * pixel }

  pub(crate) fn params(&self, config: RenderConfig) -> vello::RenderParams {
    vello::RenderParams {
      base_color:          self.background,
      width:               config.width,
      height:              config.height,
      antialiasing_method: vello::AaConfig::Msaa16,
    }
  }

  pub(crate) fn fill(&mut self, shape: &impl Shape, transform: Affine, brush: &Brush) {
    self.scene.fill(Fill::NonZero, self.root * transform, brush, None, shape);
  }

  pub(crate) fn stroke(
    &mut self,
    shape: &impl Shape,
    transform: Affine,
    brush: &Brush,
    stroke: &Stroke,
  ) {
    self.scene.stroke(stroke, self.root * transform, brush, None, shape);
  }

  pub(crate) fn layout_text(&mut self, text: &DrawText) -> Layout<Brush> {
    let mut builder = self.layout.ranged_builder(&mut self.font, text.text, 1.0, true);
    builder.push_default(StyleProperty::FontSize(text.size));
    builder.push_default(StyleProperty::FontWeight(text.weight));
    builder.push_default(StyleProperty::Brush(text.brush.clone()));

    let mut layout = builder.build(text.text);
    layout.break_all_lines(text.max_width);
    layout.align(None, Alignment::Start, Default::default());
    layout
  }

  pub(crate) fn draw_text(&mut self, text: DrawText) {
    let layout = self.layout_text(&text);
    self.draw_text_layout(layout, text);
  }

  /// Draws a laid out string anchored at `text.position`, rotated by `text.transform`.
  pub(crate) fn draw_text_layout(&mut self, layout: Layout<Brush>, text: DrawText) {
    let width = f64::from(layout.width());
    let height = f64::from(layout.height());
    let offset =
      (align_offset(text.horizontal_align, width), align_offset(text.vertical_align, height));
    let transform = self.root
      * Affine::translate(text.position.to_vec2())
      * text.transform
      * Affine::translate(offset);

    for line in layout.lines() {
      for item in line.items() {
        let PositionedLayoutItem::GlyphRun(glyph_run) = item else { continue };

        let run = glyph_run.run();
        let mut x = glyph_run.offset();
        let baseline = glyph_run.baseline();

        self
          .scene
          .draw_glyphs(run.font())
          .brush(&glyph_run.style().brush)
          .hint(false)
          .transform(transform)
          .glyph_transform(
            run.synthesis().skew().map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0)),
          )
          .font_size(run.font_size())
          .normalized_coords(run.normalized_coords())
          .draw(
            Fill::NonZero,
            glyph_run.glyphs().map(|glyph| {
              let gx = x + glyph.x;
              let gy = baseline + glyph.y;
              x += glyph.advance;
              vello::Glyph { id: glyph.id.into(), x: gx, y: gy }
            }),
          );
      }
    }
  }
}

fn align_offset(align: Align, extent: f64) -> f64 {
  match align {
    Align::Start => 0.0,
    Align::Center => -extent / 2.0,
    Align::End => -extent,
  }
}

/// Uniform scale that fits the square frame into `config`, centered.
fn fit_frame(config: RenderConfig) -> Affine {
  let (width, height) = (f64::from(config.width), f64::from(config.height));
  let scale = width.min(height) / FRAME;
  Affine::translate(((width - FRAME * scale) / 2.0, (height - FRAME * scale) / 2.0))
    * Affine::scale(scale)
}

impl GpuHandle {
  pub(crate) fn new(
    config: &RenderConfig,
    adapter: Option<wgpu::Adapter>,
  ) -> Result<Self, RenderError> {
    let adapter = match adapter {
      Some(adapter) => adapter,
      None => {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))
          .map_err(|e| RenderError::Adapter(e.to_string()))?
      }
    };

    let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
      label:             None,
      required_features: wgpu::Features::empty(),
      required_limits:   wgpu::Limits::defaults(),
      memory_hints:      wgpu::MemoryHints::MemoryUsage,
      trace:             wgpu::Trace::Off,
    }))
    .map_err(|e| RenderError::Device(e.to_string()))?;

    let (texture, view) = target_texture(&device, config);
    Ok(GpuHandle { device, queue, texture, view })
  }

  pub(crate) fn resize(&mut self, config: &RenderConfig) {
    let (texture, view) = target_texture(&self.device, config);
    self.texture = texture;
    self.view = view;
  }
}

fn target_texture(
  device: &wgpu::Device,
  config: &RenderConfig,
) -> (wgpu::Texture, wgpu::TextureView) {
  let texture = device.create_texture(&wgpu::TextureDescriptor {
    label:           Some("Render Texture"),
    size:            config.extent_3d(),
    mip_level_count: 1,
    sample_count:    1,
    dimension:       wgpu::TextureDimension::D2,
    format:          wgpu::TextureFormat::Rgba8Unorm,
    usage:           wgpu::TextureUsages::STORAGE_BINDING
      | wgpu::TextureUsages::TEXTURE_BINDING
      | wgpu::TextureUsages::COPY_SRC,
    view_formats:    &[],
  });
  let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
  (texture, view)
}

impl RenderConfig {
  fn extent_3d(&self) -> wgpu::Extent3d {
    wgpu::Extent3d { width: self.width, height: self.height, depth_or_array_layers: 1 }
  }
}
