use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use kurbo::{Affine, Cap, Line, Point, Rect, RoundedRect, Stroke, Vec2};
use parley::FontWeight;
use peniko::Brush;

use crate::{
  Bounds, Range,
  axes::Axes,
  bounds::{DataBounds, DataRange},
  chart::ChartSpec,
  error::SpecError,
  render::{Align, DrawText, FRAME, Render},
  theme,
};

/// Where data is drawn. The y axis runs upwards.
const VIEWPORT: Bounds = Bounds::new(Range::new(100.0, 740.0), Range::new(800.0, 110.0));
const LEGEND_ORIGIN: Point = Point::new(760.0, 110.0);
const TICKS: u32 = 8;

/// A chart description, resolved into something drawable.
pub struct Plot<'a> {
  spec: &'a ChartSpec,
  axes: Axes,
}

impl<'a> Plot<'a> {
  pub fn new(spec: &'a ChartSpec) -> Result<Plot<'a>, SpecError> {
    spec.validate()?;
    Ok(Plot { spec, axes: Axes::from_spec(spec)? })
  }

  pub fn spec(&self) -> &ChartSpec { self.spec }
}

impl Plot<'_> {
  /// Draws the whole chart, plus a tooltip for the mark under `cursor`.
  pub(crate) fn draw(&self, render: &mut Render, cursor: Option<Point>) {
    let data_bounds = self.axes.data_bounds();
    let transform = data_bounds.bounds().transform_to(VIEWPORT);

    self.draw_labels(render);
    draw_ticks(render, &data_bounds, transform);
    self.axes.draw(render, transform);
    self.axes.legend(&self.spec.color.label).draw(render, LEGEND_ORIGIN);

    let hovered = cursor.filter(|c| VIEWPORT.x.contains(c.x) && VIEWPORT.y.contains(c.y));
    if let Some(cursor) = hovered {
      if let Some(lines) = self.axes.hit(transform, cursor) {
        draw_tooltip(render, cursor, &lines);
      }
    }
  }

  fn draw_labels(&self, render: &mut Render) {
    render.draw_text(DrawText {
      text: &self.spec.title,
      size: 22.0,
      weight: FontWeight::BOLD,
      position: Point::new(40.0, 24.0),
      max_width: Some((FRAME - 80.0) as f32),
      ..Default::default()
    });

    render.draw_text(DrawText {
      text: &self.spec.x.label,
      size: 18.0,
      position: Point::new(VIEWPORT.x.min + VIEWPORT.width() / 2.0, FRAME - 30.0),
      horizontal_align: Align::Center,
      vertical_align: Align::End,
      ..Default::default()
    });

    render.draw_text(DrawText {
      text: &self.spec.y.label,
      size: 18.0,
      position: Point::new(30.0, VIEWPORT.y.max - VIEWPORT.height() / 2.0),
      transform: Affine::rotate(-FRAC_PI_2),
      horizontal_align: Align::Center,
      vertical_align: Align::Center,
      ..Default::default()
    });
  }
}

fn draw_ticks(render: &mut Render, data_bounds: &DataBounds, transform: Affine) {
  let axis = Brush::Solid(theme::AXIS);
  let grid = Brush::Solid(theme::GRID);
  let tick_stroke = Stroke::new(1.5).with_caps(Cap::Butt);

  let bounds = data_bounds.bounds();
  let labels = bounds.y.nice_ticks(TICKS);
  let ticks = bounds.y.nice_ticks(TICKS).map(|v| (v, (transform * Point::new(0.0, v)).y));
  for (y, vy) in ticks.filter(|(_, vy)| VIEWPORT.y.contains(*vy)) {
    render.stroke(
      &Line::new((VIEWPORT.x.min, vy), (VIEWPORT.x.max, vy)),
      Affine::IDENTITY,
      &grid,
      &Stroke::new(1.0),
    );
    render.stroke(
      &Line::new((VIEWPORT.x.min - 8.0, vy), (VIEWPORT.x.min, vy)),
      Affine::IDENTITY,
      &axis,
      &tick_stroke,
    );
    render.draw_text(DrawText {
      text: &labels.label(y),
      size: 13.0,
      position: Point::new(VIEWPORT.x.min - 12.0, vy),
      horizontal_align: Align::End,
      vertical_align: Align::Center,
      ..Default::default()
    });
  }

  match &data_bounds.x {
    DataRange::Categorical(labels) => {
      for (i, label) in labels.iter().enumerate() {
        let vx = (transform * Point::new(i as f64, 0.0)).x;
        render.stroke(
          &Line::new((vx, VIEWPORT.y.min), (vx, VIEWPORT.y.min + 8.0)),
          Affine::IDENTITY,
          &axis,
          &tick_stroke,
        );
        render.draw_text(DrawText {
          text: label,
          size: 13.0,
          position: Point::new(vx, VIEWPORT.y.min + 12.0),
          transform: Affine::rotate(-FRAC_PI_4),
          horizontal_align: Align::End,
          vertical_align: Align::Center,
          ..Default::default()
        });
      }
    }
    DataRange::Continuous { .. } => {
      let labels = bounds.x.nice_ticks(TICKS);
      let ticks = bounds.x.nice_ticks(TICKS).map(|v| (v, (transform * Point::new(v, 0.0)).x));
      for (x, vx) in ticks.filter(|(_, vx)| VIEWPORT.x.contains(*vx)) {
        render.stroke(
          &Line::new((vx, VIEWPORT.y.min), (vx, VIEWPORT.y.max)),
          Affine::IDENTITY,
          &grid,
          &Stroke::new(1.0),
        );
        render.stroke(
          &Line::new((vx, VIEWPORT.y.min), (vx, VIEWPORT.y.min + 8.0)),
          Affine::IDENTITY,
          &axis,
          &tick_stroke,
        );
        render.draw_text(DrawText {
          text: &labels.label(x),
          size: 13.0,
          position: Point::new(vx, VIEWPORT.y.min + 12.0),
          horizontal_align: Align::Center,
          ..Default::default()
        });
      }
    }
  }

  let frame = Stroke::new(2.0);
  let origin = Point::new(VIEWPORT.x.min, VIEWPORT.y.min);
  for end in [(VIEWPORT.x.max, VIEWPORT.y.min), (VIEWPORT.x.min, VIEWPORT.y.max)] {
    render.stroke(&Line::new(origin, end), Affine::IDENTITY, &axis, &frame);
  }
}

fn draw_tooltip(render: &mut Render, cursor: Point, lines: &[String]) {
  const PADDING: f64 = 8.0;
  const LINE_HEIGHT: f64 = 18.0;

  let mut width = 0.0_f64;
  let mut layouts = vec![];
  for line in lines {
    let text = DrawText { text: line, size: 13.0, ..Default::default() };
    let layout = render.layout_text(&text);
    width = width.max(f64::from(layout.width()));
    layouts.push((layout, text));
  }

  let size = (width + PADDING * 2.0, lines.len() as f64 * LINE_HEIGHT + PADDING * 2.0);
  let mut origin = cursor + Vec2::new(12.0, 12.0);
  if origin.x + size.0 > FRAME {
    origin.x = cursor.x - 12.0 - size.0;
  }
  if origin.y + size.1 > FRAME {
    origin.y = cursor.y - 12.0 - size.1;
  }

  let rect = RoundedRect::from_rect(Rect::from_origin_size(origin, size), 4.0);
  render.fill(&rect, Affine::IDENTITY, &Brush::Solid(theme::BACKGROUND));
  render.stroke(&rect, Affine::IDENTITY, &Brush::Solid(theme::AXIS), &Stroke::new(1.0));

  for (i, (layout, mut text)) in layouts.into_iter().enumerate() {
    text.position = origin + Vec2::new(PADDING, PADDING + i as f64 * LINE_HEIGHT);
    render.draw_text_layout(layout, text);
  }
}
