use kurbo::{Affine, Point, Rect, RoundedRect, Stroke, Vec2};
use parley::FontWeight;
use peniko::{Brush, Color};

use crate::{
  marker::Marker,
  render::{Align, DrawText, Render},
  theme,
};

pub(crate) struct Legend {
  pub title: String,
  pub items: Vec<LegendItem>,
}

pub(crate) struct LegendItem {
  pub label:  String,
  pub color:  Color,
  pub marker: Marker,
}

const PADDING: f64 = 10.0;
const FONT_SIZE: f64 = 16.0;
const LINE_HEIGHT: f64 = 24.0;
const MARKER_SIZE: f64 = 14.0;
const MARKER_WIDTH: f64 = 28.0;

impl Legend {
  /// Draws the legend with its top left corner at `origin`.
  pub(crate) fn draw(&self, render: &mut Render, origin: Point) {
    if self.items.is_empty() {
      return;
    }

    let title = DrawText {
      text: &self.title,
      size: FONT_SIZE as f32,
      weight: FontWeight::BOLD,
      vertical_align: Align::Center,
      ..Default::default()
    };
    let title_layout = render.layout_text(&title);
    let mut inner_width = f64::from(title_layout.width());

    let mut layouts = vec![];
    for item in &self.items {
      let text = DrawText {
        text: &item.label,
        size: FONT_SIZE as f32,
        vertical_align: Align::Center,
        ..Default::default()
      };
      let layout = render.layout_text(&text);
      inner_width = inner_width.max(f64::from(layout.width()) + MARKER_WIDTH);
      layouts.push((layout, text));
    }

    let inner_height = (self.items.len() + 1) as f64 * LINE_HEIGHT;
    let rect = Rect::from_origin_size(
      origin,
      (inner_width + PADDING * 2.0, inner_height + PADDING * 2.0),
    );
    let background = RoundedRect::from_rect(rect, 5.0);
    render.fill(
      &background,
      Affine::IDENTITY,
      &Brush::Solid(theme::BACKGROUND.with_alpha(0.8)),
    );
    render.stroke(&background, Affine::IDENTITY, &Brush::Solid(theme::AXIS), &Stroke::new(1.0));

    let line = |i: usize| {
      Point::new(rect.x0 + PADDING, rect.y0 + PADDING + (i as f64 + 0.5) * LINE_HEIGHT)
    };

    render.draw_text_layout(title_layout, DrawText { position: line(0), ..title });

    for (i, ((layout, mut text), item)) in layouts.into_iter().zip(&self.items).enumerate() {
      let pos = line(i + 1);

      let marker = Affine::translate((pos + Vec2::new(MARKER_SIZE / 2.0, 0.0)).to_vec2())
        * Affine::scale(MARKER_SIZE);
      render.fill(&item.marker.to_path(0.01), marker, &Brush::Solid(item.color));

      text.position = pos + Vec2::new(MARKER_WIDTH, 0.0);
      render.draw_text_layout(layout, text);
    }
  }
}
