use kurbo::{Affine, Circle, Point, Stroke};
use peniko::{Brush, Color};
use polars::prelude::*;

use super::{format_value, index_keys, key_color, numbers, strings};
use crate::{
  Range,
  bounds::{DataBounds, DataRange},
  chart::{ChartSpec, bubble_diameter},
  render::Render,
  theme,
};

const OPACITY: f32 = 0.7;

pub(crate) struct BubbleAxes {
  bubbles: Vec<Bubble>,
  keys:    Vec<String>,
  labels:  BubbleLabels,
}

#[derive(Debug, Clone, PartialEq)]
struct Bubble {
  center:   Point,
  size:     f64,
  diameter: f64,
  key:      Option<usize>,
  hover:    Option<String>,
}

struct BubbleLabels {
  x:     String,
  y:     String,
  size:  String,
  color: String,
}

impl BubbleAxes {
  pub(crate) fn new(spec: &ChartSpec, size: &str, size_max: f64) -> PolarsResult<Self> {
    let xs = numbers(&spec.data, &spec.x.field)?;
    let ys = numbers(&spec.data, &spec.y.field)?;
    let sizes = numbers(&spec.data, size)?;
    let (keys, key_names) = index_keys(&strings(&spec.data, &spec.color.field)?);
    let hover = strings(&spec.data, &spec.hover.field)?;

    let largest = sizes.iter().flatten().copied().fold(0.0, f64::max);

    let bubbles = xs
      .into_iter()
      .zip(ys)
      .zip(sizes)
      .zip(keys.into_iter().zip(hover))
      .filter_map(|(((x, y), size), (key, hover))| {
        let size = size?;
        Some(Bubble {
          center: Point::new(x?, y?),
          size,
          diameter: bubble_diameter(size, largest, size_max),
          key,
          hover,
        })
      })
      .collect();

    Ok(BubbleAxes {
      bubbles,
      keys: key_names,
      labels: BubbleLabels {
        x:     spec.x.label.clone(),
        y:     spec.y.label.clone(),
        size:  size.to_string(),
        color: spec.color.label.clone(),
      },
    })
  }

  pub(crate) fn keys(&self) -> &[String] { &self.keys }

  pub(crate) fn data_bounds(&self) -> DataBounds {
    let x = Range::from_values(self.bubbles.iter().map(|b| b.center.x));
    let y = Range::from_values(self.bubbles.iter().map(|b| b.center.y));

    DataBounds {
      x: DataRange::from(x.unwrap_or(Range::new(0.0, 1.0))),
      y: DataRange::from(y.unwrap_or(Range::new(0.0, 1.0))),
    }
  }

  pub(crate) fn draw(&self, render: &mut Render, transform: Affine) {
    let outline = Brush::Solid(theme::BACKGROUND);
    let stroke = Stroke::new(1.0);

    for bubble in self.bubbles.iter().filter(|b| b.diameter > 0.0) {
      let circle = Circle::new(transform * bubble.center, bubble.diameter / 2.0);
      let brush = Brush::Solid(self.color(bubble.key).with_alpha(OPACITY));

      render.fill(&circle, Affine::IDENTITY, &brush);
      render.stroke(&circle, Affine::IDENTITY, &outline, &stroke);
    }
  }

  pub(crate) fn hit(&self, transform: Affine, cursor: Point) -> Option<Vec<String>> {
    let bubble = self
      .bubbles
      .iter()
      .rev()
      .find(|b| b.diameter > 0.0 && (transform * b.center).distance(cursor) <= b.diameter / 2.0)?;

    let mut lines = vec![];
    if let Some(town) = &bubble.hover {
      lines.push(town.clone());
    }
    if let Some(key) = bubble.key {
      lines.push(format!("{}: {}", self.labels.color, self.keys[key]));
    }
    lines.push(format!("{}: {}", self.labels.x, format_value(bubble.center.x)));
    lines.push(format!("{}: {}", self.labels.y, format_value(bubble.center.y)));
    lines.push(format!("{}: {}", self.labels.size, format_value(bubble.size)));
    Some(lines)
  }

  fn color(&self, key: Option<usize>) -> Color {
    match key {
      Some(i) => key_color(i, self.keys.len()),
      None => theme::AXIS,
    }
  }
}
