use std::collections::HashMap;

use kurbo::{Affine, Point, Rect};
use peniko::Brush;
use polars::prelude::*;

use super::{format_value, index_keys, key_color, numbers, strings};
use crate::{
  Range,
  bounds::{DataBounds, DataRange},
  chart::{ChartSpec, Stacking},
  render::Render,
};

/// Fraction of a category slot covered by its bars.
const BAR_WIDTH: f64 = 0.8;

pub(crate) struct BarChartAxes {
  categories: Vec<String>,
  keys:       Vec<String>,
  rows:       Vec<BarRow>,
  segments:   Vec<Segment>,
  labels:     [String; 4],
}

#[derive(Debug, Clone, PartialEq)]
struct BarRow {
  slot:  usize,
  key:   usize,
  value: f64,
  hover: Option<String>,
}

/// One drawn rectangle, in data space, and the row it came from.
#[derive(Debug, Clone, PartialEq)]
struct Segment {
  row:  usize,
  rect: Rect,
}

impl BarChartAxes {
  pub(crate) fn new(spec: &ChartSpec, stacking: Stacking) -> PolarsResult<Self> {
    let (slots, categories) = index_keys(&strings(&spec.data, &spec.x.field)?);
    let (keys, key_names) = index_keys(&strings(&spec.data, &spec.color.field)?);
    let values = numbers(&spec.data, &spec.y.field)?;
    let hover = strings(&spec.data, &spec.hover.field)?;

    let rows = slots
      .into_iter()
      .zip(keys)
      .zip(values)
      .zip(hover)
      .filter_map(|(((slot, key), value), hover)| {
        Some(BarRow { slot: slot?, key: key?, value: value?, hover })
      })
      .collect::<Vec<_>>();
    let segments = layout_bars(&rows, key_names.len(), stacking);

    Ok(BarChartAxes {
      categories,
      keys: key_names,
      rows,
      segments,
      labels: [&spec.x.label, &spec.color.label, &spec.hover.label, &spec.y.label]
        .map(String::clone),
    })
  }

  pub(crate) fn keys(&self) -> &[String] { &self.keys }

  pub(crate) fn data_bounds(&self) -> DataBounds {
    let range = Range::from_values(
      self.segments.iter().flat_map(|s| [s.rect.y0, s.rect.y1]).chain(std::iter::once(0.0)),
    )
    .unwrap_or(Range::new(0.0, 1.0));

    DataBounds {
      x: DataRange::Categorical(self.categories.clone()),
      y: DataRange::Continuous { range, margin_min: range.min < 0.0, margin_max: true },
    }
  }

  pub(crate) fn draw(&self, render: &mut Render, transform: Affine) {
    let brushes = (0..self.keys.len())
      .map(|i| Brush::Solid(key_color(i, self.keys.len())))
      .collect::<Vec<_>>();

    for segment in &self.segments {
      let key = self.rows[segment.row].key;
      render.fill(&segment.rect, transform, &brushes[key]);
    }
  }

  pub(crate) fn hit(&self, transform: Affine, cursor: Point) -> Option<Vec<String>> {
    let point = transform.inverse() * cursor;
    let segment = self.segments.iter().rev().find(|s| s.rect.abs().contains(point))?;
    let row = &self.rows[segment.row];

    let [x, color, hover, y] = &self.labels;
    let mut lines = vec![
      format!("{x}: {}", self.categories[row.slot]),
      format!("{color}: {}", self.keys[row.key]),
    ];
    if let Some(town) = &row.hover {
      lines.push(format!("{hover}: {town}"));
    }
    lines.push(format!("{y}: {}", format_value(row.value)));
    Some(lines)
  }
}

/// Places one rectangle per row.
///
/// Stacked rows share their slot's full width and pile up in row order.
/// Grouped rows get a sub-band per key, and rows repeating a key pile up inside
/// it. Negative values grow downwards from their own baseline.
fn layout_bars(rows: &[BarRow], keys: usize, stacking: Stacking) -> Vec<Segment> {
  let mut tops: HashMap<(usize, usize), (f64, f64)> = HashMap::new();

  rows
    .iter()
    .enumerate()
    .map(|(i, row)| {
      let (band, x0, width) = match stacking {
        Stacking::Stack => (0, row.slot as f64 - BAR_WIDTH / 2.0, BAR_WIDTH),
        Stacking::Group => {
          let width = BAR_WIDTH / keys.max(1) as f64;
          (row.key, row.slot as f64 - BAR_WIDTH / 2.0 + row.key as f64 * width, width)
        }
      };

      let (above, below) = tops.entry((row.slot, band)).or_default();
      let base = if row.value < 0.0 { below } else { above };
      let rect = Rect::new(x0, *base, x0 + width, *base + row.value);
      *base += row.value;

      Segment { row: i, rect }
    })
    .collect()
}
