mod bar_chart;
mod scatter;

use kurbo::{Affine, Point};
use peniko::Color;
use polars::prelude::*;

pub(crate) use bar_chart::BarChartAxes;
pub(crate) use scatter::BubbleAxes;

use crate::{
  bounds::DataBounds,
  chart::{ChartSpec, Mark},
  legend::{Legend, LegendItem},
  marker::Marker,
  render::Render,
  theme,
};

pub(crate) enum Axes {
  Bar(BarChartAxes),
  Bubble(BubbleAxes),
}

impl Axes {
  pub(crate) fn from_spec(spec: &ChartSpec) -> PolarsResult<Axes> {
    Ok(match &spec.mark {
      Mark::Bar { stacking } => Axes::Bar(BarChartAxes::new(spec, *stacking)?),
      Mark::Bubble { size, size_max } => Axes::Bubble(BubbleAxes::new(spec, size, *size_max)?),
    })
  }

  pub(crate) fn data_bounds(&self) -> DataBounds {
    match self {
      Axes::Bar(a) => a.data_bounds(),
      Axes::Bubble(a) => a.data_bounds(),
    }
  }

  pub(crate) fn draw(&self, render: &mut Render, transform: Affine) {
    match self {
      Axes::Bar(a) => a.draw(render, transform),
      Axes::Bubble(a) => a.draw(render, transform),
    }
  }

  pub(crate) fn legend(&self, title: &str) -> Legend {
    let (keys, marker) = match self {
      Axes::Bar(a) => (a.keys(), Marker::Square),
      Axes::Bubble(a) => (a.keys(), Marker::Circle),
    };

    Legend {
      title: title.to_string(),
      items: keys
        .iter()
        .enumerate()
        .map(|(i, key)| LegendItem { label: key.clone(), color: key_color(i, keys.len()), marker })
        .collect(),
    }
  }

  /// Tooltip lines for the mark under `cursor`, in frame coordinates.
  pub(crate) fn hit(&self, transform: Affine, cursor: Point) -> Option<Vec<String>> {
    match self {
      Axes::Bar(a) => a.hit(transform, cursor),
      Axes::Bubble(a) => a.hit(transform, cursor),
    }
  }
}

fn key_color(index: usize, count: usize) -> Color { theme::ROCKET.category(index, count) }

/// Index of each value in first-seen order, and the distinct values.
fn index_keys(values: &[Option<String>]) -> (Vec<Option<usize>>, Vec<String>) {
  let mut keys: Vec<String> = vec![];
  let indices = values
    .iter()
    .map(|v| {
      let v = v.as_deref()?;
      Some(keys.iter().position(|k| k == v).unwrap_or_else(|| {
        keys.push(v.to_string());
        keys.len() - 1
      }))
    })
    .collect();
  (indices, keys)
}

fn strings(data: &DataFrame, field: &str) -> PolarsResult<Vec<Option<String>>> {
  let column = data.column(field)?.cast(&DataType::String)?;
  Ok(column.str()?.into_iter().map(|v| v.map(str::to_string)).collect())
}

fn numbers(data: &DataFrame, field: &str) -> PolarsResult<Vec<Option<f64>>> {
  let column = data.column(field)?.cast(&DataType::Float64)?;
  Ok(column.f64()?.into_iter().map(|v| v.filter(|v| v.is_finite())).collect())
}

fn format_value(value: f64) -> String {
  if value.fract() == 0.0 { format!("{value:.0}") } else { format!("{value:.2}") }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn keys_in_first_seen_order() {
    let values = [Some("b".to_string()), None, Some("a".to_string()), Some("b".to_string())];
    let (indices, keys) = index_keys(&values);

    assert_eq!(keys, vec!["b", "a"]);
    assert_eq!(indices, vec![Some(0), None, Some(1), Some(0)]);
  }

  #[test]
  fn numbers_drop_nan() {
    let df = df! { "v" => &[Some(1.5), None, Some(f64::NAN)] }.unwrap();
    assert_eq!(numbers(&df, "v").unwrap(), vec![Some(1.5), None, None]);
  }

  #[test]
  fn values_format_compactly() {
    assert_eq!(format_value(3.0), "3");
    assert_eq!(format_value(2.5), "2.50");
  }
}
