use kurbo::Affine;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
  pub x: Range,
  pub y: Range,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Range {
  pub min: f64,
  pub max: f64,
}

/// Data-space extent of both axes, before margins are applied.
#[derive(Clone, Debug)]
pub(crate) struct DataBounds {
  pub x: DataRange,
  pub y: DataRange,
}

#[derive(Clone, Debug)]
pub(crate) enum DataRange {
  Continuous { range: Range, margin_min: bool, margin_max: bool },
  /// One slot per label, centered on its index.
  Categorical(Vec<String>),
}

const MARGIN: f64 = 0.05;

impl From<Range> for DataRange {
  fn from(range: Range) -> Self {
    DataRange::Continuous { range, margin_min: true, margin_max: true }
  }
}

impl DataRange {
  pub(crate) fn range(&self) -> Range {
    match self {
      DataRange::Continuous { range, margin_min, margin_max } => {
        let range =
          if range.size() == 0.0 { range.expand(1.0_f64.max(range.max.abs())) } else { *range };
        let pad = range.size() * MARGIN;
        Range::new(
          if *margin_min { range.min - pad } else { range.min },
          if *margin_max { range.max + pad } else { range.max },
        )
      }
      DataRange::Categorical(labels) => Range::new(-0.5, labels.len().max(1) as f64 - 0.5),
    }
  }
}

impl DataBounds {
  pub(crate) fn bounds(&self) -> Bounds { Bounds::new(self.x.range(), self.y.range()) }
}

impl Bounds {
  pub const fn new(x: Range, y: Range) -> Self { Bounds { x, y } }

  pub fn width(&self) -> f64 { self.x.size() }
  pub fn height(&self) -> f64 { self.y.size() }

  /// Maps `self` onto `viewport`, flipping an axis if the viewport runs backwards.
  pub(crate) fn transform_to(&self, viewport: Bounds) -> Affine {
    let scale_x = viewport.x.size() / self.x.size();
    let scale_y = viewport.y.size() / self.y.size();
    let translate_x = viewport.x.min - self.x.min * scale_x;
    let translate_y = viewport.y.min - self.y.min * scale_y;

    Affine::new([scale_x, 0.0, 0.0, scale_y, translate_x, translate_y])
  }
}

impl Range {
  pub const fn new(min: f64, max: f64) -> Self { Range { min, max } }
  pub const fn size(&self) -> f64 { self.max - self.min }

  /// Grows both ends away from the middle, respecting direction.
  pub const fn expand(self, amount: f64) -> Self {
    let sign = if self.size() < 0.0 { -1.0 } else { 1.0 };
    Range { min: self.min - amount * sign, max: self.max + amount * sign }
  }

  pub const fn contains(&self, value: f64) -> bool {
    (value >= self.min && value <= self.max) || (value <= self.min && value >= self.max)
  }

  /// Smallest range covering every finite value, if there is one.
  pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Range> {
    values.into_iter().filter(|v| v.is_finite()).fold(None, |acc, v| match acc {
      None => Some(Range::new(v, v)),
      Some(r) => Some(Range::new(r.min.min(v), r.max.max(v))),
    })
  }

  /// Round-numbered ticks covering the range, about `count` of them.
  pub fn nice_ticks(&self, count: u32) -> NiceTicksIter {
    let step = self.size().abs() / f64::from(count.max(1));
    let k = step.log10().floor();
    let base = step / 10f64.powf(k);

    let nice_base = match base {
      b if b <= 1.0 => 1.0,
      b if b <= 2.0 => 2.0,
      b if b <= 2.5 => 2.5,
      b if b <= 5.0 => 5.0,
      _ => 10.0,
    };

    let step = nice_base * 10f64.powf(k);
    let (lo, hi) = (self.min.min(self.max), self.min.max(self.max));
    let lo = (lo / step).ceil() * step;

    let decimals = if nice_base == 2.5 { -k as i32 + 1 } else { -k as i32 };
    NiceTicksIter { current: lo, step, hi, decimals: decimals.max(0) as usize }
  }
}

pub struct NiceTicksIter {
  current:  f64,
  step:     f64,
  hi:       f64,
  decimals: usize,
}

impl NiceTicksIter {
  pub fn label(&self, value: f64) -> String { format!("{:.*}", self.decimals, value) }
}

impl Iterator for NiceTicksIter {
  type Item = f64;
  fn next(&mut self) -> Option<Self::Item> {
    if !self.step.is_finite() || self.step <= 0.0 {
      return None;
    }

    if self.current <= self.hi + self.step * 1e-9 {
      let p = 10f64.powi(self.decimals as i32 + 2);
      let result = (self.current * p).round() / p;
      self.current += self.step;
      Some(result)
    } else {
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use kurbo::Point;

  use super::*;

  #[test]
  fn ticks_on_round_numbers() {
    let ticks = Range::new(0.0, 10.0).nice_ticks(10).collect::<Vec<_>>();
    assert_eq!(ticks, (0..=10).map(f64::from).collect::<Vec<_>>());

    let ticks = Range::new(0.0, 100.0).nice_ticks(5).collect::<Vec<_>>();
    assert_eq!(ticks, vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
  }

  #[test]
  fn ticks_stay_inside() {
    let ticks = Range::new(-0.3, 7.4).nice_ticks(4).collect::<Vec<_>>();
    assert_eq!(ticks, vec![0.0, 2.0, 4.0, 6.0]);
  }

  #[test]
  fn tick_labels() {
    let iter = Range::new(0.0, 1.0).nice_ticks(4);
    assert_eq!(iter.label(0.25), "0.25");

    let iter = Range::new(0.0, 50.0).nice_ticks(5);
    assert_eq!(iter.label(10.0), "10");
  }

  #[test]
  fn empty_range_has_no_ticks() {
    assert_eq!(Range::new(3.0, 3.0).nice_ticks(10).count(), 0);
  }

  #[test]
  fn categorical_slots() {
    let range = DataRange::Categorical(vec!["Akkar".into(), "Beirut".into()]).range();
    assert_eq!(range, Range::new(-0.5, 1.5));
    assert_eq!(DataRange::Categorical(vec![]).range(), Range::new(-0.5, 0.5));
  }

  #[test]
  fn margins() {
    let range = DataRange::Continuous {
      range:      Range::new(0.0, 10.0),
      margin_min: false,
      margin_max: true,
    }
    .range();
    assert_eq!(range, Range::new(0.0, 10.5));

    let flat = DataRange::from(Range::new(0.0, 0.0)).range();
    assert!(flat.size() > 0.0);
  }

  #[test]
  fn from_values_skips_nan() {
    assert_eq!(Range::from_values([3.0, f64::NAN, -1.0]), Some(Range::new(-1.0, 3.0)));
    assert_eq!(Range::from_values([]), None);
  }

  #[test]
  fn transform_flips_y() {
    let data = Bounds::new(Range::new(0.0, 10.0), Range::new(0.0, 100.0));
    let viewport = Bounds::new(Range::new(100.0, 600.0), Range::new(800.0, 100.0));
    let transform = data.transform_to(viewport);

    assert_eq!(transform * Point::new(0.0, 0.0), Point::new(100.0, 800.0));
    assert_eq!(transform * Point::new(10.0, 100.0), Point::new(600.0, 100.0));
    assert!(viewport.y.contains(450.0));
  }
}
