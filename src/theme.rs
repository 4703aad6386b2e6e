use color::{HueDirection, Oklch, OpaqueColor, Srgb};
use peniko::Color;

pub struct LinearPalette {
  start: OpaqueColor<Oklch>,
  end:   OpaqueColor<Oklch>,
}

/// Hue sweep used for category colors.
pub const ROCKET: LinearPalette =
  LinearPalette::new(OpaqueColor::new([0.7, 0.13, 50.0]), OpaqueColor::new([0.7, 0.13, 290.0]));

pub const TEXT: Color = Color::from_rgb8(32, 32, 32);
pub const AXIS: Color = Color::from_rgb8(128, 128, 128);
pub const GRID: Color = Color::from_rgb8(230, 230, 230);
pub const BACKGROUND: Color = Color::WHITE;

impl LinearPalette {
  pub const fn new(start: OpaqueColor<Oklch>, end: OpaqueColor<Oklch>) -> Self {
    Self { start, end }
  }

  pub fn sample(&self, t: f32) -> OpaqueColor<Oklch> {
    let t = t.clamp(0.0, 1.0);
    self.start.lerp(self.end, t, HueDirection::Increasing)
  }

  /// Color of category `index` out of `count`, spread evenly over the palette.
  pub fn category(&self, index: usize, count: usize) -> Color {
    let t = if count <= 1 { 0.0 } else { index as f32 / (count - 1) as f32 };
    self.sample(t).convert::<Srgb>().with_alpha(1.0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn categories_span_the_palette() {
    let first = ROCKET.sample(0.0).convert::<Srgb>().components;
    let last = ROCKET.sample(1.0).convert::<Srgb>().components;

    assert_eq!(ROCKET.category(0, 3).components[..3], first);
    assert_eq!(ROCKET.category(2, 3).components[..3], last);
    assert_ne!(ROCKET.category(0, 3).components, ROCKET.category(1, 3).components);
    assert_eq!(ROCKET.category(1, 3).components[3], 1.0);
  }

  #[test]
  fn single_category_takes_the_start() {
    assert_eq!(ROCKET.category(0, 1).components, ROCKET.category(0, 0).components);
  }
}
