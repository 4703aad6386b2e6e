use kurbo::{BezPath, Circle, Point, Rect, Shape};

/// Legend swatch shapes, drawn in a unit box centered on the origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
  Circle,
  Square,
}

impl Marker {
  pub(crate) fn to_path(self, tolerance: f64) -> BezPath {
    match self {
      Marker::Circle => Circle::new(Point::new(0.0, 0.0), 0.5).to_path(tolerance),
      Marker::Square => Rect::new(-0.5, -0.5, 0.5, 0.5).to_path(tolerance),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unit_box() {
    for marker in [Marker::Circle, Marker::Square] {
      let bbox = marker.to_path(0.01).bounding_box();
      assert!((bbox.width() - 1.0).abs() < 0.01);
      assert!((bbox.center() - Point::ORIGIN).hypot() < 0.01);
    }
  }
}
