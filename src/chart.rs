//! Declarative chart descriptions.
//!
//! A [`ChartSpec`] says which fields drive which visual channel. It does not
//! know how it will be drawn; [`crate::Plot`] is one consumer.

use polars::prelude::*;

use crate::{
  error::SpecError,
  facility::FacilityKind,
  filter::MeltedRow,
  load::{GOVERNORATE, TOWN, unique_strings},
};

pub const FACILITY_KIND: &str = "facility_kind";
pub const COUNT: &str = "count";

/// Largest rendered bubble diameter, in pixels.
pub const BUBBLE_SIZE_MAX: f64 = 60.0;

const GOVERNORATE_LABEL: &str = "Governorate / District";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stacking {
  /// Bars sharing an x value are stacked on top of each other.
  Stack,
  /// Bars sharing an x value are placed side by side.
  Group,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
  Bar { stacking: Stacking },
  Bubble { size: String, size_max: f64 },
}

/// A field bound to a visual channel, and the label to show for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoding {
  pub field: String,
  pub label: String,
}

#[derive(Debug, Clone)]
pub struct ChartSpec {
  pub title: String,
  pub mark:  Mark,
  pub x:     Encoding,
  pub y:     Encoding,
  pub color: Encoding,
  pub hover: Encoding,
  pub data:  DataFrame,
}

impl Encoding {
  pub fn new(field: &str, label: &str) -> Self {
    Encoding { field: field.to_string(), label: label.to_string() }
  }

  /// Labeled with the field name itself.
  pub fn field(field: &str) -> Self { Encoding::new(field, field) }
}

/// Stacked bars of facility counts per governorate, one color per kind.
pub fn build_bar(rows: &[MeltedRow]) -> ChartSpec {
  let data = DataFrame::new(vec![
    Column::new(
      GOVERNORATE.into(),
      rows.iter().map(|r| r.governorate.as_str()).collect::<Vec<_>>(),
    ),
    Column::new(TOWN.into(), rows.iter().map(|r| r.town.as_deref()).collect::<Vec<_>>()),
    Column::new(FACILITY_KIND.into(), rows.iter().map(|r| r.kind.label()).collect::<Vec<_>>()),
    Column::new(COUNT.into(), rows.iter().map(|r| r.count).collect::<Vec<_>>()),
  ])
  .unwrap_or_default();

  ChartSpec {
    title: "Stacked Bar: Facility Counts by Governorate".to_string(),
    mark:  Mark::Bar { stacking: Stacking::Stack },
    x:     Encoding::new(GOVERNORATE, GOVERNORATE_LABEL),
    y:     Encoding::new(COUNT, "Number of Facilities"),
    color: Encoding::new(FACILITY_KIND, "Facility Type"),
    hover: Encoding::field(TOWN),
    data,
  }
}

/// Hospitals against clinics per town, sized by pharmacies.
pub fn build_bubble(rows: &DataFrame) -> Result<ChartSpec, SpecError> {
  let hospitals = FacilityKind::Hospitals.column();
  let clinics = FacilityKind::Clinics.column();
  let pharmacies = FacilityKind::Pharmacies.column();

  for field in [hospitals, clinics, pharmacies, GOVERNORATE, TOWN] {
    if !rows.schema().contains(field) {
      return Err(SpecError::MissingField { chart: "bubble", field: field.to_string() });
    }
  }

  Ok(ChartSpec {
    title: "Healthcare Resource Distribution in Lebanon - Bubble size refers to the number of \
            pharmacies."
      .to_string(),
    mark:  Mark::Bubble { size: pharmacies.to_string(), size_max: BUBBLE_SIZE_MAX },
    x:     Encoding::field(hospitals),
    y:     Encoding::field(clinics),
    color: Encoding::new(GOVERNORATE, GOVERNORATE_LABEL),
    hover: Encoding::field(TOWN),
    data:  rows.clone(),
  })
}

/// Diameter of a bubble whose area is proportional to `value`.
///
/// The largest value gets `size_max`. Non-positive values draw nothing.
pub fn bubble_diameter(value: f64, max: f64, size_max: f64) -> f64 {
  if value <= 0.0 || max <= 0.0 || !value.is_finite() {
    0.0
  } else {
    size_max * (value / max).sqrt()
  }
}

impl ChartSpec {
  pub fn is_empty(&self) -> bool { self.data.height() == 0 }

  /// Distinct values of `field`, in the order they first appear.
  pub fn categories(&self, field: &str) -> PolarsResult<Vec<String>> {
    unique_strings(&self.data.column(field)?.cast(&DataType::String)?)
  }

  /// Fails if any bound field is absent from the data.
  pub fn validate(&self) -> Result<(), SpecError> {
    let chart = match self.mark {
      Mark::Bar { .. } => "bar",
      Mark::Bubble { .. } => "bubble",
    };
    let mut fields = vec![&self.x.field, &self.y.field, &self.color.field, &self.hover.field];
    if let Mark::Bubble { size, .. } = &self.mark {
      fields.push(size);
    }

    match fields.into_iter().find(|f| !self.data.schema().contains(f)) {
      Some(field) => Err(SpecError::MissingField { chart, field: field.clone() }),
      None => Ok(()),
    }
  }
}
