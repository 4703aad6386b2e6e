use std::{fs::File, path::Path};

use polars::prelude::*;

use crate::{error::LoadError, facility::FacilityKind};

pub const REF_AREA: &str = "refArea";
pub const TOWN: &str = "Town";
pub const GOVERNORATE: &str = "governorate";

/// The facility table, loaded once and never mutated.
#[derive(Clone, Debug)]
pub struct Table {
  frame: DataFrame,
  kinds: Vec<FacilityKind>,
}

/// Last `/`-delimited segment of a hierarchical area identifier.
///
/// Identifiers without a `/` come back unchanged.
pub fn derive_governorate(ref_area: &str) -> &str {
  ref_area.rsplit('/').next().unwrap_or(ref_area)
}

impl Table {
  pub fn load(path: impl AsRef<Path>) -> Result<Table, LoadError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let frame = CsvReader::new(file).finish()?;
    tracing::debug!(path = %path.display(), rows = frame.height(), "loaded facility table");

    Table::from_frame(frame)
  }

  /// Normalizes an in-memory frame the same way [`Table::load`] does.
  pub fn from_frame(mut frame: DataFrame) -> Result<Table, LoadError> {
    for required in [REF_AREA, TOWN] {
      if !frame.schema().contains(required) {
        return Err(LoadError::MissingColumn(required));
      }
    }

    let ref_area = frame.column(REF_AREA)?.cast(&DataType::String)?;
    let governorate: StringChunked =
      ref_area.str()?.into_iter().map(|v| v.map(derive_governorate)).collect();
    frame.with_column(governorate.with_name(GOVERNORATE.into()))?;

    let town = frame.column(TOWN)?.cast(&DataType::String)?;
    frame.with_column(town)?;

    let kinds = FacilityKind::discover(&frame.schema());
    for kind in &kinds {
      let counts = frame.column(kind.column())?.cast(&DataType::Int64)?;
      frame.with_column(counts)?;
    }
    for missing in FacilityKind::ALL.iter().filter(|k| !kinds.contains(k)) {
      tracing::debug!(kind = %missing, "no count column, kind unavailable");
    }

    Ok(Table { frame, kinds })
  }

  pub fn frame(&self) -> &DataFrame { &self.frame }
  pub fn kinds(&self) -> &[FacilityKind] { &self.kinds }
  pub fn height(&self) -> usize { self.frame.height() }

  /// Distinct governorates in first-seen order.
  pub fn governorates(&self) -> PolarsResult<Vec<String>> {
    unique_strings(self.frame.column(GOVERNORATE)?)
  }

  /// Distinct towns of one governorate in first-seen order.
  pub fn towns_in(&self, governorate: &str) -> PolarsResult<Vec<String>> {
    let frame = self.frame.clone().lazy().filter(col(GOVERNORATE).eq(lit(governorate))).collect()?;
    unique_strings(frame.column(TOWN)?)
  }
}

pub(crate) fn unique_strings(column: &Column) -> PolarsResult<Vec<String>> {
  let unique = column.unique_stable()?;
  Ok(unique.str()?.into_iter().flatten().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn frame() -> DataFrame {
    df! {
      "refArea" => &["http://dbpedia.org/resource/Mount_Lebanon", "lebanon/Beirut", "Akkar"],
      "Town" => &["Aley", "Ashrafieh", "Halba"],
      "Type and size of medical resources - Hospitals" => &[Some(2.0), None, Some(1.0)],
      "Type and size of medical resources - Clinics" => &[0, 3, 4],
      "Observation URI" => &["a", "b", "c"],
    }
    .unwrap()
  }

  #[test]
  fn governorate_derivation() {
    assert_eq!(derive_governorate("lebanon/Mount Lebanon"), "Mount Lebanon");
    assert_eq!(derive_governorate("Beirut"), "Beirut");
    assert_eq!(derive_governorate(""), "");
    assert_eq!(derive_governorate("trailing/"), "");
    assert_eq!(derive_governorate("a/b/c"), "c");
  }

  #[test]
  fn normalizes_frame() {
    let table = Table::from_frame(frame()).unwrap();

    assert_eq!(table.kinds(), &[FacilityKind::Hospitals, FacilityKind::Clinics]);
    assert_eq!(table.governorates().unwrap(), vec!["Mount_Lebanon", "Beirut", "Akkar"]);

    let hospitals = table.frame().column(FacilityKind::Hospitals.column()).unwrap();
    assert_eq!(hospitals.dtype(), &DataType::Int64);
    assert_eq!(hospitals.i64().unwrap().get(0), Some(2));
    assert_eq!(hospitals.i64().unwrap().get(1), None);

    // Extra columns ride along untouched.
    assert!(table.frame().column("Observation URI").is_ok());
  }

  #[test]
  fn null_and_numeric_areas_pass_through() {
    let df = df! {
      "refArea" => &[Some(7), None],
      "Town" => &["Tyre", "Sidon"],
    }
    .unwrap();
    let table = Table::from_frame(df).unwrap();
    let governorate = table.frame().column(GOVERNORATE).unwrap();

    assert_eq!(governorate.str().unwrap().get(0), Some("7"));
    assert_eq!(governorate.str().unwrap().get(1), None);
    assert!(table.kinds().is_empty());
  }

  #[test]
  fn missing_required_column() {
    let df = df! { "refArea" => &["Beirut"] }.unwrap();
    assert!(matches!(Table::from_frame(df), Err(LoadError::MissingColumn(TOWN))));
  }

  #[test]
  fn missing_file() {
    assert!(matches!(Table::load("does/not/exist.csv"), Err(LoadError::Io(_))));
  }

  #[test]
  fn towns_in_governorate() {
    let df = df! {
      "refArea" => &["x/Beirut", "x/Beirut", "x/Akkar", "x/Beirut"],
      "Town" => &["Ashrafieh", "Hamra", "Halba", "Ashrafieh"],
    }
    .unwrap();
    let table = Table::from_frame(df).unwrap();

    assert_eq!(table.towns_in("Beirut").unwrap(), vec!["Ashrafieh", "Hamra"]);
    assert!(table.towns_in("Tripoli").unwrap().is_empty());
  }
}
