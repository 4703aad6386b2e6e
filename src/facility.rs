use std::fmt;

use polars::prelude::Schema;

/// A category of medical resource counted per town.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FacilityKind {
  Hospitals,
  Clinics,
  Pharmacies,
}

impl FacilityKind {
  pub const ALL: [FacilityKind; 3] =
    [FacilityKind::Hospitals, FacilityKind::Clinics, FacilityKind::Pharmacies];

  /// Name of the count column in the source CSV.
  pub const fn column(self) -> &'static str {
    match self {
      FacilityKind::Hospitals => "Type and size of medical resources - Hospitals",
      FacilityKind::Clinics => "Type and size of medical resources - Clinics",
      FacilityKind::Pharmacies => "Type and size of medical resources - Pharmacies",
    }
  }

  pub const fn label(self) -> &'static str {
    match self {
      FacilityKind::Hospitals => "Hospitals",
      FacilityKind::Clinics => "Clinics",
      FacilityKind::Pharmacies => "Pharmacies",
    }
  }

  pub fn from_column(column: &str) -> Option<FacilityKind> {
    Self::ALL.into_iter().find(|k| k.column() == column)
  }

  pub fn from_label(label: &str) -> Option<FacilityKind> {
    Self::ALL.into_iter().find(|k| k.label() == label)
  }

  /// The kinds whose count column exists in `schema`, in declaration order.
  pub fn discover(schema: &Schema) -> Vec<FacilityKind> {
    Self::ALL.into_iter().filter(|k| schema.contains(k.column())).collect()
  }
}

impl fmt::Display for FacilityKind {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { f.write_str(self.label()) }
}

#[cfg(test)]
mod tests {
  use polars::prelude::*;

  use super::*;

  #[test]
  fn discover_keeps_declaration_order() {
    let df = df! {
      "Type and size of medical resources - Pharmacies" => &[1],
      "Town" => &["Aley"],
      "Type and size of medical resources - Hospitals" => &[2],
    }
    .unwrap();

    assert_eq!(
      FacilityKind::discover(&df.schema()),
      vec![FacilityKind::Hospitals, FacilityKind::Pharmacies]
    );
  }

  #[test]
  fn discover_nothing() {
    let df = df! { "Town" => &["Aley"] }.unwrap();
    assert!(FacilityKind::discover(&df.schema()).is_empty());
  }

  #[test]
  fn names() {
    for kind in FacilityKind::ALL {
      assert_eq!(FacilityKind::from_column(kind.column()), Some(kind));
      assert_eq!(FacilityKind::from_label(kind.label()), Some(kind));
    }
    assert_eq!(FacilityKind::from_label("Dentists"), None);
    assert_eq!(FacilityKind::Clinics.to_string(), "Clinics");
  }
}
