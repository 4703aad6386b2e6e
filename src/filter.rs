use std::collections::BTreeSet;

use polars::prelude::*;

use crate::{
  facility::FacilityKind,
  load::{GOVERNORATE, TOWN, Table},
};

/// One (governorate, town, kind) triple with a positive count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeltedRow {
  pub governorate: String,
  pub town:        Option<String>,
  pub kind:        FacilityKind,
  pub count:       i64,
}

/// Long-format counts for the stacked bar chart.
///
/// Rows come out in source order, and within a row in kind declaration order.
/// An empty kind or governorate selection yields no rows.
pub fn bar_dataset(
  table: &Table,
  selected_kinds: &[FacilityKind],
  selected_governorates: &BTreeSet<String>,
) -> PolarsResult<Vec<MeltedRow>> {
  let kinds =
    table.kinds().iter().copied().filter(|k| selected_kinds.contains(k)).collect::<Vec<_>>();
  if kinds.is_empty() || selected_governorates.is_empty() {
    return Ok(vec![]);
  }

  let kept = table
    .frame()
    .clone()
    .lazy()
    .filter(one_of(GOVERNORATE, selected_governorates))
    .collect()?;

  let governorates = kept.column(GOVERNORATE)?.str()?;
  let towns = kept.column(TOWN)?.str()?;
  let counts = kinds
    .iter()
    .map(|k| -> PolarsResult<_> { Ok((*k, kept.column(k.column())?.i64()?)) })
    .collect::<PolarsResult<Vec<_>>>()?;

  let mut rows = vec![];
  for i in 0..kept.height() {
    let Some(governorate) = governorates.get(i) else { continue };

    for (kind, column) in &counts {
      match column.get(i) {
        Some(count) if count > 0 => rows.push(MeltedRow {
          governorate: governorate.to_string(),
          town:        towns.get(i).map(str::to_string),
          kind:        *kind,
          count,
        }),
        _ => {}
      }
    }
  }

  tracing::trace!(source = table.height(), kept = kept.height(), rows = rows.len(), "bar dataset");
  Ok(rows)
}

/// Rows for the bubble plot, every column kept.
///
/// An empty `selected_towns` means no town restriction at all, not "no towns".
pub fn bubble_dataset(
  table: &Table,
  selected_governorates: &BTreeSet<String>,
  selected_towns: &BTreeSet<String>,
) -> PolarsResult<DataFrame> {
  let mut lf = table.frame().clone().lazy().filter(one_of(GOVERNORATE, selected_governorates));
  if !selected_towns.is_empty() {
    lf = lf.filter(one_of(TOWN, selected_towns));
  }

  let rows = lf.collect()?;
  tracing::trace!(source = table.height(), rows = rows.height(), "bubble dataset");
  Ok(rows)
}

fn one_of(column: &str, values: &BTreeSet<String>) -> Expr {
  values.iter().map(|v| col(column).eq(lit(v.as_str()))).reduce(Expr::or).unwrap_or(lit(false))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn table() -> Table {
    let df = df! {
      "refArea" => &["lebanon/Mount Lebanon", "lebanon/Beirut"],
      "Town" => &["Aley", "Ashrafieh"],
      "Type and size of medical resources - Hospitals" => &[2, 0],
      "Type and size of medical resources - Clinics" => &[0, 3],
      "Type and size of medical resources - Pharmacies" => &[5, 1],
    }
    .unwrap();
    Table::from_frame(df).unwrap()
  }

  fn set(values: &[&str]) -> BTreeSet<String> { values.iter().map(|v| v.to_string()).collect() }

  fn row(governorate: &str, town: &str, kind: FacilityKind, count: i64) -> MeltedRow {
    MeltedRow { governorate: governorate.into(), town: Some(town.into()), kind, count }
  }

  #[test]
  fn melts_and_drops_zero_counts() {
    let rows =
      bar_dataset(&table(), &FacilityKind::ALL, &set(&["Mount Lebanon", "Beirut"])).unwrap();

    assert_eq!(
      rows,
      vec![
        row("Mount Lebanon", "Aley", FacilityKind::Hospitals, 2),
        row("Mount Lebanon", "Aley", FacilityKind::Pharmacies, 5),
        row("Beirut", "Ashrafieh", FacilityKind::Clinics, 3),
        row("Beirut", "Ashrafieh", FacilityKind::Pharmacies, 1),
      ]
    );
  }

  #[test]
  fn empty_selections_draw_nothing() {
    let table = table();
    assert!(bar_dataset(&table, &[], &set(&["Beirut"])).unwrap().is_empty());
    assert!(bar_dataset(&table, &FacilityKind::ALL, &set(&[])).unwrap().is_empty());
  }

  #[test]
  fn only_selected_kinds_and_governorates() {
    let rows =
      bar_dataset(&table(), &[FacilityKind::Pharmacies], &set(&["Beirut", "Akkar"])).unwrap();
    assert_eq!(rows, vec![row("Beirut", "Ashrafieh", FacilityKind::Pharmacies, 1)]);
  }

  #[test]
  fn null_and_negative_counts_dropped() {
    let df = df! {
      "refArea" => &["x/Akkar", "x/Akkar", "x/Akkar"],
      "Town" => &["Halba", "Qobayat", "Bebnine"],
      "Type and size of medical resources - Clinics" => &[None, Some(-1), Some(4)],
    }
    .unwrap();
    let table = Table::from_frame(df).unwrap();

    let rows = bar_dataset(&table, &FacilityKind::ALL, &set(&["Akkar"])).unwrap();
    assert_eq!(rows, vec![row("Akkar", "Bebnine", FacilityKind::Clinics, 4)]);
    assert!(rows.iter().all(|r| r.count > 0));
  }

  #[test]
  fn kinds_missing_from_table_are_skipped() {
    let df = df! {
      "refArea" => &["x/Akkar"],
      "Town" => &["Halba"],
    }
    .unwrap();
    let table = Table::from_frame(df).unwrap();
    assert!(bar_dataset(&table, &FacilityKind::ALL, &set(&["Akkar"])).unwrap().is_empty());
  }

  #[test]
  fn bubble_without_towns_keeps_governorate_rows() {
    let rows = bubble_dataset(&table(), &set(&["Beirut"]), &set(&[])).unwrap();

    assert_eq!(rows.height(), 1);
    assert_eq!(rows.column("Town").unwrap().str().unwrap().get(0), Some("Ashrafieh"));
    assert_eq!(rows.width(), table().frame().width());
  }

  #[test]
  fn bubble_town_restriction() {
    let table = table();
    let governorates = set(&["Beirut", "Mount Lebanon"]);

    let rows = bubble_dataset(&table, &governorates, &set(&["Aley"])).unwrap();
    assert_eq!(rows.height(), 1);
    assert_eq!(rows.column("Town").unwrap().str().unwrap().get(0), Some("Aley"));

    // A checked town outside the selected governorates does not bring its row back.
    let rows = bubble_dataset(&table, &set(&["Beirut"]), &set(&["Aley"])).unwrap();
    assert_eq!(rows.height(), 0);
  }

  #[test]
  fn datasets_are_repeatable() {
    let table = table();
    let governorates = set(&["Beirut", "Mount Lebanon"]);

    let first = bar_dataset(&table, &FacilityKind::ALL, &governorates).unwrap();
    let second = bar_dataset(&table, &FacilityKind::ALL, &governorates).unwrap();
    assert_eq!(first, second);

    let first = bubble_dataset(&table, &governorates, &set(&[])).unwrap();
    let second = bubble_dataset(&table, &governorates, &set(&[])).unwrap();
    assert!(first.equals_missing(&second));
    assert_eq!(table.height(), 2);
  }
}
