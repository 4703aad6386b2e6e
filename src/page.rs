//! The two dashboard pages.
//!
//! Each page owns its own copy of the table and runs load, filter, and build
//! from scratch on every trigger. Pages never share state with each other.

use std::collections::BTreeSet;

use crate::{
  DashboardConfig,
  chart::{BUBBLE_SIZE_MAX, ChartSpec, Mark, build_bar, build_bubble},
  error::Error,
  facility::FacilityKind,
  filter::{bar_dataset, bubble_dataset},
  load::Table,
  selection::{Category, SelectionStore, SessionSelections},
};

pub const NOTHING_SELECTED: &str =
  "Please select at least one facility type and one governorate/district to display the chart.";

/// What a page shows after a run.
#[derive(Debug, Clone)]
pub enum PageView {
  Chart(ChartSpec),
  /// The user deselected every kind or every governorate. Not a failure.
  NothingSelected,
}

/// The selection store, resolved against one table at the start of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
  pub kinds:        Vec<FacilityKind>,
  pub governorates: BTreeSet<String>,
  /// Towns explicitly observed and checked. Empty means no town restriction.
  pub towns:        BTreeSet<String>,
}

impl Selection {
  pub fn snapshot(table: &Table, store: &impl SelectionStore) -> Result<Selection, Error> {
    let kinds = table
      .kinds()
      .iter()
      .copied()
      .filter(|k| store.get_selection(Category::Kind, k.label()))
      .collect();
    let governorates = table
      .governorates()?
      .into_iter()
      .filter(|g| store.get_selection(Category::Governorate, g))
      .collect();
    let towns = store.checked(Category::Town).into_iter().collect();

    Ok(Selection { kinds, governorates, towns })
  }
}

pub struct BarPage {
  table: Table,
}

impl BarPage {
  pub fn load(config: &DashboardConfig) -> Result<BarPage, Error> {
    Ok(BarPage { table: Table::load(config.get_data_path())? })
  }

  pub fn new(table: Table) -> BarPage { BarPage { table } }

  pub fn table(&self) -> &Table { &self.table }

  pub fn run(&self, store: &impl SelectionStore) -> Result<PageView, Error> {
    let selection = Selection::snapshot(&self.table, store)?;
    if selection.kinds.is_empty() || selection.governorates.is_empty() {
      return Ok(PageView::NothingSelected);
    }

    let rows = bar_dataset(&self.table, &selection.kinds, &selection.governorates)?;
    Ok(PageView::Chart(build_bar(&rows)))
  }
}

pub struct BubblePage {
  table:    Table,
  size_max: f64,
}

impl BubblePage {
  pub fn load(config: &DashboardConfig) -> Result<BubblePage, Error> {
    let mut page = BubblePage::new(Table::load(config.get_data_path())?);
    page.size_max = config.get_bubble_size_max();
    Ok(page)
  }

  pub fn new(table: Table) -> BubblePage {
    BubblePage { table, size_max: BUBBLE_SIZE_MAX }
  }

  pub fn table(&self) -> &Table { &self.table }

  /// Shows the town checkboxes of every selected governorate, checking new ones.
  pub fn observe_towns(&self, store: &mut SessionSelections) -> Result<(), Error> {
    for governorate in self.table.governorates()? {
      if !store.get_selection(Category::Governorate, &governorate) {
        continue;
      }
      for town in self.table.towns_in(&governorate)? {
        store.observe(Category::Town, &town);
      }
    }
    Ok(())
  }

  pub fn run(&self, store: &impl SelectionStore) -> Result<PageView, Error> {
    let selection = Selection::snapshot(&self.table, store)?;
    let rows = bubble_dataset(&self.table, &selection.governorates, &selection.towns)?;

    let mut spec = build_bubble(&rows)?;
    if let Mark::Bubble { size_max, .. } = &mut spec.mark {
      *size_max = self.size_max;
    }
    Ok(PageView::Chart(spec))
  }
}
