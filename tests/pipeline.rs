use std::collections::BTreeSet;

use medplot::{
  BarPage, BubblePage, COUNT, Category, ChartSpec, DashboardConfig, Error, FACILITY_KIND,
  FacilityKind, LoadError, NOTHING_SELECTED, PageView, Plot, SessionSelections, SpecError, Table,
  bar_dataset, bubble_dataset,
};

fn fixture(name: &str) -> String { format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR")) }

fn config(name: &str) -> DashboardConfig {
  let mut config = DashboardConfig::new();
  config.data_path(fixture(name));
  config
}

fn chart(view: PageView) -> ChartSpec {
  match view {
    PageView::Chart(spec) => spec,
    PageView::NothingSelected => panic!("expected a chart, got: {NOTHING_SELECTED}"),
  }
}

fn strings(spec: &ChartSpec, field: &str) -> Vec<String> {
  let column = spec.data.column(field).unwrap();
  column.str().unwrap().into_iter().map(|v| v.unwrap_or_default().to_string()).collect()
}

fn set(values: &[&str]) -> BTreeSet<String> { values.iter().map(|v| v.to_string()).collect() }

#[test]
fn loads_fixture() {
  let table = Table::load(fixture("facilities.csv")).unwrap();

  assert_eq!(table.height(), 4);
  assert_eq!(table.kinds(), FacilityKind::ALL);
  assert_eq!(table.governorates().unwrap(), vec!["Mount Lebanon", "Beirut", "Akkar"]);
  assert_eq!(table.towns_in("Beirut").unwrap(), vec!["Ashrafieh", "Hamra"]);
}

#[test]
fn missing_file_is_a_load_error() {
  let result = BarPage::load(&config("does_not_exist.csv"));
  assert!(matches!(result, Err(Error::Load(LoadError::Io(_)))));
}

#[test]
fn bar_page_melts_every_positive_count() {
  let page = BarPage::load(&config("facilities.csv")).unwrap();
  let spec = chart(page.run(&SessionSelections::new()).unwrap());

  let counts = spec.data.column(COUNT).unwrap().i64().unwrap();
  assert_eq!(counts.into_no_null_iter().collect::<Vec<_>>(), vec![2, 5, 3, 1, 1, 2, 1, 4]);
  assert_eq!(
    strings(&spec, FACILITY_KIND),
    vec![
      "Hospitals",
      "Pharmacies",
      "Clinics",
      "Pharmacies",
      "Hospitals",
      "Pharmacies",
      "Clinics",
      "Pharmacies",
    ]
  );
  assert_eq!(spec.categories("governorate").unwrap(), vec!["Mount Lebanon", "Beirut", "Akkar"]);
  Plot::new(&spec).unwrap();
}

#[test]
fn bar_dataset_matches_worked_example() {
  let table = Table::load(fixture("facilities.csv")).unwrap();
  let rows = bar_dataset(&table, &FacilityKind::ALL, &set(&["Mount Lebanon", "Beirut"])).unwrap();

  let head = rows
    .iter()
    .take(3)
    .map(|r| (r.governorate.as_str(), r.town.as_deref(), r.kind, r.count))
    .collect::<Vec<_>>();
  assert_eq!(
    head,
    vec![
      ("Mount Lebanon", Some("Aley"), FacilityKind::Hospitals, 2),
      ("Mount Lebanon", Some("Aley"), FacilityKind::Pharmacies, 5),
      ("Beirut", Some("Ashrafieh"), FacilityKind::Clinics, 3),
    ]
  );
  assert!(rows.iter().all(|r| r.count > 0 && r.governorate != "Akkar"));
}

#[test]
fn unchecking_every_kind_shows_the_prompt() {
  let page = BarPage::load(&config("facilities.csv")).unwrap();
  let mut store = SessionSelections::new();
  store.uncheck_all(Category::Kind, FacilityKind::ALL.map(FacilityKind::label));

  assert!(matches!(page.run(&store).unwrap(), PageView::NothingSelected));
}

#[test]
fn bubble_dataset_for_one_governorate() {
  let table = Table::load(fixture("facilities.csv")).unwrap();
  let rows = bubble_dataset(&table, &set(&["Akkar"]), &set(&[])).unwrap();

  assert_eq!(rows.height(), 1);
  assert_eq!(rows.column("Town").unwrap().str().unwrap().get(0), Some("Halba"));
}

#[test]
fn governorate_selected_with_no_towns_checked_shows_every_town() {
  let page = BubblePage::load(&config("facilities.csv")).unwrap();
  let mut store = SessionSelections::new();
  store.uncheck_all(Category::Governorate, ["Mount Lebanon", "Akkar"]);
  page.observe_towns(&mut store).unwrap();
  store.uncheck_all(Category::Town, ["Ashrafieh", "Hamra"]);

  let spec = chart(page.run(&store).unwrap());
  assert_eq!(strings(&spec, "Town"), vec!["Ashrafieh", "Hamra"]);
  Plot::new(&spec).unwrap();
}

#[test]
fn bubble_page_follows_checked_towns() {
  let page = BubblePage::load(&config("facilities.csv")).unwrap();
  let mut store = SessionSelections::new();
  page.observe_towns(&mut store).unwrap();
  store.set(Category::Town, "Hamra", false).set(Category::Town, "Halba", false);

  let spec = chart(page.run(&store).unwrap());
  assert_eq!(strings(&spec, "Town"), vec!["Aley", "Ashrafieh"]);
}

#[test]
fn bubble_chart_needs_pharmacies() {
  let config = config("no_pharmacies.csv");

  let bar = BarPage::load(&config).unwrap();
  assert_eq!(bar.table().kinds(), [FacilityKind::Hospitals, FacilityKind::Clinics]);
  chart(bar.run(&SessionSelections::new()).unwrap());

  let bubble = BubblePage::load(&config).unwrap();
  match bubble.run(&SessionSelections::new()) {
    Err(Error::Spec(SpecError::MissingField { chart, field })) => {
      assert_eq!(chart, "bubble");
      assert_eq!(field, FacilityKind::Pharmacies.column());
    }
    other => panic!("expected a missing pharmacies field, got {other:?}"),
  }
}
