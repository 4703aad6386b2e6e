use std::time::Instant;

use medplot::{BubblePage, DashboardConfig, PageView, SessionSelections};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();

  let config = DashboardConfig::new();
  let page = BubblePage::load(&config)?;
  let mut store = SessionSelections::new();
  let started = Instant::now();

  medplot::show_live(config.get_refresh_interval(), move || {
    tracing::debug!(elapsed = ?started.elapsed(), "refreshing bubble page");

    match page.observe_towns(&mut store).and_then(|()| page.run(&store)) {
      Ok(PageView::Chart(spec)) => Some(spec),
      Ok(PageView::NothingSelected) => None,
      Err(e) => {
        tracing::warn!("bubble page failed: {e}");
        None
      }
    }
  })?;

  Ok(())
}
