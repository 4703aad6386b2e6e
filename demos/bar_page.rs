use medplot::{BarPage, Category, DashboardConfig, PageView, Plot, SessionSelections};
use tracing_subscriber::EnvFilter;

/// Governorates named on the command line start unchecked. Pass `--save <path>` to
/// write a PNG instead of opening a window.
fn main() -> Result<(), Box<dyn std::error::Error>> {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();

  let mut args = std::env::args().skip(1).collect::<Vec<_>>();
  let save = match args.iter().position(|a| a == "--save") {
    Some(i) if i + 1 < args.len() => Some(args.drain(i..=i + 1).nth(1).unwrap_or_default()),
    _ => None,
  };

  let config = DashboardConfig::new();
  let page = BarPage::load(&config)?;

  let mut store = SessionSelections::new();
  store.uncheck_all(Category::Governorate, args.iter().map(String::as_str));

  match page.run(&store)? {
    PageView::NothingSelected => println!("{}", medplot::NOTHING_SELECTED),
    PageView::Chart(spec) => match save {
      Some(path) => Plot::new(&spec)?.save(path, config.get_render_size())?,
      None => Plot::new(&spec)?.show()?,
    },
  }

  Ok(())
}
