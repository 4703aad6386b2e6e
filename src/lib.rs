//! Medical facility dashboard for Lebanon.
//!
//! A static CSV of facility counts per town is loaded into a [`Table`],
//! filtered by the user's checkbox selections ([`SelectionStore`]), reshaped
//! into a [`ChartSpec`], and drawn by a [`Plot`].
//!
//! ```no_run
//! use medplot::{BarPage, DashboardConfig, PageView, Plot, SessionSelections};
//!
//! let page = BarPage::load(&DashboardConfig::new())?;
//! if let PageView::Chart(spec) = page.run(&SessionSelections::new())? {
//!   Plot::new(&spec)?.save("bar.png", 1024)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod axes;
mod bounds;
mod chart;
mod config;
mod error;
mod facility;
mod filter;
mod legend;
mod load;
mod marker;
mod page;
mod plot;
mod render;
mod selection;
mod theme;

pub use bounds::{Bounds, NiceTicksIter, Range};
pub use chart::{
  BUBBLE_SIZE_MAX, COUNT, ChartSpec, Encoding, FACILITY_KIND, Mark, Stacking, bubble_diameter,
  build_bar, build_bubble,
};
pub use config::DashboardConfig;
pub use error::{Error, LoadError, RenderError, SpecError};
pub use facility::FacilityKind;
pub use filter::{MeltedRow, bar_dataset, bubble_dataset};
pub use load::{GOVERNORATE, REF_AREA, TOWN, Table, derive_governorate};
pub use page::{BarPage, BubblePage, NOTHING_SELECTED, PageView, Selection};
pub use plot::Plot;
pub use render::show_live;
pub use selection::{Category, SelectionStore, SessionSelections};
