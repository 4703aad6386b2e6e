use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use crate::chart::BUBBLE_SIZE_MAX;

#[derive(Debug, Clone)]
pub struct DashboardConfig {
  data_path:        PathBuf,
  refresh_interval: Duration,
  bubble_size_max:  f64,
  render_size:      u32,
}

impl Default for DashboardConfig {
  fn default() -> Self {
    DashboardConfig {
      data_path:        PathBuf::from("data/HealthServicesData.csv"),
      refresh_interval: Duration::from_secs(2),
      bubble_size_max:  BUBBLE_SIZE_MAX,
      render_size:      1024,
    }
  }
}

impl DashboardConfig {
  pub fn new() -> Self { DashboardConfig::default() }

  pub fn data_path(&mut self, path: impl AsRef<Path>) -> &mut Self {
    self.data_path = path.as_ref().to_path_buf();
    self
  }

  /// How often the bubble page re-runs its pipeline.
  pub fn refresh_interval(&mut self, interval: Duration) -> &mut Self {
    self.refresh_interval = interval;
    self
  }

  pub fn bubble_size_max(&mut self, diameter: f64) -> &mut Self {
    self.bubble_size_max = diameter;
    self
  }

  /// Side length of saved images, in pixels.
  pub fn render_size(&mut self, size: u32) -> &mut Self {
    self.render_size = size.max(1);
    self
  }

  pub fn get_data_path(&self) -> &Path { &self.data_path }
  pub fn get_refresh_interval(&self) -> Duration { self.refresh_interval }
  pub fn get_bubble_size_max(&self) -> f64 { self.bubble_size_max }
  pub fn get_render_size(&self) -> u32 { self.render_size }
}
