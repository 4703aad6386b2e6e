use polars::error::PolarsError;
use thiserror::Error;

/// The source table could not be read. Fatal for the page that asked for it.
#[derive(Error, Debug)]
pub enum LoadError {
  #[error("failed to open facility table: {0}")]
  Io(#[from] std::io::Error),
  #[error("failed to parse facility table: {0}")]
  Polars(#[from] PolarsError),
  #[error("facility table has no `{0}` column")]
  MissingColumn(&'static str),
}

/// A chart could not be described from the rows it was handed.
#[derive(Error, Debug)]
pub enum SpecError {
  #[error("{chart} chart needs a `{field}` field")]
  MissingField { chart: &'static str, field: String },
  #[error(transparent)]
  Polars(#[from] PolarsError),
}

#[derive(Error, Debug)]
pub enum RenderError {
  #[error("no suitable graphics adapter: {0}")]
  Adapter(String),
  #[error("failed to create graphics device: {0}")]
  Device(String),
  #[error("failed to create window: {0}")]
  Window(String),
  #[error("failed to create surface: {0}")]
  Surface(String),
  #[error(transparent)]
  Vello(#[from] vello::Error),
  #[error("failed to read back rendered frame: {0}")]
  Readback(String),
  #[error(transparent)]
  Image(#[from] image::ImageError),
}

/// Everything that can stop a page pipeline run.
#[derive(Error, Debug)]
pub enum Error {
  #[error(transparent)]
  Load(#[from] LoadError),
  #[error(transparent)]
  Spec(#[from] SpecError),
  #[error(transparent)]
  Polars(#[from] PolarsError),
}

pub(crate) trait ResultExt<T> {
  /// Logs the error at `warn` and discards it.
  fn log_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
  #[track_caller]
  fn log_err(self) -> Option<T> {
    match self {
      Ok(v) => Some(v),
      Err(e) => {
        let caller = std::panic::Location::caller();
        tracing::warn!(%caller, "{e}");
        None
      }
    }
  }
}
