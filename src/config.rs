use std::path::PathBuf;

use crate::db::DB_FILE_NAME;
use crate::error::{CatalogError, Result};

pub const DATA_DIR_ENV: &str = "BOOKSHELF_DATA_DIR";
const APP_DIR_NAME: &str = "bookshelf";

/// Limits applied when turning an uploaded picture into a cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageLimits {
  pub max_bytes: u64,
  pub max_width: u32,
  pub max_height: u32,
  pub jpeg_quality: u8,
}

impl Default for ImageLimits {
  fn default() -> Self {
    Self {
      max_bytes: 2 * 1024 * 1024,
      max_width: 800,
      max_height: 1200,
      jpeg_quality: 70,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
  pub data_dir: PathBuf,
  pub images: ImageLimits,
}

impl AppConfig {
  /// `data_dir` comes from the CLI flag or `BOOKSHELF_DATA_DIR`; without either
  /// the platform data directory is used.
  pub fn resolve(data_dir: Option<PathBuf>) -> Result<Self> {
    let data_dir = match data_dir {
      Some(dir) => dir,
      None => default_data_dir()?,
    };
    Ok(Self {
      data_dir,
      images: ImageLimits::default(),
    })
  }

  pub fn db_path(&self) -> PathBuf {
    self.data_dir.join(DB_FILE_NAME)
  }
}

fn default_data_dir() -> Result<PathBuf> {
  dirs::data_dir()
    .map(|dir| dir.join(APP_DIR_NAME))
    .ok_or_else(|| CatalogError::StorageUnavailable("could not determine a data directory".to_string()))
}
