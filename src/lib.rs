pub mod catalog;
pub mod cli;
pub mod config;
pub mod cover;
pub mod db;
pub mod error;
pub mod local_storage;
pub mod models;
pub mod render;
pub mod seed;
pub mod session;
pub mod store;

pub use catalog::{CatalogManager, CatalogView, EditForm, Filter, IdGenerator};
pub use config::{AppConfig, ImageLimits};
pub use error::{CatalogError, Result};
pub use local_storage::LocalStorage;
pub use models::{Account, Book, BookDraft, BookStatus};
pub use render::{Card, CardImage, Detail, Rendered, Stats, ViewMode};
pub use session::Session;
pub use store::{CatalogStore, MemoryStore, SqliteStore};

pub fn run() -> std::process::ExitCode {
  cli::run()
}
