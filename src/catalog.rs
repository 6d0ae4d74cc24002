//! # Catalog manager
//!
//! [`CatalogManager`] owns the in-memory snapshot of every book and is the only
//! thing that tells the view what to draw. Each mutation goes through the same
//! loop:
//!
//! 1. write to the [`CatalogStore`] (`put` or `delete_by_id`);
//! 2. reload the full list from the store;
//! 3. re-render the full list;
//! 4. notify.
//!
//! If any step fails the error is returned as-is and the snapshot keeps its
//! previous contents until the next successful reload.
//!
//! Searching and filtering never touch the snapshot; they only change what is
//! rendered.

use crate::error::{CatalogError, Result};
use crate::models::{Book, BookDraft};
use crate::render::{self, Detail, Rendered, Stats, ViewMode};
use crate::seed;
use crate::store::CatalogStore;

/// Whatever displays the catalog: a terminal, a web page, a test recorder.
pub trait CatalogView {
  fn render(&mut self, rendered: &Rendered);
  fn notify(&mut self, message: &str);
  /// Asked before destructive actions; `false` cancels them.
  fn confirm(&mut self, prompt: &str) -> bool;
}

/// Hands out strictly increasing ids seeded from the wall clock (milliseconds).
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
  last: i64,
}

impl IdGenerator {
  pub fn new() -> Self {
    Self::default()
  }

  /// Makes sure later ids land above `id`.
  pub fn observe(&mut self, id: i64) {
    self.last = self.last.max(id);
  }

  /// Fails once every id above the last one handed out is used up.
  pub fn next_id(&mut self) -> Result<i64> {
    let floor = self
      .last
      .checked_add(1)
      .ok_or_else(|| CatalogError::WriteFailed("no book ids left".to_string()))?;
    let id = chrono::Utc::now().timestamp_millis().max(floor);
    self.last = id;
    Ok(id)
  }
}

/// Search box plus category dropdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
  pub query: String,
  pub category: Option<String>,
}

impl Filter {
  pub fn matches(&self, book: &Book) -> bool {
    matches_query(book, &self.query) && matches_category(book, self.category.as_deref())
  }
}

fn matches_query(book: &Book, query: &str) -> bool {
  if query.is_empty() {
    return true;
  }
  let needle = query.to_lowercase();
  book.title.to_lowercase().contains(&needle) || book.author.to_lowercase().contains(&needle)
}

fn matches_category(book: &Book, category: Option<&str>) -> bool {
  match category {
    None | Some("") => true,
    Some(category) => book.category == category,
  }
}

/// Edit form pre-populated from a stored record.
#[derive(Debug, Clone, PartialEq)]
pub struct EditForm {
  pub id: i64,
  pub fields: BookDraft,
}

pub struct CatalogManager<S, V> {
  store: S,
  view: V,
  books: Vec<Book>,
  ids: IdGenerator,
  mode: ViewMode,
  filter: Filter,
}

impl<S: CatalogStore, V: CatalogView> CatalogManager<S, V> {
  pub fn new(store: S, view: V) -> Self {
    Self {
      store,
      view,
      books: Vec::new(),
      ids: IdGenerator::new(),
      mode: ViewMode::default(),
      filter: Filter::default(),
    }
  }

  pub fn with_view_mode(mut self, mode: ViewMode) -> Self {
    self.mode = mode;
    self
  }

  pub fn books(&self) -> &[Book] {
    &self.books
  }

  pub fn store(&self) -> &S {
    &self.store
  }

  pub fn view(&self) -> &V {
    &self.view
  }

  pub fn view_mut(&mut self) -> &mut V {
    &mut self.view
  }

  pub fn view_mode(&self) -> ViewMode {
    self.mode
  }

  pub fn filter(&self) -> &Filter {
    &self.filter
  }

  /// Pulls every record from the store. An empty store gets the sample shelf
  /// written once, then is read back.
  pub fn load(&mut self) -> Result<()> {
    let mut books = self.store.get_all()?;
    if books.is_empty() {
      log::info!("catalog is empty, seeding {} sample books", seed::SAMPLE_BOOK_COUNT);
      let samples = seed::default_books(&mut self.ids)?;
      self.store.put_all(&samples)?;
      books = self.store.get_all()?;
    }
    self.replace_snapshot(books);
    Ok(())
  }

  fn reload(&mut self) -> Result<()> {
    let books = self.store.get_all()?;
    self.replace_snapshot(books);
    Ok(())
  }

  fn replace_snapshot(&mut self, books: Vec<Book>) {
    for book in &books {
      self.ids.observe(book.id);
    }
    self.books = books;
  }

  fn find(&self, id: i64) -> Option<&Book> {
    self.books.iter().find(|book| book.id == id)
  }

  pub fn add(&mut self, draft: BookDraft) -> Result<i64> {
    let id = self.ids.next_id()?;
    let book = draft.into_book(id);
    self.store.put(&book)?;
    log::info!("added book {} ({})", id, book.title);
    self.reload()?;
    self.render_all();
    self.view.notify("✅ Book added");
    Ok(id)
  }

  /// Loads a record into an edit form; nothing is written until [`Self::update`].
  pub fn edit(&self, id: i64) -> Result<EditForm> {
    let book = self.find(id).ok_or(CatalogError::NotFound(id))?;
    Ok(EditForm {
      id,
      fields: BookDraft::from(book),
    })
  }

  /// Replaces every field of `id` with `draft`. An empty image keeps the current one.
  pub fn update(&mut self, id: i64, mut draft: BookDraft) -> Result<()> {
    let existing = self.find(id).ok_or(CatalogError::NotFound(id))?;
    if draft.image.trim().is_empty() {
      draft.image = existing.image.clone();
    }
    let book = draft.into_book(id);
    self.store.put(&book)?;
    log::info!("updated book {} ({})", id, book.title);
    self.reload()?;
    self.render_all();
    self.view.notify("✅ Book updated");
    Ok(())
  }

  /// Deletes after the view confirms. Returns whether anything was removed.
  pub fn remove(&mut self, id: i64) -> Result<bool> {
    let Some(book) = self.find(id) else {
      return Ok(false);
    };
    let prompt = format!("Are you sure you want to delete \"{}\"?", book.title);
    if !self.view.confirm(&prompt) {
      return Ok(false);
    }
    self.store.delete_by_id(id)?;
    log::info!("removed book {}", id);
    self.reload()?;
    self.render_all();
    self.view.notify("✅ Book deleted");
    Ok(true)
  }

  pub fn search(&self, query: &str) -> Vec<&Book> {
    self
      .books
      .iter()
      .filter(|book| matches_query(book, query))
      .collect()
  }

  pub fn filter_by_category(&self, category: Option<&str>) -> Vec<&Book> {
    self
      .books
      .iter()
      .filter(|book| matches_category(book, category))
      .collect()
  }

  /// Renders only the books matching both the query and the category.
  pub fn apply_filters(&mut self, filter: Filter) -> usize {
    self.filter = filter;
    self.render_filtered()
  }

  pub fn set_view_mode(&mut self, mode: ViewMode) {
    self.mode = mode;
    self.render_filtered();
  }

  pub fn render(&self, books: &[&Book]) -> Rendered {
    render::render_cards(books, self.mode)
  }

  fn render_all(&mut self) {
    let all: Vec<&Book> = self.books.iter().collect();
    let rendered = render::render_cards(&all, self.mode);
    self.view.render(&rendered);
  }

  fn render_filtered(&mut self) -> usize {
    let visible: Vec<&Book> = self
      .books
      .iter()
      .filter(|book| self.filter.matches(book))
      .collect();
    let rendered = render::render_cards(&visible, self.mode);
    self.view.render(&rendered);
    rendered.cards.len()
  }

  pub fn show_detail(&self, id: i64) -> Result<Detail> {
    self
      .find(id)
      .map(Detail::of)
      .ok_or(CatalogError::NotFound(id))
  }

  pub fn read(&self, id: i64) -> Result<String> {
    self
      .find(id)
      .map(render::reading_html)
      .ok_or(CatalogError::NotFound(id))
  }

  /// Reading content for a terminal: control characters replaced, no markup.
  pub fn read_text(&self, id: i64) -> Result<String> {
    self
      .find(id)
      .map(render::reading_text)
      .ok_or(CatalogError::NotFound(id))
  }

  pub fn stats(&self) -> Stats {
    Stats::of(&self.books)
  }
}
