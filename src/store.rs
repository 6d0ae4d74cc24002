//! Durable persistence of book records, keyed by id.
//!
//! [`CatalogStore`] is the seam the catalog manager talks to. Every call is
//! single-shot: no statement or cursor outlives it, and writes are never
//! batched or coalesced.
//!
//! | Implementation | Backing |
//! |----------------|---------|
//! | [`SqliteStore`] | `books` table in the local SQLite file |
//! | [`MemoryStore`] | ordered in-memory map, for tests and throwaway sessions |

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection};

use crate::db;
use crate::error::{storage_unavailable, write_failed, Result};
use crate::models::Book;

pub trait CatalogStore {
  /// Every stored record. Order is unspecified.
  fn get_all(&self) -> Result<Vec<Book>>;
  /// Insert or replace by `book.id`.
  fn put(&self, book: &Book) -> Result<()>;
  /// Remove the record if present; absent ids succeed as a no-op.
  fn delete_by_id(&self, id: i64) -> Result<()>;
  /// Writes every record or none of them.
  fn put_all(&self, books: &[Book]) -> Result<()> {
    for book in books {
      self.put(book)?;
    }
    Ok(())
  }
}

const UPSERT_BOOK_SQL: &str =
  "INSERT INTO books (id, title, author, category, year, status, image, quantity, content) \
   VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9) \
   ON CONFLICT(id) DO UPDATE SET title = excluded.title, author = excluded.author, \
   category = excluded.category, year = excluded.year, status = excluded.status, \
   image = excluded.image, quantity = excluded.quantity, content = excluded.content";

fn upsert_book(conn: &Connection, book: &Book) -> Result<()> {
  conn
    .execute(
      UPSERT_BOOK_SQL,
      params![
        book.id,
        book.title,
        book.author,
        book.category,
        book.year,
        book.status,
        book.image,
        book.quantity,
        book.content,
      ],
    )
    .map_err(|err| {
      log::error!("failed to save book {}: {}", book.id, err);
      write_failed(err)
    })?;
  Ok(())
}

pub struct SqliteStore {
  conn: Connection,
}

impl SqliteStore {
  pub fn open_or_create(path: &Path) -> Result<Self> {
    Ok(Self {
      conn: db::open_db(path)?,
    })
  }

  pub fn open_in_memory() -> Result<Self> {
    Ok(Self {
      conn: db::open_in_memory()?,
    })
  }
}

impl CatalogStore for SqliteStore {
  fn get_all(&self) -> Result<Vec<Book>> {
    let mut stmt = self
      .conn
      .prepare(
        "SELECT id, title, author, category, year, status, image, quantity, content FROM books",
      )
      .map_err(storage_unavailable)?;

    let rows = stmt
      .query_map(params![], |row| {
        Ok(Book {
          id: row.get(0)?,
          title: row.get(1)?,
          author: row.get(2)?,
          category: row.get(3)?,
          year: row.get(4)?,
          status: row.get(5)?,
          image: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
          quantity: row.get(7)?,
          content: row.get(8)?,
        })
      })
      .map_err(storage_unavailable)?;

    let mut books = Vec::new();
    for row in rows {
      books.push(row.map_err(storage_unavailable)?);
    }
    Ok(books)
  }

  fn put(&self, book: &Book) -> Result<()> {
    upsert_book(&self.conn, book)
  }

  fn put_all(&self, books: &[Book]) -> Result<()> {
    let tx = self.conn.unchecked_transaction().map_err(write_failed)?;
    for book in books {
      upsert_book(&tx, book)?;
    }
    tx.commit().map_err(write_failed)
  }

  fn delete_by_id(&self, id: i64) -> Result<()> {
    self
      .conn
      .execute("DELETE FROM books WHERE id = ?1", params![id])
      .map_err(|err| {
        log::error!("failed to delete book {}: {}", id, err);
        write_failed(err)
      })?;
    Ok(())
  }
}

/// In-memory store ordered by id.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
  books: Arc<Mutex<BTreeMap<i64, Book>>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

impl CatalogStore for MemoryStore {
  fn get_all(&self) -> Result<Vec<Book>> {
    let books = self.books.lock().map_err(storage_unavailable)?;
    Ok(books.values().cloned().collect())
  }

  fn put(&self, book: &Book) -> Result<()> {
    let mut books = self.books.lock().map_err(write_failed)?;
    books.insert(book.id, book.clone());
    Ok(())
  }

  fn delete_by_id(&self, id: i64) -> Result<()> {
    let mut books = self.books.lock().map_err(write_failed)?;
    books.remove(&id);
    Ok(())
  }

  fn put_all(&self, new_books: &[Book]) -> Result<()> {
    let mut books = self.books.lock().map_err(write_failed)?;
    for book in new_books {
      books.insert(book.id, book.clone());
    }
    Ok(())
  }
}
