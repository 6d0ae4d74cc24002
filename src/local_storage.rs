use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use crate::db;
use crate::error::{storage_unavailable, write_failed, Result};

/// String key/value area kept apart from the book records.
pub struct LocalStorage {
  conn: Connection,
}

impl LocalStorage {
  pub fn open(path: &Path) -> Result<Self> {
    Ok(Self {
      conn: db::open_db(path)?,
    })
  }

  pub fn open_in_memory() -> Result<Self> {
    Ok(Self {
      conn: db::open_in_memory()?,
    })
  }

  pub fn get_item(&self, key: &str) -> Result<Option<String>> {
    self
      .conn
      .query_row(
        "SELECT value FROM local_storage WHERE key = ?1",
        params![key],
        |row| row.get(0),
      )
      .optional()
      .map_err(storage_unavailable)
  }

  pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
    upsert_item(&self.conn, key, value)
  }

  /// Sets several keys in one transaction: all of them land or none do.
  pub fn set_items(&self, items: &[(&str, &str)]) -> Result<()> {
    let tx = self.conn.unchecked_transaction().map_err(write_failed)?;
    for (key, value) in items {
      upsert_item(&tx, key, value)?;
    }
    tx.commit().map_err(write_failed)
  }

  pub fn remove_item(&self, key: &str) -> Result<()> {
    self
      .conn
      .execute("DELETE FROM local_storage WHERE key = ?1", params![key])
      .map_err(write_failed)?;
    Ok(())
  }

  #[cfg(test)]
  pub(crate) fn connection(&self) -> &Connection {
    &self.conn
  }
}

fn upsert_item(conn: &Connection, key: &str, value: &str) -> Result<()> {
  conn
    .execute(
      "INSERT INTO local_storage (key, value) VALUES (?1, ?2) \
       ON CONFLICT(key) DO UPDATE SET value = excluded.value",
      params![key, value],
    )
    .map_err(write_failed)?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn set_get_overwrite_remove() {
    let storage = LocalStorage::open_in_memory().unwrap();
    assert_eq!(storage.get_item("loggedIn").unwrap(), None);

    storage.set_item("loggedIn", "true").unwrap();
    storage.set_item("loggedIn", "false").unwrap();
    assert_eq!(storage.get_item("loggedIn").unwrap().as_deref(), Some("false"));

    storage.remove_item("loggedIn").unwrap();
    storage.remove_item("loggedIn").unwrap();
    assert_eq!(storage.get_item("loggedIn").unwrap(), None);
  }

  #[test]
  fn set_items_is_all_or_nothing() {
    let storage = LocalStorage::open_in_memory().unwrap();
    storage
      .connection()
      .execute_batch(
        "CREATE TRIGGER reject_b BEFORE INSERT ON local_storage WHEN NEW.key = 'b' \
         BEGIN SELECT RAISE(ABORT, 'quota exceeded'); END;",
      )
      .unwrap();

    assert!(storage.set_items(&[("a", "1"), ("b", "2")]).is_err());
    assert_eq!(storage.get_item("a").unwrap(), None);

    storage.set_items(&[("a", "1"), ("c", "3")]).unwrap();
    assert_eq!(storage.get_item("a").unwrap().as_deref(), Some("1"));
    assert_eq!(storage.get_item("c").unwrap().as_deref(), Some("3"));
  }
}
