//! Single-account login gate.
//!
//! One account at most, stored as plaintext JSON under the `account` key.
//! The session itself is two more keys, `loggedIn` and `currentUser`.

use crate::error::{write_failed, CatalogError, Result};
use crate::local_storage::LocalStorage;
use crate::models::Account;

pub const ACCOUNT_KEY: &str = "account";
pub const LOGGED_IN_KEY: &str = "loggedIn";
pub const CURRENT_USER_KEY: &str = "currentUser";

pub struct Session {
  storage: LocalStorage,
}

impl Session {
  pub fn new(storage: LocalStorage) -> Self {
    Self { storage }
  }

  /// Replaces whatever account was stored before.
  pub fn register(&self, username: &str, password: &str, confirm: &str) -> Result<()> {
    if username.is_empty() || password.is_empty() || confirm.is_empty() {
      return Err(CatalogError::ValidationFailed(
        "Please fill in every field".to_string(),
      ));
    }
    if password != confirm {
      return Err(CatalogError::ValidationFailed(
        "Password confirmation does not match".to_string(),
      ));
    }

    let account = Account {
      username: username.to_string(),
      password: password.to_string(),
    };
    let json = serde_json::to_string(&account).map_err(write_failed)?;
    self.storage.set_item(ACCOUNT_KEY, &json)?;
    log::info!("registered account {}", username);
    Ok(())
  }

  pub fn login(&self, username: &str, password: &str) -> Result<()> {
    let account = self.account()?.ok_or_else(|| {
      CatalogError::AuthFailed("No account yet. Please register first".to_string())
    })?;
    if account.username != username || account.password != password {
      log::warn!("failed login attempt for {}", username);
      return Err(CatalogError::AuthFailed(
        "Wrong username or password".to_string(),
      ));
    }

    self
      .storage
      .set_items(&[(CURRENT_USER_KEY, username), (LOGGED_IN_KEY, "true")])?;
    log::info!("{} logged in", username);
    Ok(())
  }

  pub fn logout(&self) -> Result<()> {
    self.storage.remove_item(LOGGED_IN_KEY)?;
    self.storage.remove_item(CURRENT_USER_KEY)?;
    Ok(())
  }

  pub fn is_logged_in(&self) -> Result<bool> {
    Ok(self.storage.get_item(LOGGED_IN_KEY)?.as_deref() == Some("true"))
  }

  pub fn current_user(&self) -> Result<Option<String>> {
    if !self.is_logged_in()? {
      return Ok(None);
    }
    self.storage.get_item(CURRENT_USER_KEY)
  }

  pub fn account(&self) -> Result<Option<Account>> {
    let Some(raw) = self.storage.get_item(ACCOUNT_KEY)? else {
      return Ok(None);
    };
    serde_json::from_str(&raw)
      .map(Some)
      .map_err(|err| CatalogError::AuthFailed(format!("Stored account is unreadable: {}", err)))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn session() -> Session {
    Session::new(LocalStorage::open_in_memory().unwrap())
  }

  #[test]
  fn register_rejects_empty_fields() {
    let session = session();
    for (user, pass, confirm) in [("", "p", "p"), ("a", "", "p"), ("a", "p", "")] {
      assert!(matches!(
        session.register(user, pass, confirm),
        Err(CatalogError::ValidationFailed(_))
      ));
    }
    assert!(session.account().unwrap().is_none());
  }

  #[test]
  fn mismatched_confirmation_keeps_prior_account() {
    let session = session();
    session.register("reader", "secret", "secret").unwrap();

    let err = session.register("a", "p1", "p2").unwrap_err();
    assert!(matches!(err, CatalogError::ValidationFailed(_)));

    let account = session.account().unwrap().unwrap();
    assert_eq!(account.username, "reader");
    assert_eq!(account.password, "secret");
  }

  #[test]
  fn register_overwrites_previous_account() {
    let session = session();
    session.register("first", "one", "one").unwrap();
    session.register("second", "two", "two").unwrap();

    assert!(matches!(
      session.login("first", "one"),
      Err(CatalogError::AuthFailed(_))
    ));
    session.login("second", "two").unwrap();
  }

  #[test]
  fn login_requires_an_account() {
    let session = session();
    assert!(matches!(
      session.login("reader", "secret"),
      Err(CatalogError::AuthFailed(_))
    ));
    assert!(!session.is_logged_in().unwrap());
  }

  #[test]
  fn login_with_wrong_password_fails() {
    let session = session();
    session.register("reader", "secret", "secret").unwrap();
    assert!(matches!(
      session.login("reader", "guess"),
      Err(CatalogError::AuthFailed(_))
    ));
    assert!(!session.is_logged_in().unwrap());
    assert_eq!(session.current_user().unwrap(), None);
  }

  #[test]
  fn login_then_logout() {
    let session = session();
    session.register("reader", "secret", "secret").unwrap();
    session.login("reader", "secret").unwrap();
    assert!(session.is_logged_in().unwrap());
    assert_eq!(session.current_user().unwrap().as_deref(), Some("reader"));

    session.logout().unwrap();
    assert!(!session.is_logged_in().unwrap());
    assert_eq!(session.current_user().unwrap(), None);

    session.logout().unwrap();
  }

  #[test]
  fn failed_login_write_leaves_previous_session() {
    let session = session();
    session.register("alice", "secret", "secret").unwrap();
    session.login("alice", "secret").unwrap();
    session.register("bob", "hunter2", "hunter2").unwrap();
    session
      .storage
      .connection()
      .execute_batch(
        "CREATE TRIGGER freeze_user BEFORE UPDATE ON local_storage WHEN NEW.key = 'currentUser' \
         BEGIN SELECT RAISE(ABORT, 'quota exceeded'); END;",
      )
      .unwrap();

    assert!(matches!(
      session.login("bob", "hunter2"),
      Err(CatalogError::WriteFailed(_))
    ));
    assert_eq!(session.current_user().unwrap().as_deref(), Some("alice"));

    session.logout().unwrap();
    session
      .storage
      .connection()
      .execute_batch(
        "CREATE TRIGGER reject_user BEFORE INSERT ON local_storage WHEN NEW.key = 'currentUser' \
         BEGIN SELECT RAISE(ABORT, 'quota exceeded'); END;",
      )
      .unwrap();
    assert!(session.login("bob", "hunter2").is_err());
    assert!(!session.is_logged_in().unwrap());
  }
}
