use async_trait::async_trait;
use database::embedded::{self, Database, ReadableTable, TableDefinition};
use database::{DatabaseError, DatabaseResult};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::{
    error::{UserError, UserResult},
    models::User,
    repository::UserRepository,
};

/// Users table: hyphenated id -> JSON-encoded [`User`]
pub const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Embedded store implementation of UserRepository
///
/// Every operation runs one redb transaction on the blocking pool. Email
/// uniqueness is a full scan inside the write transaction, so concurrent creates
/// cannot both claim the same address.
#[derive(Clone)]
pub struct EmbeddedUserRepository {
    db: Arc<Database>,
}

/// Result of a guarded write, decided inside the transaction
enum WriteOutcome {
    Written,
    EmailTaken,
    Missing,
}

impl EmbeddedUserRepository {
    /// Wrap a store handle, creating the users table if needed.
    pub fn new(db: Arc<Database>) -> DatabaseResult<Self> {
        embedded::ensure_table(&db, USERS)?;
        Ok(Self { db })
    }
}

fn encode(user: &User) -> UserResult<Vec<u8>> {
    Ok(serde_json::to_vec(user)?)
}

/// Decode a stored record, logging and skipping it if corrupt.
fn decode_or_skip(key: &str, bytes: &[u8]) -> Option<User> {
    match serde_json::from_slice(bytes) {
        Ok(user) => Some(user),
        Err(e) => {
            warn!(key, error = %e, "Skipping corrupt user record");
            None
        }
    }
}

fn scan_users<T>(table: &T) -> DatabaseResult<Vec<User>>
where
    T: ReadableTable<&'static str, &'static [u8]>,
{
    let mut users = Vec::new();
    for entry in table.iter()? {
        let (key, value) = entry?;
        if let Some(user) = decode_or_skip(key.value(), value.value()) {
            users.push(user);
        }
    }
    Ok(users)
}

/// True if a user other than `except` holds `email`. Stops at the first match.
fn email_taken<T>(table: &T, email: &str, except: Option<Uuid>) -> DatabaseResult<bool>
where
    T: ReadableTable<&'static str, &'static [u8]>,
{
    for entry in table.iter()? {
        let (key, value) = entry?;
        if let Some(user) = decode_or_skip(key.value(), value.value()) {
            if user.email == email && Some(user.id) != except {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

#[async_trait]
impl UserRepository for EmbeddedUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let bytes = encode(&user)?;
        let key = user.id.to_string();
        let email = user.email.clone();

        let outcome = embedded::run_blocking(&self.db, move |db| {
            let txn = db.begin_write()?;
            {
                let mut table = txn.open_table(USERS)?;
                if email_taken(&table, &email, None)? {
                    return Ok(WriteOutcome::EmailTaken);
                }
                table.insert(key.as_str(), bytes.as_slice())?;
            }
            txn.commit()?;
            Ok(WriteOutcome::Written)
        })
        .await?;

        match outcome {
            WriteOutcome::Written => {
                tracing::info!(user_id = %user.id, email = %user.email, "Created user");
                Ok(user)
            }
            WriteOutcome::EmailTaken => Err(UserError::DuplicateEmail(user.email)),
            WriteOutcome::Missing => Err(UserError::Internal("unexpected write outcome".into())),
        }
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let key = id.to_string();

        let user = embedded::run_blocking(&self.db, move |db| {
            let txn = db.begin_read()?;
            let table = txn.open_table(USERS)?;
            let user = match table.get(key.as_str())? {
                Some(value) => Some(
                    serde_json::from_slice::<User>(value.value())
                        .map_err(|e| DatabaseError::Codec(e.to_string()))?,
                ),
                None => None,
            };
            Ok(user)
        })
        .await?;

        Ok(user)
    }

    async fn get_all(&self) -> UserResult<Vec<User>> {
        let users = embedded::run_blocking(&self.db, |db| {
            let txn = db.begin_read()?;
            let table = txn.open_table(USERS)?;
            scan_users(&table)
        })
        .await?;

        Ok(users)
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let bytes = encode(&user)?;
        let key = user.id.to_string();
        let email = user.email.clone();
        let id = user.id;

        let outcome = embedded::run_blocking(&self.db, move |db| {
            let txn = db.begin_write()?;
            {
                let mut table = txn.open_table(USERS)?;
                if table.get(key.as_str())?.is_none() {
                    return Ok(WriteOutcome::Missing);
                }
                if email_taken(&table, &email, Some(id))? {
                    return Ok(WriteOutcome::EmailTaken);
                }
                table.insert(key.as_str(), bytes.as_slice())?;
            }
            txn.commit()?;
            Ok(WriteOutcome::Written)
        })
        .await?;

        match outcome {
            WriteOutcome::Written => {
                tracing::info!(user_id = %user.id, "Updated user");
                Ok(user)
            }
            WriteOutcome::EmailTaken => Err(UserError::DuplicateEmail(user.email)),
            WriteOutcome::Missing => Err(UserError::NotFound(user.id.to_string())),
        }
    }

    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let key = id.to_string();

        let existed = embedded::run_blocking(&self.db, move |db| {
            let txn = db.begin_write()?;
            let existed = {
                let mut table = txn.open_table(USERS)?;
                let removed = table.remove(key.as_str())?;
                removed.is_some()
            };
            txn.commit()?;
            Ok(existed)
        })
        .await?;

        if existed {
            tracing::info!(user_id = %id, "Deleted user");
        }
        Ok(existed)
    }

    async fn email_exists(&self, email: &str) -> UserResult<bool> {
        let email = email.to_string();

        let exists = embedded::run_blocking(&self.db, move |db| {
            let txn = db.begin_read()?;
            let table = txn.open_table(USERS)?;
            email_taken(&table, &email, None)
        })
        .await?;

        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> EmbeddedUserRepository {
        let db = Arc::new(embedded::open_in_memory().unwrap());
        EmbeddedUserRepository::new(db).unwrap()
    }

    fn user(name: &str, email: &str) -> User {
        User::new(name.to_string(), email.to_string(), "hash".to_string())
    }

    fn put_raw(repo: &EmbeddedUserRepository, key: &str, bytes: &[u8]) {
        let txn = repo.db.begin_write().unwrap();
        txn.open_table(USERS).unwrap().insert(key, bytes).unwrap();
        txn.commit().unwrap();
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let repo = repo();

        let created = repo.create(user("Alice", "alice@example.com")).await.unwrap();
        let fetched = repo.get_by_id(created.id).await.unwrap();

        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn test_get_missing_user() {
        let repo = repo();
        assert!(repo.get_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email() {
        let repo = repo();
        repo.create(user("Alice", "alice@example.com")).await.unwrap();

        let result = repo.create(user("Alice 2", "alice@example.com")).await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
        assert_eq!(repo.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_stored_value_is_json_with_password_key() {
        let repo = repo();
        let created = repo.create(user("Alice", "alice@example.com")).await.unwrap();

        let txn = repo.db.begin_read().unwrap();
        let table = txn.open_table(USERS).unwrap();
        let raw = table.get(created.id.to_string().as_str()).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_slice(raw.value()).unwrap();

        assert_eq!(value["id"], created.id.to_string());
        assert_eq!(value["name"], "Alice");
        assert_eq!(value["email"], "alice@example.com");
        assert_eq!(value["password"], "hash");
    }

    #[tokio::test]
    async fn test_corrupt_records_are_skipped_by_scans() {
        let repo = repo();
        let alice = repo.create(user("Alice", "alice@example.com")).await.unwrap();
        put_raw(&repo, "00000000-0000-0000-0000-000000000000", b"{not json");

        let all = repo.get_all().await.unwrap();
        assert_eq!(all, vec![alice]);
        assert!(repo.email_exists("alice@example.com").await.unwrap());
        assert!(!repo.email_exists("bob@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_get_corrupt_record_is_serialization_error() {
        let repo = repo();
        let id = Uuid::new_v4();
        put_raw(&repo, &id.to_string(), b"garbage");

        let err = repo.get_by_id(id).await.unwrap_err();
        assert!(matches!(err, UserError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_update_guards() {
        let repo = repo();
        let alice = repo.create(user("Alice", "alice@example.com")).await.unwrap();
        repo.create(user("Bob", "bob@example.com")).await.unwrap();

        let mut same_email = alice.clone();
        same_email.name = "Alicia".to_string();
        assert_eq!(repo.update(same_email).await.unwrap().name, "Alicia");

        let mut taken = alice.clone();
        taken.email = "bob@example.com".to_string();
        assert!(matches!(repo.update(taken).await, Err(UserError::DuplicateEmail(_))));

        let ghost = user("Ghost", "ghost@example.com");
        assert!(matches!(repo.update(ghost).await, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = repo();
        let alice = repo.create(user("Alice", "alice@example.com")).await.unwrap();

        assert!(repo.delete(alice.id).await.unwrap());
        assert!(!repo.delete(alice.id).await.unwrap());
        assert!(repo.get_by_id(alice.id).await.unwrap().is_none());
    }
}
