use async_trait::async_trait;
use rusqlite::types::Value;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::warn;

use crate::database::Database;
use crate::error::AppError;
use crate::filtering::PredicateList;

/// A persistent record with a database-assigned id.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Name used in "not found" errors.
    const NAME: &'static str;
    const TABLE: &'static str;

    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);
}

/// An in-place edit applied by [`Repository::modify`].
pub type Change<T> = Box<dyn FnOnce(&mut T) -> Result<(), AppError> + Send>;

/// Equality terms on top-level document fields, evaluated by SQLite.
///
/// The expressions match the indexes in `002_document_keys.sql`.
#[derive(Debug, Clone, Default)]
pub struct Key {
    terms: Vec<(String, Value)>,
}

impl Key {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &'static str, value: impl Into<Value>) -> Self {
        self.terms
            .push((format!("json_extract(data, '$.{}') = ?", field), value.into()));
        self
    }

    /// ASCII case-insensitive text match.
    pub fn eq_nocase(mut self, field: &'static str, value: &str) -> Self {
        self.terms.push((
            format!("lower(json_extract(data, '$.{}')) = lower(?)", field),
            Value::Text(value.to_string()),
        ));
        self
    }

    fn where_clause(&self) -> String {
        if self.terms.is_empty() {
            return "1 = 1".to_string();
        }
        self.terms
            .iter()
            .map(|(sql, _)| sql.as_str())
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    fn values(&self) -> Vec<Value> {
        self.terms.iter().map(|(_, value)| value.clone()).collect()
    }
}

#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Stores a new entity and returns it with its assigned id.
    /// A duplicate natural key is a `Conflict`.
    async fn insert(&self, entity: T) -> Result<T, AppError>;

    /// Reads, changes and writes back one entity under a single connection
    /// lock, so concurrent changes to other fields are not lost.
    async fn modify(&self, id: i64, change: Change<T>) -> Result<T, AppError>;

    /// Returns false when nothing was deleted.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Deletes every entity matching `key`; returns their ids.
    async fn delete_by_key(&self, key: &Key) -> Result<Vec<i64>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<T>, AppError>;

    /// Every entity matching `key`, in id order.
    async fn find_by_key(&self, key: &Key) -> Result<Vec<T>, AppError>;

    /// Every entity matching all predicates, in id order.
    async fn find_where(&self, filter: &PredicateList<T>) -> Result<Vec<T>, AppError>;

    async fn get(&self, id: i64) -> Result<T, AppError> {
        self.find_by_id(id)
            .await?
            .ok_or(AppError::NotFound { entity: T::NAME, id })
    }

    async fn exists(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.find_by_id(id).await?.is_some())
    }
}

/// Stores each entity as a JSON document in `T::TABLE`.
pub struct SqliteRepository<T> {
    db: Arc<Database>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> SqliteRepository<T> {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }
}

fn decode<T: Entity>(id: i64, data: &str) -> Result<T, AppError> {
    let mut entity: T = serde_json::from_str(data)?;
    entity.set_id(id);
    Ok(entity)
}

/// Maps unique index violations to `Conflict`.
fn write_error<T: Entity>(e: rusqlite::Error) -> AppError {
    match e {
        rusqlite::Error::SqliteFailure(ref failure, _)
            if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            AppError::Conflict(format!("{} with the same key already exists", T::NAME))
        }
        e => AppError::Database(e),
    }
}

fn write<T: Entity>(conn: &rusqlite::Connection, id: i64, data: &str) -> Result<usize, AppError> {
    conn.execute(
        &format!(
            "UPDATE {} SET data = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
            T::TABLE
        ),
        rusqlite::params![data, id],
    )
    .map_err(write_error::<T>)
}

#[async_trait]
impl<T: Entity> Repository<T> for SqliteRepository<T> {
    async fn insert(&self, mut entity: T) -> Result<T, AppError> {
        let db = self.db.clone();
        let data = serde_json::to_string(&entity)?;

        let id = tokio::task::spawn_blocking(move || -> Result<i64, AppError> {
            let conn = db.connection()?;

            conn.execute(
                &format!("INSERT INTO {} (data) VALUES (?1)", T::TABLE),
                rusqlite::params![&data],
            )
            .map_err(write_error::<T>)?;

            Ok(conn.last_insert_rowid())
        })
        .await??;

        entity.set_id(id);
        Ok(entity)
    }

    async fn modify(&self, id: i64, change: Change<T>) -> Result<T, AppError> {
        let db = self.db.clone();

        tokio::task::spawn_blocking(move || -> Result<T, AppError> {
            use rusqlite::OptionalExtension;

            let conn = db.connection()?;

            let data: Option<String> = conn
                .query_row(
                    &format!("SELECT data FROM {} WHERE id = ?1", T::TABLE),
                    [id],
                    |row| row.get(0),
                )
                .optional()?;
            let Some(data) = data else {
                return Err(AppError::NotFound { entity: T::NAME, id });
            };

            let mut entity: T = decode(id, &data)?;
            change(&mut entity)?;
            write::<T>(&conn, id, &serde_json::to_string(&entity)?)?;

            Ok(entity)
        })
        .await?
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let db = self.db.clone();

        tokio::task::spawn_blocking(move || -> Result<bool, AppError> {
            let conn = db.connection()?;

            let deleted = conn.execute(
                &format!("DELETE FROM {} WHERE id = ?1", T::TABLE),
                rusqlite::params![id],
            )?;

            Ok(deleted > 0)
        })
        .await?
    }

    async fn delete_by_key(&self, key: &Key) -> Result<Vec<i64>, AppError> {
        let db = self.db.clone();
        let sql = format!(
            "DELETE FROM {} WHERE {} RETURNING id",
            T::TABLE,
            key.where_clause()
        );
        let values = key.values();

        tokio::task::spawn_blocking(move || -> Result<Vec<i64>, AppError> {
            let conn = db.connection()?;

            let mut stmt = conn.prepare(&sql)?;
            let mut ids = stmt
                .query_map(rusqlite::params_from_iter(values), |row| row.get(0))?
                .collect::<Result<Vec<i64>, _>>()?;
            ids.sort_unstable();

            Ok(ids)
        })
        .await?
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<T>, AppError> {
        let db = self.db.clone();

        tokio::task::spawn_blocking(move || -> Result<Option<T>, AppError> {
            use rusqlite::OptionalExtension;

            let conn = db.connection()?;

            let mut stmt = conn.prepare(&format!("SELECT data FROM {} WHERE id = ?1", T::TABLE))?;
            let data: Option<String> = stmt.query_row([id], |row| row.get(0)).optional()?;

            data.map(|data| decode(id, &data)).transpose()
        })
        .await?
    }

    async fn find_by_key(&self, key: &Key) -> Result<Vec<T>, AppError> {
        let db = self.db.clone();
        let sql = format!(
            "SELECT id, data FROM {} WHERE {} ORDER BY id",
            T::TABLE,
            key.where_clause()
        );
        let values = key.values();

        tokio::task::spawn_blocking(move || -> Result<Vec<T>, AppError> {
            let conn = db.connection()?;

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(rusqlite::params_from_iter(values), |row| {
                    Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
                })?
                .collect::<Result<Vec<_>, _>>()?;

            rows.iter().map(|(id, data)| decode(*id, data)).collect()
        })
        .await?
    }

    async fn find_where(&self, filter: &PredicateList<T>) -> Result<Vec<T>, AppError> {
        let db = self.db.clone();

        let rows = tokio::task::spawn_blocking(move || -> Result<Vec<(i64, String)>, AppError> {
            let conn = db.connection()?;

            let mut stmt = conn.prepare(&format!("SELECT id, data FROM {} ORDER BY id", T::TABLE))?;
            let rows = stmt
                .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(rows)
        })
        .await??;

        let mut matching = Vec::new();
        for (id, data) in rows {
            let entity: T = match decode(id, &data) {
                Ok(entity) => entity,
                Err(e) => {
                    warn!("Skipping unreadable {} {}: {}", T::NAME, id, e);
                    continue;
                }
            };
            if filter.matches(&entity) {
                matching.push(entity);
            }
        }
        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        #[serde(default)]
        id: i64,
        text: String,
        stars: i32,
    }

    impl Entity for Note {
        const NAME: &'static str = "Note";
        const TABLE: &'static str = "audit_log";

        fn id(&self) -> i64 {
            self.id
        }

        fn set_id(&mut self, id: i64) {
            self.id = id;
        }
    }

    fn note(text: &str, stars: i32) -> Note {
        Note {
            id: 0,
            text: text.to_string(),
            stars,
        }
    }

    async fn repository() -> SqliteRepository<Note> {
        let db = Database::new(":memory:").await.unwrap();
        db.migrate().await.unwrap();
        SqliteRepository::new(Arc::new(db))
    }

    #[tokio::test]
    async fn test_insert_assigns_ids() {
        let repo = repository().await;

        let first = repo.insert(note("first", 1)).await.unwrap();
        let second = repo.insert(note("second", 2)).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(repo.get(2).await.unwrap(), second);
    }

    #[tokio::test]
    async fn test_modify_and_delete() {
        let repo = repository().await;
        let stored = repo.insert(note("draft", 1)).await.unwrap();

        let changed = repo
            .modify(
                stored.id,
                Box::new(|n: &mut Note| {
                    n.text = "final".to_string();
                    Ok(())
                }),
            )
            .await
            .unwrap();
        assert_eq!(changed.text, "final");
        assert_eq!(repo.get(stored.id).await.unwrap(), changed);

        assert!(repo.delete(stored.id).await.unwrap());
        assert!(!repo.delete(stored.id).await.unwrap());
        assert!(!repo.exists(stored.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_entities() {
        let repo = repository().await;

        assert!(repo.find_by_id(42).await.unwrap().is_none());
        let err = repo.get(42).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { entity: "Note", id: 42 }));

    }

    #[tokio::test]
    async fn test_find_and_delete_by_key() {
        let repo = repository().await;
        for (text, stars) in [("Pils", 3), ("porter", 5), ("pils", 5)] {
            repo.insert(note(text, stars)).await.unwrap();
        }

        let found = repo
            .find_by_key(&Key::new().eq_nocase("text", "PILS").eq("stars", 5))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 3);

        let deleted = repo.delete_by_key(&Key::new().eq("stars", 5)).await.unwrap();
        assert_eq!(deleted, vec![2, 3]);
        assert!(repo.delete_by_key(&Key::new().eq("stars", 5)).await.unwrap().is_empty());
        assert_eq!(repo.find_by_key(&Key::new()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_modify_keeps_concurrent_changes() {
        let repo = Arc::new(repository().await);
        let id = repo.insert(note("draft", 0)).await.unwrap().id;

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let repo = repo.clone();
            tasks.push(tokio::spawn(async move {
                repo.modify(
                    id,
                    Box::new(|n: &mut Note| {
                        n.stars += 1;
                        Ok(())
                    }),
                )
                .await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(repo.get(id).await.unwrap().stars, 8);
    }

    #[tokio::test]
    async fn test_failed_change_is_not_written() {
        let repo = repository().await;
        let stored = repo.insert(note("draft", 1)).await.unwrap();

        let err = repo
            .modify(
                stored.id,
                Box::new(|n: &mut Note| {
                    n.stars = 99;
                    Err(AppError::Conflict("no".into()))
                }),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(repo.get(stored.id).await.unwrap().stars, 1);
        assert!(matches!(
            repo.modify(42, Box::new(|_: &mut Note| Ok(()))).await.unwrap_err(),
            AppError::NotFound { id: 42, .. }
        ));
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Label {
        #[serde(default)]
        id: i64,
        name: String,
    }
    crate::entity!(Label, "Label", "beer_styles");

    #[tokio::test]
    async fn test_duplicate_key_is_a_conflict() {
        let db = Arc::new(Database::new(":memory:").await.unwrap());
        db.migrate().await.unwrap();
        let repo: SqliteRepository<Label> = SqliteRepository::new(db);

        let first = repo
            .insert(Label { id: 0, name: "Porter".into() })
            .await
            .unwrap();
        let second = repo
            .insert(Label { id: 0, name: "Stout".into() })
            .await
            .unwrap();

        let err = repo
            .insert(Label { id: 0, name: "porter".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let rename = repo.modify(
            second.id,
            Box::new(|label: &mut Label| {
                label.name = "PORTER".into();
                Ok(())
            }),
        );
        assert!(matches!(rename.await.unwrap_err(), AppError::Conflict(_)));
        assert_eq!(repo.get(second.id).await.unwrap().name, "Stout");
        assert_eq!(repo.get(first.id).await.unwrap().name, "Porter");
    }

    #[tokio::test]
    async fn test_unreadable_rows_are_skipped_in_lists() {
        let repo = repository().await;
        repo.insert(note("pils", 3)).await.unwrap();
        repo.db
            .connection()
            .unwrap()
            .execute("INSERT INTO audit_log (data) VALUES ('not json')", [])
            .unwrap();

        let found = repo.find_where(&PredicateList::new()).await.unwrap();

        assert_eq!(found.len(), 1);
        assert!(repo.find_by_id(2).await.is_err());
    }

    #[tokio::test]
    async fn test_find_where_applies_every_predicate() {
        let repo = repository().await;
        for (text, stars) in [("pils", 3), ("porter", 5), ("stout", 4), ("ipa", 5)] {
            repo.insert(note(text, stars)).await.unwrap();
        }

        let filter = PredicateList::new()
            .when(Some(4), |n: &Note, min: &i32| n.stars >= *min)
            .push(|n: &Note| n.text.len() > 3);
        let found = repo.find_where(&filter).await.unwrap();

        let texts: Vec<&str> = found.iter().map(|n| n.text.as_str()).collect();
        assert_eq!(texts, vec!["porter", "stout"]);
    }
}

/// Implements [`Entity`] for a struct with an `id: i64` field.
#[macro_export]
macro_rules! entity {
    ($entity:ty, $name:literal, $table:literal) => {
        impl $crate::store::Entity for $entity {
            const NAME: &'static str = $name;
            const TABLE: &'static str = $table;

            fn id(&self) -> i64 {
                self.id
            }

            fn set_id(&mut self, id: i64) {
                self.id = id;
            }
        }
    };
}
