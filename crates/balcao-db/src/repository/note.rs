//! # Note Repository
//!
//! ## Timestamps
//! ```text
//! insert(note)   created_at ← now (if unset)   modified_at ← now
//! update(note)   created_at   unchanged        modified_at ← now
//! ```
//! Both stamps come from [`balcao_core::clock::utc_now`] at the moment the
//! repository writes the row.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use balcao_core::clock;
use balcao_core::Note;

/// Repository for note database operations.
#[derive(Debug, Clone)]
pub struct NoteRepository {
    pool: SqlitePool,
}

impl NoteRepository {
    /// Creates a new NoteRepository.
    pub fn new(pool: SqlitePool) -> Self {
        NoteRepository { pool }
    }

    /// Inserts a note and returns it with both timestamps set.
    pub async fn insert(&self, mut note: Note) -> DbResult<Note> {
        note.validate()?;
        note.stamp_inserted(clock::utc_now());

        debug!(id = %note.id, title = %note.title, "Inserting note");

        sqlx::query(
            r#"
            INSERT INTO notes (id, title, content, created_at, modified_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&note.id)
        .bind(&note.title)
        .bind(&note.content)
        .bind(note.created_at)
        .bind(note.modified_at)
        .execute(&self.pool)
        .await?;

        Ok(note)
    }

    /// Gets a note by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Note>> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, title, content, created_at, modified_at
            FROM notes
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(note)
    }

    /// Lists notes, most recently modified first.
    pub async fn list(&self) -> DbResult<Vec<Note>> {
        let notes = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, title, content, created_at, modified_at
            FROM notes
            ORDER BY modified_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(notes)
    }

    /// Writes title and content and refreshes modified-at.
    ///
    /// created_at is never rewritten; the stored value wins over whatever the
    /// caller passes. Read and write share one transaction.
    pub async fn update(&self, mut note: Note) -> DbResult<Note> {
        note.validate()?;

        let mut tx = self.pool.begin().await?;

        let stored = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, title, content, created_at, modified_at
            FROM notes
            WHERE id = ?1
            "#,
        )
        .bind(&note.id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Note", &note.id))?;
        note.created_at = stored.created_at;
        note.touch(clock::utc_now());

        debug!(id = %note.id, "Updating note");

        sqlx::query(
            r#"
            UPDATE notes SET
                title = ?2,
                content = ?3,
                modified_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(&note.id)
        .bind(&note.title)
        .bind(&note.content)
        .bind(note.modified_at)
        .execute(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(note)
    }

    /// Deletes a note.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting note");

        let result = sqlx::query("DELETE FROM notes WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Note", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use std::time::Duration;

    async fn repo() -> NoteRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().notes()
    }

    #[tokio::test]
    async fn test_insert_stamps_equal_timestamps() {
        let repo = repo().await;
        let note = Note::new("Fornecedores", "ligar para o atacado às 9h").unwrap();

        let stored = repo.insert(note).await.unwrap();
        assert!(stored.created_at.is_some());
        assert_eq!(stored.modified_at, stored.created_at);

        let fetched = repo.get_by_id(&stored.id).await.unwrap().unwrap();
        assert_eq!(fetched, stored);

        let value = serde_json::to_value(&fetched).unwrap();
        assert!(value["created_at"].is_string());
        assert_eq!(value["created_at"], value["modified_at"]);
    }

    #[tokio::test]
    async fn test_update_advances_modified_at_only() {
        let repo = repo().await;
        let stored = repo
            .insert(Note::new("Fornecedores", "ligar para o atacado").unwrap())
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(20)).await;

        let mut edited = stored.clone();
        edited.content = "ligar para o atacado e para a padaria".to_string();
        let updated = repo.update(edited).await.unwrap();

        assert_eq!(updated.created_at, stored.created_at);
        assert!(updated.modified_at > stored.modified_at);

        let fetched = repo.get_by_id(&stored.id).await.unwrap().unwrap();
        assert_eq!(fetched.content, "ligar para o atacado e para a padaria");
        assert_eq!(fetched.modified_at, updated.modified_at);
        assert_eq!(fetched.created_at, stored.created_at);
    }

    #[tokio::test]
    async fn test_update_ignores_caller_created_at() {
        let repo = repo().await;
        let stored = repo
            .insert(Note::new("Caixa", "conferir troco").unwrap())
            .await
            .unwrap();

        let mut edited = stored.clone();
        edited.created_at = None;
        let updated = repo.update(edited).await.unwrap();

        assert_eq!(updated.created_at, stored.created_at);
    }

    #[tokio::test]
    async fn test_padded_title_at_limit_inserts() {
        let repo = repo().await;
        let note = Note::new(format!("{}   ", "T".repeat(200)), "conferir troco").unwrap();

        let stored = repo.insert(note).await.unwrap();
        let fetched = repo.get_by_id(&stored.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "T".repeat(200));
    }

    #[tokio::test]
    async fn test_update_rejects_padded_title_over_limit() {
        let repo = repo().await;
        let stored = repo
            .insert(Note::new("Caixa", "conferir troco").unwrap())
            .await
            .unwrap();

        let mut edited = stored.clone();
        edited.title = format!("{} ", "T".repeat(200));
        assert!(matches!(repo.update(edited).await, Err(DbError::Domain(_))));
        assert_eq!(repo.get_by_id(&stored.id).await.unwrap().unwrap().title, "Caixa");
    }

    #[tokio::test]
    async fn test_update_missing_note() {
        let repo = repo().await;
        let note = Note::new("Caixa", "conferir troco").unwrap();

        assert!(matches!(
            repo.update(note).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_most_recent_first() {
        let repo = repo().await;
        let first = repo.insert(Note::new("Primeira", "a").unwrap()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = repo.insert(Note::new("Segunda", "b").unwrap()).await.unwrap();

        let ids: Vec<String> = repo.list().await.unwrap().into_iter().map(|n| n.id).collect();
        assert_eq!(ids, [second.id.clone(), first.id.clone()]);

        repo.delete(&second.id).await.unwrap();
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }
}
