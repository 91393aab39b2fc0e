//! PostgreSQL book catalog

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::time::Duration;

use super::models::{Book, BookDraft};
use super::store::BookStore;
use crate::db::{Database, bounded};
use crate::error::StoreError;

const BOOK_COLUMNS: &str =
    "book_id, name, category, price, description, author_id, image_url, book_url, created_at";

pub struct PgBookRepository {
    pool: PgPool,
    timeout: Duration,
}

impl PgBookRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
            timeout: db.query_timeout(),
        }
    }

    fn row_to_book(row: &PgRow) -> Result<Book, StoreError> {
        Ok(Book {
            id: row.try_get("book_id")?,
            name: row.try_get("name")?,
            category: row.try_get("category")?,
            price: row.try_get("price")?,
            description: row.try_get("description")?,
            author_id: row.try_get("author_id")?,
            image_url: row.try_get("image_url")?,
            book_url: row.try_get("book_url")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl BookStore for PgBookRepository {
    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        bounded(self.timeout, async {
            let rows = sqlx::query(&format!(
                "SELECT {} FROM books_tb ORDER BY book_id",
                BOOK_COLUMNS
            ))
            .fetch_all(&self.pool)
            .await?;
            rows.iter().map(Self::row_to_book).collect()
        })
        .await
    }

    async fn find_by_id(&self, book_id: i64) -> Result<Option<Book>, StoreError> {
        bounded(self.timeout, async {
            let row = sqlx::query(&format!(
                "SELECT {} FROM books_tb WHERE book_id = $1",
                BOOK_COLUMNS
            ))
            .bind(book_id)
            .fetch_optional(&self.pool)
            .await?;
            row.as_ref().map(Self::row_to_book).transpose()
        })
        .await
    }

    async fn list_by_author(&self, author_id: i64) -> Result<Vec<Book>, StoreError> {
        bounded(self.timeout, async {
            let rows = sqlx::query(&format!(
                "SELECT {} FROM books_tb WHERE author_id = $1 ORDER BY book_id",
                BOOK_COLUMNS
            ))
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;
            rows.iter().map(Self::row_to_book).collect()
        })
        .await
    }

    async fn create(&self, draft: BookDraft) -> Result<Book, StoreError> {
        bounded(self.timeout, async {
            let row = sqlx::query(&format!(
                r#"INSERT INTO books_tb
                   (name, category, price, description, author_id, image_url, book_url)
                   VALUES ($1, $2, $3, $4, $5, $6, $7)
                   RETURNING {}"#,
                BOOK_COLUMNS
            ))
            .bind(&draft.name)
            .bind(&draft.category)
            .bind(draft.price)
            .bind(&draft.description)
            .bind(draft.author_id)
            .bind(&draft.image_url)
            .bind(&draft.book_url)
            .fetch_one(&self.pool)
            .await?;
            Self::row_to_book(&row)
        })
        .await
    }

    async fn update(&self, book_id: i64, draft: BookDraft) -> Result<Book, StoreError> {
        bounded(self.timeout, async {
            let row = sqlx::query(&format!(
                r#"UPDATE books_tb
                   SET name = $2, category = $3, price = $4, description = $5,
                       author_id = $6, image_url = $7, book_url = $8
                   WHERE book_id = $1
                   RETURNING {}"#,
                BOOK_COLUMNS
            ))
            .bind(book_id)
            .bind(&draft.name)
            .bind(&draft.category)
            .bind(draft.price)
            .bind(&draft.description)
            .bind(draft.author_id)
            .bind(&draft.image_url)
            .bind(&draft.book_url)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;
            Self::row_to_book(&row)
        })
        .await
    }

    async fn delete(&self, book_id: i64) -> Result<(), StoreError> {
        bounded(self.timeout, async {
            let result = sqlx::query("DELETE FROM books_tb WHERE book_id = $1")
                .bind(book_id)
                .execute(&self.pool)
                .await?;
            if result.rows_affected() == 0 {
                return Err(StoreError::NotFound);
            }
            Ok(())
        })
        .await
    }
}
