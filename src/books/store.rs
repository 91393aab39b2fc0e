//! Book catalog store

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::models::{Book, BookDraft};
use crate::error::StoreError;

#[async_trait]
pub trait BookStore: Send + Sync {
    /// All books, ascending id
    async fn list(&self) -> Result<Vec<Book>, StoreError>;

    async fn find_by_id(&self, book_id: i64) -> Result<Option<Book>, StoreError>;

    async fn list_by_author(&self, author_id: i64) -> Result<Vec<Book>, StoreError>;

    async fn create(&self, draft: BookDraft) -> Result<Book, StoreError>;

    /// Overwrite all stored fields. `NotFound` if the id is unknown.
    async fn update(&self, book_id: i64, draft: BookDraft) -> Result<Book, StoreError>;

    /// `NotFound` if the id is unknown.
    async fn delete(&self, book_id: i64) -> Result<(), StoreError>;
}

#[derive(Default)]
struct BookTable {
    next_id: i64,
    books: BTreeMap<i64, Book>,
}

/// Process-local catalog
#[derive(Default)]
pub struct MemoryBookStore {
    inner: RwLock<BookTable>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        Ok(self.inner.read().await.books.values().cloned().collect())
    }

    async fn find_by_id(&self, book_id: i64) -> Result<Option<Book>, StoreError> {
        Ok(self.inner.read().await.books.get(&book_id).cloned())
    }

    async fn list_by_author(&self, author_id: i64) -> Result<Vec<Book>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .books
            .values()
            .filter(|b| b.author_id == author_id)
            .cloned()
            .collect())
    }

    async fn create(&self, draft: BookDraft) -> Result<Book, StoreError> {
        let mut table = self.inner.write().await;
        table.next_id += 1;
        let book = Book {
            id: table.next_id,
            name: draft.name,
            category: draft.category,
            price: draft.price,
            description: draft.description,
            author_id: draft.author_id,
            image_url: draft.image_url,
            book_url: draft.book_url,
            created_at: Utc::now(),
        };
        table.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn update(&self, book_id: i64, draft: BookDraft) -> Result<Book, StoreError> {
        let mut table = self.inner.write().await;
        let book = table.books.get_mut(&book_id).ok_or(StoreError::NotFound)?;
        book.name = draft.name;
        book.category = draft.category;
        book.price = draft.price;
        book.description = draft.description;
        book.author_id = draft.author_id;
        book.image_url = draft.image_url;
        book.book_url = draft.book_url;
        Ok(book.clone())
    }

    async fn delete(&self, book_id: i64) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .books
            .remove(&book_id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn draft(name: &str, author_id: i64) -> BookDraft {
        BookDraft {
            name: name.to_string(),
            category: "Fiction".to_string(),
            price: Decimal::new(1250, 2),
            description: None,
            author_id,
            image_url: None,
            book_url: None,
        }
    }

    #[tokio::test]
    async fn test_crud_cycle() {
        let store = MemoryBookStore::new();
        let a = store.create(draft("A", 1)).await.unwrap();
        let b = store.create(draft("B", 2)).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(store.list().await.unwrap().len(), 2);

        let updated = store.update(a.id, draft("A2", 1)).await.unwrap();
        assert_eq!(updated.name, "A2");
        assert_eq!(updated.created_at, a.created_at);

        store.delete(b.id).await.unwrap();
        assert!(store.find_by_id(b.id).await.unwrap().is_none());
        assert_eq!(store.list().await.unwrap(), vec![updated]);
    }

    #[tokio::test]
    async fn test_missing_ids() {
        let store = MemoryBookStore::new();
        assert!(matches!(
            store.update(9, draft("X", 1)).await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(store.delete(9).await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_list_by_author() {
        let store = MemoryBookStore::new();
        store.create(draft("A", 1)).await.unwrap();
        store.create(draft("B", 2)).await.unwrap();
        store.create(draft("C", 1)).await.unwrap();

        let names: Vec<String> = store
            .list_by_author(1)
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, vec!["A", "C"]);
    }
}
