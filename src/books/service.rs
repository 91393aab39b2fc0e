use std::sync::Arc;

use validator::Validate;

use super::models::{Book, BookDraft, BookRequest};
use super::store::BookStore;
use crate::error::{AppError, AppResult, StoreError};
use crate::gateway::types::MessageResponse;
use crate::user_auth::policy::{authorize_mutation, owner_for_new_resource};
use crate::user_auth::token::Identity;

pub struct BookService {
    store: Arc<dyn BookStore>,
}

impl BookService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    /// All books, optionally filtered by a case-insensitive search text.
    pub async fn list(&self, query: Option<&str>) -> AppResult<Vec<Book>> {
        let books = self.store.list().await?;
        Ok(match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(needle) => books.into_iter().filter(|b| b.matches(needle)).collect(),
            None => books,
        })
    }

    pub async fn get(&self, book_id: i64) -> AppResult<Book> {
        self.store
            .find_by_id(book_id)
            .await?
            .ok_or(AppError::NotFound("Book"))
    }

    /// Books owned by the caller
    pub async fn mine(&self, identity: &Identity) -> AppResult<Vec<Book>> {
        Ok(self.store.list_by_author(identity.user_id).await?)
    }

    /// Create a book owned by the caller. Any `id`/`authorId` in the payload is ignored.
    pub async fn create(&self, identity: &Identity, req: BookRequest) -> AppResult<Book> {
        let req = req.normalized();
        req.validate()?;
        let draft = BookDraft::from_request(req, owner_for_new_resource(identity));
        let book = self.store.create(draft).await?;
        tracing::info!(book_id = book.id, user_id = identity.user_id, "book created");
        Ok(book)
    }

    /// Check order: payload id mismatch, existence, then ownership.
    pub async fn update(
        &self,
        identity: &Identity,
        book_id: i64,
        req: BookRequest,
    ) -> AppResult<MessageResponse> {
        let req = req.normalized();
        req.validate()?;
        if req.id.is_some_and(|id| id != book_id) {
            return Err(AppError::validation("Book ID mismatch"));
        }

        let existing = self.get(book_id).await?;
        authorize_mutation(identity, existing.author_id, book_id)?;

        // Ownership never moves through an update
        let draft = BookDraft::from_request(req, existing.author_id);
        self.store
            .update(book_id, draft)
            .await
            .map_err(not_found_as_book)?;
        tracing::info!(book_id, user_id = identity.user_id, "book updated");
        Ok(MessageResponse::new("Book updated successfully."))
    }

    pub async fn delete(&self, identity: &Identity, book_id: i64) -> AppResult<MessageResponse> {
        let existing = self.get(book_id).await?;
        authorize_mutation(identity, existing.author_id, book_id)?;

        self.store
            .delete(book_id)
            .await
            .map_err(not_found_as_book)?;
        tracing::info!(book_id, user_id = identity.user_id, "book deleted");
        Ok(MessageResponse::new("Book deleted successfully."))
    }
}

// A concurrent delete between the lookup and the write
fn not_found_as_book(err: StoreError) -> AppError {
    match err {
        StoreError::NotFound => AppError::NotFound("Book"),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::books::store::MemoryBookStore;
    use crate::user_auth::models::Role;
    use rust_decimal::Decimal;

    fn identity(user_id: i64, role: Role) -> Identity {
        Identity {
            user_id,
            name: format!("u{user_id}"),
            email: format!("u{user_id}@x.com"),
            role,
        }
    }

    fn request(name: &str) -> BookRequest {
        BookRequest {
            id: None,
            name: name.to_string(),
            category: "Fiction".into(),
            price: Decimal::new(500, 2),
            description: None,
            author_id: None,
            image_url: None,
            book_url: None,
        }
    }

    fn service() -> BookService {
        BookService::new(Arc::new(MemoryBookStore::new()))
    }

    #[tokio::test]
    async fn test_create_forces_owner() {
        let svc = service();
        let spoofed = BookRequest {
            id: Some(77),
            author_id: Some(999),
            ..request("Mine")
        };
        let book = svc.create(&identity(3, Role::User), spoofed).await.unwrap();
        assert_eq!(book.author_id, 3);
        assert_eq!(book.id, 1);
    }

    #[tokio::test]
    async fn test_update_ownership_matrix() {
        let svc = service();
        let owner = identity(1, Role::User);
        let other = identity(2, Role::User);
        let admin = identity(3, Role::Admin);
        let book = svc.create(&owner, request("B")).await.unwrap();

        let err = svc
            .update(&other, book.id, request("hijack"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
        assert_eq!(svc.get(book.id).await.unwrap().name, "B");

        let ok = svc.update(&admin, book.id, request("by admin")).await.unwrap();
        assert_eq!(ok.message, "Book updated successfully.");
        // Admin edits keep the original owner
        assert_eq!(svc.get(book.id).await.unwrap().author_id, 1);

        svc.update(&owner, book.id, request("by owner")).await.unwrap();
        assert_eq!(svc.get(book.id).await.unwrap().name, "by owner");
    }

    #[tokio::test]
    async fn test_update_check_order() {
        let svc = service();
        let owner = identity(1, Role::User);
        let other = identity(2, Role::User);
        let book = svc.create(&owner, request("B")).await.unwrap();

        let mismatch = BookRequest {
            id: Some(book.id + 1),
            ..request("B")
        };
        assert!(matches!(
            svc.update(&other, book.id, mismatch).await,
            Err(AppError::Validation(_))
        ));

        // Unknown id reports NotFound even to a non-owner
        assert!(matches!(
            svc.update(&other, 404, request("x")).await,
            Err(AppError::NotFound("Book"))
        ));

        let matching = BookRequest {
            id: Some(book.id),
            ..request("same id")
        };
        assert!(svc.update(&owner, book.id, matching).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_ownership() {
        let svc = service();
        let owner = identity(1, Role::User);
        let book = svc.create(&owner, request("B")).await.unwrap();

        assert!(matches!(
            svc.delete(&identity(2, Role::User), book.id).await,
            Err(AppError::Forbidden)
        ));
        assert!(matches!(
            svc.delete(&owner, 999).await,
            Err(AppError::NotFound("Book"))
        ));
        let ok = svc.delete(&identity(9, Role::Admin), book.id).await.unwrap();
        assert_eq!(ok.message, "Book deleted successfully.");
        assert!(matches!(
            svc.get(book.id).await,
            Err(AppError::NotFound("Book"))
        ));
    }

    #[tokio::test]
    async fn test_list_search_and_mine() {
        let svc = service();
        let a = identity(1, Role::User);
        let b = identity(2, Role::User);
        svc.create(&a, request("Dune")).await.unwrap();
        svc.create(&b, request("Emma")).await.unwrap();
        svc.create(&a, request("Dracula")).await.unwrap();

        assert_eq!(svc.list(None).await.unwrap().len(), 3);
        assert_eq!(svc.list(Some("  ")).await.unwrap().len(), 3);
        let hits = svc.list(Some("DU")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Dune");

        let mine: Vec<String> = svc
            .mine(&a)
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(mine, vec!["Dune", "Dracula"]);
    }

    #[tokio::test]
    async fn test_invalid_payload_rejected() {
        let svc = service();
        let bad = BookRequest {
            price: Decimal::new(-1, 0),
            ..request("B")
        };
        assert!(matches!(
            svc.create(&identity(1, Role::User), bad).await,
            Err(AppError::Validation(_))
        ));

        let blank = request("   ");
        assert!(matches!(
            svc.create(&identity(1, Role::User), blank).await,
            Err(AppError::Validation(_))
        ));

        let oversized = BookRequest {
            price: Decimal::new(10_000_000_000, 0),
            ..request("B")
        };
        assert!(matches!(
            svc.create(&identity(1, Role::User), oversized).await,
            Err(AppError::Validation(_))
        ));
        assert!(svc.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_stores_trimmed_fields() {
        let svc = service();
        let owner = identity(1, Role::User);
        let book = svc.create(&owner, request(" Dune ")).await.unwrap();
        assert_eq!(book.name, "Dune");

        let blank = request(" ");
        assert!(matches!(
            svc.update(&owner, book.id, blank).await,
            Err(AppError::Validation(_))
        ));
        assert_eq!(svc.get(book.id).await.unwrap().name, "Dune");
    }
}
