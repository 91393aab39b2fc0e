use once_cell::sync::Lazy;
use std::sync::Arc;
use validator::Validate;

use super::models::{
    AuthResponse, LoginRequest, NewUser, PurchaseOutcome, RegisterRequest, Role, normalize_email,
};
use super::password;
use super::store::UserStore;
use super::token::{Identity, TokenIssuer, TokenVerifier};
use crate::books::store::BookStore;
use crate::error::{AppError, AppResult, StoreError};
use crate::gateway::types::MessageResponse;

/// Digest checked when the email is unknown, so both login failures run PBKDF2.
static DUMMY_DIGEST: Lazy<String> = Lazy::new(|| password::hash("bookerx-dummy-password"));

pub struct UserAuthService {
    users: Arc<dyn UserStore>,
    books: Arc<dyn BookStore>,
    issuer: TokenIssuer,
    verifier: Arc<TokenVerifier>,
}

impl UserAuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        books: Arc<dyn BookStore>,
        issuer: TokenIssuer,
        verifier: Arc<TokenVerifier>,
    ) -> Self {
        // Build the dummy digest now, not on the first unknown-email login
        Lazy::force(&DUMMY_DIGEST);
        Self {
            users,
            books,
            issuer,
            verifier,
        }
    }

    pub fn users(&self) -> &Arc<dyn UserStore> {
        &self.users
    }

    /// Register a new user with role `User`
    pub async fn register(&self, req: RegisterRequest) -> AppResult<MessageResponse> {
        let req = req.normalized();
        req.validate()?;
        let email = req.email;

        if self.users.exists_by_email(&email).await? {
            return Err(AppError::DuplicateEmail);
        }

        // PBKDF2 is CPU-bound; keep it off the async workers
        let password = req.password;
        let password_digest = tokio::task::spawn_blocking(move || password::hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("hash task failed: {}", e)))?;

        // The store's uniqueness constraint settles a race the pre-check missed
        let user = self
            .users
            .create(NewUser {
                name: req.name,
                email,
                password_digest,
                role: Role::User,
            })
            .await?;

        tracing::info!(user_id = user.user_id, "user registered");
        Ok(MessageResponse::new("User registered successfully."))
    }

    /// Login and issue a bearer token.
    ///
    /// Unknown email and wrong password return the same error after the same work.
    pub async fn login(&self, req: LoginRequest) -> AppResult<AuthResponse> {
        req.validate()?;
        let email = normalize_email(&req.email);
        let user = self.users.find_by_email(&email).await?;

        let digest = user.as_ref().map(|u| u.password_digest.clone());
        let password = req.password;
        let matched = tokio::task::spawn_blocking(move || {
            password::verify(&password, digest.as_deref().unwrap_or(DUMMY_DIGEST.as_str()))
        })
        .await
        .map_err(|e| AppError::Internal(format!("verify task failed: {}", e)))?;

        let user = match user {
            Some(user) if matched => user,
            _ => {
                tracing::warn!("login failed");
                return Err(AppError::InvalidCredentials);
            }
        };

        let token = self
            .issuer
            .issue(&user)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        tracing::info!(user_id = user.user_id, "login succeeded");
        Ok(AuthResponse {
            token,
            name: user.name,
            email: user.email,
        })
    }

    /// Verify a bearer token. Every failure collapses to `Unauthenticated`.
    pub fn verify_token(&self, token: &str) -> AppResult<Identity> {
        self.verifier.verify(token).map_err(|e| {
            tracing::warn!(reason = %e, "token rejected");
            AppError::Unauthenticated
        })
    }

    /// Record a purchase for the caller. Buying twice is a no-op.
    pub async fn purchase(&self, identity: &Identity, book_id: i64) -> AppResult<MessageResponse> {
        if self.books.find_by_id(book_id).await?.is_none() {
            return Err(AppError::NotFound("Book"));
        }

        let outcome = self
            .users
            .append_purchase(identity.user_id, book_id)
            .await
            .map_err(|e| match e {
                // Token outlived its account
                StoreError::NotFound => AppError::Unauthenticated,
                other => other.into(),
            })?;

        if let PurchaseOutcome::Appended(_) = outcome {
            tracing::info!(user_id = identity.user_id, book_id, "book purchased");
        }
        Ok(MessageResponse::new(outcome.message()))
    }

    /// Ids of books the caller has bought, in purchase order
    pub async fn purchased_ids(&self, identity: &Identity) -> AppResult<Vec<i64>> {
        self.users
            .find_by_id(identity.user_id)
            .await?
            .map(|u| u.purchased_book_ids)
            .ok_or(AppError::Unauthenticated)
    }
}
