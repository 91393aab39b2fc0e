use std::sync::Arc;

use crate::books::BookService;
use crate::books::store::BookStore;
use crate::config::JwtConfig;
use crate::user_auth::store::UserStore;
use crate::user_auth::{TokenIssuer, TokenVerifier, UserAuthService};

/// Gateway shared state
#[derive(Clone)]
pub struct AppState {
    /// Registration, login, token verification, purchases
    pub auth: Arc<UserAuthService>,
    /// Book catalog
    pub books: Arc<BookService>,
}

impl AppState {
    pub fn new(auth: Arc<UserAuthService>, books: Arc<BookService>) -> Self {
        Self { auth, books }
    }

    /// Wire services over the given stores. The JWT secret is captured here
    /// once and never reloaded.
    pub fn with_stores(
        users: Arc<dyn UserStore>,
        books: Arc<dyn BookStore>,
        jwt: &JwtConfig,
    ) -> Self {
        let auth = UserAuthService::new(
            users,
            books.clone(),
            TokenIssuer::new(jwt),
            Arc::new(TokenVerifier::new(jwt)),
        );
        Self::new(Arc::new(auth), Arc::new(BookService::new(books)))
    }
}
