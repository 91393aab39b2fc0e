//! Account records and request/response DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Account role. Serialized as `"User"` / `"Admin"` in token claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(i16)]
pub enum Role {
    #[default]
    User = 0,
    Admin = 1,
}

impl Role {
    pub fn as_i16(self) -> i16 {
        self as i16
    }
}

impl TryFrom<i16> for Role {
    type Error = i16;

    fn try_from(v: i16) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Role::User),
            1 => Ok(Role::Admin),
            other => Err(other),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "User"),
            Role::Admin => write!(f, "Admin"),
        }
    }
}

/// Stored account. `password_digest` never leaves the service layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub password_digest: String,
    pub role: Role,
    /// Ordered, duplicate-free
    pub purchased_book_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn owns_purchase(&self, book_id: i64) -> bool {
        self.purchased_book_ids.contains(&book_id)
    }
}

/// Insert payload for the credential store
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_digest: String,
    pub role: Role,
}

/// Result of appending a purchase
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseOutcome {
    Appended(User),
    AlreadyOwned(User),
}

impl PurchaseOutcome {
    pub fn user(&self) -> &User {
        match self {
            Self::Appended(u) | Self::AlreadyOwned(u) => u,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Appended(_) => "bought",
            Self::AlreadyOwned(_) => "already bought",
        }
    }
}

/// Trim and lower-case an email so lookups and the uniqueness constraint
/// agree on one spelling.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// At least 8 characters with upper, lower, digit and symbol.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let rule = |code: &'static str, msg: &'static str| {
        Err(ValidationError::new(code).with_message(msg.into()))
    };

    if password.chars().count() < 8 {
        return rule("password_too_short", "Password must be at least 8 characters.");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return rule(
            "password_no_upper",
            "Password must contain at least one uppercase letter.",
        );
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return rule(
            "password_no_lower",
            "Password must contain at least one lowercase letter.",
        );
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return rule("password_no_digit", "Password must contain at least one number.");
    }
    if password.chars().all(|c| c.is_ascii_alphanumeric()) {
        return rule("password_no_symbol", "Password must contain at least one symbol.");
    }
    Ok(())
}

/// User Registration Request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "A")]
    #[validate(length(min = 1, max = 100, message = "Name is required."))]
    pub name: String,
    #[schema(example = "a@x.com")]
    #[validate(email(message = "Email is not valid."))]
    pub email: String,
    #[schema(example = "Secret1!")]
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,
}

impl RegisterRequest {
    /// Trim the name and normalize the email so validation sees what gets stored.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: normalize_email(&self.email),
            password: self.password,
        }
    }
}

/// User Login Request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "a@x.com")]
    #[validate(length(min = 1, message = "Email is required."))]
    pub email: String,
    #[schema(example = "Secret1!")]
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub name: String,
    pub email: String,
}
