//! Book catalog records and request DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Catalog entry. `author_id` is the owning user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    #[schema(example = "Rust in Action")]
    pub name: String,
    #[schema(example = "Programming")]
    pub category: String,
    #[schema(value_type = String, example = "39.99")]
    pub price: Decimal,
    pub description: Option<String>,
    pub author_id: i64,
    pub image_url: Option<String>,
    pub book_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Book {
    /// Text searched by `?q=`: name, category, price, description, author id, id.
    pub fn search_text(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.name,
            self.category,
            self.price,
            self.description.as_deref().unwrap_or_default(),
            self.author_id,
            self.id
        )
    }

    /// Case-insensitive substring match against `search_text`.
    pub fn matches(&self, needle: &str) -> bool {
        self.search_text()
            .to_lowercase()
            .contains(&needle.to_lowercase())
    }
}

/// Largest price `books_tb.price NUMERIC(12,2)` can hold.
pub const MAX_PRICE: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price < Decimal::ZERO {
        return Err(ValidationError::new("negative_price")
            .with_message("Price must be greater than or equal to 0.".into()));
    }
    if *price > MAX_PRICE {
        return Err(ValidationError::new("price_too_large")
            .with_message("Price must not exceed 9999999999.99.".into()));
    }
    if price.normalize().scale() > 2 {
        return Err(ValidationError::new("price_scale")
            .with_message("Price must have at most 2 decimal places.".into()));
    }
    Ok(())
}

/// Create/update payload.
///
/// `id` is only compared against the path on update. `author_id` is accepted
/// for wire compatibility and never trusted.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    #[serde(default)]
    pub id: Option<i64>,
    #[validate(length(min = 1, max = 200, message = "Name is required."))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "Category is required."))]
    pub category: String,
    #[schema(value_type = String, example = "39.99")]
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author_id: Option<i64>,
    #[serde(default)]
    #[validate(url(message = "Image URL is not valid."))]
    pub image_url: Option<String>,
    #[serde(default)]
    #[validate(url(message = "Book URL is not valid."))]
    pub book_url: Option<String>,
}

impl BookRequest {
    /// Trim the required text fields so blank values fail validation.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            category: self.category.trim().to_string(),
            ..self
        }
    }
}

/// Stored fields of a book, owner already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub description: Option<String>,
    pub author_id: i64,
    pub image_url: Option<String>,
    pub book_url: Option<String>,
}

impl BookDraft {
    /// Build from a request with the owner chosen by the caller, not the payload.
    pub fn from_request(req: BookRequest, author_id: i64) -> Self {
        Self {
            name: req.name,
            category: req.category,
            price: req.price,
            description: req.description,
            author_id,
            image_url: req.image_url,
            book_url: req.book_url,
        }
    }
}

/// `GET /books` query string
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Case-insensitive search text
    pub q: Option<String>,
}
