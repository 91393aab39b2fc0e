//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::books::models::{Book, BookRequest};
use crate::gateway::handlers::HealthResponse;
use crate::gateway::types::MessageResponse;
use crate::user_auth::models::{AuthResponse, LoginRequest, RegisterRequest};

/// JWT bearer security scheme
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            let scheme = HttpBuilder::new()
                .scheme(HttpAuthScheme::Bearer)
                .bearer_format("JWT")
                .description(Some("Token from POST /api/v1/auth/login: Bearer {token}"))
                .build();
            components.add_security_scheme("bearer_auth", SecurityScheme::Http(scheme));
        }
    }
}

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "BookerX Marketplace API",
        version = "1.0.0",
        description = "Book marketplace: accounts, bearer-token auth, catalog and purchases.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health_check,
        crate::user_auth::handlers::register,
        crate::user_auth::handlers::login,
        crate::user_auth::handlers::buy_book,
        crate::user_auth::handlers::purchased_books,
        crate::books::handlers::list_books,
        crate::books::handlers::get_book,
        crate::books::handlers::my_books,
        crate::books::handlers::create_book,
        crate::books::handlers::update_book,
        crate::books::handlers::delete_book,
    ),
    components(
        schemas(
            HealthResponse,
            MessageResponse,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            Book,
            BookRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration and login"),
        (name = "Books", description = "Book catalog (mutations require ownership or admin)"),
        (name = "User", description = "Purchases (auth required)"),
        (name = "System", description = "Health checks and system info")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::OpenApi;

    #[test]
    fn test_openapi_spec_generates() {
        let spec = ApiDoc::openapi();
        assert_eq!(spec.info.title, "BookerX Marketplace API");
        assert_eq!(spec.info.version, "1.0.0");
    }

    #[test]
    fn test_openapi_json_serializable() {
        let json_str = ApiDoc::openapi().to_json().unwrap();
        assert!(json_str.contains("BookerX Marketplace API"));
    }

    #[test]
    fn test_endpoints_registered() {
        let paths = ApiDoc::openapi().paths;
        for path in [
            "/api/v1/health",
            "/api/v1/auth/register",
            "/api/v1/auth/login",
            "/api/v1/books",
            "/api/v1/books/{id}",
            "/api/v1/books/mine",
            "/api/v1/books/{id}/buy",
            "/api/v1/user/purchases",
        ] {
            assert!(paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn test_security_scheme_registered() {
        let spec = ApiDoc::openapi();
        let components = spec.components.expect("should have components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
