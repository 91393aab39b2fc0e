//! Bearer tokens: HS256-signed JWTs carrying identity and role claims.
//!
//! Issuance and verification are pure functions of (claims | token, secret,
//! time). The `*_at` variants take the clock explicitly; the plain variants
//! read `Utc::now()`.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::models::{Role, User};
use crate::config::JwtConfig;

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user_id as string)
    pub sub: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub iss: String,
    pub aud: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration time (unix seconds)
    pub exp: i64,
}

/// Authenticated caller, passed explicitly to every protected operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Why a token was rejected. Only used for logging: every variant is
/// reported to the caller as the same `Unauthenticated` error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("missing token")]
    Missing,
    #[error("malformed token")]
    Malformed,
    #[error("bad signature")]
    BadSignature,
    #[error("token expired")]
    Expired,
    #[error("invalid claims: {0}")]
    InvalidClaims(String),
    #[error("signing failed: {0}")]
    Signing(String),
}

/// Mints signed bearer tokens.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    issuer: String,
    audience: String,
    lifetime: Duration,
}

impl TokenIssuer {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            lifetime: Duration::hours(config.lifetime_hours),
        }
    }

    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        self.issue_at(user, Utc::now())
    }

    /// Sign a claim set for `user` as if issued at `now`.
    pub fn issue_at(&self, user: &User, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user.user_id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }
}

/// Validates inbound bearer tokens.
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller-supplied clock in verify_at
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);

        Self {
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Check structure, signature, expiry (`exp > now`) and claims.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, TokenError> {
        if token.is_empty() {
            return Err(TokenError::Missing);
        }

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                ErrorKind::InvalidToken
                | ErrorKind::Base64(_)
                | ErrorKind::Utf8(_)
                | ErrorKind::InvalidAlgorithm => TokenError::Malformed,
                _ => TokenError::InvalidClaims(e.to_string()),
            }
        })?;

        let claims = data.claims;
        if claims.exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }

        let user_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| TokenError::InvalidClaims("sub is not a user id".to_string()))?;

        Ok(Identity {
            user_id,
            name: claims.name,
            email: claims.email,
            role: claims.role,
        })
    }

    /// Decode claims without the expiry check. Test helper for round-trips.
    #[cfg(test)]
    pub(crate) fn decode_claims(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|d| d.claims)
            .map_err(|e| TokenError::InvalidClaims(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SECRET: &str = "supersecretkey1234567890123456";

    fn config() -> JwtConfig {
        JwtConfig::new(SECRET)
    }

    fn user(role: Role) -> User {
        User {
            user_id: 42,
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            password_digest: "unused".to_string(),
            role,
            purchased_book_ids: vec![],
            created_at: Utc::now(),
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_round_trip_claims() {
        let issuer = TokenIssuer::new(&config());
        let verifier = TokenVerifier::new(&config());
        let u = user(Role::Admin);

        let token = issuer.issue_at(&u, t0()).unwrap();
        let claims = verifier.decode_claims(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.name, "A");
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.iat, t0().timestamp());
        assert_eq!(claims.exp, (t0() + Duration::hours(6)).timestamp());

        let identity = verifier.verify_at(&token, t0()).unwrap();
        assert_eq!(
            identity,
            Identity {
                user_id: 42,
                name: "A".to_string(),
                email: "a@x.com".to_string(),
                role: Role::Admin,
            }
        );
    }

    #[test]
    fn test_signing_is_deterministic() {
        let issuer = TokenIssuer::new(&config());
        let u = user(Role::User);
        assert_eq!(
            issuer.issue_at(&u, t0()).unwrap(),
            issuer.issue_at(&u, t0()).unwrap()
        );
    }

    #[test]
    fn test_expiry_boundary() {
        let issuer = TokenIssuer::new(&config());
        let verifier = TokenVerifier::new(&config());
        let token = issuer.issue_at(&user(Role::User), t0()).unwrap();

        let just_before = t0() + Duration::hours(6) - Duration::seconds(1);
        let just_after = t0() + Duration::hours(6) + Duration::seconds(1);
        assert!(verifier.verify_at(&token, just_before).is_ok());
        assert_eq!(
            verifier.verify_at(&token, just_after),
            Err(TokenError::Expired)
        );
        assert_eq!(
            verifier.verify_at(&token, t0() + Duration::hours(6)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_tampering_any_byte_is_rejected() {
        let issuer = TokenIssuer::new(&config());
        let verifier = TokenVerifier::new(&config());
        let token = issuer.issue_at(&user(Role::User), t0()).unwrap();
        let bytes = token.as_bytes();

        for i in 0..bytes.len() {
            let mut tampered = bytes.to_vec();
            tampered[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(tampered).unwrap();
            assert!(
                verifier.verify_at(&tampered, t0()).is_err(),
                "tampered byte {i} was accepted"
            );
        }
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = TokenIssuer::new(&JwtConfig::new("another-secret-another-secret-00"));
        let verifier = TokenVerifier::new(&config());
        let token = issuer.issue_at(&user(Role::User), t0()).unwrap();
        assert_eq!(
            verifier.verify_at(&token, t0()),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let mut other = config();
        other.audience = "someone-else".to_string();
        let token = TokenIssuer::new(&other)
            .issue_at(&user(Role::User), t0())
            .unwrap();
        assert!(TokenVerifier::new(&config()).verify_at(&token, t0()).is_err());
    }

    #[test]
    fn test_malformed_and_missing() {
        let verifier = TokenVerifier::new(&config());
        assert_eq!(verifier.verify_at("", t0()), Err(TokenError::Missing));
        assert!(verifier.verify_at("not-a-jwt", t0()).is_err());
        assert!(verifier.verify_at("a.b.c", t0()).is_err());
    }

    #[test]
    fn test_missing_role_claim_rejected() {
        #[derive(Serialize)]
        struct NoRole {
            sub: String,
            name: String,
            email: String,
            iss: String,
            aud: String,
            iat: i64,
            exp: i64,
        }
        let cfg = config();
        let claims = NoRole {
            sub: "1".into(),
            name: "A".into(),
            email: "a@x.com".into(),
            iss: cfg.issuer.clone(),
            aud: cfg.audience.clone(),
            iat: t0().timestamp(),
            exp: (t0() + Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(matches!(
            TokenVerifier::new(&cfg).verify_at(&token, t0()),
            Err(TokenError::InvalidClaims(_))
        ));
    }

    #[test]
    fn test_non_numeric_subject_rejected() {
        let cfg = config();
        let claims = Claims {
            sub: "alice".into(),
            name: "A".into(),
            email: "a@x.com".into(),
            role: Role::User,
            iss: cfg.issuer.clone(),
            aud: cfg.audience.clone(),
            iat: t0().timestamp(),
            exp: (t0() + Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(TokenVerifier::new(&cfg).verify_at(&token, t0()).is_err());
    }
}
