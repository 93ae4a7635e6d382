//! Bearer-token authentication for the REST surface.
//!
//! Token issuance lives in an external auth service; this module only
//! validates tokens and turns their claims into the typed
//! [`AuthenticatedUser`] request context consumed by handlers and services.

use std::future::{Ready, ready};

use actix_web::{Error, FromRequest, HttpRequest, dev::Payload, error::ErrorUnauthorized, web};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::domain::user::{AuthenticatedUser, Role};
use crate::models::config::ServerConfig;

/// JWT claims carried by the auth service's HS256 tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub name: String,
    pub email: String,
    pub role: String,
    /// Expiry, seconds since the epoch.
    pub exp: usize,
}

impl Claims {
    fn into_user(self) -> Result<AuthenticatedUser, String> {
        let id: i32 = self
            .sub
            .parse()
            .map_err(|_| format!("invalid subject: {}", self.sub))?;
        let role: Role = self.role.parse().map_err(|_| format!("unknown role: {}", self.role))?;
        Ok(AuthenticatedUser {
            id,
            name: self.name,
            email: self.email,
            role,
        })
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Decodes and validates a bearer token against the shared secret.
pub fn decode_token(token: &str, secret: &str) -> Result<AuthenticatedUser, String> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| format!("invalid token: {e}"))?;
    data.claims.into_user()
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = (|| {
            let config = req
                .app_data::<web::Data<ServerConfig>>()
                .ok_or_else(|| "server configuration missing".to_string())?;
            let token = bearer_token(req).ok_or_else(|| "missing bearer token".to_string())?;
            decode_token(token, &config.secret)
        })()
        .map_err(|reason| {
            log::debug!("Rejected request: {reason}");
            ErrorUnauthorized("authentication required")
        });

        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn token_for(role: &str, secret: &str) -> String {
        let claims = Claims {
            sub: "7".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            role: role.into(),
            exp: (Utc::now().timestamp() + 3600) as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn valid_token_yields_typed_user() {
        let token = token_for("accountant", "s3cret");
        let user = decode_token(&token, "s3cret").unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(user.role, Role::Accountant);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = token_for("admin", "s3cret");
        assert!(decode_token(&token, "other").is_err());
    }

    #[test]
    fn unknown_role_is_rejected() {
        let token = token_for("janitor", "s3cret");
        assert!(decode_token(&token, "s3cret").is_err());
    }
}
