use axum::http::{HeaderMap, header};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::application::comments::dto::Requester;

/// Claims minted by the external authentication service. This crate only
/// verifies them; issuance, refresh and OAuth flows live elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub email: String,
    pub role: String,
    pub exp: usize,
}

impl UserClaims {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::from_str(&self.sub).ok()
    }
}

pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.to_string())
}

pub fn decode_optional_user_claims(headers: &HeaderMap, secret: &str) -> Option<UserClaims> {
    let token = extract_bearer_token(headers)?;
    decode::<UserClaims>(
        &token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()
    .map(|d| d.claims)
}

/// Builds the requester identity the comment system needs: account id (if
/// any), email for vote identity, and the admin capability. Requests without
/// a valid token act as guests.
pub fn resolve_requester(headers: &HeaderMap, secret: &str) -> Requester {
    match decode_optional_user_claims(headers, secret) {
        Some(claims) => Requester {
            user_id: claims.user_id(),
            email: Some(claims.email.clone()),
            is_admin: claims.is_admin(),
        },
        None => Requester::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_garbage_token_yields_a_guest() {
        let headers = HeaderMap::new();
        let requester = resolve_requester(&headers, "secret");
        assert!(requester.user_id.is_none());
        assert!(!requester.is_admin);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer not-a-jwt".parse().unwrap());
        let requester = resolve_requester(&headers, "secret");
        assert!(requester.email.is_none());
    }

    #[test]
    fn admin_role_and_uuid_subject_are_recognized() {
        let claims = UserClaims {
            sub: "0192aa3e-0000-7000-8000-000000000000".into(),
            email: "mod@example.com".into(),
            role: "admin".into(),
            exp: 0,
        };
        assert!(claims.is_admin());
        assert!(claims.user_id().is_some());

        let guest_claims = UserClaims {
            sub: "not-a-uuid".into(),
            email: "x@example.com".into(),
            role: "user".into(),
            exp: 0,
        };
        assert!(!guest_claims.is_admin());
        assert!(guest_claims.user_id().is_none());
    }
}
