use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;

/// Claims of a token issued by the identity provider.
///
/// `sub` is the owner id every management operation is scoped to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// HS256 verifier (and, for development, issuer) of bearer tokens
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: Option<String>,
    token_minutes: u64,
}

impl JwtService {
    pub fn new(secret: &str, issuer: Option<String>, token_minutes: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            token_minutes,
        }
    }

    /// Create JwtService from config
    pub fn from_config(auth: &AuthConfig) -> Self {
        Self::new(&auth.jwt_secret, auth.issuer.clone(), auth.token_minutes)
    }

    /// Mint a token for `subject` (used by `linkhop issue-token`)
    pub fn issue_token(&self, subject: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.token_minutes as i64)).timestamp(),
            iss: self.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Validate signature, expiry and (when configured) issuer
    pub fn validate_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::default();
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)?;

        if token_data.claims.sub.trim().is_empty() {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidSubject,
            ));
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new("test_secret_key_32_bytes_long!!", None, 15)
    }

    #[test]
    fn test_issue_and_validate_token() {
        let service = create_test_service();
        let token = service.issue_token("user-42").unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "user-42");
        assert!(claims.exp > claims.iat);
        assert!(claims.iss.is_none());
    }

    #[test]
    fn test_invalid_token_rejected() {
        let service = create_test_service();
        assert!(service.validate_token("invalid.token.here").is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service1 = create_test_service();
        let service2 = JwtService::new("different_secret_key_32_bytes!!", None, 15);

        let token = service1.issue_token("user-42").unwrap();
        assert!(service2.validate_token(&token).is_err());
    }

    #[test]
    fn test_issuer_enforced_when_configured() {
        let secret = "test_secret_key_32_bytes_long!!";
        let strict = JwtService::new(secret, Some("idp.example".to_string()), 15);
        let other = JwtService::new(secret, Some("elsewhere".to_string()), 15);
        let none = JwtService::new(secret, None, 15);

        let token = strict.issue_token("u1").unwrap();
        assert_eq!(strict.validate_token(&token).unwrap().iss.as_deref(), Some("idp.example"));
        assert!(other.validate_token(&token).is_err());
        assert!(strict.validate_token(&none.issue_token("u1").unwrap()).is_err());
    }

    #[test]
    fn test_empty_subject_rejected() {
        let service = create_test_service();
        let token = service.issue_token("  ").unwrap();
        assert!(service.validate_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = create_test_service();

        // 过期时间超过默认 leeway
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: "user-42".to_string(),
            iat: (now - chrono::Duration::hours(2)).timestamp(),
            exp: (now - chrono::Duration::hours(1)).timestamp(),
            iss: None,
        };

        let encoding_key =
            jsonwebtoken::EncodingKey::from_secret(b"test_secret_key_32_bytes_long!!");
        let token =
            jsonwebtoken::encode(&jsonwebtoken::Header::default(), &claims, &encoding_key).unwrap();

        let result = service.validate_token(&token);
        assert!(
            result.is_err(),
            "Expected expired token to be rejected, but got: {:?}",
            result
        );
    }
}
