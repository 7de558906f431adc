//! Token Issuer / Verifier
//!
//! Compact HS256 JWTs. Verification pins the algorithm, so a token
//! announcing any other algorithm (including `none`) is rejected before
//! its signature is even considered.

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::value_object::token_claims::TokenClaims;
use crate::error::{AuthError, AuthResult, TokenRejection};

const ALGORITHM: Algorithm = Algorithm::HS256;

/// A freshly signed token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies bearer tokens with one symmetric key
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: chrono::Duration,
    issuer: String,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = config.leeway_secs;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        validation.set_issuer(&[config.issuer.as_str()]);

        Self {
            encoding: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            ttl: config.token_ttl_chrono(),
            issuer: config.issuer.clone(),
        }
    }

    /// Issue a token for `user`, valid from now
    pub fn issue(&self, user: &User) -> AuthResult<IssuedToken> {
        self.issue_at(user, Utc::now())
    }

    /// Issue a token as if the current time were `issued_at`
    pub fn issue_at(&self, user: &User, issued_at: DateTime<Utc>) -> AuthResult<IssuedToken> {
        let claims = TokenClaims::for_user(user, issued_at, self.ttl, &self.issuer)
            .ok_or_else(|| AuthError::TokenSigning("expiry out of range".to_string()))?;
        let expires_at = claims
            .expires_at()
            .ok_or_else(|| AuthError::TokenSigning("expiry out of range".to_string()))?;

        let token = jsonwebtoken::encode(&Header::new(ALGORITHM), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenSigning(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Check algorithm, signature, issuer and time window; return the claims
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenRejection> {
        jsonwebtoken::decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| rejection(e.kind()))
    }
}

fn rejection(kind: &JwtErrorKind) -> TokenRejection {
    match kind {
        JwtErrorKind::ExpiredSignature => TokenRejection::Expired,
        JwtErrorKind::ImmatureSignature => TokenRejection::NotYetValid,
        JwtErrorKind::InvalidSignature => TokenRejection::BadSignature,
        JwtErrorKind::InvalidAlgorithm
        | JwtErrorKind::InvalidAlgorithmName
        | JwtErrorKind::MissingAlgorithm => TokenRejection::AlgorithmMismatch,
        JwtErrorKind::InvalidIssuer => TokenRejection::WrongIssuer,
        _ => TokenRejection::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{
        email::Email, person_name::PersonName, user_name::UserName,
        user_password::{RawPassword, UserPassword},
    };
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use platform::password::HashCost;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig::with_secret(secret)
    }

    fn user() -> User {
        let raw = RawPassword::new("secret1".to_string()).unwrap();
        User::new(
            Email::new("a@x.com").unwrap(),
            UserName::new("alice").unwrap(),
            UserPassword::from_raw(&raw, HashCost::new(8, 1, 1), None).unwrap(),
            PersonName::new("First name", "A").unwrap(),
            PersonName::new("Last name", "L").unwrap(),
        )
    }

    #[test]
    fn test_issue_then_verify() {
        let service = TokenService::new(&config("k1"));
        let user = user();
        let issued = service.issue(&user).unwrap();

        assert_eq!(issued.token.split('.').count(), 3);

        let claims = service.verify(&issued.token).unwrap();
        assert_eq!(claims.sub, user.user_id.to_string());
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.iss, "hermes-api");
        assert_eq!(claims.exp - claims.iat, 86_400);
        assert_eq!(claims.user_id().unwrap(), user.user_id);
        assert_eq!(claims.expires_at(), Some(issued.expires_at));
    }

    #[test]
    fn test_expired_token_fails() {
        let service = TokenService::new(&config("k1"));
        let issued = service
            .issue_at(&user(), Utc::now() - chrono::Duration::hours(25))
            .unwrap();
        assert_eq!(service.verify(&issued.token), Err(TokenRejection::Expired));
    }

    #[test]
    fn test_other_secret_fails() {
        let issuer = TokenService::new(&config("k1"));
        let verifier = TokenService::new(&config("k2"));
        let issued = issuer.issue(&user()).unwrap();
        assert_eq!(
            verifier.verify(&issued.token),
            Err(TokenRejection::BadSignature)
        );
    }

    #[test]
    fn test_other_algorithm_fails() {
        let service = TokenService::new(&config("k1"));
        let claims = TokenClaims::for_user(
            &user(),
            Utc::now(),
            chrono::Duration::hours(1),
            "hermes-api",
        )
        .unwrap();
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(b"k1"),
        )
        .unwrap();
        assert_eq!(
            service.verify(&token),
            Err(TokenRejection::AlgorithmMismatch)
        );
    }

    #[test]
    fn test_alg_none_fails() {
        let service = TokenService::new(&config("k1"));
        let claims = TokenClaims::for_user(
            &user(),
            Utc::now(),
            chrono::Duration::hours(1),
            "hermes-api",
        )
        .unwrap();
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
        let token = format!("{header}.{payload}.");
        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn test_wrong_issuer_fails() {
        let issuer = TokenService::new(&AuthConfig {
            issuer: "someone-else".to_string(),
            ..config("k1")
        });
        let verifier = TokenService::new(&config("k1"));
        let issued = issuer.issue(&user()).unwrap();
        assert_eq!(
            verifier.verify(&issued.token),
            Err(TokenRejection::WrongIssuer)
        );
    }

    #[test]
    fn test_out_of_range_ttl_is_an_error() {
        let service = TokenService::new(&AuthConfig {
            token_ttl: std::time::Duration::from_secs(10_000_000_000_000),
            ..config("k1")
        });
        let err = service.issue(&user()).unwrap_err();
        assert!(matches!(err, AuthError::TokenSigning(_)));
        assert_eq!(err.into_app_error().status_code(), 500);
    }

    #[test]
    fn test_garbage_is_malformed() {
        let service = TokenService::new(&config("k1"));
        assert_eq!(service.verify("abc"), Err(TokenRejection::Malformed));
        assert_eq!(service.verify(""), Err(TokenRejection::Malformed));
    }
}
