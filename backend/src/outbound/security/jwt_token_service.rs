//! HS256 JSON Web Token adapter for the [`TokenService`] port.

use std::fmt;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ports::{TokenError, TokenService};
use crate::domain::{AccessToken, UserId};

/// Claims carried by every access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub iss: String,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
    pub jti: String,
}

/// Signs and verifies access tokens with a shared secret.
#[derive(Clone)]
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    ttl: Duration,
}

impl fmt::Debug for JwtTokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtTokenService")
            .field("issuer", &self.issuer)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl JwtTokenService {
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use tenancy::outbound::security::JwtTokenService;
    ///
    /// let tokens = JwtTokenService::new(b"secret", "tenancy", Duration::from_secs(3600));
    /// # let _ = tokens;
    /// ```
    pub fn new(secret: &[u8], issuer: impl Into<String>, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            issuer: issuer.into(),
            ttl,
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation
    }

    fn claims_for(&self, user: &UserId) -> Claims {
        let iat = Utc::now().timestamp();
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        Claims {
            sub: user.to_string(),
            iss: self.issuer.clone(),
            iat,
            exp: iat.saturating_add(ttl),
            jti: Uuid::new_v4().to_string(),
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user: &UserId) -> Result<AccessToken, TokenError> {
        encode(
            &Header::new(Algorithm::HS256),
            &self.claims_for(user),
            &self.encoding,
        )
        .map(AccessToken::new)
        .map_err(|err| TokenError::signing(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation()).map_err(|err| {
            match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::expired(),
                _ => TokenError::invalid(err.to_string()),
            }
        })?;
        UserId::new(&data.claims.sub).map_err(|err| TokenError::invalid(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    const SECRET: &[u8] = b"test-secret";

    #[fixture]
    fn tokens() -> JwtTokenService {
        JwtTokenService::new(SECRET, "tenancy", Duration::from_secs(600))
    }

    fn sign(claims: &Claims, secret: &[u8]) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret),
        )
        .expect("sign")
    }

    #[rstest]
    fn issued_token_round_trips_to_the_user(tokens: JwtTokenService) {
        let user = UserId::random();
        let token = tokens.issue(&user).expect("issue");
        assert!(!token.as_str().is_empty());
        assert_eq!(tokens.verify(token.as_str()).expect("verify"), user);
    }

    #[rstest]
    fn each_token_gets_a_fresh_jti(tokens: JwtTokenService) {
        let user = UserId::random();
        let first = tokens.issue(&user).expect("issue");
        let second = tokens.issue(&user).expect("issue");
        assert_ne!(first.as_str(), second.as_str());
    }

    #[rstest]
    fn expired_tokens_are_reported_as_expired(tokens: JwtTokenService) {
        let mut claims = tokens.claims_for(&UserId::random());
        claims.iat -= 7200;
        claims.exp = claims.iat + 60;
        let token = sign(&claims, SECRET);

        assert_eq!(tokens.verify(&token), Err(TokenError::Expired));
    }

    #[rstest]
    fn wrong_secret_is_invalid(tokens: JwtTokenService) {
        let claims = tokens.claims_for(&UserId::random());
        let token = sign(&claims, b"other-secret");
        assert!(matches!(tokens.verify(&token), Err(TokenError::Invalid { .. })));
    }

    #[rstest]
    fn wrong_issuer_is_invalid(tokens: JwtTokenService) {
        let mut claims = tokens.claims_for(&UserId::random());
        claims.iss = "someone-else".to_owned();
        let token = sign(&claims, SECRET);
        assert!(matches!(tokens.verify(&token), Err(TokenError::Invalid { .. })));
    }

    #[rstest]
    fn non_uuid_subject_is_invalid(tokens: JwtTokenService) {
        let mut claims = tokens.claims_for(&UserId::random());
        claims.sub = "root".to_owned();
        let token = sign(&claims, SECRET);
        assert!(matches!(tokens.verify(&token), Err(TokenError::Invalid { .. })));
    }

    #[rstest]
    #[case("")]
    #[case("not.a.token")]
    fn garbage_is_invalid(tokens: JwtTokenService, #[case] token: &str) {
        assert!(matches!(tokens.verify(token), Err(TokenError::Invalid { .. })));
    }
}
